#![forbid(unsafe_code)]

//! Lineage graph model: typed delivery artifacts, their relationships, the
//! configurable type vocabulary, and a read-only index over a snapshot.

mod error;
pub mod graph;
pub mod model;
pub mod vocabulary;

pub use error::LineageError;
pub use graph::{IntegrityIssue, IntegrityReport, LineageGraph};
pub use model::{Edge, Node, NodeType, Relationship, Snapshot};
pub use vocabulary::{CoverageLayers, Vocabulary, VocabularyNameError, validate_vocabulary_name};
