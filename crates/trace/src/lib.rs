#![forbid(unsafe_code)]

//! Traceability and impact analysis over a [`lineage_core::LineageGraph`].
//!
//! Every entry point is a pure function of the loaded graph; nothing is
//! cached between calls, so a refreshed snapshot never yields stale numbers.

mod error;

pub mod coverage;
pub mod filter;
pub mod impact;
pub mod orphans;

pub use coverage::{Coverage, CoverageMatrix, CoverageStats, TraceabilityRow};
pub use error::TraceError;
pub use filter::{CoverageFilter, filter_rows};
pub use impact::{
    DEFAULT_MAX_DEPTH, Direction, ImpactNode, ImpactQuery, ImpactResult, MaxDepth, analyze_impact,
};
pub use orphans::{OrphanReport, find_orphans};
