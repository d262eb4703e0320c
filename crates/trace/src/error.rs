#![forbid(unsafe_code)]

use lineage_core::LineageError;

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("invalid depth {0}: depth must not be negative")]
    InvalidDepth(i64),
    #[error("unknown coverage filter {0:?} (expected all|covered|partial|uncovered)")]
    UnknownFilter(String),
    #[error("unknown direction {0:?} (expected upstream|downstream)")]
    UnknownDirection(String),
    #[error(transparent)]
    Lineage(#[from] LineageError),
}
