#![forbid(unsafe_code)]

use lineage_core::LineageError;
use lineage_trace::TraceError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("cannot read snapshot {path}: {source}")]
    Snapshot {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Lineage(#[from] LineageError),
    #[error(transparent)]
    Trace(#[from] TraceError),
    #[error("write output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("write output: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// 2 for caller-supplied arguments the analysis rejected, 1 otherwise.
    pub(crate) fn exit_code(&self) -> u8 {
        match self {
            Self::Trace(TraceError::InvalidDepth(_))
            | Self::Trace(TraceError::UnknownFilter(_))
            | Self::Trace(TraceError::UnknownDirection(_))
            | Self::Trace(TraceError::Lineage(LineageError::UnknownRelationship(_)))
            | Self::Lineage(LineageError::UnknownRelationship(_)) => 2,
            Self::Snapshot { .. }
            | Self::Lineage(_)
            | Self::Trace(TraceError::Lineage(_))
            | Self::Output(_)
            | Self::Io(_) => 1,
        }
    }
}
