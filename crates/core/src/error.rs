#![forbid(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum LineageError {
    #[error("invalid vocabulary entry {name:?}: {reason}")]
    Vocabulary { name: String, reason: &'static str },
    #[error("unknown relationship: {0}")]
    UnknownRelationship(String),
    #[error("unsupported vocabulary file format: {0}")]
    UnsupportedFormat(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
