use thiserror::Error;

/// Unified error type for the sift workspace.
#[derive(Error, Debug)]
pub enum SiftError {
    // ── Input errors ───────────────────────────────────────────
    #[error("invalid input: record '{id}': {reason}")]
    InvalidInput { id: String, reason: String },

    #[error("malformed attribute '{key}': {reason}")]
    MalformedAttribute { key: String, reason: String },

    #[error("duplicate record id: {0}")]
    DuplicateId(String),

    #[error("invalid mapping pattern: {0}")]
    InvalidPattern(String),

    // ── Candidate source errors ────────────────────────────────
    #[error("candidate source error: {source_name}: {reason}")]
    Source { source_name: String, reason: String },

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl SiftError {
    /// Shorthand for an [`SiftError::InvalidInput`] on a record id.
    pub fn invalid(id: impl Into<String>, reason: impl Into<String>) -> Self {
        SiftError::InvalidInput {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiftError>;
