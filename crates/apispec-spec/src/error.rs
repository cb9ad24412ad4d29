use thiserror::Error;

/// Errors produced while building, encoding or decoding a specification.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Operation docs attached to an endpoint could not be parsed.
    #[error("invalid docs for {method} {path}: {reason}")]
    InvalidDocs {
        method: String,
        path: String,
        reason: String,
    },

    /// Operation docs parsed, but are not an object.
    #[error("docs for {method} {path} must be an object")]
    DocsNotAnObject { method: String, path: String },

    /// JSON/YAML decode error.
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON/YAML encode error.
    #[error("serialization error: {0}")]
    Serialize(String),
}
