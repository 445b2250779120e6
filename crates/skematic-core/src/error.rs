//! # Error Types
//!
//! Hard-failure categories for the toolkit. Structurally invalid *data* is
//! never an error here — the validator reports it as `ValidationError`
//! values and callers branch on `is_valid`. The variants below cover the
//! only conditions allowed to surface as `Err`: inputs that cannot be
//! decoded at all, and caller misuse at the engine boundary.

use thiserror::Error;

/// Top-level error type for Skematic.
#[derive(Error, Debug)]
pub enum SkematicError {
    /// A schema or sample document could not be read or decoded.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The caller handed the engine input it cannot represent.
    #[error("invalid engine input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_load_display() {
        let err = SkematicError::DocumentLoad {
            path: "fixtures/users.yaml".into(),
            reason: "invalid YAML: mapping values are not allowed".into(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("fixtures/users.yaml"));
        assert!(rendered.contains("invalid YAML"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SkematicError = io.into();
        assert!(matches!(err, SkematicError::Io(_)));
    }
}
