//! Error types for the pcorr-explorer library.

use thiserror::Error;

/// Main error type for the library.
///
/// Every domain variant is recoverable: callers degrade to an empty view,
/// no highlight, or a skipped widget rather than aborting the session.
#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("Malformed identifier '{identifier}': expected {expected} entities, found {found}")]
    MalformedIdentifier {
        identifier: String,
        expected: String,
        found: usize,
    },

    #[error("\"{0}\" not found in CCL or Lineage")]
    HighlightNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExplorerError {
    /// Shorthand for a [`ExplorerError::NotFound`] of the given kind.
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Whether the error is one the browsing surface should show as an
    /// inline warning (as opposed to an I/O or configuration failure).
    /// The CLI logs these and exits successfully.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::MalformedIdentifier { .. }
                | Self::HighlightNotFound(_)
                | Self::InvalidInput(_)
                | Self::EmptyData(_)
        )
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;
