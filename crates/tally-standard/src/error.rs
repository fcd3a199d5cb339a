//! Error types for standardization.

use thiserror::Error;

/// Result type for standardization setup.
pub type Result<T> = std::result::Result<T, StandardError>;

/// Errors raised while configuring a standardizer.
///
/// Mapping a row never fails: a row no rule claims stays unmapped.
#[derive(Debug, Error)]
pub enum StandardError {
    /// An override names a canonical concept that does not exist
    #[error("Unknown standard concept: {0}")]
    UnknownConcept(String),

    /// Override table could not be read
    #[error("Invalid override table: {0}")]
    InvalidOverrides(#[from] serde_json::Error),
}
