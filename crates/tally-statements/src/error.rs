//! Error types for statement construction.

use tally_xbrl::XbrlError;
use thiserror::Error;

/// Result type for statement operations.
pub type Result<T> = std::result::Result<T, StatementError>;

/// Errors that can occur while building statements.
///
/// Sparse data is not an error: a statement without usable periods comes back
/// empty with low confidence.
#[derive(Debug, Error)]
pub enum StatementError {
    /// Underlying parse failure
    #[error(transparent)]
    Xbrl(#[from] XbrlError),

    /// A configuration value is out of range
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}
