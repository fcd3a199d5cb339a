//! Error types for filing and entity operations.

use tally_standard::StandardError;
use tally_statements::StatementError;
use tally_xbrl::XbrlError;
use thiserror::Error;

/// Result type for filing and entity operations.
pub type Result<T> = std::result::Result<T, TallyError>;

/// Errors that can occur while reconstructing statements.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Taxonomy or instance could not be parsed
    #[error(transparent)]
    Xbrl(#[from] XbrlError),

    /// Invalid statement configuration
    #[error(transparent)]
    Statement(#[from] StatementError),

    /// Invalid standardization overrides
    #[error(transparent)]
    Standard(#[from] StandardError),

    /// Configuration could not be deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// An entity needs at least one filing
    #[error("No filings given")]
    NoFilings,

    /// Filings of different companies were combined
    #[error("Filing {accession} belongs to {found}, expected {expected}")]
    MixedEntities {
        /// Entity of the first filing
        expected: String,
        /// Entity of the offending filing
        found: String,
        /// Accession number of the offending filing
        accession: String,
    },
}
