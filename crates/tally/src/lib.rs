#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tally/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod entity;
pub mod error;
pub mod filing;
pub mod form;
pub mod stitch;

// Re-export the layers
pub use tally_output as output;
pub use tally_standard as standard;
pub use tally_statements as statements;
pub use tally_xbrl as xbrl;

pub use batch::{BatchFailure, BatchOutcome, parse_filings};
pub use config::Config;
pub use entity::Entity;
pub use error::{Result, TallyError};
pub use filing::{Filing, FilingSource};
pub use form::{FormType, StatementStrategy};
pub use stitch::{ColumnKey, ColumnSource, RowKey, StitchConfig, StitchInput, Stitched, Stitcher};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
