#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tally/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod instance;
pub mod taxonomy;

mod xml;

pub use cache::TaxonomyCache;
pub use error::{Diagnostics, IssueKind, ParseIssue, Result, XbrlError};
pub use instance::{
    Context, ContextKey, Decimals, Dimension, DimensionValue, DocumentInfo, Fact, FactValue,
    FiscalYearEnd, Instance, Period, Unit,
};
pub use taxonomy::{
    BalanceType, Concept, ConceptId, PeriodType, PresentationNetwork, StatementKind, Taxonomy,
    TaxonomyBundle,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
