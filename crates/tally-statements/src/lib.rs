#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tally/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod config;
pub mod error;
pub mod facts;
pub mod kind;
pub mod normalize;
pub mod periods;
pub mod splits;
pub mod statement;

pub use builder::{BuildContext, StatementBuilder};
pub use config::{NormalizerConfig, Scale, SelectorConfig, SplitConfig, StatementOptions};
pub use error::{Result, StatementError};
pub use facts::{FactOrigin, FactTable, NormalizedFact, ValueKind};
pub use normalize::Normalizer;
pub use periods::{
    Cadence, FiscalCalendar, MaterialCoverage, PeriodCandidate, PeriodSelector, PeriodShape,
    YtdPreference,
};
pub use splits::{CorporateActionAdjuster, SplitDetection, SplitEvent};
pub use statement::{
    Cell, Confidence, Statement, StatementPeriod, StatementRow, StatementTable, TableRecord,
};
