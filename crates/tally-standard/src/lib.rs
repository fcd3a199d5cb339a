#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tally/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod concept;
pub mod derived;
pub mod error;
pub mod mapper;
pub mod pattern;
pub mod standardizer;

pub use concept::StandardConcept;
pub use derived::{DerivedRule, derive_missing};
pub use error::{Result, StandardError};
pub use mapper::ConceptMapper;
pub use pattern::PatternRule;
pub use standardizer::{Mapping, MappingSource, StandardizeReport, Standardizer, StandardizerConfig};
