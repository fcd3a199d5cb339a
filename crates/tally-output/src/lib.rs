#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tally/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod frame;
pub mod render;

pub use export::{ExportError, ExportFormat, Exporter};
pub use frame::{to_frame, to_wide_frame};
pub use render::{to_ascii_table, to_markdown};
