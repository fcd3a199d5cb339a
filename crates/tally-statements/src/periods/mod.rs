//! Period selection.
//!
//! Candidates are enumerated from the fact table, filtered against fiscal
//! calendar and fact-count floors, then ranked. Quarterly labels always come
//! from the period's own dates, never from the filer's fiscal-period tags.

pub mod candidate;
pub mod fiscal;
pub mod selector;
pub mod ttm;

pub use candidate::PeriodCandidate;
pub use fiscal::FiscalCalendar;
pub use selector::{
    DiscreteFirst, MaterialCoverage, PeriodSelector, Rejection, SelectionRequest, Selection,
    YtdPreference,
};

use crate::facts::FactOrigin;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tally_xbrl::Period;

/// Which periods a statement presents.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// Fiscal years
    #[default]
    Annual,
    /// Discrete quarters and year-to-date periods
    Quarterly,
    /// Trailing twelve months
    #[display("TTM")]
    Ttm,
}

impl Cadence {
    /// Returns true if a fact of `origin` covering a period of `shape` can
    /// back a column at this cadence.
    pub const fn admits(self, shape: PeriodShape, origin: FactOrigin) -> bool {
        match (self, shape) {
            (_, PeriodShape::Instant) => matches!(origin, FactOrigin::Reported),
            (Self::Annual, PeriodShape::Annual) => matches!(origin, FactOrigin::Reported),
            (Self::Quarterly, PeriodShape::Quarter) => {
                matches!(origin, FactOrigin::Reported | FactOrigin::DerivedQ4)
            }
            (Self::Quarterly, PeriodShape::HalfYear | PeriodShape::NineMonths) => {
                matches!(origin, FactOrigin::Reported)
            }
            (Self::Ttm, PeriodShape::Annual) => {
                matches!(origin, FactOrigin::Reported | FactOrigin::Ttm)
            }
            _ => false,
        }
    }
}

/// Duration class of a period, by length in days.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PeriodShape {
    /// Point in time
    Instant,
    /// Roughly three months
    Quarter,
    /// Roughly six months
    HalfYear,
    /// Roughly nine months
    NineMonths,
    /// Roughly a year
    Annual,
    /// Anything else (stub periods, transition periods)
    Other,
}

impl PeriodShape {
    /// Classifies a period by length.
    ///
    /// Bands are wide enough for 52/53-week fiscal calendars.
    pub fn of(period: &Period) -> Self {
        if period.is_instant() {
            return Self::Instant;
        }
        match period.days() {
            80..=100 => Self::Quarter,
            170..=200 => Self::HalfYear,
            260..=290 => Self::NineMonths,
            350..=380 => Self::Annual,
            _ => Self::Other,
        }
    }

    /// Returns true for multi-quarter periods shorter than a year.
    pub const fn is_ytd(self) -> bool {
        matches!(self, Self::HalfYear | Self::NineMonths)
    }
}
