//! Period candidates and their labels.

use super::{Cadence, FiscalCalendar, PeriodShape};
use serde::{Deserialize, Serialize};
use tally_xbrl::Period;

/// A period that could become a statement column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCandidate {
    /// The period itself
    pub period: Period,
    /// Duration class
    pub shape: PeriodShape,
    /// Display label, e.g. `FY 2024`, `Q2 YTD 2024` or `2024-06-30`
    pub label: String,
    /// Fiscal year the period closes
    pub fiscal_year: i32,
    /// Fiscal quarter the period closes, for sub-annual durations
    pub fiscal_quarter: Option<u8>,
    /// Distinct statement concepts with a value in this period
    pub fact_count: usize,
    /// Distinct essential balance sheet concepts with a value
    pub essential_count: usize,
    /// Whether the end date matches the fiscal calendar
    pub aligned: bool,
    /// Coverage plus alignment
    pub score: f64,
    /// Whether any backing fact was derived rather than reported
    pub derived: bool,
}

impl PeriodCandidate {
    /// Creates an unscored candidate with its label computed from its dates.
    pub fn new(period: Period, calendar: &FiscalCalendar) -> Self {
        let shape = PeriodShape::of(&period);
        let end = period.end();
        let fiscal_year = calendar.fiscal_year(end);
        let fiscal_quarter = matches!(
            shape,
            PeriodShape::Quarter | PeriodShape::HalfYear | PeriodShape::NineMonths
        )
        .then(|| calendar.quarter(end));
        Self {
            label: label(&period, shape, fiscal_year, fiscal_quarter),
            period,
            shape,
            fiscal_year,
            fiscal_quarter,
            fact_count: 0,
            essential_count: 0,
            aligned: false,
            score: 0.0,
            derived: false,
        }
    }

    /// Marks the candidate as backed by derived facts.
    ///
    /// A derived year-long period under the TTM cadence is a trailing year,
    /// labeled by its end date rather than a fiscal year.
    pub fn mark_derived(&mut self, cadence: Cadence) {
        self.derived = true;
        if cadence == Cadence::Ttm && self.shape == PeriodShape::Annual {
            self.label = format!("TTM {}", self.period.end());
        }
    }

    /// Returns true for year-to-date periods longer than a quarter.
    pub const fn is_ytd(&self) -> bool {
        self.shape.is_ytd()
    }

    /// Shorthand for the end date.
    pub const fn end(&self) -> chrono::NaiveDate {
        self.period.end()
    }
}

/// Builds the display label from the period's own dates.
///
/// Filer-supplied fiscal period tags are ignored.
fn label(period: &Period, shape: PeriodShape, fiscal_year: i32, fiscal_quarter: Option<u8>) -> String {
    match (shape, fiscal_quarter) {
        (PeriodShape::Instant, _) => period.end().to_string(),
        (PeriodShape::Annual, _) => format!("FY {fiscal_year}"),
        (PeriodShape::Quarter, Some(q)) => format!("Q{q} {fiscal_year}"),
        (PeriodShape::HalfYear | PeriodShape::NineMonths, Some(q)) => {
            format!("Q{q} YTD {fiscal_year}")
        }
        _ => period.to_string(),
    }
}
