//! Fiscal calendar arithmetic.

use super::PeriodShape;
use crate::facts::FactTable;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tally_xbrl::{DocumentInfo, FiscalYearEnd};

/// Days before a fiscal year end that still belong to that fiscal year.
///
/// Covers 52/53-week years that close a few days into the next month.
const FISCAL_YEAR_GRACE_DAYS: u64 = 45;

/// Days a 52/53-week quarter may run past its nominal month.
const QUARTER_END_SLACK_DAYS: u64 = 7;

/// A company's fiscal calendar, anchored on its fiscal year end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalCalendar {
    /// Fiscal year end month and day
    pub year_end: FiscalYearEnd,
}

impl Default for FiscalCalendar {
    fn default() -> Self {
        Self::new(FiscalYearEnd::DECEMBER)
    }
}

impl FiscalCalendar {
    /// Creates a calendar for the given fiscal year end.
    pub const fn new(year_end: FiscalYearEnd) -> Self {
        Self { year_end }
    }

    /// Works out the fiscal year end of a filing.
    ///
    /// Uses the cover page when it declares one, then the document period end
    /// of an annual report, then the end of the best-covered annual period in
    /// the facts. Defaults to December.
    pub fn detect(info: &DocumentInfo, facts: &FactTable) -> Self {
        if let Some(year_end) = info.fiscal_year_end {
            return Self::new(year_end);
        }
        if info.fiscal_period_focus.as_deref() == Some("FY")
            && let Some(end) = info.period_end
        {
            return Self::new(FiscalYearEnd::from_date(end));
        }

        let mut annual: HashMap<NaiveDate, usize> = HashMap::new();
        for fact in facts.facts() {
            if !fact.origin.is_derived() && PeriodShape::of(&fact.period) == PeriodShape::Annual {
                *annual.entry(fact.period.end()).or_default() += 1;
            }
        }
        annual
            .into_iter()
            .max_by_key(|(end, count)| (*count, *end))
            .map_or_else(Self::default, |(end, _)| {
                tracing::debug!(%end, "fiscal year end inferred from annual facts");
                Self::new(FiscalYearEnd::from_date(end))
            })
    }

    /// Whole months from the fiscal year end month to `end`'s month, 0-11.
    pub fn months_after_year_end(&self, end: NaiveDate) -> u32 {
        (end.month() + 12 - self.year_end.month) % 12
    }

    /// Fiscal quarter (1-4) a period ending on `end` closes.
    ///
    /// Quarter ends may drift one month either side of the nominal boundary,
    /// so each quarter owns a three-month window centred on it.
    pub fn quarter(&self, end: NaiveDate) -> u8 {
        match self.months_after_year_end(end) {
            2..=4 => 1,
            5..=7 => 2,
            8..=10 => 3,
            _ => 4,
        }
    }

    /// Fiscal year a period ending on `end` belongs to: the calendar year of
    /// the first fiscal year end on or after `end` less the grace window.
    pub fn fiscal_year(&self, end: NaiveDate) -> i32 {
        let cutoff = end
            .checked_sub_days(Days::new(FISCAL_YEAR_GRACE_DAYS))
            .unwrap_or(end);
        let this_year = self.year_end_in(cutoff.year());
        if this_year >= cutoff {
            this_year.year()
        } else {
            cutoff.year() + 1
        }
    }

    /// Fiscal year end date falling in calendar `year`, clamped to the last
    /// day of short months.
    pub fn year_end_in(&self, year: i32) -> NaiveDate {
        let FiscalYearEnd { month, day } = self.year_end;
        (28..=day.max(28))
            .rev()
            .find_map(|d| NaiveDate::from_ymd_opt(year, month, d.min(day)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Returns true if `end` falls within `tolerance` months of the fiscal
    /// year end month.
    pub fn is_year_end_aligned(&self, end: NaiveDate, tolerance: u32) -> bool {
        let after = self.months_after_year_end(end);
        after <= tolerance || 12 - after <= tolerance
    }

    /// Returns true if `end` closes a fiscal quarter, allowing a week of
    /// slack into the following month.
    pub fn is_quarter_end(&self, end: NaiveDate) -> bool {
        let on_boundary = |date: NaiveDate| self.months_after_year_end(date) % 3 == 0;
        on_boundary(end)
            || end
                .checked_sub_days(Days::new(QUARTER_END_SLACK_DAYS))
                .is_some_and(on_boundary)
    }
}
