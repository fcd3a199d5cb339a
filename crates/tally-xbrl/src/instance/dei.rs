//! Cover-page facts from the `dei` namespace.

use super::context::parse_date;
use super::fact::Fact;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Month and day of a fiscal year end, from `--MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FiscalYearEnd {
    /// Month, 1-12
    pub month: u32,
    /// Day of month
    pub day: u32,
}

impl FiscalYearEnd {
    /// Calendar year end.
    pub const DECEMBER: Self = Self { month: 12, day: 31 };

    /// Parses `--MM-DD` (also accepts `MM-DD` and `MMDD`).
    pub fn parse(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != 4 {
            return None;
        }
        let month: u32 = digits[..2].parse().ok()?;
        let day: u32 = digits[2..].parse().ok()?;
        ((1..=12).contains(&month) && (1..=31).contains(&day)).then_some(Self { month, day })
    }

    /// Fiscal year end taken from a known annual period end date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

/// Document and entity information reported on the cover page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// `dei:DocumentType` (e.g. "10-K")
    pub document_type: Option<String>,
    /// `dei:DocumentPeriodEndDate`
    pub period_end: Option<NaiveDate>,
    /// `dei:DocumentFiscalYearFocus`
    pub fiscal_year_focus: Option<i32>,
    /// `dei:DocumentFiscalPeriodFocus` (e.g. "FY", "Q2")
    pub fiscal_period_focus: Option<String>,
    /// `dei:CurrentFiscalYearEndDate`
    pub fiscal_year_end: Option<FiscalYearEnd>,
    /// `dei:EntityRegistrantName`
    pub registrant_name: Option<String>,
    /// `dei:EntityCentralIndexKey`
    pub cik: Option<String>,
    /// `dei:AmendmentFlag`
    pub amendment: Option<bool>,
}

impl DocumentInfo {
    /// Extracts cover facts, preferring consolidated contexts.
    pub fn from_facts(facts: &[Fact]) -> Self {
        let text = |name: &str| -> Option<String> {
            facts
                .iter()
                .filter(|f| f.concept.name == name && f.concept.prefix.starts_with("dei"))
                .min_by_key(|f| !f.is_consolidated())
                .and_then(|f| f.value.as_text().map(|t| t.trim().to_string()))
                .filter(|t| !t.is_empty())
        };

        Self {
            document_type: text("DocumentType"),
            period_end: text("DocumentPeriodEndDate").and_then(|d| parse_date(&d).ok()),
            fiscal_year_focus: text("DocumentFiscalYearFocus").and_then(|y| y.parse().ok()),
            fiscal_period_focus: text("DocumentFiscalPeriodFocus"),
            fiscal_year_end: text("CurrentFiscalYearEndDate")
                .and_then(|d| FiscalYearEnd::parse(&d)),
            registrant_name: text("EntityRegistrantName"),
            cik: text("EntityCentralIndexKey"),
            amendment: text("AmendmentFlag").map(|f| f.eq_ignore_ascii_case("true")),
        }
    }
}
