//! Form types and the statement layout each one presents.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tally_statements::{Cadence, StatementOptions};
use tally_xbrl::StatementKind;

/// SEC form types with distinct statement layouts.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    /// Annual report
    #[display("10-K")]
    TenK,
    /// Amended annual report
    #[display("10-K/A")]
    TenKA,
    /// Quarterly report
    #[display("10-Q")]
    TenQ,
    /// Amended quarterly report
    #[display("10-Q/A")]
    TenQA,
    /// Annual report of a foreign private issuer
    #[display("20-F")]
    TwentyF,
    /// Annual report of a Canadian issuer
    #[display("40-F")]
    FortyF,
    /// Anything else; treated as annual
    #[display("{_0}")]
    Other(String),
}

impl FormType {
    /// Parses a form name as it appears in `dei:DocumentType` or an EDGAR
    /// index. Never fails; unknown names become [`FormType::Other`].
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_uppercase().replace(' ', "");
        match normalized.as_str() {
            "10-K" | "10K" | "10-KT" => Self::TenK,
            "10-K/A" | "10-KA" | "10-KT/A" => Self::TenKA,
            "10-Q" | "10Q" | "10-QT" => Self::TenQ,
            "10-Q/A" | "10-QA" | "10-QT/A" => Self::TenQA,
            "20-F" | "20-F/A" => Self::TwentyF,
            "40-F" | "40-F/A" => Self::FortyF,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Returns true for amendments.
    pub const fn is_amendment(&self) -> bool {
        matches!(self, Self::TenKA | Self::TenQA)
    }

    /// Returns true for forms reporting sub-annual periods.
    pub const fn is_quarterly(&self) -> bool {
        matches!(self, Self::TenQ | Self::TenQA)
    }

    /// The statement layout for this form.
    pub const fn strategy(&self) -> StatementStrategy {
        match self {
            Self::TenQ | Self::TenQA => StatementStrategy::for_cadence(Cadence::Quarterly),
            Self::TenK | Self::TenKA | Self::TwentyF | Self::FortyF | Self::Other(_) => {
                StatementStrategy::for_cadence(Cadence::Annual)
            }
        }
    }
}

/// Cadence and column counts a form presents.
///
/// Quarterly reports show the current and prior-year quarter plus both
/// year-to-date periods; annual reports show two balance sheet dates and three
/// fiscal years of flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementStrategy {
    /// Period cadence
    pub cadence: Cadence,
    /// Columns on the balance sheet
    pub balance_sheet_periods: usize,
    /// Columns on the income, cash flow and equity statements
    pub flow_periods: usize,
}

impl StatementStrategy {
    /// Number of columns for `kind`.
    pub const fn max_periods(&self, kind: StatementKind) -> usize {
        match kind {
            StatementKind::BalanceSheet => self.balance_sheet_periods,
            StatementKind::IncomeStatement | StatementKind::CashFlow | StatementKind::Equity => {
                self.flow_periods
            }
        }
    }

    /// `base` with this strategy's cadence and column count for `kind`.
    pub fn options(&self, kind: StatementKind, base: &StatementOptions) -> StatementOptions {
        StatementOptions {
            cadence: self.cadence,
            max_periods: self.max_periods(kind),
            ..base.clone()
        }
    }

    /// The default layout of a cadence; TTM shows the latest trailing year
    /// and the prior fiscal year.
    pub const fn for_cadence(cadence: Cadence) -> Self {
        match cadence {
            Cadence::Annual => Self {
                cadence,
                balance_sheet_periods: 2,
                flow_periods: 3,
            },
            Cadence::Quarterly => Self {
                cadence,
                balance_sheet_periods: 2,
                flow_periods: 4,
            },
            Cadence::Ttm => Self {
                cadence,
                balance_sheet_periods: 2,
                flow_periods: 2,
            },
        }
    }
}
