//! Tunable thresholds.
//!
//! Every heuristic threshold is a named constant here, mirrored into a
//! serde-deserializable config struct whose `Default` uses the constant.

use crate::error::{Result, StatementError};
use crate::periods::Cadence;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tally_xbrl::StatementKind;

/// Lower bound of the dynamic fact-count floor.
pub const MIN_FACT_FLOOR: usize = 10;
/// Upper bound of the dynamic fact-count floor.
pub const MAX_FACT_FLOOR: usize = 40;
/// Share of the richest candidate's fact count a period must reach.
pub const FLOOR_RATIO: f64 = 0.4;
/// Facts that always qualify a balance sheet period.
pub const BALANCE_SHEET_ABSOLUTE_FLOOR: usize = 30;
/// Facts that always qualify an income statement period.
pub const INCOME_ABSOLUTE_FLOOR: usize = 20;
/// Facts that always qualify a cash flow period.
pub const CASH_FLOW_ABSOLUTE_FLOOR: usize = 15;
/// Facts that always qualify an equity statement period.
pub const EQUITY_ABSOLUTE_FLOOR: usize = 15;
/// Distinct essential concepts a balance sheet period needs.
pub const MIN_ESSENTIAL_CONCEPTS: usize = 10;
/// Months a period end may sit from the fiscal-year-end month (52/53-week years).
pub const FISCAL_ALIGNMENT_TOLERANCE_MONTHS: u32 = 1;
/// Instant candidates kept before scoring.
pub const INSTANT_CANDIDATE_POOL: usize = 10;
/// Duration candidates kept before scoring.
pub const DURATION_CANDIDATE_POOL: usize = 12;
/// A YTD period needs this many times the discrete quarter's facts to rank first.
pub const YTD_MATERIAL_RATIO: f64 = 1.5;
/// Longest duration context a split-ratio fact may carry.
pub const SPLIT_MAX_CONTEXT_DAYS: i64 = 31;
/// Longest gap between a split fact's period end and the filing date.
pub const SPLIT_MAX_FILING_LAG_DAYS: i64 = 280;

/// Absolute floors per statement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsoluteFloors {
    /// Balance sheet floor
    pub balance_sheet: usize,
    /// Income statement floor
    pub income_statement: usize,
    /// Cash flow floor
    pub cash_flow: usize,
    /// Equity statement floor
    pub equity: usize,
}

impl AbsoluteFloors {
    /// Floor for `kind`.
    pub const fn for_kind(&self, kind: StatementKind) -> usize {
        match kind {
            StatementKind::BalanceSheet => self.balance_sheet,
            StatementKind::IncomeStatement => self.income_statement,
            StatementKind::CashFlow => self.cash_flow,
            StatementKind::Equity => self.equity,
        }
    }
}

impl Default for AbsoluteFloors {
    fn default() -> Self {
        Self {
            balance_sheet: BALANCE_SHEET_ABSOLUTE_FLOOR,
            income_statement: INCOME_ABSOLUTE_FLOOR,
            cash_flow: CASH_FLOW_ABSOLUTE_FLOOR,
            equity: EQUITY_ABSOLUTE_FLOOR,
        }
    }
}

/// Configuration for the period selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Lower bound of the dynamic floor (default: 10)
    pub min_floor: usize,
    /// Upper bound of the dynamic floor (default: 40)
    pub max_floor: usize,
    /// Share of the richest candidate (default: 0.4)
    pub floor_ratio: f64,
    /// Per-statement absolute floors
    pub absolute_floors: AbsoluteFloors,
    /// Essential concepts a balance sheet period needs (default: 10)
    pub min_essential_concepts: usize,
    /// Fiscal alignment tolerance in months (default: 1)
    pub alignment_tolerance_months: u32,
    /// Instant candidates kept before scoring (default: 10)
    pub instant_pool: usize,
    /// Duration candidates kept before scoring (default: 12)
    pub duration_pool: usize,
    /// Fact ratio for the default quarterly-vs-YTD preference (default: 1.5)
    pub ytd_material_ratio: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            min_floor: MIN_FACT_FLOOR,
            max_floor: MAX_FACT_FLOOR,
            floor_ratio: FLOOR_RATIO,
            absolute_floors: AbsoluteFloors::default(),
            min_essential_concepts: MIN_ESSENTIAL_CONCEPTS,
            alignment_tolerance_months: FISCAL_ALIGNMENT_TOLERANCE_MONTHS,
            instant_pool: INSTANT_CANDIDATE_POOL,
            duration_pool: DURATION_CANDIDATE_POOL,
            ytd_material_ratio: YTD_MATERIAL_RATIO,
        }
    }
}

impl SelectorConfig {
    /// Checks ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.floor_ratio) {
            return Err(StatementError::InvalidConfig {
                field: "floor_ratio",
                reason: format!("{} is not between 0 and 1", self.floor_ratio),
            });
        }
        if self.min_floor > self.max_floor {
            return Err(StatementError::InvalidConfig {
                field: "min_floor",
                reason: format!("{} exceeds max_floor {}", self.min_floor, self.max_floor),
            });
        }
        if self.ytd_material_ratio <= 0.0 {
            return Err(StatementError::InvalidConfig {
                field: "ytd_material_ratio",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Effective floor given the richest candidate's fact count.
    ///
    /// The dynamic floor `max(min, min(max, ratio * richest))` is capped by the
    /// statement's absolute floor, so a period meeting the absolute floor
    /// always passes. `ratio * richest` is truncated to a whole fact count.
    pub fn floor(&self, kind: StatementKind, richest: usize) -> usize {
        let scaled = (self.floor_ratio * richest as f64).floor() as usize;
        let dynamic = scaled.min(self.max_floor).max(self.min_floor);
        dynamic.min(self.absolute_floors.for_kind(kind))
    }
}

/// Configuration for split detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Longest duration context for a split-ratio fact (default: 31)
    pub max_context_days: i64,
    /// Longest period-end to filing-date lag (default: 280)
    pub max_filing_lag_days: i64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_context_days: SPLIT_MAX_CONTEXT_DAYS,
            max_filing_lag_days: SPLIT_MAX_FILING_LAG_DAYS,
        }
    }
}

/// Presentation scale for monetary values.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// As reported
    #[default]
    Units,
    /// Divided by 1,000
    Thousands,
    /// Divided by 1,000,000
    Millions,
    /// Divided by 1,000,000,000
    Billions,
}

impl Scale {
    /// Divisor applied to monetary values.
    pub const fn divisor(self) -> f64 {
        match self {
            Self::Units => 1.0,
            Self::Thousands => 1e3,
            Self::Millions => 1e6,
            Self::Billions => 1e9,
        }
    }
}

/// Configuration for sign and scale normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Presentation scale for monetary values (default: units)
    pub scale: Scale,
    /// Apply calculation weights to child concepts (default: true)
    pub apply_weights: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            scale: Scale::Units,
            apply_weights: true,
        }
    }
}

/// Options for building one statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementOptions {
    /// Period cadence to present (default: annual)
    pub cadence: Cadence,
    /// Most columns to show (default: 3)
    pub max_periods: usize,
    /// Show dimensional breakdown rows under their totals (default: false)
    pub include_dimensions: bool,
    /// Build a flat statement from standard concepts when no role matches (default: true)
    pub use_fallback: bool,
    /// Drop rows without any value (default: true)
    pub prune_empty_rows: bool,
}

impl Default for StatementOptions {
    fn default() -> Self {
        Self {
            cadence: Cadence::Annual,
            max_periods: 3,
            include_dimensions: false,
            use_fallback: true,
            prune_empty_rows: true,
        }
    }
}
