//! The statement model: ordered rows, ordered periods, per-cell metadata.

use crate::facts::{FactOrigin, NormalizedFact};
use crate::periods::PeriodCandidate;
use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tally_xbrl::{BalanceType, ConceptId, Dimension, Period, StatementKind};

/// How much a statement, row or column can be trusted.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Confidence {
    /// Complete and aligned with the fiscal calendar
    High,
    /// Usable, with gaps or derived values
    Medium,
    /// No usable periods
    Low,
}

impl Confidence {
    /// The lower of two confidence levels.
    pub fn worst(self, other: Self) -> Self {
        self.max(other)
    }
}

/// A presented column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementPeriod {
    /// The period
    pub period: Period,
    /// Display label
    pub label: String,
    /// Fiscal year the period closes
    pub fiscal_year: i32,
    /// Fiscal quarter for sub-annual durations
    pub fiscal_quarter: Option<u8>,
    /// Year-to-date period longer than a quarter
    pub is_ytd: bool,
    /// Backed by derived facts
    pub derived: bool,
}

impl From<&PeriodCandidate> for StatementPeriod {
    fn from(candidate: &PeriodCandidate) -> Self {
        Self {
            period: candidate.period,
            label: candidate.label.clone(),
            fiscal_year: candidate.fiscal_year,
            fiscal_quarter: candidate.fiscal_quarter,
            is_ytd: candidate.is_ytd(),
            derived: candidate.derived,
        }
    }
}

/// A value with the metadata of the fact behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Presented value, sign and scale applied
    pub value: f64,
    /// Value as filed (presentation scale only; `split_factor` records the
    /// split adjustment in `value`)
    pub reported: f64,
    /// Unit measure
    pub unit: Option<String>,
    /// Whether the backing fact is an instant
    pub is_instant: bool,
    /// Concept balance type
    pub balance: Option<BalanceType>,
    /// Calculation weight
    pub weight: Option<f64>,
    /// Sign applied to the reported value
    pub preferred_sign: i8,
    /// Declared decimals
    pub decimals: Option<i32>,
    /// Index of the backing fact in its fact table
    pub fact_index: usize,
    /// Reported or derived
    pub origin: FactOrigin,
    /// Cumulative split ratio applied
    pub split_factor: f64,
}

impl Cell {
    /// Cell for the fact at `index`.
    pub fn from_fact(index: usize, fact: &NormalizedFact) -> Self {
        Self {
            value: fact.value,
            reported: fact.reported,
            unit: fact.unit.clone(),
            is_instant: fact.period.is_instant(),
            balance: fact.balance,
            weight: fact.weight,
            preferred_sign: fact.preferred_sign,
            decimals: fact.decimals,
            fact_index: index,
            origin: fact.origin,
            split_factor: fact.split_factor,
        }
    }

    /// A computed cell with no backing fact.
    pub fn derived(value: f64, unit: Option<String>, origin: FactOrigin) -> Self {
        Self {
            value,
            reported: value,
            unit,
            is_instant: false,
            balance: None,
            weight: None,
            preferred_sign: 1,
            decimals: None,
            fact_index: usize::MAX,
            origin,
            split_factor: 1.0,
        }
    }
}

/// One line of a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Reported concept
    pub concept: ConceptId,
    /// Canonical concept name, once standardized
    pub standard: Option<String>,
    /// Display label
    pub label: String,
    /// Indentation level
    pub depth: usize,
    /// Heading without values
    pub is_abstract: bool,
    /// Total or subtotal line
    pub is_total: bool,
    /// Label of the enclosing heading
    pub section: Option<String>,
    /// Share of columns with a reported value
    pub confidence: Confidence,
    /// Dimension member for breakdown rows
    pub dimension: Option<Dimension>,
    /// One entry per statement period
    pub cells: Vec<Option<Cell>>,
    /// Row values were computed rather than reported
    pub derived: bool,
}

impl StatementRow {
    /// Creates a row with `columns` empty cells.
    pub fn new(concept: ConceptId, label: impl Into<String>, depth: usize, columns: usize) -> Self {
        Self {
            concept,
            standard: None,
            label: label.into(),
            depth,
            is_abstract: false,
            is_total: false,
            section: None,
            confidence: Confidence::Low,
            dimension: None,
            cells: vec![None; columns],
            derived: false,
        }
    }

    /// Value in column `index`.
    pub fn value(&self, index: usize) -> Option<f64> {
        self.cells.get(index)?.as_ref().map(|c| c.value)
    }

    /// Returns true if any column has a value.
    pub fn has_values(&self) -> bool {
        self.cells.iter().any(Option::is_some)
    }

    /// Recomputes the derived flag and confidence from the cells.
    pub fn refresh(&mut self) {
        let filled = self.cells.iter().flatten().count();
        let reported = self
            .cells
            .iter()
            .flatten()
            .filter(|c| !c.origin.is_derived())
            .count();
        self.derived = self.derived || filled > reported;
        self.confidence = if self.is_abstract || (filled == self.cells.len() && reported == filled)
        {
            Confidence::High
        } else if filled > 0 {
            Confidence::Medium
        } else {
            Confidence::Low
        };
    }
}

/// A reconstructed financial statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Statement kind
    pub kind: StatementKind,
    /// Presentation role the rows came from; `None` for fallback statements
    pub role: Option<String>,
    /// Columns, most relevant first
    pub periods: Vec<StatementPeriod>,
    /// Rows in presentation order
    pub rows: Vec<StatementRow>,
    /// Overall confidence
    pub confidence: Confidence,
    /// Problems worth surfacing to a reader
    pub warnings: Vec<String>,
    /// Built from the standard concept list instead of a presentation role
    pub fallback: bool,
}

impl Statement {
    /// An empty, low-confidence statement.
    pub const fn empty(kind: StatementKind) -> Self {
        Self {
            kind,
            role: None,
            periods: Vec::new(),
            rows: Vec::new(),
            confidence: Confidence::Low,
            warnings: Vec::new(),
            fallback: false,
        }
    }

    /// Returns true if there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() || !self.rows.iter().any(StatementRow::has_values)
    }

    /// Column labels in order.
    pub fn period_labels(&self) -> Vec<&str> {
        self.periods.iter().map(|p| p.label.as_str()).collect()
    }

    /// Column index of `label`.
    pub fn period_index(&self, label: &str) -> Option<usize> {
        self.periods.iter().position(|p| p.label == label)
    }

    /// First consolidated row whose concept or standard name is `name`.
    pub fn row(&self, name: &str) -> Option<&StatementRow> {
        self.rows.iter().find(|r| {
            r.dimension.is_none()
                && (r.concept.name == name || r.standard.as_deref() == Some(name))
        })
    }

    /// Cell at (`row`, `column`).
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row)?.cells.get(column)?.as_ref()
    }

    /// Value of the row named `name` in the column labeled `period`.
    pub fn value(&self, name: &str, period: &str) -> Option<f64> {
        let column = self.period_index(period)?;
        self.row(name)?.value(column)
    }

    /// Removes rows without values and headings left with nothing beneath.
    pub fn prune_empty_rows(&mut self) {
        let n = self.rows.len();
        let mut keep = vec![false; n];
        for i in (0..n).rev() {
            let row = &self.rows[i];
            if row.has_values() {
                keep[i] = true;
            } else if row.is_abstract {
                keep[i] = self.rows[i + 1..]
                    .iter()
                    .zip(&keep[i + 1..])
                    .take_while(|(r, _)| r.depth > row.depth)
                    .any(|(_, k)| *k);
            }
        }
        let before = n;
        let mut flags = keep.into_iter();
        self.rows.retain(|_| flags.next().unwrap_or(false));
        tracing::debug!(kind = %self.kind, before, after = self.rows.len(), "pruned empty rows");
    }

    /// Flattens the statement into one record per (row, period).
    ///
    /// Rows and periods keep their order and every cell keeps its metadata.
    /// A statement without periods yields one record per row.
    pub fn to_table(&self) -> StatementTable {
        let mut records = Vec::with_capacity(self.rows.len() * self.periods.len().max(1));
        for (row_index, row) in self.rows.iter().enumerate() {
            if self.periods.is_empty() {
                records.push(TableRecord::new(row_index, row, None, None));
                continue;
            }
            for (period_index, period) in self.periods.iter().enumerate() {
                let cell = row.cells.get(period_index).and_then(Option::as_ref);
                records.push(TableRecord::new(
                    row_index,
                    row,
                    Some((period_index, period)),
                    cell,
                ));
            }
        }
        StatementTable {
            kind: self.kind,
            role: self.role.clone(),
            confidence: self.confidence,
            fallback: self.fallback,
            warnings: self.warnings.clone(),
            columns: self.periods.iter().map(|p| p.label.clone()).collect(),
            records,
        }
    }
}

/// One (row, period) pair of a flattened statement.
///
/// Every field is a scalar so the record serializes directly to CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    /// Row position
    pub row: usize,
    /// Reported concept
    pub concept: String,
    /// Canonical concept
    pub standard: Option<String>,
    /// Display label
    pub label: String,
    /// Indentation level
    pub depth: usize,
    /// Heading row
    pub is_abstract: bool,
    /// Total row
    pub is_total: bool,
    /// Enclosing heading
    pub section: Option<String>,
    /// Dimension qualifier, `axis=member`
    pub dimension: Option<String>,
    /// Row confidence
    pub row_confidence: Confidence,
    /// Row computed rather than reported
    pub row_derived: bool,
    /// Column position
    pub period_index: Option<usize>,
    /// Column label
    pub period: Option<String>,
    /// Column start date; `None` for instants
    pub period_start: Option<NaiveDate>,
    /// Column end date
    pub period_end: Option<NaiveDate>,
    /// Presented value
    pub value: Option<f64>,
    /// Reported value
    pub reported: Option<f64>,
    /// Unit measure
    pub unit: Option<String>,
    /// Backing fact is an instant
    pub is_instant: Option<bool>,
    /// Balance type
    pub balance: Option<BalanceType>,
    /// Calculation weight
    pub weight: Option<f64>,
    /// Sign applied
    pub preferred_sign: Option<i8>,
    /// Declared decimals
    pub decimals: Option<i32>,
    /// Fact index in the fact table
    pub fact_index: Option<usize>,
    /// Reported or derived
    pub origin: Option<FactOrigin>,
    /// Split ratio applied
    pub split_factor: Option<f64>,
}

impl TableRecord {
    fn new(
        row_index: usize,
        row: &StatementRow,
        period: Option<(usize, &StatementPeriod)>,
        cell: Option<&Cell>,
    ) -> Self {
        Self {
            row: row_index,
            concept: row.concept.to_string(),
            standard: row.standard.clone(),
            label: row.label.clone(),
            depth: row.depth,
            is_abstract: row.is_abstract,
            is_total: row.is_total,
            section: row.section.clone(),
            dimension: row.dimension.as_ref().map(ToString::to_string),
            row_confidence: row.confidence,
            row_derived: row.derived,
            period_index: period.map(|(i, _)| i),
            period: period.map(|(_, p)| p.label.clone()),
            period_start: period.and_then(|(_, p)| p.period.start()),
            period_end: period.map(|(_, p)| p.period.end()),
            value: cell.map(|c| c.value),
            reported: cell.map(|c| c.reported),
            unit: cell.and_then(|c| c.unit.clone()),
            is_instant: cell.map(|c| c.is_instant),
            balance: cell.and_then(|c| c.balance),
            weight: cell.and_then(|c| c.weight),
            preferred_sign: cell.map(|c| c.preferred_sign),
            decimals: cell.and_then(|c| c.decimals),
            fact_index: cell.map(|c| c.fact_index).filter(|i| *i != usize::MAX),
            origin: cell.map(|c| c.origin),
            split_factor: cell.map(|c| c.split_factor),
        }
    }
}

/// A statement flattened to records, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    /// Statement kind
    pub kind: StatementKind,
    /// Source role
    pub role: Option<String>,
    /// Statement confidence
    pub confidence: Confidence,
    /// Built from the fallback concept list
    pub fallback: bool,
    /// Statement warnings
    pub warnings: Vec<String>,
    /// Column labels in order
    pub columns: Vec<String>,
    /// Row-major records
    pub records: Vec<TableRecord>,
}

impl StatementTable {
    /// Number of statement rows.
    pub fn row_count(&self) -> usize {
        self.records.last().map_or(0, |r| r.row + 1)
    }

    /// Value at (`row`, column labeled `period`).
    pub fn value(&self, row: usize, period: &str) -> Option<f64> {
        self.records
            .iter()
            .find(|r| r.row == row && r.period.as_deref() == Some(period))
            .and_then(|r| r.value)
    }
}
