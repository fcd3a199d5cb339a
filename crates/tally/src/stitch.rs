//! Merging one statement kind across the filings of an entity.
//!
//! Filings are visited newest first, so for every (row, column) pair the most
//! recent filing that reports a value wins. Visiting order is fixed by
//! (filing date, accession), which makes the merge independent of the order
//! inputs are given in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tally_statements::{Cell, Confidence, SelectorConfig, Statement, StatementPeriod, StatementRow};
use tally_xbrl::{Dimension, Period, StatementKind};

/// Configuration for the stitcher
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Most columns to keep, newest first; `None` keeps every column that
    /// clears the floor (default: None)
    pub max_periods: Option<usize>,
}

/// One filing's statement handed to the stitcher.
#[derive(Debug, Clone, Copy)]
pub struct StitchInput<'a> {
    /// The statement
    pub statement: &'a Statement,
    /// Entity identifier of the filing
    pub entity: &'a str,
    /// Date the filing was accepted
    pub filing_date: NaiveDate,
    /// Accession number
    pub accession: &'a str,
}

/// Identity of a column across filings.
///
/// Statement columns are consolidated, so `dimensions` is empty for them;
/// breakdowns travel on rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnKey {
    /// Entity identifier
    pub entity: String,
    /// Start date; `None` for instants
    pub start: Option<NaiveDate>,
    /// End date
    pub end: NaiveDate,
    /// Dimension set
    pub dimensions: Vec<Dimension>,
}

impl ColumnKey {
    fn of(entity: &str, period: &Period) -> Self {
        Self {
            entity: entity.to_string(),
            start: period.start(),
            end: period.end(),
            dimensions: Vec::new(),
        }
    }
}

/// Identity of a row across filings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowKey {
    /// Canonical name, or the reported concept when unmapped
    pub identity: String,
    /// Breakdown member
    pub dimension: Option<Dimension>,
    /// Position among rows with the same identity (opening and closing
    /// balances of a roll-forward)
    pub occurrence: usize,
}

impl RowKey {
    /// Keys of every row of `statement`, in row order.
    pub fn keys(statement: &Statement) -> Vec<Self> {
        let mut seen: HashMap<(String, Option<Dimension>), usize> = HashMap::new();
        statement
            .rows
            .iter()
            .map(|row| {
                let identity = row
                    .standard
                    .clone()
                    .unwrap_or_else(|| row.concept.to_string());
                let count = seen
                    .entry((identity.clone(), row.dimension.clone()))
                    .or_default();
                let key = Self {
                    identity,
                    dimension: row.dimension.clone(),
                    occurrence: *count,
                };
                *count += 1;
                key
            })
            .collect()
    }
}

/// Where a stitched column came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSource {
    /// Column identity
    pub key: ColumnKey,
    /// Newest filing presenting the column
    pub accession: String,
    /// Number of filings presenting the column
    pub filings: usize,
    /// Values in the column
    pub values: usize,
}

/// A statement merged across filings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stitched {
    /// The merged statement
    pub statement: Statement,
    /// One entry per statement column
    pub sources: Vec<ColumnSource>,
}

struct Column {
    key: ColumnKey,
    period: StatementPeriod,
    accession: String,
    filings: usize,
}

/// Merges statements of one kind across filings.
#[derive(Debug, Clone, Default)]
pub struct Stitcher {
    selector: SelectorConfig,
    config: StitchConfig,
}

impl Stitcher {
    /// Creates a stitcher using the selector's fact floors.
    pub const fn new(selector: SelectorConfig, config: StitchConfig) -> Self {
        Self { selector, config }
    }

    /// Merges `inputs` into one statement of `kind`.
    ///
    /// Inputs of another kind are ignored. The same filing given twice counts
    /// once, and stitching a stitched statement again returns it unchanged.
    pub fn stitch(&self, kind: StatementKind, inputs: &[StitchInput<'_>]) -> Stitched {
        let mut ordered: Vec<&StitchInput<'_>> = inputs
            .iter()
            .filter(|input| {
                let matches = input.statement.kind == kind;
                if !matches {
                    tracing::warn!(accession = input.accession, %kind, "skipping statement of another kind");
                }
                matches
            })
            .collect();
        ordered.sort_by(|a, b| {
            b.filing_date
                .cmp(&a.filing_date)
                .then_with(|| b.accession.cmp(a.accession))
        });
        ordered.dedup_by(|a, b| a.accession == b.accession);

        let Some(newest) = ordered.first() else {
            let mut statement = Statement::empty(kind);
            statement.warnings.push(format!("no {kind} to stitch"));
            return Stitched {
                statement,
                sources: Vec::new(),
            };
        };

        let mut rows: Vec<(RowKey, StatementRow)> = Vec::new();
        let mut positions: HashMap<RowKey, usize> = HashMap::new();
        let mut columns: HashMap<ColumnKey, Column> = HashMap::new();
        let mut cells: HashMap<(RowKey, ColumnKey), Cell> = HashMap::new();
        let mut warnings: BTreeSet<String> = BTreeSet::new();
        let mut confidence = Confidence::High;

        for input in &ordered {
            let statement = input.statement;
            confidence = confidence.worst(statement.confidence);
            warnings.extend(statement.warnings.iter().cloned());

            let column_keys: Vec<ColumnKey> = statement
                .periods
                .iter()
                .map(|p| ColumnKey::of(input.entity, &p.period))
                .collect();
            for (key, period) in column_keys.iter().zip(&statement.periods) {
                columns
                    .entry(key.clone())
                    .and_modify(|c| c.filings += 1)
                    .or_insert_with(|| Column {
                        key: key.clone(),
                        period: period.clone(),
                        accession: input.accession.to_string(),
                        filings: 1,
                    });
            }

            let mut anchor: Option<usize> = None;
            for (key, row) in RowKey::keys(statement).into_iter().zip(&statement.rows) {
                let position = match positions.get(&key) {
                    Some(&at) => at,
                    None => {
                        // a row the newer filings dropped goes after its predecessor here
                        let at = anchor.map_or(0, |a| a + 1);
                        for p in positions.values_mut().filter(|p| **p >= at) {
                            *p += 1;
                        }
                        positions.insert(key.clone(), at);
                        let mut template = row.clone();
                        template.cells.clear();
                        template.derived = false;
                        rows.insert(at, (key.clone(), template));
                        at
                    }
                };
                anchor = Some(position);

                for (column, cell) in column_keys.iter().zip(&row.cells) {
                    if let Some(cell) = cell {
                        cells
                            .entry((key.clone(), column.clone()))
                            .or_insert_with(|| cell.clone());
                    }
                }
            }
        }

        let mut columns: Vec<Column> = columns.into_values().collect();
        columns.sort_by(|a, b| {
            b.key
                .end
                .cmp(&a.key.end)
                .then_with(|| b.key.start.cmp(&a.key.start))
                .then_with(|| a.key.entity.cmp(&b.key.entity))
        });

        let counts: Vec<usize> = columns
            .iter()
            .map(|column| {
                rows.iter()
                    .filter(|(key, row)| !row.is_abstract && key.dimension.is_none())
                    .filter(|(key, _)| cells.contains_key(&(key.clone(), column.key.clone())))
                    .count()
            })
            .collect();
        let richest = counts.iter().copied().max().unwrap_or(0);
        let floor = self.selector.floor(kind, richest);
        let mut kept: Vec<(Column, usize)> = columns
            .into_iter()
            .zip(counts)
            .filter(|(column, count)| {
                let passes = *count >= floor && *count > 0;
                if !passes {
                    tracing::debug!(
                        period = %column.period.label,
                        facts = count,
                        floor,
                        "stitched column below floor"
                    );
                }
                passes
            })
            .collect();
        if let Some(max) = self.config.max_periods {
            kept.truncate(max);
        }

        let mut statement = Statement::empty(kind);
        statement.role = newest.statement.role.clone();
        statement.fallback = newest.statement.fallback;
        statement.warnings = warnings.into_iter().collect();
        statement.periods = kept.iter().map(|(c, _)| c.period.clone()).collect();
        statement.rows = rows
            .into_iter()
            .map(|(key, mut row)| {
                row.cells = kept
                    .iter()
                    .map(|(column, _)| cells.remove(&(key.clone(), column.key.clone())))
                    .collect();
                row.refresh();
                row
            })
            .collect();
        statement.prune_empty_rows();
        statement.confidence = if statement.periods.is_empty() {
            let warning = format!("no stitched {kind} period cleared the fact floor");
            if !statement.warnings.contains(&warning) {
                statement.warnings.push(warning);
            }
            Confidence::Low
        } else {
            confidence
        };

        let sources = kept
            .into_iter()
            .map(|(column, values)| ColumnSource {
                key: column.key,
                accession: column.accession,
                filings: column.filings,
                values,
            })
            .collect::<Vec<_>>();

        tracing::info!(
            %kind,
            filings = ordered.len(),
            periods = statement.periods.len(),
            rows = statement.rows.len(),
            "stitched statement"
        );
        Stitched { statement, sources }
    }
}
