//! Derived facts produced by normalization and later stages.
//!
//! Raw [`Fact`](tally_xbrl::Fact)s are never modified. Every stage after
//! parsing works on [`NormalizedFact`]s that keep the raw fact index as
//! provenance.

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tally_xbrl::{BalanceType, ConceptId, Dimension, Period};

/// What a numeric value measures; decides scaling and split treatment.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Currency amount
    Monetary,
    /// Currency per share, or a share price
    PerShare,
    /// Share count
    Shares,
    /// Ratio or percentage
    Pure,
    /// Anything else (employees, square feet...)
    Other,
}

impl ValueKind {
    /// Only monetary values are rescaled.
    pub const fn is_scaled(self) -> bool {
        matches!(self, Self::Monetary)
    }

    /// Whether split adjustment applies.
    pub const fn is_split_sensitive(self) -> bool {
        matches!(self, Self::PerShare | Self::Shares)
    }
}

/// How a fact came to exist.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactOrigin {
    /// Reported in the instance
    Reported,
    /// Trailing twelve months computed from quarters or YTD periods
    #[display("TTM")]
    Ttm,
    /// Fourth quarter computed as fiscal year minus nine-month YTD
    #[display("DerivedQ4")]
    DerivedQ4,
    /// Calculated from other lines of the same statement
    Computed,
}

impl FactOrigin {
    /// Returns true for computed facts.
    pub const fn is_derived(self) -> bool {
        !matches!(self, Self::Reported)
    }
}

/// A numeric fact after sign and scale normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFact {
    /// Index of the raw fact this value came from
    pub source_index: usize,
    /// Reported concept
    pub concept: ConceptId,
    /// Entity identifier
    pub entity: String,
    /// Reporting period
    pub period: Period,
    /// Dimension qualifiers
    pub dimensions: Vec<Dimension>,
    /// Unit measure text (e.g. `USD`, `USD/shares`)
    pub unit: Option<String>,
    /// Value after weight, pin, scale and split adjustment
    pub value: f64,
    /// Value as filed, presentation scale applied; splits only touch `value`
    pub reported: f64,
    /// Calculation weight relative to the parent, if the concept is a child
    pub weight: Option<f64>,
    /// Sign applied to the reported value
    pub preferred_sign: i8,
    /// Value classification
    pub kind: ValueKind,
    /// Balance type of the concept
    pub balance: Option<BalanceType>,
    /// Declared decimals; `None` for INF or unknown
    pub decimals: Option<i32>,
    /// Where the value came from
    pub origin: FactOrigin,
    /// Cumulative split ratio applied (1.0 when unadjusted)
    pub split_factor: f64,
    /// Filing date of the document that reported this fact
    pub filing_date: Option<NaiveDate>,
}

impl NormalizedFact {
    /// Returns true if the fact has no dimension qualifiers.
    pub fn is_consolidated(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// Normalized facts of one filing, indexed by concept.
///
/// The index is not serialized; it is rebuilt on deserialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "StoredFactTable")]
pub struct FactTable {
    facts: Vec<NormalizedFact>,
    #[serde(skip)]
    by_concept: HashMap<ConceptId, Vec<usize>>,
    /// Set once split adjustment has run; adjustment is never reapplied
    pub split_adjusted: bool,
}

#[derive(Deserialize)]
struct StoredFactTable {
    facts: Vec<NormalizedFact>,
    #[serde(default)]
    split_adjusted: bool,
}

impl From<StoredFactTable> for FactTable {
    fn from(stored: StoredFactTable) -> Self {
        let mut table = Self::new(stored.facts);
        table.split_adjusted = stored.split_adjusted;
        table
    }
}

impl FactTable {
    /// Builds a table from normalized facts.
    pub fn new(facts: Vec<NormalizedFact>) -> Self {
        let mut table = Self {
            facts,
            ..Self::default()
        };
        table.reindex();
        table
    }

    fn reindex(&mut self) {
        self.by_concept.clear();
        for (i, fact) in self.facts.iter().enumerate() {
            self.by_concept
                .entry(fact.concept.clone())
                .or_default()
                .push(i);
        }
    }

    /// Every fact.
    pub fn facts(&self) -> &[NormalizedFact] {
        &self.facts
    }

    /// Mutable access for in-place adjustment.
    pub(crate) fn facts_mut(&mut self) -> &mut [NormalizedFact] {
        &mut self.facts
    }

    /// Facts for `concept`, falling back to a local-name match when the
    /// prefix differs.
    pub fn facts_for(&self, concept: &ConceptId) -> Vec<&NormalizedFact> {
        if let Some(indices) = self.by_concept.get(concept) {
            return indices.iter().map(|&i| &self.facts[i]).collect();
        }
        self.facts
            .iter()
            .filter(|f| f.concept.name == concept.name)
            .collect()
    }

    /// Facts for `concept` paired with their table index.
    pub fn indexed_for(&self, concept: &ConceptId) -> Vec<(usize, &NormalizedFact)> {
        if let Some(indices) = self.by_concept.get(concept) {
            return indices.iter().map(|&i| (i, &self.facts[i])).collect();
        }
        self.facts
            .iter()
            .enumerate()
            .filter(|(_, f)| f.concept.name == concept.name)
            .collect()
    }

    /// Consolidated facts for `concept` in exactly `period`.
    pub fn consolidated(&self, concept: &ConceptId, period: &Period) -> Vec<&NormalizedFact> {
        self.facts_for(concept)
            .into_iter()
            .filter(|f| f.is_consolidated() && &f.period == period)
            .collect()
    }

    /// Returns true if any fact (in any period) exists for `concept`.
    pub fn has_concept(&self, concept: &ConceptId) -> bool {
        self.by_concept.contains_key(concept)
            || self.facts.iter().any(|f| f.concept.name == concept.name)
    }

    /// Distinct periods in the table.
    pub fn periods(&self) -> BTreeSet<Period> {
        self.facts.iter().map(|f| f.period).collect()
    }

    /// Appends derived facts.
    pub fn extend(&mut self, derived: impl IntoIterator<Item = NormalizedFact>) {
        self.facts.extend(derived);
        self.reindex();
    }

    /// Number of facts.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
