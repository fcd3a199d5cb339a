//! Stock split detection and restatement.
//!
//! Splits are detected from split-ratio facts and applied once, before period
//! selection, so every view built from the table sees the same restated
//! values.

use crate::config::SplitConfig;
use crate::facts::FactTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Concepts reporting a split conversion ratio (new shares per old share).
pub const SPLIT_RATIO_CONCEPTS: &[&str] = &[
    "StockholdersEquityNoteStockSplitConversionRatio1",
    "StockholdersEquityNoteStockSplitConversionRatio",
    "StockSplitConversionRatio",
    "StockSplitConversionRatio1",
];

/// A detected split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitEvent {
    /// Effective date
    pub date: NaiveDate,
    /// New shares per old share; below 1 for reverse splits
    pub ratio: f64,
}

/// Outcome of split detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitDetection {
    /// Unambiguous events in chronological order
    pub events: Vec<SplitEvent>,
    /// Dates reported with conflicting ratios
    pub ambiguous_dates: Vec<NaiveDate>,
    /// Human readable warnings
    pub warnings: Vec<String>,
}

impl SplitDetection {
    /// Returns true if conflicting ratios were found.
    pub fn is_ambiguous(&self) -> bool {
        !self.ambiguous_dates.is_empty()
    }

    /// Merges detections from several filings of one entity.
    ///
    /// The result does not depend on input order.
    pub fn merge<'a>(detections: impl IntoIterator<Item = &'a Self>) -> Self {
        let mut ratios: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        let mut ambiguous: Vec<NaiveDate> = Vec::new();
        for detection in detections {
            for event in &detection.events {
                ratios.entry(event.date).or_default().push(event.ratio);
            }
            ambiguous.extend(&detection.ambiguous_dates);
        }
        resolve(ratios, ambiguous)
    }
}

fn ratios_agree(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

fn resolve(ratios: BTreeMap<NaiveDate, Vec<f64>>, mut ambiguous: Vec<NaiveDate>) -> SplitDetection {
    let mut detection = SplitDetection::default();
    for (date, values) in ratios {
        let first = values[0];
        if values.iter().all(|r| ratios_agree(*r, first)) {
            if !ambiguous.contains(&date) {
                detection.events.push(SplitEvent { date, ratio: first });
            }
        } else if !ambiguous.contains(&date) {
            ambiguous.push(date);
        }
    }
    ambiguous.sort();
    ambiguous.dedup();
    for date in &ambiguous {
        let warning = format!("conflicting split ratios reported for {date}; no split adjustment applied");
        tracing::warn!(%date, "conflicting split ratios");
        detection.warnings.push(warning);
    }
    detection.ambiguous_dates = ambiguous;
    detection
}

/// Detects splits and restates per-share and share-count facts.
#[derive(Debug, Clone, Default)]
pub struct CorporateActionAdjuster {
    config: SplitConfig,
}

impl CorporateActionAdjuster {
    /// Creates an adjuster with the given configuration.
    pub const fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    /// Finds split events in one filing's facts.
    ///
    /// A ratio fact qualifies when its context is an instant or at most
    /// `max_context_days` long, and, when the filing date is known, it was
    /// filed within `max_filing_lag_days` of the period end. The lag filter
    /// rejects later filings' comparative echoes of an old split.
    pub fn detect(&self, table: &FactTable, filing_date: Option<NaiveDate>) -> SplitDetection {
        let mut ratios: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for fact in table.facts() {
            if !SPLIT_RATIO_CONCEPTS.contains(&fact.concept.name.as_str()) || !fact.is_consolidated() {
                continue;
            }
            if fact.period.days() > self.config.max_context_days {
                continue;
            }
            let end = fact.period.end();
            if let Some(filed) = filing_date
                && filed.signed_duration_since(end).num_days() > self.config.max_filing_lag_days
            {
                tracing::debug!(%end, %filed, "ignoring split ratio echoed by a later filing");
                continue;
            }
            if !(fact.reported.is_finite() && fact.reported > 0.0) || ratios_agree(fact.reported, 1.0) {
                continue;
            }
            ratios.entry(end).or_default().push(fact.reported);
        }
        let detection = resolve(ratios, Vec::new());
        if !detection.events.is_empty() {
            tracing::debug!(events = detection.events.len(), "detected stock splits");
        }
        detection
    }

    /// Restates split-sensitive facts in place.
    ///
    /// A split applies to a fact when it takes effect after the fact's period
    /// end and, when known, after the fact's filing date (later filings
    /// already report restated comparatives). Per-share values are divided by
    /// the cumulative ratio and share counts multiplied by it. Ambiguous
    /// detections and already-adjusted tables are left alone.
    pub fn adjust(&self, table: &mut FactTable, detection: &SplitDetection) {
        if table.split_adjusted {
            tracing::debug!("fact table already split-adjusted");
            return;
        }
        table.split_adjusted = true;
        if detection.is_ambiguous() || detection.events.is_empty() {
            return;
        }

        let mut adjusted = 0usize;
        for fact in table.facts_mut() {
            if !fact.kind.is_split_sensitive() {
                continue;
            }
            let end = fact.period.end();
            let factor: f64 = detection
                .events
                .iter()
                .filter(|e| e.date > end && fact.filing_date.is_none_or(|filed| e.date > filed))
                .map(|e| e.ratio)
                .product();
            if ratios_agree(factor, 1.0) {
                continue;
            }
            let scale = if fact.kind == crate::facts::ValueKind::Shares {
                factor
            } else {
                1.0 / factor
            };
            fact.value *= scale;
            fact.split_factor *= factor;
            adjusted += 1;
        }
        tracing::debug!(adjusted, "applied split adjustment");
    }
}
