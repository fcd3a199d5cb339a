//! Choosing which periods a statement presents.

use super::{Cadence, FiscalCalendar, PeriodCandidate, PeriodShape};
use crate::config::SelectorConfig;
use crate::facts::FactTable;
use crate::kind;
use crate::statement::Confidence;
use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tally_xbrl::{ConceptId, Period, StatementKind};

/// Score added to candidates that end on a fiscal boundary.
const ALIGNMENT_BONUS: f64 = 0.5;
/// Coverage is compared in steps of this size so near-equal columns tie and
/// recency decides.
const COVERAGE_STEP: f64 = 0.1;

/// Decides whether a year-to-date period outranks the discrete quarter that
/// ends on the same day.
///
/// Both periods are always kept; the policy only orders them.
pub trait YtdPreference: fmt::Debug + Send + Sync {
    /// Returns true if `ytd` should rank ahead of `discrete`.
    fn prefers_ytd(&self, discrete: &PeriodCandidate, ytd: &PeriodCandidate) -> bool;
}

/// The YTD period ranks first only when it carries materially more facts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialCoverage {
    /// YTD facts must reach this multiple of the discrete quarter's facts
    pub ratio: f64,
}

impl Default for MaterialCoverage {
    fn default() -> Self {
        Self {
            ratio: crate::config::YTD_MATERIAL_RATIO,
        }
    }
}

impl YtdPreference for MaterialCoverage {
    fn prefers_ytd(&self, discrete: &PeriodCandidate, ytd: &PeriodCandidate) -> bool {
        ytd.fact_count as f64 >= self.ratio * discrete.fact_count as f64
    }
}

/// The discrete quarter always ranks first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscreteFirst;

impl YtdPreference for DiscreteFirst {
    fn prefers_ytd(&self, _discrete: &PeriodCandidate, _ytd: &PeriodCandidate) -> bool {
        false
    }
}

/// Why a candidate was not selected.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// Ends after the document period end
    #[display("ends after the document period end")]
    FutureDated,
    /// Fell outside the candidate pool
    #[display("outside the candidate pool")]
    OutsidePool,
    /// Too few facts
    #[display("{facts} facts below floor {floor}")]
    BelowFloor {
        /// Facts found
        facts: usize,
        /// Floor in force
        floor: usize,
    },
    /// Too few essential balance sheet concepts
    #[display("{found} essential concepts, {required} required")]
    MissingEssentials {
        /// Essentials found
        found: usize,
        /// Essentials required
        required: usize,
    },
    /// Cleared every floor but ranked below the cut
    #[display("ranked below the selected periods")]
    Ranked,
}

/// What to select periods for.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRequest<'a> {
    /// Statement kind; balance sheets present instants
    pub kind: StatementKind,
    /// Cadence to present
    pub cadence: Cadence,
    /// Concepts that belong to the statement
    pub concepts: &'a [ConceptId],
    /// Fiscal calendar of the filer
    pub calendar: &'a FiscalCalendar,
    /// Periods ending later than this are ignored
    pub document_period_end: Option<NaiveDate>,
    /// Most columns to return
    pub max_periods: usize,
}

/// Selected periods in display order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Chosen candidates, most recent first
    pub periods: Vec<PeriodCandidate>,
    /// Candidates that were considered and dropped
    pub rejected: Vec<(Period, Rejection)>,
    /// Confidence in the selection
    pub confidence: Option<Confidence>,
}

impl Selection {
    /// Returns true if nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Confidence, `Low` when empty.
    pub fn confidence(&self) -> Confidence {
        self.confidence.unwrap_or(Confidence::Low)
    }

    /// Reason a period was rejected, if it was.
    pub fn rejection(&self, period: &Period) -> Option<Rejection> {
        self.rejected
            .iter()
            .find(|(p, _)| p == period)
            .map(|(_, r)| *r)
    }
}

/// Ranks and filters period candidates.
#[derive(Debug, Clone)]
pub struct PeriodSelector {
    config: SelectorConfig,
    preference: Arc<dyn YtdPreference>,
}

impl Default for PeriodSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

impl PeriodSelector {
    /// Creates a selector with the material-coverage YTD policy.
    pub fn new(config: SelectorConfig) -> Self {
        let preference = Arc::new(MaterialCoverage {
            ratio: config.ytd_material_ratio,
        });
        Self { config, preference }
    }

    /// Replaces the YTD policy.
    pub fn with_preference(mut self, preference: impl YtdPreference + 'static) -> Self {
        self.preference = Arc::new(preference);
        self
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Selects the periods a statement presents.
    pub fn select(&self, facts: &FactTable, request: &SelectionRequest<'_>) -> Selection {
        let mut selection = Selection::default();
        let mut candidates = self.enumerate(facts, request);

        // future-dated periods never reach the pool
        if let Some(limit) = request.document_period_end {
            candidates.retain(|c| {
                let keep = c.end() <= limit;
                if !keep {
                    selection.rejected.push((c.period, Rejection::FutureDated));
                }
                keep
            });
        }

        let pool_size = if request.kind.uses_instants() {
            self.config.instant_pool
        } else {
            self.config.duration_pool
        };
        candidates.sort_by(|a, b| {
            b.fact_count
                .cmp(&a.fact_count)
                .then_with(|| b.end().cmp(&a.end()))
        });
        for dropped in candidates.split_off(pool_size.min(candidates.len())) {
            selection.rejected.push((dropped.period, Rejection::OutsidePool));
        }

        let richest = candidates.iter().map(|c| c.fact_count).max().unwrap_or(0);
        let floor = self.config.floor(request.kind, richest);
        let required_essentials = if request.kind == StatementKind::BalanceSheet {
            let richest_essentials = candidates
                .iter()
                .map(|c| c.essential_count)
                .max()
                .unwrap_or(0);
            self.config.min_essential_concepts.min(richest_essentials)
        } else {
            0
        };

        candidates.retain(|c| {
            let rejection = if c.fact_count < floor {
                Some(Rejection::BelowFloor {
                    facts: c.fact_count,
                    floor,
                })
            } else if c.essential_count < required_essentials {
                Some(Rejection::MissingEssentials {
                    found: c.essential_count,
                    required: required_essentials,
                })
            } else {
                None
            };
            if let Some(rejection) = rejection {
                tracing::debug!(period = %c.period, %rejection, "period rejected");
                selection.rejected.push((c.period, rejection));
            }
            rejection.is_none()
        });

        for candidate in &mut candidates {
            let coverage = candidate.fact_count as f64 / richest.max(1) as f64;
            let bucketed = (coverage / COVERAGE_STEP).round() * COVERAGE_STEP;
            candidate.score = bucketed + if candidate.aligned { ALIGNMENT_BONUS } else { 0.0 };
        }

        candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| self.display_order(a, b))
        });
        for dropped in candidates.split_off(request.max_periods.min(candidates.len())) {
            selection.rejected.push((dropped.period, Rejection::Ranked));
        }
        candidates.sort_by(|a, b| self.display_order(a, b));

        if !candidates.is_empty() {
            let clean = candidates.iter().all(|c| c.aligned && !c.derived);
            selection.confidence = Some(if clean {
                Confidence::High
            } else {
                Confidence::Medium
            });
        }
        tracing::debug!(
            kind = %request.kind,
            cadence = %request.cadence,
            selected = candidates.len(),
            rejected = selection.rejected.len(),
            floor,
            "selected periods"
        );
        selection.periods = candidates;
        selection
    }

    /// Most recent first; for a shared end date the YTD policy decides.
    fn display_order(&self, a: &PeriodCandidate, b: &PeriodCandidate) -> Ordering {
        b.end().cmp(&a.end()).then_with(|| {
            match (a.shape, b.shape) {
                (PeriodShape::Quarter, s) if s.is_ytd() => {
                    if self.preference.prefers_ytd(a, b) {
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    }
                }
                (s, PeriodShape::Quarter) if s.is_ytd() => {
                    if self.preference.prefers_ytd(b, a) {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    }
                }
                _ => b
                    .fact_count
                    .cmp(&a.fact_count)
                    .then_with(|| b.period.start().cmp(&a.period.start())),
            }
        })
    }

    /// One candidate per distinct (start, end) the statement's facts cover.
    fn enumerate(&self, facts: &FactTable, request: &SelectionRequest<'_>) -> Vec<PeriodCandidate> {
        let names: HashSet<&str> = request.concepts.iter().map(|c| c.name.as_str()).collect();
        let instants = request.kind.uses_instants();

        let mut covered: HashMap<Period, (HashSet<&str>, bool)> = HashMap::new();
        let mut instant_names: HashMap<NaiveDate, HashSet<&str>> = HashMap::new();
        let mut essentials: HashMap<Period, HashSet<&str>> = HashMap::new();

        for fact in facts.facts().iter().filter(|f| f.is_consolidated()) {
            let name = fact.concept.name.as_str();
            let shape = PeriodShape::of(&fact.period);
            if instants && shape == PeriodShape::Instant && kind::is_balance_sheet_essential(name) {
                essentials.entry(fact.period).or_default().insert(name);
            }
            if !names.contains(name) {
                continue;
            }
            if !instants && shape == PeriodShape::Instant {
                instant_names.entry(fact.period.end()).or_default().insert(name);
                continue;
            }
            if instants != (shape == PeriodShape::Instant)
                || !request.cadence.admits(shape, fact.origin)
            {
                continue;
            }
            let entry = covered.entry(fact.period).or_default();
            entry.0.insert(name);
            entry.1 |= fact.origin.is_derived();
        }

        let tolerance = self.config.alignment_tolerance_months;
        covered
            .into_iter()
            .map(|(period, (mut concepts, derived))| {
                let mut candidate = PeriodCandidate::new(period, request.calendar);
                if let Some(at_end) = instant_names.get(&period.end()) {
                    concepts.extend(at_end);
                }
                candidate.fact_count = concepts.len();
                candidate.essential_count = essentials.get(&period).map_or(0, HashSet::len);
                if derived {
                    candidate.mark_derived(request.cadence);
                }
                candidate.aligned = if request.cadence == Cadence::Annual {
                    request.calendar.is_year_end_aligned(period.end(), tolerance)
                } else {
                    request.calendar.is_quarter_end(period.end())
                };
                candidate
            })
            .collect()
    }
}
