//! Derived periods: discrete fourth quarters and trailing twelve months.
//!
//! Only consolidated monetary flows are derived. Per-share values and share
//! counts do not add across periods.

use super::PeriodShape;
use crate::facts::{FactOrigin, FactTable, NormalizedFact, ValueKind};
use chrono::{Days, NaiveDate};
use std::collections::{BTreeMap, HashSet};
use tally_xbrl::{ConceptId, Period};

/// Largest gap, in days, tolerated between periods that should abut or
/// recur a year apart.
const CONTIGUITY_SLACK_DAYS: i64 = 7;

fn flows(table: &FactTable) -> BTreeMap<&ConceptId, Vec<&NormalizedFact>> {
    let mut by_concept: BTreeMap<&ConceptId, Vec<&NormalizedFact>> = BTreeMap::new();
    for fact in table.facts() {
        if fact.is_consolidated()
            && fact.kind == ValueKind::Monetary
            && !fact.period.is_instant()
            && !fact.origin.is_derived()
        {
            by_concept.entry(&fact.concept).or_default().push(fact);
        }
    }
    by_concept
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

fn near(a: NaiveDate, b: NaiveDate) -> bool {
    a.signed_duration_since(b).num_days().abs() <= CONTIGUITY_SLACK_DAYS
}

fn derive(
    template: &NormalizedFact,
    parts: &[&NormalizedFact],
    period: Period,
    value: f64,
    reported: f64,
    origin: FactOrigin,
) -> NormalizedFact {
    NormalizedFact {
        period,
        value,
        reported,
        origin,
        decimals: parts.iter().filter_map(|f| f.decimals).min(),
        split_factor: 1.0,
        ..template.clone()
    }
}

/// Computes Q4 = fiscal year − nine-month YTD where no discrete fourth
/// quarter is reported.
pub fn derive_fourth_quarters(table: &FactTable) -> Vec<NormalizedFact> {
    let mut out = Vec::new();
    for (concept, facts) in flows(table) {
        for year in facts.iter().filter(|f| PeriodShape::of(&f.period) == PeriodShape::Annual) {
            let (Some(start), end) = (year.period.start(), year.period.end()) else {
                continue;
            };
            let reported_q4 = facts.iter().any(|f| {
                PeriodShape::of(&f.period) == PeriodShape::Quarter && f.period.end() == end
            });
            if reported_q4 {
                continue;
            }
            let Some(nine) = facts.iter().find(|f| {
                PeriodShape::of(&f.period) == PeriodShape::NineMonths
                    && f.period.start() == Some(start)
            }) else {
                continue;
            };
            let period = Period::Duration {
                start: next_day(nine.period.end()),
                end,
            };
            tracing::debug!(%concept, %period, "derived fourth quarter");
            out.push(derive(
                year,
                &[*year, *nine],
                period,
                year.value - nine.value,
                year.reported - nine.reported,
                FactOrigin::DerivedQ4,
            ));
        }
    }
    out
}

/// Derives fourth quarters for the fiscal years of `annual` from the
/// nine-month YTD facts of `interim` tables, typically the third-quarter
/// reports of the same entity.
///
/// Quarters `annual` already reports or derives on its own are left out.
pub fn derive_fourth_quarters_across<'a>(
    annual: &FactTable,
    interim: impl IntoIterator<Item = &'a FactTable>,
) -> Vec<NormalizedFact> {
    let mut combined: Vec<NormalizedFact> = annual
        .facts()
        .iter()
        .filter(|f| !f.origin.is_derived())
        .cloned()
        .collect();
    for table in interim {
        combined.extend(
            table
                .facts()
                .iter()
                .filter(|f| {
                    !f.origin.is_derived() && PeriodShape::of(&f.period) == PeriodShape::NineMonths
                })
                .cloned(),
        );
    }
    let known: HashSet<(ConceptId, Period)> = annual
        .facts()
        .iter()
        .filter(|f| f.is_consolidated() && PeriodShape::of(&f.period) == PeriodShape::Quarter)
        .map(|f| (f.concept.clone(), f.period))
        .collect();

    derive_fourth_quarters(&FactTable::new(combined))
        .into_iter()
        .filter(|q| !known.contains(&(q.concept.clone(), q.period)))
        .collect()
}

/// Computes trailing-twelve-month values ending on each available quarter
/// end.
///
/// Four contiguous discrete quarters are summed when available; otherwise
/// `FY + YTD − prior-year YTD`. Ends that coincide with a reported fiscal
/// year are skipped, since the fiscal year already is the trailing year.
/// Discrete quarters include derived fourth quarters when `table` holds them.
pub fn derive_trailing_twelve_months(table: &FactTable) -> Vec<NormalizedFact> {
    let mut out = Vec::new();
    for (concept, facts) in flows(table) {
        let fiscal_years: Vec<&NormalizedFact> = facts
            .iter()
            .copied()
            .filter(|f| PeriodShape::of(&f.period) == PeriodShape::Annual)
            .collect();
        let year_ends: HashSet<NaiveDate> = fiscal_years.iter().map(|f| f.period.end()).collect();
        let mut produced: HashSet<NaiveDate> = HashSet::new();

        let mut quarters: Vec<&NormalizedFact> = table
            .facts_for(concept)
            .into_iter()
            .filter(|f| {
                f.is_consolidated()
                    && f.kind == ValueKind::Monetary
                    && matches!(f.origin, FactOrigin::Reported | FactOrigin::DerivedQ4)
                    && PeriodShape::of(&f.period) == PeriodShape::Quarter
            })
            .collect();
        quarters.sort_by_key(|f| f.period.end());
        quarters.dedup_by_key(|f| f.period.end());

        for window in quarters.windows(4) {
            let contiguous = window.windows(2).all(|pair| {
                pair[1]
                    .period
                    .start()
                    .is_some_and(|s| near(s, next_day(pair[0].period.end())))
            });
            let end = window[3].period.end();
            if !contiguous || year_ends.contains(&end) || !produced.insert(end) {
                continue;
            }
            let Some(start) = window[0].period.start() else {
                continue;
            };
            out.push(derive(
                window[3],
                window,
                Period::Duration { start, end },
                window.iter().map(|f| f.value).sum(),
                window.iter().map(|f| f.reported).sum(),
                FactOrigin::Ttm,
            ));
        }

        for year in &fiscal_years {
            let (Some(year_start), year_end) = (year.period.start(), year.period.end()) else {
                continue;
            };
            let current_ytds = facts.iter().filter(|f| {
                PeriodShape::of(&f.period) != PeriodShape::Annual
                    && f.period.start().is_some_and(|s| near(s, next_day(year_end)))
            });
            for current in current_ytds {
                let end = current.period.end();
                if year_ends.contains(&end) || produced.contains(&end) {
                    continue;
                }
                let Some(prior) = facts.iter().find(|f| {
                    f.period.start() == Some(year_start)
                        && near(f.period.end(), end.checked_sub_days(Days::new(365)).unwrap_or(end))
                        && (f.period.days() - current.period.days()).abs() <= CONTIGUITY_SLACK_DAYS
                }) else {
                    continue;
                };
                produced.insert(end);
                let period = Period::Duration {
                    start: next_day(prior.period.end()),
                    end,
                };
                out.push(derive(
                    current,
                    &[*year, *current, *prior],
                    period,
                    year.value + current.value - prior.value,
                    year.reported + current.reported - prior.reported,
                    FactOrigin::Ttm,
                ));
            }
        }
        if !produced.is_empty() {
            tracing::debug!(%concept, periods = produced.len(), "derived trailing twelve months");
        }
    }
    out
}
