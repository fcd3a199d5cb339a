//! Statement construction from a presentation network and selected periods.

use crate::config::StatementOptions;
use crate::facts::{FactTable, NormalizedFact};
use crate::kind;
use crate::periods::{FiscalCalendar, PeriodSelector, SelectionRequest};
use crate::statement::{Cell, Confidence, Statement, StatementPeriod, StatementRow};
use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};
use tally_xbrl::taxonomy::{abstracts, roles};
use tally_xbrl::{
    ConceptId, Dimension, DimensionValue, Period, PeriodType, PresentationNetwork, StatementKind,
    Taxonomy,
};

/// Name suffixes of hypercube scaffolding that never becomes a row.
const STRUCTURAL_SUFFIXES: &[&str] = &["Axis", "Table", "Member", "Domain", "LineItems"];

/// Everything a statement is built from.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    /// Filing taxonomy
    pub taxonomy: &'a Taxonomy,
    /// Normalized, split-adjusted facts with derived periods appended
    pub facts: &'a FactTable,
    /// Fiscal calendar of the filer
    pub calendar: &'a FiscalCalendar,
    /// Document period end; later periods are never presented
    pub document_period_end: Option<NaiveDate>,
}

/// A statement line before values are attached.
#[derive(Debug, Clone)]
struct Line {
    concept: ConceptId,
    label: String,
    depth: usize,
    is_abstract: bool,
    is_total: bool,
    section: Option<String>,
    preferred_label: Option<String>,
    /// Zero-based occurrence of this concept within the statement
    occurrence: usize,
    /// Total occurrences of this concept within the statement
    occurrences: usize,
}

/// Builds statements.
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    selector: PeriodSelector,
}

impl StatementBuilder {
    /// Creates a builder around a period selector.
    pub const fn new(selector: PeriodSelector) -> Self {
        Self { selector }
    }

    /// The period selector in use.
    pub const fn selector(&self) -> &PeriodSelector {
        &self.selector
    }

    /// Builds one statement.
    ///
    /// Never fails: missing roles and sparse data produce an empty statement
    /// with low confidence and a warning.
    pub fn build(
        &self,
        ctx: &BuildContext<'_>,
        kind: StatementKind,
        options: &StatementOptions,
    ) -> Statement {
        let (lines, role, fallback) = match ctx.taxonomy.statement_network(kind) {
            Some(network) => (network_lines(ctx, network), Some(network.role.clone()), false),
            None if options.use_fallback => (fallback_lines(ctx, kind), None, true),
            None => {
                let mut statement = Statement::empty(kind);
                statement
                    .warnings
                    .push(format!("no presentation role found for the {kind}"));
                return statement;
            }
        };

        let concepts: Vec<ConceptId> = lines
            .iter()
            .filter(|l| !l.is_abstract)
            .map(|l| l.concept.clone())
            .collect();
        let selection = self.selector.select(
            ctx.facts,
            &SelectionRequest {
                kind,
                cadence: options.cadence,
                concepts: &concepts,
                calendar: ctx.calendar,
                document_period_end: ctx.document_period_end,
                max_periods: options.max_periods,
            },
        );

        let mut statement = Statement::empty(kind);
        statement.role = role;
        statement.fallback = fallback;
        if fallback {
            statement
                .warnings
                .push(format!("no presentation role found for the {kind}; showing standard concepts"));
        }
        if selection.is_empty() {
            statement
                .warnings
                .push(format!("no {} period cleared the fact floor", options.cadence));
            return statement;
        }

        statement.periods = selection.periods.iter().map(StatementPeriod::from).collect();
        let columns: Vec<Period> = statement.periods.iter().map(|p| p.period).collect();
        let mut used: Vec<HashSet<usize>> = vec![HashSet::new(); columns.len()];
        let show_breakdowns = options.include_dimensions && kind != StatementKind::Equity;

        for line in &lines {
            let mut row = StatementRow::new(line.concept.clone(), &line.label, line.depth, columns.len());
            row.is_abstract = line.is_abstract;
            row.is_total = line.is_total;
            row.section = line.section.clone();
            if !line.is_abstract {
                let instant_concept = is_instant_concept(ctx, &line.concept);
                for (col, period) in columns.iter().enumerate() {
                    let Some(target) = target_period(line, period, instant_concept) else {
                        continue;
                    };
                    if let Some((index, fact)) = pick(ctx.facts, &line.concept, &target, None, &used[col]) {
                        used[col].insert(index);
                        row.cells[col] = Some(Cell::from_fact(index, fact));
                    }
                }
            }
            row.refresh();
            statement.rows.push(row);

            if show_breakdowns && !line.is_abstract {
                let breakdowns = breakdown_rows(ctx, line, &columns, &mut used);
                statement.rows.extend(breakdowns);
            }
        }

        if options.prune_empty_rows {
            statement.prune_empty_rows();
        }
        statement.confidence = selection.confidence();
        if fallback {
            statement.confidence = statement.confidence.worst(Confidence::Medium);
        }
        tracing::debug!(
            %kind,
            rows = statement.rows.len(),
            periods = statement.periods.len(),
            fallback,
            "built statement"
        );
        statement
    }
}

fn is_structural(ctx: &BuildContext<'_>, concept: &ConceptId) -> bool {
    let dims = ctx.taxonomy.dimensions();
    STRUCTURAL_SUFFIXES.iter().any(|s| concept.name.ends_with(s))
        || dims.is_axis(concept)
        || dims.is_member(concept)
        || ctx
            .taxonomy
            .concept(concept)
            .is_some_and(|c| c.is_axis() || c.is_table())
}

/// Flattens a presentation network into lines, dropping hypercube
/// scaffolding and closing the depth gaps it leaves.
fn network_lines(ctx: &BuildContext<'_>, network: &PresentationNetwork) -> Vec<Line> {
    let nodes = network.walk();
    let mut totals: HashMap<&ConceptId, usize> = HashMap::new();
    for node in &nodes {
        *totals.entry(&node.concept).or_default() += 1;
    }

    let mut hidden: Vec<bool> = Vec::new();
    let mut headings: Vec<(usize, String)> = Vec::new();
    let mut seen: HashMap<&ConceptId, usize> = HashMap::new();
    let mut lines = Vec::new();

    for node in &nodes {
        hidden.truncate(node.depth);
        let hidden_above = hidden.iter().filter(|h| **h).count();
        let structural = is_structural(ctx, &node.concept);
        hidden.push(structural);
        if structural {
            continue;
        }

        let depth = node.depth - hidden_above;
        headings.retain(|(d, _)| *d < depth);
        let name = node.concept.name.as_str();
        let preferred = node.preferred_label.as_deref();
        let is_abstract = ctx.taxonomy.is_abstract(&node.concept)
            || abstracts::infer_structural(
                node.has_children,
                ctx.facts.has_concept(&node.concept),
                name,
                preferred,
            );
        let label = ctx.taxonomy.label(&node.concept, preferred);
        let occurrence = seen.entry(&node.concept).or_default();
        let line = Line {
            concept: node.concept.clone(),
            label: label.clone(),
            depth,
            is_abstract,
            is_total: abstracts::looks_like_total(name, preferred),
            section: headings.last().map(|(_, l)| l.clone()),
            preferred_label: node.preferred_label.clone(),
            occurrence: *occurrence,
            occurrences: totals.get(&node.concept).copied().unwrap_or(1),
        };
        *occurrence += 1;
        if is_abstract {
            headings.push((depth, label));
        }
        lines.push(line);
    }
    lines
}

/// A flat list of the standard concepts for `kind` that the filing reports.
fn fallback_lines(ctx: &BuildContext<'_>, kind: StatementKind) -> Vec<Line> {
    kind::fallback_concepts(kind)
        .into_iter()
        .filter(|c| ctx.facts.has_concept(c))
        .map(|concept| {
            let label = ctx.taxonomy.label(&concept, None);
            Line {
                is_total: abstracts::looks_like_total(&concept.name, None),
                concept,
                label,
                depth: 0,
                is_abstract: false,
                section: None,
                preferred_label: None,
                occurrence: 0,
                occurrences: 1,
            }
        })
        .collect()
}

fn is_instant_concept(ctx: &BuildContext<'_>, concept: &ConceptId) -> bool {
    match ctx.taxonomy.concept(concept).and_then(|c| c.period_type) {
        Some(period_type) => period_type == PeriodType::Instant,
        None => {
            let facts = ctx.facts.facts_for(concept);
            !facts.is_empty() && facts.iter().all(|f| f.period.is_instant())
        }
    }
}

/// The period a line reads in a column.
///
/// Instant concepts in a duration column are roll-forward balances: the
/// opening balance sits the day before the period starts. The preferred
/// label decides when present; otherwise the first of several occurrences
/// is the opening balance and any other occurrence the closing one.
fn target_period(line: &Line, column: &Period, instant_concept: bool) -> Option<Period> {
    let Period::Duration { start, end } = *column else {
        return Some(*column);
    };
    if !instant_concept {
        return Some(*column);
    }
    let opening = match line.preferred_label.as_deref() {
        Some(roles::PERIOD_START_LABEL) => true,
        Some(roles::PERIOD_END_LABEL) => false,
        _ => line.occurrences > 1 && line.occurrence == 0,
    };
    if opening {
        start.pred_opt().map(Period::Instant)
    } else {
        Some(Period::Instant(end))
    }
}

/// Best unused fact for (`concept`, `period`, `dimension`).
///
/// Reported facts beat derived ones, then higher precision wins.
fn pick<'t>(
    facts: &'t FactTable,
    concept: &ConceptId,
    period: &Period,
    dimension: Option<&Dimension>,
    used: &HashSet<usize>,
) -> Option<(usize, &'t NormalizedFact)> {
    facts
        .indexed_for(concept)
        .into_iter()
        .filter(|(index, fact)| {
            !used.contains(index)
                && &fact.period == period
                && match dimension {
                    None => fact.is_consolidated(),
                    Some(d) => fact.dimensions.len() == 1 && &fact.dimensions[0] == d,
                }
        })
        .min_by_key(|(index, fact)| {
            (
                fact.origin.is_derived(),
                Reverse(fact.decimals.unwrap_or(i32::MAX)),
                *index,
            )
        })
}

/// Rows for single-member breakdowns of `line`, placed beneath it.
fn breakdown_rows(
    ctx: &BuildContext<'_>,
    line: &Line,
    columns: &[Period],
    used: &mut [HashSet<usize>],
) -> Vec<StatementRow> {
    let instant_concept = is_instant_concept(ctx, &line.concept);
    let targets: Vec<Option<Period>> = columns
        .iter()
        .map(|c| target_period(line, c, instant_concept))
        .collect();
    let dims = ctx.taxonomy.dimensions();

    let members: BTreeSet<&Dimension> = ctx
        .facts
        .facts_for(&line.concept)
        .into_iter()
        .filter(|f| targets.contains(&Some(f.period)))
        .filter_map(|f| match f.dimensions.as_slice() {
            [only] => Some(only),
            _ => None,
        })
        .filter(|d| match &d.member {
            DimensionValue::Explicit(member) => !dims.is_default(&d.axis, member),
            DimensionValue::Typed(_) => true,
        })
        .collect();

    let mut rows = Vec::new();
    for dimension in members {
        let label = match &dimension.member {
            DimensionValue::Explicit(member) => ctx.taxonomy.label(member, None),
            DimensionValue::Typed(value) => value.clone(),
        };
        let mut row = StatementRow::new(line.concept.clone(), label, line.depth + 1, columns.len());
        row.section = Some(line.label.clone());
        row.dimension = Some(dimension.clone());
        for (col, target) in targets.iter().enumerate() {
            let Some(target) = target else { continue };
            if let Some((index, fact)) = pick(ctx.facts, &line.concept, target, Some(dimension), &used[col]) {
                used[col].insert(index);
                row.cells[col] = Some(Cell::from_fact(index, fact));
            }
        }
        if row.has_values() {
            row.refresh();
            rows.push(row);
        }
    }
    rows
}
