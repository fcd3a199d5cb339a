//! Lines computed from other standardized lines.
//!
//! A derived line is added only when the statement has no row already mapped
//! to it, and only in columns where both inputs are present. Inputs are read
//! as reported (before sign normalization), so the arithmetic does not depend
//! on how a filer weighted its calculation network.

use crate::concept::StandardConcept;
use tally_statements::{Cell, FactOrigin, Statement, StatementRow};
use tally_xbrl::taxonomy::concept::humanize;
use tally_xbrl::{ConceptId, StatementKind};

/// Prefix of the synthetic concepts backing derived rows.
pub const DERIVED_PREFIX: &str = "tally";

/// `target = minuend − subtrahend` on statements of `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedRule {
    /// Line produced
    pub target: StandardConcept,
    /// Statement the rule applies to
    pub kind: StatementKind,
    /// Left operand
    pub minuend: StandardConcept,
    /// Right operand
    pub subtrahend: StandardConcept,
}

/// The derived lines.
pub const DERIVED_RULES: &[DerivedRule] = &[
    DerivedRule {
        target: StandardConcept::GrossProfit,
        kind: StatementKind::IncomeStatement,
        minuend: StandardConcept::Revenue,
        subtrahend: StandardConcept::CostOfRevenue,
    },
    DerivedRule {
        target: StandardConcept::FreeCashFlow,
        kind: StatementKind::CashFlow,
        minuend: StandardConcept::OperatingCashFlow,
        subtrahend: StandardConcept::CapitalExpenditures,
    },
    DerivedRule {
        target: StandardConcept::TotalLiabilities,
        kind: StatementKind::BalanceSheet,
        minuend: StandardConcept::LiabilitiesAndEquity,
        subtrahend: StandardConcept::StockholdersEquity,
    },
];

fn position(statement: &Statement, standard: StandardConcept) -> Option<usize> {
    let name = standard.to_string();
    statement
        .rows
        .iter()
        .position(|r| r.dimension.is_none() && r.standard.as_deref() == Some(name.as_str()))
}

impl DerivedRule {
    /// Computes the derived row, or `None` when the target is already
    /// present or no column has both inputs.
    pub fn compute(&self, statement: &Statement) -> Option<(usize, StatementRow)> {
        if statement.kind != self.kind {
            return None;
        }
        if position(statement, self.target)
            .is_some_and(|i| statement.rows[i].has_values())
        {
            return None;
        }
        let left_index = position(statement, self.minuend)?;
        let right_index = position(statement, self.subtrahend)?;
        let (left, right) = (&statement.rows[left_index], &statement.rows[right_index]);

        let name = self.target.to_string();
        let mut row = StatementRow::new(
            ConceptId::new(DERIVED_PREFIX, name.as_str()),
            humanize(&name),
            left.depth,
            statement.periods.len(),
        );
        row.standard = Some(name);
        row.section = left.section.clone();
        row.is_total = true;
        row.derived = true;

        for (column, slot) in row.cells.iter_mut().enumerate() {
            let (Some(Some(a)), Some(Some(b))) = (left.cells.get(column), right.cells.get(column))
            else {
                continue;
            };
            let mut cell = Cell::derived(a.reported - b.reported, a.unit.clone(), FactOrigin::Computed);
            cell.is_instant = a.is_instant;
            cell.split_factor = a.split_factor;
            *slot = Some(cell);
        }
        row.refresh();
        if !row.has_values() {
            return None;
        }
        Some((left_index.max(right_index) + 1, row))
    }
}

/// Applies every rule for the statement's kind; returns the lines added.
pub fn derive_missing(statement: &mut Statement) -> Vec<StandardConcept> {
    let mut added = Vec::new();
    for rule in DERIVED_RULES {
        let Some((mut at, row)) = rule.compute(statement) else {
            continue;
        };
        // an empty row mapped to the target would otherwise shadow the derived one
        if let Some(placeholder) = position(statement, rule.target) {
            statement.rows.remove(placeholder);
            if placeholder < at {
                at -= 1;
            }
        }
        tracing::debug!(kind = %statement.kind, line = %rule.target, "derived line");
        statement.rows.insert(at, row);
        added.push(rule.target);
    }
    added
}
