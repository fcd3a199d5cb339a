//! Name-pattern fallback for concepts the standard table does not list.
//!
//! Company extensions often rename a standard line (`acme:NetRevenuesProducts`
//! is still revenue). Patterns match fragments of the local name; a rule needs
//! every `all` fragment, at least one `any` fragment when given, and no `none`
//! fragment.

use crate::concept::StandardConcept;
use tally_xbrl::StatementKind;

/// One fallback rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRule {
    /// Concept the rule maps to
    pub standard: StandardConcept,
    /// Fragments that must all appear
    pub all: &'static [&'static str],
    /// Fragments of which one must appear; empty means no constraint
    pub any: &'static [&'static str],
    /// Fragments that disqualify the name
    pub none: &'static [&'static str],
}

impl PatternRule {
    /// Returns true if the rule claims `name` on a statement of `kind`.
    pub fn matches(&self, name: &str, kind: StatementKind) -> bool {
        self.standard.fits(kind)
            && self.all.iter().all(|f| name.contains(f))
            && (self.any.is_empty() || self.any.iter().any(|f| name.contains(f)))
            && !self.none.iter().any(|f| name.contains(f))
    }
}

const COMPONENT: &[&str] = &[
    "Member", "Axis", "Percent", "Rate", "PerShare", "Segment", "Deferred", "Other",
];

/// Fallback rules, first match wins.
pub const PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        standard: StandardConcept::GrossProfit,
        all: &["GrossProfit"],
        any: &[],
        none: COMPONENT,
    },
    PatternRule {
        standard: StandardConcept::CostOfRevenue,
        all: &["CostOf"],
        any: &["Revenue", "Sales", "GoodsAndServices", "GoodsSold"],
        none: COMPONENT,
    },
    PatternRule {
        standard: StandardConcept::Revenue,
        all: &[],
        any: &["Revenues", "NetSales", "SalesRevenue"],
        none: &[
            "Cost", "Deferred", "Unearned", "Receivable", "Member", "Axis", "Percent", "PerShare",
        ],
    },
    PatternRule {
        standard: StandardConcept::ResearchAndDevelopment,
        all: &["ResearchAndDevelopment"],
        any: &[],
        none: &["InProcess", "Credit", "Member"],
    },
    PatternRule {
        standard: StandardConcept::SellingGeneralAndAdministrative,
        all: &["SellingGeneralAndAdministrative"],
        any: &[],
        none: &["Member"],
    },
    PatternRule {
        standard: StandardConcept::OperatingIncome,
        all: &["OperatingIncome"],
        any: &[],
        none: &["Other", "NonOperating", "Nonoperating", "Member", "PerShare"],
    },
    PatternRule {
        standard: StandardConcept::NetIncome,
        all: &["NetIncome"],
        any: &[],
        none: &[
            "PerShare",
            "Noncontrolling",
            "Discontinued",
            "Adjustment",
            "Member",
            "Comprehensive",
        ],
    },
    PatternRule {
        standard: StandardConcept::OperatingCashFlow,
        all: &["NetCashProvidedBy", "OperatingActivities"],
        any: &[],
        none: &["Discontinued"],
    },
    PatternRule {
        standard: StandardConcept::InvestingCashFlow,
        all: &["NetCashProvidedBy", "InvestingActivities"],
        any: &[],
        none: &["Discontinued"],
    },
    PatternRule {
        standard: StandardConcept::FinancingCashFlow,
        all: &["NetCashProvidedBy", "FinancingActivities"],
        any: &[],
        none: &["Discontinued"],
    },
    PatternRule {
        standard: StandardConcept::CapitalExpenditures,
        all: &["PaymentsToAcquire"],
        any: &["PropertyPlantAndEquipment", "ProductiveAssets"],
        none: &["Member"],
    },
    PatternRule {
        standard: StandardConcept::CashAndEquivalents,
        all: &["CashAndCashEquivalents"],
        any: &[],
        none: &["Period", "Increase", "Decrease", "Restricted", "Member"],
    },
];

/// The first rule claiming `name` on a statement of `kind`.
pub fn match_pattern(name: &str, kind: StatementKind) -> Option<StandardConcept> {
    PATTERN_RULES
        .iter()
        .find(|rule| rule.matches(name, kind))
        .map(|rule| rule.standard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("NetRevenuesProducts", StatementKind::IncomeStatement, Some(StandardConcept::Revenue))]
    #[case("TotalNetSales", StatementKind::IncomeStatement, Some(StandardConcept::Revenue))]
    #[case("CostOfProductRevenue", StatementKind::IncomeStatement, Some(StandardConcept::CostOfRevenue))]
    #[case("DeferredRevenuesCurrent", StatementKind::IncomeStatement, None)]
    #[case("AdjustedGrossProfit", StatementKind::IncomeStatement, Some(StandardConcept::GrossProfit))]
    #[case("NetIncomeAttributableToParent", StatementKind::CashFlow, Some(StandardConcept::NetIncome))]
    #[case("NetIncomePerShareDiluted", StatementKind::IncomeStatement, None)]
    #[case("NetCashProvidedByOperatingActivitiesTotal", StatementKind::CashFlow, Some(StandardConcept::OperatingCashFlow))]
    #[case("Revenues", StatementKind::BalanceSheet, None)]
    fn test_patterns(
        #[case] name: &str,
        #[case] kind: StatementKind,
        #[case] expected: Option<StandardConcept>,
    ) {
        assert_eq!(match_pattern(name, kind), expected);
    }
}
