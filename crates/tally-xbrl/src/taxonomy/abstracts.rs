//! Tiered abstract-concept detection.
//!
//! Standard schemas referenced by a filing are usually not shipped with it, so
//! the explicit `abstract` attribute is often unavailable. The tiers are tried
//! in order and the first one that answers wins.

use super::concept::{AbstractSource, ConceptId};
use super::roles;

/// Local-name suffixes that always denote a structural heading.
pub const ABSTRACT_SUFFIXES: &[&str] = &[
    "Abstract",
    "RollForward",
    "Table",
    "Axis",
    "Domain",
    "Member",
    "LineItems",
];

/// Standard headings that filers reference from the base taxonomy.
pub const KNOWN_ABSTRACT: &[&str] = &[
    "StatementOfFinancialPositionAbstract",
    "IncomeStatementAbstract",
    "StatementOfCashFlowsAbstract",
    "StatementOfStockholdersEquityAbstract",
    "StatementOfIncomeAndComprehensiveIncomeAbstract",
    "AssetsAbstract",
    "AssetsCurrentAbstract",
    "AssetsNoncurrentAbstract",
    "LiabilitiesAbstract",
    "LiabilitiesCurrentAbstract",
    "LiabilitiesNoncurrentAbstract",
    "LiabilitiesAndStockholdersEquityAbstract",
    "StockholdersEquityAbstract",
    "OperatingExpensesAbstract",
    "CostsAndExpensesAbstract",
    "NonoperatingIncomeExpenseAbstract",
    "EarningsPerShareAbstract",
    "EarningsPerShareBasicAbstract",
    "EarningsPerShareDilutedAbstract",
    "WeightedAverageNumberOfSharesOutstandingAbstract",
    "NetCashProvidedByUsedInOperatingActivitiesAbstract",
    "NetCashProvidedByUsedInInvestingActivitiesAbstract",
    "NetCashProvidedByUsedInFinancingActivitiesAbstract",
    "IncreaseDecreaseInOperatingCapitalAbstract",
    "AdjustmentsToReconcileNetIncomeLossToCashProvidedByUsedInOperatingActivitiesAbstract",
    "SupplementalCashFlowInformationAbstract",
    "StatementLineItems",
    "StatementTable",
    "StatementEquityComponentsAxis",
    "EquityComponentDomain",
    "CoverAbstract",
    "DocumentAndEntityInformationAbstract",
    "DocumentAndEntityInformation",
    "StatementOfFinancialPosition",
    "IncomeStatement",
    "StatementOfCashFlows",
    "StatementOfStockholdersEquity",
];

/// Resolves the abstract flag from the first three tiers.
///
/// The structural tier needs reported facts and is applied later by
/// [`infer_structural`].
pub fn resolve(id: &ConceptId, schema_attr: Option<bool>) -> (bool, AbstractSource) {
    if let Some(flag) = schema_attr {
        return (flag, AbstractSource::Schema);
    }
    if ABSTRACT_SUFFIXES.iter().any(|s| id.name.ends_with(s)) {
        return (true, AbstractSource::NamePattern);
    }
    if KNOWN_ABSTRACT.contains(&id.name.as_str()) {
        return (true, AbstractSource::KnownTable);
    }
    (false, AbstractSource::Default)
}

/// Structural tier: a node with children, no reported fact in any period and
/// no total framing is a heading.
pub fn infer_structural(
    has_children: bool,
    has_reported_fact: bool,
    name: &str,
    preferred_label: Option<&str>,
) -> bool {
    has_children && !has_reported_fact && !looks_like_total(name, preferred_label)
}

/// Returns true if the row frames a total or subtotal.
pub fn looks_like_total(name: &str, preferred_label: Option<&str>) -> bool {
    if matches!(
        preferred_label,
        Some(roles::TOTAL_LABEL) | Some(roles::NEGATED_TOTAL_LABEL)
    ) {
        return true;
    }
    name.starts_with("Total")
        || name.contains("Total")
        || name.starts_with("NetCashProvidedBy")
        || matches!(
            name,
            "Assets"
                | "Liabilities"
                | "LiabilitiesAndStockholdersEquity"
                | "StockholdersEquity"
                | "AssetsCurrent"
                | "LiabilitiesCurrent"
        )
}
