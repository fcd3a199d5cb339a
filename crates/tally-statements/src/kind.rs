//! Per-statement concept tables.
//!
//! Local names only; prefixes drift between taxonomy versions.

use tally_xbrl::{ConceptId, StatementKind};

/// Balance sheet concepts that distinguish a real balance sheet column from
/// an instant that only carries a few equity or cover-page values.
pub const BALANCE_SHEET_ESSENTIALS: &[&str] = &[
    "Assets",
    "AssetsCurrent",
    "CashAndCashEquivalentsAtCarryingValue",
    "AccountsReceivableNetCurrent",
    "InventoryNet",
    "PrepaidExpenseAndOtherAssetsCurrent",
    "PropertyPlantAndEquipmentNet",
    "Goodwill",
    "IntangibleAssetsNetExcludingGoodwill",
    "OperatingLeaseRightOfUseAsset",
    "OtherAssetsNoncurrent",
    "Liabilities",
    "LiabilitiesCurrent",
    "AccountsPayableCurrent",
    "AccruedLiabilitiesCurrent",
    "ContractWithCustomerLiabilityCurrent",
    "LongTermDebtNoncurrent",
    "OperatingLeaseLiabilityNoncurrent",
    "OtherLiabilitiesNoncurrent",
    "StockholdersEquity",
    "CommonStockValue",
    "AdditionalPaidInCapital",
    "RetainedEarningsAccumulatedDeficit",
    "AccumulatedOtherComprehensiveIncomeLossNetOfTax",
    "LiabilitiesAndStockholdersEquity",
];

const INCOME_STATEMENT_FALLBACK: &[&str] = &[
    "Revenues",
    "RevenueFromContractWithCustomerExcludingAssessedTax",
    "CostOfRevenue",
    "CostOfGoodsAndServicesSold",
    "GrossProfit",
    "ResearchAndDevelopmentExpense",
    "SellingGeneralAndAdministrativeExpense",
    "OperatingExpenses",
    "OperatingIncomeLoss",
    "InterestExpense",
    "NonoperatingIncomeExpense",
    "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
    "IncomeTaxExpenseBenefit",
    "NetIncomeLoss",
    "EarningsPerShareBasic",
    "EarningsPerShareDiluted",
    "WeightedAverageNumberOfSharesOutstandingBasic",
    "WeightedAverageNumberOfDilutedSharesOutstanding",
];

const CASH_FLOW_FALLBACK: &[&str] = &[
    "NetIncomeLoss",
    "DepreciationDepletionAndAmortization",
    "ShareBasedCompensation",
    "DeferredIncomeTaxExpenseBenefit",
    "IncreaseDecreaseInAccountsReceivable",
    "IncreaseDecreaseInInventories",
    "IncreaseDecreaseInAccountsPayable",
    "NetCashProvidedByUsedInOperatingActivities",
    "PaymentsToAcquirePropertyPlantAndEquipment",
    "PaymentsToAcquireBusinessesNetOfCashAcquired",
    "NetCashProvidedByUsedInInvestingActivities",
    "ProceedsFromIssuanceOfLongTermDebt",
    "RepaymentsOfLongTermDebt",
    "PaymentsForRepurchaseOfCommonStock",
    "PaymentsOfDividends",
    "NetCashProvidedByUsedInFinancingActivities",
    "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalentsPeriodIncreaseDecreaseIncludingExchangeRateEffect",
];

const EQUITY_FALLBACK: &[&str] = &[
    "StockholdersEquity",
    "NetIncomeLoss",
    "OtherComprehensiveIncomeLossNetOfTax",
    "StockIssuedDuringPeriodValueShareBasedCompensation",
    "AdjustmentsToAdditionalPaidInCapitalSharebasedCompensationRequisiteServicePeriodRecognitionValue",
    "StockRepurchasedDuringPeriodValue",
    "DividendsCommonStock",
];

/// Concepts shown, in order, when a filing has no recognizable presentation
/// role for `kind`.
pub fn fallback_concepts(kind: StatementKind) -> Vec<ConceptId> {
    let names = match kind {
        StatementKind::BalanceSheet => BALANCE_SHEET_ESSENTIALS,
        StatementKind::IncomeStatement => INCOME_STATEMENT_FALLBACK,
        StatementKind::CashFlow => CASH_FLOW_FALLBACK,
        StatementKind::Equity => EQUITY_FALLBACK,
    };
    names.iter().map(|n| ConceptId::new("us-gaap", *n)).collect()
}

/// Returns true if `name` is an essential balance sheet concept.
pub fn is_balance_sheet_essential(name: &str) -> bool {
    BALANCE_SHEET_ESSENTIALS.contains(&name)
}
