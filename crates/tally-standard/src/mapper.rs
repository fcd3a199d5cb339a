//! The standard concept table.
//!
//! Different filers, and the same filer across taxonomy years, tag the same
//! line with different concepts. Each canonical concept lists the local names
//! it absorbs, most direct first.

use crate::concept::StandardConcept;
use std::collections::HashMap;

/// Local names absorbed by each canonical concept, most direct first.
pub const STANDARD_TAGS: &[(StandardConcept, &[&str])] = &[
    (
        StandardConcept::CashAndEquivalents,
        &[
            "CashAndCashEquivalentsAtCarryingValue",
            "Cash",
            "CashAndDueFromBanks",
            "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
        ],
    ),
    (
        StandardConcept::ShortTermInvestments,
        &[
            "ShortTermInvestments",
            "MarketableSecuritiesCurrent",
            "AvailableForSaleSecuritiesDebtSecuritiesCurrent",
        ],
    ),
    (
        StandardConcept::AccountsReceivable,
        &["AccountsReceivableNetCurrent", "ReceivablesNetCurrent"],
    ),
    (StandardConcept::Inventory, &["InventoryNet", "InventoryFinishedGoods"]),
    (StandardConcept::CurrentAssets, &["AssetsCurrent"]),
    (
        StandardConcept::PropertyPlantAndEquipment,
        &[
            "PropertyPlantAndEquipmentNet",
            "PropertyPlantAndEquipmentAndFinanceLeaseRightOfUseAssetAfterAccumulatedDepreciationAndAmortization",
        ],
    ),
    (StandardConcept::Goodwill, &["Goodwill"]),
    (
        StandardConcept::IntangibleAssets,
        &[
            "IntangibleAssetsNetExcludingGoodwill",
            "FiniteLivedIntangibleAssetsNet",
        ],
    ),
    (StandardConcept::TotalAssets, &["Assets"]),
    (
        StandardConcept::AccountsPayable,
        &["AccountsPayableCurrent", "AccountsPayableAndAccruedLiabilitiesCurrent"],
    ),
    (StandardConcept::CurrentLiabilities, &["LiabilitiesCurrent"]),
    (
        StandardConcept::LongTermDebt,
        &[
            "LongTermDebtNoncurrent",
            "LongTermDebt",
            "LongTermDebtAndCapitalLeaseObligations",
        ],
    ),
    (StandardConcept::TotalLiabilities, &["Liabilities"]),
    (
        StandardConcept::RetainedEarnings,
        &["RetainedEarningsAccumulatedDeficit"],
    ),
    (
        StandardConcept::StockholdersEquity,
        &[
            "StockholdersEquity",
            "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
        ],
    ),
    (
        StandardConcept::LiabilitiesAndEquity,
        &["LiabilitiesAndStockholdersEquity"],
    ),
    (
        StandardConcept::Revenue,
        &[
            "Revenues",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "SalesRevenueNet",
            "RevenueFromContractWithCustomerIncludingAssessedTax",
        ],
    ),
    (
        StandardConcept::CostOfRevenue,
        &[
            "CostOfRevenue",
            "CostOfGoodsAndServicesSold",
            "CostOfGoodsSold",
            "CostOfServices",
        ],
    ),
    (StandardConcept::GrossProfit, &["GrossProfit"]),
    (
        StandardConcept::ResearchAndDevelopment,
        &[
            "ResearchAndDevelopmentExpense",
            "ResearchAndDevelopmentExpenseExcludingAcquiredInProcessCost",
        ],
    ),
    (
        StandardConcept::SellingGeneralAndAdministrative,
        &[
            "SellingGeneralAndAdministrativeExpense",
            "GeneralAndAdministrativeExpense",
        ],
    ),
    (
        StandardConcept::OperatingExpenses,
        &["OperatingExpenses", "CostsAndExpenses"],
    ),
    (StandardConcept::OperatingIncome, &["OperatingIncomeLoss"]),
    (
        StandardConcept::InterestExpense,
        &["InterestExpense", "InterestExpenseNonoperating"],
    ),
    (
        StandardConcept::PretaxIncome,
        &[
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
        ],
    ),
    (StandardConcept::IncomeTax, &["IncomeTaxExpenseBenefit"]),
    (
        StandardConcept::NetIncome,
        &[
            "NetIncomeLoss",
            "ProfitLoss",
            "NetIncomeLossAvailableToCommonStockholdersBasic",
        ],
    ),
    (StandardConcept::EpsBasic, &["EarningsPerShareBasic"]),
    (
        StandardConcept::EpsDiluted,
        &["EarningsPerShareDiluted", "EarningsPerShareBasicAndDiluted"],
    ),
    (
        StandardConcept::SharesBasic,
        &["WeightedAverageNumberOfSharesOutstandingBasic"],
    ),
    (
        StandardConcept::SharesDiluted,
        &["WeightedAverageNumberOfDilutedSharesOutstanding"],
    ),
    (
        StandardConcept::DepreciationAndAmortization,
        &[
            "DepreciationDepletionAndAmortization",
            "DepreciationAndAmortization",
            "DepreciationAmortizationAndAccretionNet",
        ],
    ),
    (
        StandardConcept::ShareBasedCompensation,
        &["ShareBasedCompensation", "AllocatedShareBasedCompensationExpense"],
    ),
    (
        StandardConcept::OperatingCashFlow,
        &[
            "NetCashProvidedByUsedInOperatingActivities",
            "NetCashProvidedByUsedInOperatingActivitiesContinuingOperations",
        ],
    ),
    (
        StandardConcept::CapitalExpenditures,
        &[
            "PaymentsToAcquirePropertyPlantAndEquipment",
            "PaymentsToAcquireProductiveAssets",
            "PaymentsForCapitalImprovements",
        ],
    ),
    (
        StandardConcept::InvestingCashFlow,
        &[
            "NetCashProvidedByUsedInInvestingActivities",
            "NetCashProvidedByUsedInInvestingActivitiesContinuingOperations",
        ],
    ),
    (
        StandardConcept::FinancingCashFlow,
        &[
            "NetCashProvidedByUsedInFinancingActivities",
            "NetCashProvidedByUsedInFinancingActivitiesContinuingOperations",
        ],
    ),
    (
        StandardConcept::DividendsPaid,
        &["PaymentsOfDividends", "PaymentsOfDividendsCommonStock"],
    ),
    (
        StandardConcept::ShareRepurchases,
        &["PaymentsForRepurchaseOfCommonStock"],
    ),
];

/// Lookup in both directions over [`STANDARD_TAGS`].
#[derive(Debug, Clone)]
pub struct ConceptMapper {
    /// Canonical concept to the local names it absorbs
    tags: HashMap<StandardConcept, Vec<String>>,
    /// Local name to (canonical concept, rank within its list)
    by_tag: HashMap<String, (StandardConcept, usize)>,
}

impl ConceptMapper {
    /// Creates a mapper over the standard table.
    pub fn new() -> Self {
        let mut tags: HashMap<StandardConcept, Vec<String>> = HashMap::new();
        let mut by_tag = HashMap::new();
        for (standard, names) in STANDARD_TAGS {
            for (rank, name) in names.iter().enumerate() {
                tags.entry(*standard).or_default().push((*name).to_string());
                by_tag.entry((*name).to_string()).or_insert((*standard, rank));
            }
        }
        Self { tags, by_tag }
    }

    /// Local names absorbed by `standard`.
    pub fn tags_for(&self, standard: StandardConcept) -> Option<&[String]> {
        self.tags.get(&standard).map(Vec::as_slice)
    }

    /// The canonical concept for a local name, with its rank (0 = most direct).
    pub fn lookup(&self, name: &str) -> Option<(StandardConcept, usize)> {
        self.by_tag.get(name).copied()
    }
}

impl Default for ConceptMapper {
    fn default() -> Self {
        Self::new()
    }
}
