//! The canonical line-item vocabulary.

use crate::error::StandardError;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tally_xbrl::StatementKind;

/// A canonical line item shared across filers and taxonomy versions.
///
/// The display form is the canonical name written to `StatementRow::standard`.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum StandardConcept {
    // Balance sheet
    /// Cash and cash equivalents
    CashAndEquivalents,
    /// Short-term and marketable investments
    ShortTermInvestments,
    /// Trade receivables
    AccountsReceivable,
    /// Inventory
    Inventory,
    /// Total current assets
    CurrentAssets,
    /// Net property, plant and equipment
    PropertyPlantAndEquipment,
    /// Goodwill
    Goodwill,
    /// Intangibles other than goodwill
    IntangibleAssets,
    /// Total assets
    TotalAssets,
    /// Trade payables
    AccountsPayable,
    /// Total current liabilities
    CurrentLiabilities,
    /// Non-current debt
    LongTermDebt,
    /// Total liabilities
    TotalLiabilities,
    /// Retained earnings or accumulated deficit
    RetainedEarnings,
    /// Equity attributable to the parent
    StockholdersEquity,
    /// Total liabilities and equity
    LiabilitiesAndEquity,

    // Income statement
    /// Total revenue
    Revenue,
    /// Cost of revenue
    CostOfRevenue,
    /// Gross profit
    GrossProfit,
    /// Research and development
    ResearchAndDevelopment,
    /// Selling, general and administrative
    SellingGeneralAndAdministrative,
    /// Total operating expenses
    OperatingExpenses,
    /// Operating income
    OperatingIncome,
    /// Interest expense
    InterestExpense,
    /// Income before income taxes
    PretaxIncome,
    /// Income tax expense
    IncomeTax,
    /// Net income
    NetIncome,
    /// Basic earnings per share
    EpsBasic,
    /// Diluted earnings per share
    EpsDiluted,
    /// Weighted average basic shares
    SharesBasic,
    /// Weighted average diluted shares
    SharesDiluted,

    // Cash flow
    /// Depreciation and amortization
    DepreciationAndAmortization,
    /// Share-based compensation
    ShareBasedCompensation,
    /// Net cash from operating activities
    OperatingCashFlow,
    /// Purchases of property, plant and equipment
    CapitalExpenditures,
    /// Net cash from investing activities
    InvestingCashFlow,
    /// Net cash from financing activities
    FinancingCashFlow,
    /// Dividends paid
    DividendsPaid,
    /// Share repurchases
    ShareRepurchases,
    /// Operating cash flow less capital expenditures
    FreeCashFlow,
}

impl StandardConcept {
    /// Every canonical concept.
    pub const ALL: [Self; 40] = [
        Self::CashAndEquivalents,
        Self::ShortTermInvestments,
        Self::AccountsReceivable,
        Self::Inventory,
        Self::CurrentAssets,
        Self::PropertyPlantAndEquipment,
        Self::Goodwill,
        Self::IntangibleAssets,
        Self::TotalAssets,
        Self::AccountsPayable,
        Self::CurrentLiabilities,
        Self::LongTermDebt,
        Self::TotalLiabilities,
        Self::RetainedEarnings,
        Self::StockholdersEquity,
        Self::LiabilitiesAndEquity,
        Self::Revenue,
        Self::CostOfRevenue,
        Self::GrossProfit,
        Self::ResearchAndDevelopment,
        Self::SellingGeneralAndAdministrative,
        Self::OperatingExpenses,
        Self::OperatingIncome,
        Self::InterestExpense,
        Self::PretaxIncome,
        Self::IncomeTax,
        Self::NetIncome,
        Self::EpsBasic,
        Self::EpsDiluted,
        Self::SharesBasic,
        Self::SharesDiluted,
        Self::DepreciationAndAmortization,
        Self::ShareBasedCompensation,
        Self::OperatingCashFlow,
        Self::CapitalExpenditures,
        Self::InvestingCashFlow,
        Self::FinancingCashFlow,
        Self::DividendsPaid,
        Self::ShareRepurchases,
        Self::FreeCashFlow,
    ];

    /// The statement this concept normally appears on.
    pub const fn home(self) -> StatementKind {
        use StandardConcept::*;
        match self {
            CashAndEquivalents | ShortTermInvestments | AccountsReceivable | Inventory
            | CurrentAssets | PropertyPlantAndEquipment | Goodwill | IntangibleAssets
            | TotalAssets | AccountsPayable | CurrentLiabilities | LongTermDebt
            | TotalLiabilities | RetainedEarnings | StockholdersEquity | LiabilitiesAndEquity => {
                StatementKind::BalanceSheet
            }
            Revenue | CostOfRevenue | GrossProfit | ResearchAndDevelopment
            | SellingGeneralAndAdministrative | OperatingExpenses | OperatingIncome
            | InterestExpense | PretaxIncome | IncomeTax | NetIncome | EpsBasic | EpsDiluted
            | SharesBasic | SharesDiluted => StatementKind::IncomeStatement,
            DepreciationAndAmortization | ShareBasedCompensation | OperatingCashFlow
            | CapitalExpenditures | InvestingCashFlow | FinancingCashFlow | DividendsPaid
            | ShareRepurchases | FreeCashFlow => StatementKind::CashFlow,
        }
    }

    /// Returns true if the concept may be mapped on a statement of `kind`.
    ///
    /// Net income legitimately repeats on the cash flow and equity statements,
    /// and equity balances on the equity statement.
    pub const fn fits(self, kind: StatementKind) -> bool {
        match (self, kind) {
            (Self::NetIncome, StatementKind::CashFlow | StatementKind::Equity) => true,
            (
                Self::DepreciationAndAmortization | Self::ShareBasedCompensation,
                StatementKind::IncomeStatement,
            ) => true,
            (Self::StockholdersEquity | Self::RetainedEarnings, StatementKind::Equity) => true,
            _ => self.home() as u8 == kind as u8,
        }
    }
}

impl FromStr for StandardConcept {
    type Err = StandardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| StandardError::UnknownConcept(wanted.to_string()))
    }
}
