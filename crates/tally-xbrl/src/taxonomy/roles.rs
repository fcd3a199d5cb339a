//! Role and arcrole URIs, and classification of presentation roles into
//! statement kinds.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Standard label role.
pub const STANDARD_LABEL: &str = "http://www.xbrl.org/2003/role/label";
/// Terse label role.
pub const TERSE_LABEL: &str = "http://www.xbrl.org/2003/role/terseLabel";
/// Verbose label role.
pub const VERBOSE_LABEL: &str = "http://www.xbrl.org/2003/role/verboseLabel";
/// Total label role; marks a row as a total.
pub const TOTAL_LABEL: &str = "http://www.xbrl.org/2003/role/totalLabel";
/// Beginning balance of a roll-forward.
pub const PERIOD_START_LABEL: &str = "http://www.xbrl.org/2003/role/periodStartLabel";
/// Ending balance of a roll-forward.
pub const PERIOD_END_LABEL: &str = "http://www.xbrl.org/2003/role/periodEndLabel";
/// Negated label role.
pub const NEGATED_LABEL: &str = "http://www.xbrl.org/2009/role/negatedLabel";
/// Negated total label role.
pub const NEGATED_TOTAL_LABEL: &str = "http://www.xbrl.org/2009/role/negatedTotalLabel";

/// Presentation parent-child arcrole.
pub const PARENT_CHILD: &str = "http://www.xbrl.org/2003/arcrole/parent-child";
/// Concept-label arcrole.
pub const CONCEPT_LABEL: &str = "http://www.xbrl.org/2003/arcrole/concept-label";
/// Calculation summation arcrole.
pub const SUMMATION_ITEM: &str = "http://www.xbrl.org/2003/arcrole/summation-item";
/// Calculation 1.1 summation arcrole.
pub const SUMMATION_ITEM_2023: &str = "https://xbrl.org/2023/arcrole/summation-item";

/// Primary item to hypercube.
pub const DIM_ALL: &str = "http://xbrl.org/int/dim/arcrole/all";
/// Hypercube to axis.
pub const DIM_HYPERCUBE_DIMENSION: &str = "http://xbrl.org/int/dim/arcrole/hypercube-dimension";
/// Axis to domain.
pub const DIM_DIMENSION_DOMAIN: &str = "http://xbrl.org/int/dim/arcrole/dimension-domain";
/// Domain to member.
pub const DIM_DOMAIN_MEMBER: &str = "http://xbrl.org/int/dim/arcrole/domain-member";
/// Axis to default member.
pub const DIM_DIMENSION_DEFAULT: &str = "http://xbrl.org/int/dim/arcrole/dimension-default";

/// The four core financial statements.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatementKind {
    /// Statement of financial position
    #[display("Balance Sheet")]
    BalanceSheet,
    /// Statement of operations
    #[display("Income Statement")]
    IncomeStatement,
    /// Statement of cash flows
    #[display("Cash Flow Statement")]
    CashFlow,
    /// Statement of changes in equity
    #[display("Statement of Equity")]
    Equity,
}

impl StatementKind {
    /// All statement kinds in presentation order.
    pub const ALL: [Self; 4] = [
        Self::BalanceSheet,
        Self::IncomeStatement,
        Self::CashFlow,
        Self::Equity,
    ];

    /// Balance sheets present instants; the other statements present durations.
    pub const fn uses_instants(self) -> bool {
        matches!(self, Self::BalanceSheet)
    }
}

/// A presentation role recognized as a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMatch {
    /// Statement the role presents
    pub kind: StatementKind,
    /// Lower is better; standalone comprehensive income ranks behind
    /// the primary income statement
    pub priority: u8,
}

const EXCLUDED: &[&str] = &[
    "PARENTHETICAL",
    "DETAIL",
    "POLICIES",
    "POLICY",
    "NOTES",
    "DISCLOSURE",
    "TABLES",
];

const CASH_FLOW: &[&str] = &["CASHFLOW", "CASHFLOWS", "CHANGESINCASH"];

const BALANCE_SHEET: &[&str] = &[
    "BALANCESHEET",
    "FINANCIALPOSITION",
    "FINANCIALCONDITION",
    "STATEMENTOFCONDITION",
    "STATEMENTSOFCONDITION",
    "ASSETSLIABILITIES",
];

const EQUITY: &[&str] = &[
    "STOCKHOLDERSEQUITY",
    "SHAREHOLDERSEQUITY",
    "SHAREOWNERSEQUITY",
    "STOCKHOLDERSDEFICIT",
    "SHAREHOLDERSDEFICIT",
    "CHANGESINEQUITY",
    "STATEMENTOFEQUITY",
    "STATEMENTSOFEQUITY",
    "PARTNERSCAPITAL",
    "MEMBERSEQUITY",
];

const INCOME: &[&str] = &[
    "INCOME",
    "OPERATIONS",
    "EARNINGS",
    "PROFITORLOSS",
    "PROFITANDLOSS",
    "COMPREHENSIVELOSS",
];

/// Classifies a presentation role from its URI and `roleType` definition.
///
/// Keyword checks run cash flow first, then balance sheet and equity, then
/// income, so "liabilities and stockholders' equity" stays a balance sheet.
pub fn classify_role(uri: &str, definition: Option<&str>) -> Option<RoleMatch> {
    if let Some(def) = definition
        && let Some(kind) = definition_category(def)
        && kind != "STATEMENT"
    {
        return None;
    }

    let tail = uri.rsplit('/').next().unwrap_or(uri);
    let text = normalize(&format!("{} {}", tail, definition.unwrap_or_default()));

    if EXCLUDED.iter().any(|k| text.contains(k)) {
        return None;
    }

    let has = |keys: &[&str]| keys.iter().any(|k| text.contains(k));
    let kind = if has(CASH_FLOW) {
        StatementKind::CashFlow
    } else if has(BALANCE_SHEET) {
        StatementKind::BalanceSheet
    } else if has(EQUITY) {
        StatementKind::Equity
    } else if has(INCOME) {
        StatementKind::IncomeStatement
    } else {
        return None;
    };

    let standalone_comprehensive = kind == StatementKind::IncomeStatement
        && text.contains("COMPREHENSIVE")
        && !["OPERATIONS", "EARNINGS", "INCOMEAND", "STATEMENTSOFINCOMECOMPREHENSIVE"]
            .iter()
            .any(|k| text.contains(k));

    Some(RoleMatch {
        kind,
        priority: u8::from(standalone_comprehensive),
    })
}

/// Category segment of a `0000010 - Statement - Title` definition.
fn definition_category(definition: &str) -> Option<String> {
    let mut parts = definition.split(" - ");
    let seq = parts.next()?;
    if !seq.trim().chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let category = parts.next()?;
    parts.next()?;
    Some(category.trim().to_ascii_uppercase())
}

fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
