//! Reporting concepts and their labels.

use super::roles;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualified concept name: namespace prefix plus local name.
///
/// Parses the three spellings that appear across taxonomy files:
/// `us-gaap:Revenues` (instance/QName), `us-gaap_Revenues` (schema id and
/// locator fragment) and a bare `Revenues`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct ConceptId {
    /// Namespace prefix (e.g. "us-gaap"); empty when unknown
    pub prefix: String,
    /// Local element name (e.g. "Revenues")
    pub name: String,
}

impl ConceptId {
    /// Creates a concept id from its parts.
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// Parses `prefix:Name`, `prefix_Name` or `Name`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some((prefix, name)) = raw.split_once(':') {
            return Self::new(prefix, name);
        }
        match raw.split_once('_') {
            Some((prefix, name)) if !prefix.is_empty() && !name.is_empty() => {
                Self::new(prefix, name)
            }
            _ => Self::new("", raw),
        }
    }

    /// Concept named by the fragment of a locator href (`file.xsd#us-gaap_Assets`).
    pub fn from_href(href: &str) -> Option<Self> {
        let (_, fragment) = href.rsplit_once('#')?;
        if fragment.is_empty() {
            return None;
        }
        Some(Self::parse(fragment))
    }

    /// Returns true if the local name matches, ignoring the prefix.
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.prefix, self.name)
        }
    }
}

impl From<ConceptId> for String {
    fn from(id: ConceptId) -> Self {
        id.to_string()
    }
}

impl From<String> for ConceptId {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for ConceptId {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Balance type of a monetary concept.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceType {
    /// Debit balance (assets, expenses)
    #[display("debit")]
    Debit,
    /// Credit balance (liabilities, equity, revenue)
    #[display("credit")]
    Credit,
}

impl BalanceType {
    /// Parses the schema attribute value.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }
}

/// Whether a concept is measured at a point in time or over a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Point in time (balance sheet items)
    Instant,
    /// Over a period (income and cash flow items)
    Duration,
}

impl PeriodType {
    /// Parses the schema attribute value.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "instant" => Some(Self::Instant),
            "duration" => Some(Self::Duration),
            _ => None,
        }
    }
}

/// Which tier of abstract detection decided a concept's abstract flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbstractSource {
    /// Explicit `abstract` attribute in the schema
    Schema,
    /// Name suffix such as `Abstract` or `LineItems`
    NamePattern,
    /// Fixed table of known abstract standard concepts
    KnownTable,
    /// No tier matched; non-abstract by default
    Default,
}

/// A label resource attached to a concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label role URI
    pub role: String,
    /// `xml:lang` of the label
    pub lang: String,
    /// Label text
    pub text: String,
}

/// A reporting concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Qualified name
    pub id: ConceptId,
    /// Declared data type (e.g. `xbrli:monetaryItemType`)
    pub data_type: Option<String>,
    /// Declared period type
    pub period_type: Option<PeriodType>,
    /// Substitution group (e.g. `xbrldt:dimensionItem`)
    pub substitution_group: Option<String>,
    /// Resolved abstract flag
    pub is_abstract: bool,
    /// Tier that decided `is_abstract`
    pub abstract_source: AbstractSource,
    /// False for placeholder concepts referenced but never declared
    pub declared: bool,
    /// Labels by role and language
    pub labels: Vec<Label>,
    balance: Option<BalanceType>,
}

impl Concept {
    /// A declared concept with no attributes resolved yet.
    pub fn new(id: ConceptId) -> Self {
        Self {
            id,
            data_type: None,
            period_type: None,
            substitution_group: None,
            is_abstract: false,
            abstract_source: AbstractSource::Default,
            declared: true,
            labels: Vec::new(),
            balance: None,
        }
    }

    /// Placeholder for a concept referenced without a schema entry.
    ///
    /// Non-abstract with no balance, so its facts are never lost.
    pub fn unknown(id: ConceptId) -> Self {
        Self {
            declared: false,
            ..Self::new(id)
        }
    }

    /// Resolved balance type.
    pub const fn balance(&self) -> Option<BalanceType> {
        self.balance
    }

    /// Sets the balance type once; later conflicting assignments are ignored.
    ///
    /// Returns false if a different balance was already resolved.
    pub fn resolve_balance(&mut self, balance: BalanceType) -> bool {
        match self.balance {
            None => {
                self.balance = Some(balance);
                true
            }
            Some(existing) if existing == balance => true,
            Some(existing) => {
                tracing::warn!(
                    concept = %self.id,
                    ?existing,
                    ?balance,
                    "ignoring conflicting balance type"
                );
                false
            }
        }
    }

    /// True for numeric item types (monetary, shares, per-share, decimals).
    pub fn is_numeric(&self) -> bool {
        let Some(data_type) = self.data_type.as_deref() else {
            return true;
        };
        let ty = data_type.rsplit(':').next().unwrap_or(data_type);
        !matches!(
            ty,
            "stringItemType"
                | "textBlockItemType"
                | "dateItemType"
                | "booleanItemType"
                | "normalizedStringItemType"
                | "tokenItemType"
                | "anyURIItemType"
                | "gYearItemType"
                | "gMonthDayItemType"
                | "durationItemType"
                | "domainItemType"
                | "dateTimeItemType"
        ) && !ty.ends_with("StringItemType")
    }

    /// True for dimension axes (`xbrldt:dimensionItem`).
    pub fn is_axis(&self) -> bool {
        self.substitution_group
            .as_deref()
            .is_some_and(|g| g.ends_with("dimensionItem"))
            || self.id.name.ends_with("Axis")
    }

    /// True for hypercubes (`xbrldt:hypercubeItem`).
    pub fn is_table(&self) -> bool {
        self.substitution_group
            .as_deref()
            .is_some_and(|g| g.ends_with("hypercubeItem"))
            || self.id.name.ends_with("Table")
    }

    /// Label text for `role`, falling back through terse, standard and verbose
    /// labels, then to the humanized local name.
    pub fn label(&self, role: Option<&str>) -> String {
        let order = [
            role,
            Some(roles::TERSE_LABEL),
            Some(roles::STANDARD_LABEL),
            Some(roles::VERBOSE_LABEL),
        ];
        for wanted in order.into_iter().flatten() {
            if let Some(label) = self.find_label(wanted) {
                return label.to_string();
            }
        }
        self.labels
            .first()
            .map(|l| l.text.clone())
            .unwrap_or_else(|| humanize(&self.id.name))
    }

    /// Label for exactly `role`, preferring English.
    pub fn find_label(&self, role: &str) -> Option<&str> {
        let matching: Vec<&Label> = self.labels.iter().filter(|l| l.role == role).collect();
        matching
            .iter()
            .find(|l| l.lang.to_ascii_lowercase().starts_with("en"))
            .or_else(|| matching.first())
            .map(|l| l.text.as_str())
    }

    pub(crate) fn add_label(&mut self, label: Label) {
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
    }
}

/// Splits a CamelCase local name into words.
pub fn humanize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    let chars: Vec<char> = name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out
}
