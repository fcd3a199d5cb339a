//! Facts and units.

use super::context::{Dimension, Period};
use crate::taxonomy::ConceptId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 measure prefix.
const ISO4217: &str = "iso4217:";

/// A unit of measure, possibly a ratio such as USD per share.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// `id` attribute
    pub id: String,
    /// Numerator measures (or the single measure)
    pub numerators: Vec<String>,
    /// Denominator measures; empty for simple units
    pub denominators: Vec<String>,
}

impl Unit {
    /// A simple unit with a single measure.
    pub fn simple(id: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            numerators: vec![measure.into()],
            denominators: Vec::new(),
        }
    }

    /// A divide unit.
    pub fn ratio(id: impl Into<String>, numerator: impl Into<String>, denominator: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            numerators: vec![numerator.into()],
            denominators: vec![denominator.into()],
        }
    }

    fn local(measure: &str) -> &str {
        measure.rsplit_once(':').map_or(measure, |(_, l)| l)
    }

    fn is_currency(measure: &str) -> bool {
        measure.starts_with(ISO4217)
            || (measure.len() == 3 && measure.chars().all(|c| c.is_ascii_uppercase()))
    }

    fn is_share_measure(measure: &str) -> bool {
        Self::local(measure).eq_ignore_ascii_case("shares")
    }

    /// Currency per share (e.g. EPS, dividends per share).
    pub fn is_per_share(&self) -> bool {
        matches!(
            (self.numerators.as_slice(), self.denominators.as_slice()),
            ([num], [den]) if Self::is_currency(num) && Self::is_share_measure(den)
        )
    }

    /// Share counts.
    pub fn is_shares(&self) -> bool {
        self.denominators.is_empty()
            && matches!(self.numerators.as_slice(), [m] if Self::is_share_measure(m))
    }

    /// A single currency measure.
    pub fn is_monetary(&self) -> bool {
        self.denominators.is_empty()
            && matches!(self.numerators.as_slice(), [m] if Self::is_currency(m))
    }

    /// Dimensionless values such as ratios and percentages.
    pub fn is_pure(&self) -> bool {
        self.denominators.is_empty()
            && matches!(self.numerators.as_slice(), [m] if Self::local(m) == "pure")
    }

    /// Measure text without namespace prefixes, e.g. `USD/shares`.
    pub fn measure(&self) -> String {
        let join = |ms: &[String]| {
            ms.iter()
                .map(|m| Self::local(m))
                .collect::<Vec<_>>()
                .join("*")
        };
        if self.denominators.is_empty() {
            join(&self.numerators)
        } else {
            format!("{}/{}", join(&self.numerators), join(&self.denominators))
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.measure())
    }
}

/// Declared precision of a numeric fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decimals {
    /// `INF`: exact value
    Infinite,
    /// Number of decimal places; negative values round to tens, thousands...
    Places(i32),
}

impl Decimals {
    /// Parses the `decimals` attribute.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("INF") {
            return Some(Self::Infinite);
        }
        raw.parse().ok().map(Self::Places)
    }
}

/// Value of a fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FactValue {
    /// Numeric value after coercion
    Numeric(f64),
    /// Non-numeric content
    Text(String),
    /// `xsi:nil="true"`
    Nil,
}

impl FactValue {
    /// Numeric value, if any.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Text content, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Key used to recognise duplicate facts.
    pub(crate) fn dedup_key(&self) -> String {
        match self {
            Self::Numeric(v) => format!("n:{:x}", v.to_bits()),
            Self::Text(t) => format!("t:{t}"),
            Self::Nil => "nil".to_string(),
        }
    }
}

/// A reported fact. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Position in the instance fact list; derived facts keep this as provenance
    pub index: usize,
    /// Reported concept
    pub concept: ConceptId,
    /// Context id as written in the document
    pub context_id: String,
    /// Entity identifier of the context
    pub entity: String,
    /// Reporting period of the context
    pub period: Period,
    /// Dimension qualifiers, with default members removed
    pub dimensions: Vec<Dimension>,
    /// Unit for numeric facts
    pub unit: Option<Unit>,
    /// Value
    pub value: FactValue,
    /// Declared precision
    pub decimals: Option<Decimals>,
}

impl Fact {
    /// Numeric value, if any.
    pub const fn numeric(&self) -> Option<f64> {
        self.value.as_f64()
    }

    /// Returns true if the fact has no dimension qualifiers.
    pub fn is_consolidated(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// Coerces a reported numeric string.
///
/// Strips surrounding whitespace, thousands separators and spaces, and reads
/// accounting parentheses as a negative sign. Returns `None` rather than zero
/// when the text is not a number.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let (negative, body) = match trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };
    let cleaned: String = body
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}
