//! Contexts: entity, period and dimensional qualifiers of a fact.

use crate::error::{Result, XbrlError};
use crate::taxonomy::ConceptId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reporting period of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    /// Point in time
    Instant(NaiveDate),
    /// Inclusive start and end dates
    Duration {
        /// First day of the period
        start: NaiveDate,
        /// Last day of the period
        end: NaiveDate,
    },
}

impl Period {
    /// End date (the instant itself for instants).
    pub const fn end(&self) -> NaiveDate {
        match self {
            Self::Instant(date) => *date,
            Self::Duration { end, .. } => *end,
        }
    }

    /// Start date; `None` for instants.
    pub const fn start(&self) -> Option<NaiveDate> {
        match self {
            Self::Instant(_) => None,
            Self::Duration { start, .. } => Some(*start),
        }
    }

    /// Returns true for instant periods.
    pub const fn is_instant(&self) -> bool {
        matches!(self, Self::Instant(_))
    }

    /// Length in days; 0 for instants.
    pub fn days(&self) -> i64 {
        match self {
            Self::Instant(_) => 0,
            Self::Duration { start, end } => end.signed_duration_since(*start).num_days(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(date) => write!(f, "{date}"),
            Self::Duration { start, end } => write!(f, "{start} to {end}"),
        }
    }
}

/// Value of a dimension qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DimensionValue {
    /// Explicit member concept
    Explicit(ConceptId),
    /// Typed member content
    Typed(String),
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(member) => write!(f, "{member}"),
            Self::Typed(value) => write!(f, "{value}"),
        }
    }
}

/// One (axis, member) qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dimension {
    /// Axis concept
    pub axis: ConceptId,
    /// Member on that axis
    pub member: DimensionValue,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.axis, self.member)
    }
}

/// Identity of a context: entity, period and sorted dimension set.
///
/// Two contexts with different ids but equal keys describe the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextKey {
    /// Entity identifier
    pub entity: String,
    /// Reporting period
    pub period: Period,
    /// Dimension qualifiers sorted by axis
    pub dimensions: Vec<Dimension>,
}

/// A declared context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// `id` attribute
    pub id: String,
    /// Entity identifier text (e.g. the CIK)
    pub entity: String,
    /// Reporting period
    pub period: Period,
    /// Dimension qualifiers sorted by axis
    pub dimensions: Vec<Dimension>,
}

impl Context {
    /// Creates a context, sorting its dimensions.
    pub fn new(
        id: impl Into<String>,
        entity: impl Into<String>,
        period: Period,
        mut dimensions: Vec<Dimension>,
    ) -> Self {
        dimensions.sort();
        dimensions.dedup();
        Self {
            id: id.into(),
            entity: entity.into(),
            period,
            dimensions,
        }
    }

    /// Identity used for equality and de-duplication.
    pub fn key(&self) -> ContextKey {
        ContextKey {
            entity: self.entity.clone(),
            period: self.period,
            dimensions: self.dimensions.clone(),
        }
    }

    /// Returns true if the context carries no dimension qualifiers.
    pub fn is_consolidated(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// Parses an `xs:date`, tolerating a trailing time or timezone.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| XbrlError::InvalidDate(trimmed.to_string()))
}
