//! Error types for taxonomy and instance parsing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for XBRL parsing operations.
pub type Result<T> = std::result::Result<T, XbrlError>;

/// Errors that abort a parse.
///
/// Problems that only affect a single element are not errors; they are
/// recorded in [`Diagnostics`] and the parse continues.
#[derive(Debug, Error)]
pub enum XbrlError {
    /// The document is not well-formed XML
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// The taxonomy bundle has no usable schema
    #[error("Taxonomy bundle contains no schema")]
    MissingSchema,

    /// The instance document has no facts at all
    #[error("Instance document contains no facts")]
    NoFacts,

    /// A date string could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A fact references a context that was never declared
    #[error("Unknown context reference: {0}")]
    UnknownContext(String),

    /// A fact references a unit that was never declared
    #[error("Unknown unit reference: {0}")]
    UnknownUnit(String),

    /// A numeric fact value could not be coerced
    #[error("Cannot coerce value {value:?} reported for {concept}")]
    Coercion {
        /// Concept the fact was reported for
        concept: String,
        /// Raw value as it appeared in the document
        value: String,
    },
}

/// Classification of a non-fatal parse problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    /// Malformed relationship element or unresolvable reference
    Structural,
    /// A value that could not be coerced to its declared type
    Data,
}

/// A non-fatal problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    /// Kind of problem
    pub kind: IssueKind,
    /// Where the problem was found (file section or element name)
    pub source: String,
    /// Human readable description
    pub message: String,
}

/// Non-fatal problems collected over a parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Every recorded issue in discovery order
    pub issues: Vec<ParseIssue>,
    /// Facts dropped because their value could not be coerced
    pub dropped_facts: usize,
    /// Facts skipped because they referenced an undeclared context or unit
    pub skipped_facts: usize,
    /// Duplicate facts collapsed into one
    pub collapsed_duplicates: usize,
}

impl Diagnostics {
    /// Record a structural issue; the offending element is skipped.
    pub fn structural(&mut self, source: impl Into<String>, message: impl Into<String>) {
        let issue = ParseIssue {
            kind: IssueKind::Structural,
            source: source.into(),
            message: message.into(),
        };
        tracing::warn!(source = %issue.source, "{}", issue.message);
        self.issues.push(issue);
    }

    /// Record a data issue for a dropped fact.
    pub fn data(&mut self, source: impl Into<String>, error: &XbrlError) {
        let issue = ParseIssue {
            kind: IssueKind::Data,
            source: source.into(),
            message: error.to_string(),
        };
        tracing::warn!(source = %issue.source, "dropping fact: {}", issue.message);
        self.dropped_facts += 1;
        self.issues.push(issue);
    }

    /// Record a fact skipped for an unresolvable reference.
    pub fn skipped(&mut self, source: impl Into<String>, error: &XbrlError) {
        let issue = ParseIssue {
            kind: IssueKind::Structural,
            source: source.into(),
            message: error.to_string(),
        };
        tracing::warn!(source = %issue.source, "skipping fact: {}", issue.message);
        self.skipped_facts += 1;
        self.issues.push(issue);
    }

    /// Number of structural issues.
    pub fn structural_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.kind == IssueKind::Structural)
            .count()
    }

    /// Returns true if nothing was recorded.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.collapsed_duplicates == 0
    }

    /// Append another set of diagnostics.
    pub fn extend(&mut self, other: Self) {
        self.issues.extend(other.issues);
        self.dropped_facts += other.dropped_facts;
        self.skipped_facts += other.skipped_facts;
        self.collapsed_duplicates += other.collapsed_duplicates;
    }
}
