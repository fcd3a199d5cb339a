//! Maps statement rows onto the canonical vocabulary.

use crate::concept::StandardConcept;
use crate::derived;
use crate::error::Result;
use crate::mapper::ConceptMapper;
use crate::pattern;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tally_statements::Statement;
use tally_xbrl::{ConceptId, StatementKind};

/// Which rule produced a mapping, strongest first.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MappingSource {
    /// Company-specific override
    Override,
    /// Standard concept table
    Table,
    /// Name-pattern fallback
    Pattern,
    /// No rule claimed the concept
    Unmapped,
}

/// Result of mapping one concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// Canonical concept, if any rule claimed it
    pub standard: Option<StandardConcept>,
    /// Rule that decided
    pub source: MappingSource,
    /// Position within the rule's candidates (0 = most direct)
    pub rank: usize,
}

impl Mapping {
    const UNMAPPED: Self = Self {
        standard: None,
        source: MappingSource::Unmapped,
        rank: 0,
    };
}

/// Configuration for the standardizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardizerConfig {
    /// Concept (`prefix:Name` or bare local name) to canonical concept
    pub overrides: BTreeMap<String, StandardConcept>,
    /// Add derived lines when the direct line is missing (default: true)
    pub derive_missing: bool,
}

impl Default for StandardizerConfig {
    fn default() -> Self {
        Self {
            overrides: BTreeMap::new(),
            derive_missing: true,
        }
    }
}

/// What a standardization pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardizeReport {
    /// Rows given a canonical name
    pub mapped: usize,
    /// Value rows left with their original label
    pub unmapped: usize,
    /// Concepts that lost a canonical name to a stronger row
    pub duplicates: Vec<String>,
    /// Lines computed from other lines
    pub derived: Vec<StandardConcept>,
}

/// Applies override → table → pattern → unmapped.
#[derive(Debug, Clone, Default)]
pub struct Standardizer {
    mapper: ConceptMapper,
    config: StandardizerConfig,
}

impl Standardizer {
    /// Creates a standardizer with the given configuration.
    pub fn new(config: StandardizerConfig) -> Self {
        Self {
            mapper: ConceptMapper::new(),
            config,
        }
    }

    /// Adds a company override.
    pub fn with_override(mut self, concept: impl Into<String>, standard: StandardConcept) -> Self {
        self.config.overrides.insert(concept.into(), standard);
        self
    }

    /// Adds overrides from a JSON object of concept to canonical name.
    pub fn with_overrides_json(mut self, json: &str) -> Result<Self> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;
        for (concept, standard) in raw {
            self.config.overrides.insert(concept, standard.parse()?);
        }
        Ok(self)
    }

    /// The configuration in use.
    pub const fn config(&self) -> &StandardizerConfig {
        &self.config
    }

    /// Maps one concept as it appears on a statement of `kind`.
    pub fn map(&self, concept: &ConceptId, kind: StatementKind) -> Mapping {
        let overridden = self
            .config
            .overrides
            .get(&concept.to_string())
            .or_else(|| self.config.overrides.get(&concept.name));
        if let Some(standard) = overridden {
            return Mapping {
                standard: Some(*standard),
                source: MappingSource::Override,
                rank: 0,
            };
        }
        if let Some((standard, rank)) = self.mapper.lookup(&concept.name)
            && standard.fits(kind)
        {
            return Mapping {
                standard: Some(standard),
                source: MappingSource::Table,
                rank,
            };
        }
        match pattern::match_pattern(&concept.name, kind) {
            Some(standard) => Mapping {
                standard: Some(standard),
                source: MappingSource::Pattern,
                rank: 0,
            },
            None => Mapping::UNMAPPED,
        }
    }

    /// Sets `standard` on every row a rule claims.
    ///
    /// A canonical name goes to one consolidated row per statement: the one
    /// with the strongest rule, then the most direct tag, then the earliest
    /// position. Losing rows keep their original label and stay unmapped.
    /// Breakdown rows inherit the name of their concept's winning row.
    pub fn standardize(&self, statement: &mut Statement) -> StandardizeReport {
        let kind = statement.kind;
        let mut report = StandardizeReport::default();
        let mut winners: HashMap<StandardConcept, (MappingSource, usize, usize)> = HashMap::new();
        let mut claims: Vec<(usize, StandardConcept)> = Vec::new();

        for (index, row) in statement.rows.iter().enumerate() {
            if row.is_abstract || row.dimension.is_some() {
                continue;
            }
            let mapping = self.map(&row.concept, kind);
            let Some(standard) = mapping.standard else {
                continue;
            };
            claims.push((index, standard));
            let key = (mapping.source, mapping.rank, index);
            winners
                .entry(standard)
                .and_modify(|best| *best = (*best).min(key))
                .or_insert(key);
        }

        let mut by_concept: HashMap<ConceptId, String> = HashMap::new();
        for (index, standard) in claims {
            let row = &mut statement.rows[index];
            if winners.get(&standard).is_some_and(|w| w.2 == index) {
                let name = standard.to_string();
                by_concept.insert(row.concept.clone(), name.clone());
                row.standard = Some(name);
            } else {
                tracing::debug!(concept = %row.concept, %standard, "canonical name already taken");
                report.duplicates.push(row.concept.to_string());
            }
        }
        for row in statement.rows.iter_mut().filter(|r| r.dimension.is_some()) {
            row.standard = by_concept.get(&row.concept).cloned();
        }

        if self.config.derive_missing {
            report.derived = derived::derive_missing(statement);
        }
        for row in statement.rows.iter().filter(|r| !r.is_abstract && r.dimension.is_none()) {
            if row.standard.is_some() {
                report.mapped += 1;
            } else {
                report.unmapped += 1;
            }
        }
        tracing::debug!(
            %kind,
            mapped = report.mapped,
            unmapped = report.unmapped,
            derived = report.derived.len(),
            "standardized statement"
        );
        report
    }
}
