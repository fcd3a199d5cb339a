//! Taxonomy model: concepts, labels and the relationship networks that
//! organize them.
//!
//! A [`Taxonomy`] is built once per filing from a [`TaxonomyBundle`] and is
//! immutable afterwards, so it can be shared between threads behind an `Arc`.

pub mod abstracts;
pub mod concept;
pub mod dimensions;
pub mod linkbase;
pub mod presentation;
pub mod roles;
pub(crate) mod schema;

pub use concept::{AbstractSource, BalanceType, Concept, ConceptId, Label, PeriodType};
pub use dimensions::{Axis, DimensionModel};
pub use linkbase::OrderKey;
pub use presentation::{PresentationEdge, PresentationNetwork, PresentationNode};
pub use roles::{RoleMatch, StatementKind};

use crate::error::{Diagnostics, Result, XbrlError};
use linkbase::LinkKind;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Raw taxonomy files for one filing.
///
/// Each section is a list because filers often split linkbases over several
/// files.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyBundle {
    /// Schema documents (`.xsd`)
    pub schemas: Vec<Vec<u8>>,
    /// Label linkbases
    pub labels: Vec<Vec<u8>>,
    /// Presentation linkbases
    pub presentation: Vec<Vec<u8>>,
    /// Calculation linkbases
    pub calculation: Vec<Vec<u8>>,
    /// Definition linkbases
    pub definition: Vec<Vec<u8>>,
}

impl TaxonomyBundle {
    /// SHA-256 over every document, hex encoded.
    ///
    /// Section tags and lengths are hashed too, so moving a document between
    /// sections changes the key.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        let sections = [
            (b'S', &self.schemas),
            (b'L', &self.labels),
            (b'P', &self.presentation),
            (b'C', &self.calculation),
            (b'D', &self.definition),
        ];
        for (tag, documents) in sections {
            hasher.update([tag]);
            hasher.update((documents.len() as u64).to_le_bytes());
            for doc in documents {
                hasher.update((doc.len() as u64).to_le_bytes());
                hasher.update(doc);
            }
        }
        format!("{:x}", hasher.finalize())
    }
}

/// A presentation role together with its statement classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    /// Role URI
    pub uri: String,
    /// `roleType` definition text
    pub definition: Option<String>,
    /// Statement the role presents, if any
    pub kind: Option<StatementKind>,
    /// Rank among roles of the same kind; lower is better
    pub priority: u8,
}

/// A calculation edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationEdge {
    /// Summation parent
    pub parent: ConceptId,
    /// Contributing child
    pub child: ConceptId,
    /// +1 or -1
    pub weight: f64,
    /// Calculation network role
    pub role: String,
}

/// The parsed concept graph of one filing.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    concepts: HashMap<ConceptId, Concept>,
    by_name: HashMap<String, Vec<ConceptId>>,
    roles: Vec<RoleInfo>,
    presentation: Vec<PresentationNetwork>,
    calculation: Vec<CalculationEdge>,
    dimensions: DimensionModel,
    diagnostics: Diagnostics,
}

impl Taxonomy {
    /// Parses and unions every document of a bundle.
    ///
    /// Fails only when no schema document of the bundle parses. Linkbases and
    /// schemas that are not well-formed, and malformed relationships, are
    /// skipped and recorded in [`Taxonomy::diagnostics`].
    pub fn parse(bundle: &TaxonomyBundle) -> Result<Self> {
        let mut taxonomy = Self::default();
        let mut diagnostics = Diagnostics::default();
        let mut role_definitions: HashMap<String, Option<String>> = HashMap::new();
        let mut schemas_parsed = 0usize;

        for (index, bytes) in bundle.schemas.iter().enumerate() {
            if bytes.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let doc = match schema::parse(bytes) {
                Ok(doc) => doc,
                Err(e) => {
                    diagnostics.structural(format!("schema[{index}]"), e.to_string());
                    continue;
                }
            };
            schemas_parsed += 1;
            for el in doc.elements {
                let (is_abstract, source) = abstracts::resolve(&el.id, el.is_abstract);
                let concept = taxonomy
                    .concepts
                    .entry(el.id.clone())
                    .or_insert_with(|| Concept::new(el.id.clone()));
                concept.data_type = concept.data_type.take().or(el.data_type);
                concept.substitution_group =
                    concept.substitution_group.take().or(el.substitution_group);
                concept.period_type = concept.period_type.or(el.period_type);
                if source == AbstractSource::Schema || concept.abstract_source != AbstractSource::Schema {
                    concept.is_abstract = is_abstract;
                    concept.abstract_source = source;
                }
                if let Some(balance) = el.balance {
                    concept.resolve_balance(balance);
                }
            }
            for role in doc.role_types {
                role_definitions.insert(role.uri, role.definition);
            }
        }
        if schemas_parsed == 0 {
            return Err(XbrlError::MissingSchema);
        }

        let labels = linkbase::parse_all(LinkKind::Label, &bundle.labels, &mut diagnostics);
        let presentation =
            linkbase::parse_all(LinkKind::Presentation, &bundle.presentation, &mut diagnostics);
        let calculation =
            linkbase::parse_all(LinkKind::Calculation, &bundle.calculation, &mut diagnostics);
        let definition =
            linkbase::parse_all(LinkKind::Definition, &bundle.definition, &mut diagnostics);

        for id in labels
            .referenced
            .iter()
            .chain(&presentation.referenced)
            .chain(&calculation.referenced)
            .chain(&definition.referenced)
        {
            taxonomy.ensure_concept(id);
        }
        for (id, label) in labels.labels {
            if let Some(concept) = taxonomy.concepts.get_mut(&id) {
                concept.add_label(label);
            }
        }

        // presentation networks, one per role, in order of first appearance
        let mut role_order: Vec<&str> = Vec::new();
        for arc in &presentation.arcs {
            if !role_order.contains(&arc.role.as_str()) {
                role_order.push(&arc.role);
            }
        }
        for role in role_order {
            let arcs: Vec<&linkbase::Arc> = presentation
                .arcs
                .iter()
                .filter(|a| a.role == role)
                .filter(|a| a.arcrole == roles::PARENT_CHILD || a.arcrole.is_empty())
                .collect();
            let role_definition = role_definitions.get(role).cloned().flatten();
            let classified = roles::classify_role(role, role_definition.as_deref());
            taxonomy.roles.push(RoleInfo {
                uri: role.to_string(),
                definition: role_definition.clone(),
                kind: classified.map(|m| m.kind),
                priority: classified.map_or(u8::MAX, |m| m.priority),
            });
            taxonomy.presentation.push(PresentationNetwork::build(
                role,
                role_definition,
                &arcs,
                &mut diagnostics,
            ));
        }

        for arc in calculation.arcs {
            let is_summation =
                arc.arcrole == roles::SUMMATION_ITEM || arc.arcrole == roles::SUMMATION_ITEM_2023;
            if !is_summation {
                continue;
            }
            let Some(weight) = arc.weight else { continue };
            taxonomy.calculation.push(CalculationEdge {
                parent: arc.from,
                child: arc.to,
                weight,
                role: arc.role,
            });
        }

        taxonomy.dimensions = DimensionModel::build(&definition.arcs);
        taxonomy.diagnostics = diagnostics;
        for id in taxonomy.concepts.keys() {
            taxonomy
                .by_name
                .entry(id.name.clone())
                .or_default()
                .push(id.clone());
        }

        tracing::debug!(
            concepts = taxonomy.concepts.len(),
            roles = taxonomy.roles.len(),
            calculation_edges = taxonomy.calculation.len(),
            issues = taxonomy.diagnostics.issues.len(),
            "parsed taxonomy"
        );
        Ok(taxonomy)
    }

    /// Inserts an unknown-concept placeholder for an undeclared reference.
    fn ensure_concept(&mut self, id: &ConceptId) {
        if !self.concepts.contains_key(id) {
            let mut concept = Concept::unknown(id.clone());
            let (is_abstract, source) = abstracts::resolve(id, None);
            concept.is_abstract = is_abstract;
            concept.abstract_source = source;
            self.concepts.insert(id.clone(), concept);
        }
    }

    /// Looks a concept up by qualified name, falling back to a unique local
    /// name match when prefixes disagree between documents.
    pub fn concept(&self, id: &ConceptId) -> Option<&Concept> {
        if let Some(concept) = self.concepts.get(id) {
            return Some(concept);
        }
        match self.by_name.get(&id.name).map(Vec::as_slice) {
            Some([only]) => self.concepts.get(only),
            _ => None,
        }
    }

    /// Looks a concept up, returning an unknown placeholder when undeclared.
    pub fn concept_or_unknown(&self, id: &ConceptId) -> Concept {
        self.concept(id)
            .cloned()
            .unwrap_or_else(|| Concept::unknown(id.clone()))
    }

    /// Every concept in the taxonomy.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values()
    }

    /// Number of concepts.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    /// Returns true if no concepts were declared or referenced.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Label for a concept with the fallback chain applied.
    pub fn label(&self, id: &ConceptId, role: Option<&str>) -> String {
        match self.concept(id) {
            Some(concept) => concept.label(role),
            None => concept::humanize(&id.name),
        }
    }

    /// Returns true if the concept is abstract by the first three tiers.
    pub fn is_abstract(&self, id: &ConceptId) -> bool {
        self.concept(id)
            .map_or_else(|| abstracts::resolve(id, None).0, |c| c.is_abstract)
    }

    /// Presentation roles with their classification.
    pub fn roles(&self) -> &[RoleInfo] {
        &self.roles
    }

    /// Presentation networks in document order.
    pub fn presentation_networks(&self) -> &[PresentationNetwork] {
        &self.presentation
    }

    /// Presentation network for a role URI.
    pub fn network(&self, role: &str) -> Option<&PresentationNetwork> {
        self.presentation.iter().find(|n| n.role == role)
    }

    /// Best presentation network for a statement kind.
    ///
    /// Roles rank by priority, then by size, then by document order.
    pub fn statement_network(&self, kind: StatementKind) -> Option<&PresentationNetwork> {
        self.roles
            .iter()
            .zip(&self.presentation)
            .enumerate()
            .filter(|(_, (info, network))| info.kind == Some(kind) && !network.is_empty())
            .min_by_key(|(idx, (info, network))| {
                (info.priority, std::cmp::Reverse(network.len()), *idx)
            })
            .map(|(_, (_, network))| network)
    }

    /// Calculation edges.
    pub fn calculation_edges(&self) -> &[CalculationEdge] {
        &self.calculation
    }

    /// Majority calculation weight of `child` across every network.
    ///
    /// Ties resolve to the weight seen first.
    pub fn calculation_weight(&self, child: &ConceptId) -> Option<f64> {
        let mut tally: Vec<(f64, usize)> = Vec::new();
        for edge in self.calculation.iter().filter(|e| &e.child == child) {
            match tally.iter_mut().find(|(w, _)| *w == edge.weight) {
                Some((_, count)) => *count += 1,
                None => tally.push((edge.weight, 1)),
            }
        }
        let best = tally.iter().map(|(_, c)| *c).max()?;
        tally
            .into_iter()
            .find(|(_, c)| *c == best)
            .map(|(w, _)| w)
    }

    /// True if the concept sums other concepts in any network.
    pub fn is_calculation_parent(&self, id: &ConceptId) -> bool {
        self.calculation.iter().any(|e| &e.parent == id)
    }

    /// Dimensional relationships.
    pub const fn dimensions(&self) -> &DimensionModel {
        &self.dimensions
    }

    /// Non-fatal problems found while parsing.
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
