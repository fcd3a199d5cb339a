//! Presentation networks: one ordered forest per role.

use super::concept::ConceptId;
use super::linkbase::{Arc, OrderKey};
use crate::error::Diagnostics;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A child edge in a presentation network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationEdge {
    /// Child concept
    pub concept: ConceptId,
    /// Sibling ordering key
    pub order: OrderKey,
    /// Preferred label role on the arc
    pub preferred_label: Option<String>,
}

/// A node produced by walking a network in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationNode {
    /// Concept shown on this line
    pub concept: ConceptId,
    /// Parent concept; `None` for roots
    pub parent: Option<ConceptId>,
    /// Nesting depth; roots are 0
    pub depth: usize,
    /// Preferred label role from the incoming arc
    pub preferred_label: Option<String>,
    /// Whether this node has children in the network
    pub has_children: bool,
}

/// The presentation forest for one extended-link role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresentationNetwork {
    /// Role URI
    pub role: String,
    /// Role definition text from the schema, if declared
    pub definition: Option<String>,
    roots: Vec<ConceptId>,
    children: HashMap<ConceptId, Vec<PresentationEdge>>,
}

impl PresentationNetwork {
    /// Builds a network from its parent-child arcs.
    ///
    /// Arcs that would close a cycle are skipped and recorded as structural
    /// issues.
    pub(crate) fn build(
        role: &str,
        definition: Option<String>,
        arcs: &[&Arc],
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut sorted: Vec<&Arc> = arcs.to_vec();
        sorted.sort_by_key(|a| a.order.seq);

        let mut network = Self {
            role: role.to_string(),
            definition,
            ..Self::default()
        };
        let mut first_seen: Vec<ConceptId> = Vec::new();
        let mut seen: HashSet<ConceptId> = HashSet::new();

        for arc in sorted {
            if arc.from == arc.to || network.reaches(&arc.to, &arc.from) {
                diagnostics.structural(
                    "presentation",
                    format!("cycle {} -> {} in {}", arc.from, arc.to, role),
                );
                continue;
            }
            let edges = network.children.entry(arc.from.clone()).or_default();
            if edges
                .iter()
                .any(|e| e.concept == arc.to && e.preferred_label == arc.preferred_label)
            {
                continue;
            }
            edges.push(PresentationEdge {
                concept: arc.to.clone(),
                order: arc.order,
                preferred_label: arc.preferred_label.clone(),
            });
            for id in [&arc.from, &arc.to] {
                if seen.insert(id.clone()) {
                    first_seen.push(id.clone());
                }
            }
        }

        for edges in network.children.values_mut() {
            edges.sort_by(|a, b| a.order.cmp(&b.order));
        }
        let has_parent: HashSet<&ConceptId> = network
            .children
            .values()
            .flat_map(|edges| edges.iter().map(|e| &e.concept))
            .collect();
        network.roots = first_seen
            .iter()
            .filter(|id| !has_parent.contains(id))
            .cloned()
            .collect();
        network
    }

    /// True if `to` is reachable from `from` through existing edges.
    fn reaches(&self, from: &ConceptId, to: &ConceptId) -> bool {
        let mut stack = vec![from];
        let mut visited: HashSet<&ConceptId> = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(edges) = self.children.get(current) {
                stack.extend(edges.iter().map(|e| &e.concept));
            }
        }
        false
    }

    /// Root concepts in document order.
    pub fn roots(&self) -> &[ConceptId] {
        &self.roots
    }

    /// Ordered children of `concept`.
    pub fn children(&self, concept: &ConceptId) -> &[PresentationEdge] {
        self.children.get(concept).map_or(&[], Vec::as_slice)
    }

    /// Every concept in the network.
    pub fn concepts(&self) -> HashSet<&ConceptId> {
        self.children
            .iter()
            .flat_map(|(parent, edges)| {
                std::iter::once(parent).chain(edges.iter().map(|e| &e.concept))
            })
            .collect()
    }

    /// Number of distinct concepts.
    pub fn len(&self) -> usize {
        self.concepts().len()
    }

    /// Returns true if the network has no edges.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first walk in presentation order.
    pub fn walk(&self) -> Vec<PresentationNode> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.walk_from(root, None, 0, None, &mut out);
        }
        out
    }

    fn walk_from(
        &self,
        concept: &ConceptId,
        parent: Option<&ConceptId>,
        depth: usize,
        preferred_label: Option<&str>,
        out: &mut Vec<PresentationNode>,
    ) {
        let children = self.children(concept);
        out.push(PresentationNode {
            concept: concept.clone(),
            parent: parent.cloned(),
            depth,
            preferred_label: preferred_label.map(str::to_string),
            has_children: !children.is_empty(),
        });
        for edge in children {
            self.walk_from(
                &edge.concept,
                Some(concept),
                depth + 1,
                edge.preferred_label.as_deref(),
                out,
            );
        }
    }
}
