//! Dimensional relationships from the definition linkbase.

use super::concept::ConceptId;
use super::linkbase::Arc;
use super::roles;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// An axis with its domain, members and default member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    /// Domain heading of the axis
    pub domain: Option<ConceptId>,
    /// Members reachable from the domain, in arc order
    pub members: Vec<ConceptId>,
    /// Member implied when a fact omits the axis
    pub default: Option<ConceptId>,
}

/// Axes, members and hypercube assignments of a taxonomy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionModel {
    axes: HashMap<ConceptId, Axis>,
    /// Axes attached to each definition role through its hypercubes
    role_axes: HashMap<String, BTreeSet<ConceptId>>,
}

impl DimensionModel {
    pub(crate) fn build(arcs: &[Arc]) -> Self {
        let mut model = Self::default();
        let mut sorted: Vec<&Arc> = arcs.iter().collect();
        sorted.sort_by(|a, b| a.order.cmp(&b.order));

        // member -> children, for walking domain-member trees
        let mut domain_children: HashMap<&ConceptId, Vec<&ConceptId>> = HashMap::new();

        for arc in &sorted {
            match arc.arcrole.as_str() {
                roles::DIM_HYPERCUBE_DIMENSION => {
                    model.axes.entry(arc.to.clone()).or_default();
                    model
                        .role_axes
                        .entry(arc.role.clone())
                        .or_default()
                        .insert(arc.to.clone());
                }
                roles::DIM_DIMENSION_DOMAIN => {
                    let axis = model.axes.entry(arc.from.clone()).or_default();
                    if axis.domain.is_none() {
                        axis.domain = Some(arc.to.clone());
                    }
                }
                roles::DIM_DIMENSION_DEFAULT => {
                    model.axes.entry(arc.from.clone()).or_default().default = Some(arc.to.clone());
                }
                roles::DIM_DOMAIN_MEMBER => {
                    domain_children.entry(&arc.from).or_default().push(&arc.to);
                }
                _ => {}
            }
        }

        for axis in model.axes.values_mut() {
            let Some(domain) = axis.domain.clone() else {
                continue;
            };
            let mut stack = vec![&domain];
            let mut members = Vec::new();
            while let Some(current) = stack.pop() {
                if let Some(children) = domain_children.get(current) {
                    for child in children.iter().rev() {
                        if !members.contains(*child) && *child != &domain {
                            stack.push(*child);
                        }
                    }
                }
                if current != &domain && !members.contains(current) {
                    members.push(current.clone());
                }
            }
            axis.members = members;
        }
        model
    }

    /// Looks up an axis.
    pub fn axis(&self, axis: &ConceptId) -> Option<&Axis> {
        self.axes.get(axis)
    }

    /// Default member of `axis`, if declared.
    pub fn default_member(&self, axis: &ConceptId) -> Option<&ConceptId> {
        self.axes.get(axis).and_then(|a| a.default.as_ref())
    }

    /// True if `member` is the declared default of `axis`.
    ///
    /// A fact tagged with the default member describes the consolidated total.
    pub fn is_default(&self, axis: &ConceptId, member: &ConceptId) -> bool {
        self.default_member(axis) == Some(member)
    }

    /// True if `concept` is a known axis.
    pub fn is_axis(&self, concept: &ConceptId) -> bool {
        self.axes.contains_key(concept)
    }

    /// True if `concept` is a domain or member of any axis.
    pub fn is_member(&self, concept: &ConceptId) -> bool {
        self.axes
            .values()
            .any(|a| a.domain.as_ref() == Some(concept) || a.members.contains(concept))
    }

    /// Axes attached to a role's hypercubes.
    pub fn axes_for_role(&self, role: &str) -> Vec<&ConceptId> {
        self.role_axes
            .get(role)
            .map(|axes| axes.iter().collect())
            .unwrap_or_default()
    }

    /// Returns true if no dimensional relationships were declared.
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}
