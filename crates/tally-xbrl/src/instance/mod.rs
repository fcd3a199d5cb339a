//! Instance documents: contexts, units and facts.

pub mod context;
pub mod dei;
pub mod fact;

pub use context::{Context, ContextKey, Dimension, DimensionValue, Period, parse_date};
pub use dei::{DocumentInfo, FiscalYearEnd};
pub use fact::{Decimals, Fact, FactValue, Unit, parse_numeric};

use crate::error::{Diagnostics, Result, XbrlError};
use crate::taxonomy::{ConceptId, Taxonomy};
use crate::xml::{self, XmlElement};
use std::collections::{HashMap, HashSet};

/// Elements under the instance root that are never facts.
const NON_FACT_ELEMENTS: &[&str] = &[
    "context",
    "unit",
    "schemaRef",
    "linkbaseRef",
    "roleRef",
    "arcroleRef",
    "footnoteLink",
];

/// Parsed facts of one filing.
#[derive(Debug, Clone, Default)]
pub struct Instance {
    contexts: HashMap<String, Context>,
    units: HashMap<String, Unit>,
    facts: Vec<Fact>,
    by_concept: HashMap<ConceptId, Vec<usize>>,
    document_info: DocumentInfo,
    diagnostics: Diagnostics,
}

impl Instance {
    /// Parses an instance document against its taxonomy.
    ///
    /// Facts with an undeclared context or unit are skipped, and numeric
    /// facts whose value cannot be coerced are dropped; both are recorded in
    /// [`Instance::diagnostics`]. A document that yields no facts is an error.
    pub fn parse(bytes: &[u8], taxonomy: &Taxonomy) -> Result<Self> {
        let root = xml::parse(bytes)?;
        let mut diagnostics = Diagnostics::default();

        let mut contexts = HashMap::new();
        let mut units = HashMap::new();
        for el in &root.children {
            match el.local_name() {
                "context" => match parse_context(el, taxonomy) {
                    Ok(ctx) => {
                        contexts.insert(ctx.id.clone(), ctx);
                    }
                    Err(e) => diagnostics.structural("context", e.to_string()),
                },
                "unit" => match parse_unit(el) {
                    Some(unit) => {
                        units.insert(unit.id.clone(), unit);
                    }
                    None => diagnostics.structural("unit", "unit without id or measure"),
                },
                _ => {}
            }
        }

        let mut instance = Self {
            contexts,
            units,
            ..Self::default()
        };
        let mut seen: HashSet<(ConceptId, ContextKey, String, String)> = HashSet::new();

        for el in fact_elements(&root) {
            let concept = ConceptId::parse(&el.name);
            let concept = taxonomy
                .concept(&concept)
                .map_or(concept, |c| c.id.clone());
            let source = concept.to_string();

            let Some(context_ref) = el.attr("contextRef") else {
                continue;
            };
            let Some(context) = instance.contexts.get(context_ref) else {
                diagnostics.skipped(source, &XbrlError::UnknownContext(context_ref.to_string()));
                continue;
            };

            let unit = match el.attr("unitRef") {
                Some(unit_ref) => match instance.units.get(unit_ref) {
                    Some(unit) => Some(unit.clone()),
                    None => {
                        diagnostics.skipped(source, &XbrlError::UnknownUnit(unit_ref.to_string()));
                        continue;
                    }
                },
                None => None,
            };

            let nil = el
                .attr_any(&["xsi:nil", "nil"])
                .is_some_and(|v| v.trim() == "true");
            let value = if nil {
                FactValue::Nil
            } else if unit.is_some() {
                match parse_numeric(&el.text) {
                    Some(v) => FactValue::Numeric(v),
                    None => {
                        diagnostics.data(
                            source.clone(),
                            &XbrlError::Coercion {
                                concept: source,
                                value: el.text.trim().to_string(),
                            },
                        );
                        continue;
                    }
                }
            } else {
                FactValue::Text(el.text.trim().to_string())
            };

            let key = (
                concept.clone(),
                context.key(),
                unit.as_ref().map(Unit::measure).unwrap_or_default(),
                value.dedup_key(),
            );
            if !seen.insert(key) {
                diagnostics.collapsed_duplicates += 1;
                continue;
            }

            let index = instance.facts.len();
            instance
                .by_concept
                .entry(concept.clone())
                .or_default()
                .push(index);
            instance.facts.push(Fact {
                index,
                concept,
                context_id: context.id.clone(),
                entity: context.entity.clone(),
                period: context.period,
                dimensions: context.dimensions.clone(),
                unit,
                value,
                decimals: el.attr("decimals").and_then(Decimals::parse),
            });
        }

        if instance.facts.is_empty() {
            return Err(XbrlError::NoFacts);
        }

        instance.document_info = DocumentInfo::from_facts(&instance.facts);
        instance.diagnostics = diagnostics;
        tracing::debug!(
            facts = instance.facts.len(),
            contexts = instance.contexts.len(),
            dropped = instance.diagnostics.dropped_facts,
            skipped = instance.diagnostics.skipped_facts,
            collapsed = instance.diagnostics.collapsed_duplicates,
            "parsed instance"
        );
        Ok(instance)
    }

    /// Every fact in document order.
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Fact by provenance index.
    pub fn fact(&self, index: usize) -> Option<&Fact> {
        self.facts.get(index)
    }

    /// Facts reported for `concept`.
    pub fn facts_for<'a>(&'a self, concept: &ConceptId) -> impl Iterator<Item = &'a Fact> + use<'a> {
        self.by_concept
            .get(concept)
            .into_iter()
            .flatten()
            .filter_map(|&i| self.facts.get(i))
    }

    /// Declared context by id.
    pub fn context(&self, id: &str) -> Option<&Context> {
        self.contexts.get(id)
    }

    /// Declared unit by id.
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.get(id)
    }

    /// Cover-page information.
    pub const fn document_info(&self) -> &DocumentInfo {
        &self.document_info
    }

    /// Non-fatal problems found while parsing.
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Number of facts kept.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if no facts were kept.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Fact elements, including those nested in tuples.
fn fact_elements(root: &XmlElement) -> Vec<&XmlElement> {
    root.descendants()
        .into_iter()
        .filter(|el| {
            !NON_FACT_ELEMENTS.contains(&el.local_name()) && el.attr("contextRef").is_some()
        })
        .collect()
}

fn parse_context(el: &XmlElement, taxonomy: &Taxonomy) -> Result<Context> {
    let id = el
        .attr("id")
        .ok_or_else(|| XbrlError::Xml("context without id".to_string()))?;
    let entity = el
        .child("entity")
        .and_then(|e| e.child("identifier"))
        .map(|i| i.trimmed_text().to_string())
        .unwrap_or_default();

    let period_el = el
        .child("period")
        .ok_or_else(|| XbrlError::Xml(format!("context {id} has no period")))?;
    let period = if let Some(instant) = period_el.child("instant") {
        Period::Instant(parse_date(&instant.text)?)
    } else {
        match (period_el.child("startDate"), period_el.child("endDate")) {
            (Some(start), Some(end)) => Period::Duration {
                start: parse_date(&start.text)?,
                end: parse_date(&end.text)?,
            },
            _ => {
                return Err(XbrlError::Xml(format!(
                    "context {id} has an unsupported period"
                )));
            }
        }
    };

    let qualifiers = el
        .child("entity")
        .and_then(|e| e.child("segment"))
        .into_iter()
        .chain(el.child("scenario"));
    let mut dimensions = Vec::new();
    for container in qualifiers {
        for member in &container.children {
            let Some(axis) = member.attr("dimension").map(ConceptId::parse) else {
                continue;
            };
            let value = match member.local_name() {
                "explicitMember" => DimensionValue::Explicit(ConceptId::parse(member.trimmed_text())),
                "typedMember" => DimensionValue::Typed(
                    member
                        .children
                        .first()
                        .map_or_else(|| member.trimmed_text(), XmlElement::trimmed_text)
                        .to_string(),
                ),
                _ => continue,
            };
            if let DimensionValue::Explicit(m) = &value
                && taxonomy.dimensions().is_default(&axis, m)
            {
                continue;
            }
            dimensions.push(Dimension {
                axis,
                member: value,
            });
        }
    }

    Ok(Context::new(id, entity, period, dimensions))
}

fn parse_unit(el: &XmlElement) -> Option<Unit> {
    let id = el.attr("id")?;
    if let Some(divide) = el.child("divide") {
        let measures = |name: &str| -> Vec<String> {
            divide
                .child(name)
                .map(|part| {
                    part.children_named("measure")
                        .map(|m| m.trimmed_text().to_string())
                        .collect()
                })
                .unwrap_or_default()
        };
        let numerators = measures("unitNumerator");
        let denominators = measures("unitDenominator");
        if numerators.is_empty() {
            return None;
        }
        return Some(Unit {
            id: id.to_string(),
            numerators,
            denominators,
        });
    }
    let numerators: Vec<String> = el
        .children_named("measure")
        .map(|m| m.trimmed_text().to_string())
        .collect();
    if numerators.is_empty() {
        return None;
    }
    Some(Unit {
        id: id.to_string(),
        numerators,
        denominators: Vec::new(),
    })
}
