//! Schema documents: element declarations and role types.

use super::concept::{BalanceType, ConceptId, PeriodType};
use crate::error::Result;
use crate::xml;

/// An `xs:element` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ElementDecl {
    pub(crate) id: ConceptId,
    pub(crate) data_type: Option<String>,
    pub(crate) substitution_group: Option<String>,
    pub(crate) is_abstract: Option<bool>,
    pub(crate) balance: Option<BalanceType>,
    pub(crate) period_type: Option<PeriodType>,
}

/// A `link:roleType` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoleType {
    pub(crate) uri: String,
    pub(crate) definition: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SchemaDoc {
    pub(crate) elements: Vec<ElementDecl>,
    pub(crate) role_types: Vec<RoleType>,
}

/// Parses a schema document.
///
/// The concept prefix comes from the element `id` (`us-gaap_Assets`) when
/// present, otherwise from the prefix bound to the target namespace.
pub(crate) fn parse(bytes: &[u8]) -> Result<SchemaDoc> {
    let root = xml::parse(bytes)?;
    let target_prefix = root
        .attr("targetNamespace")
        .and_then(|ns| root.prefix_for_namespace(ns))
        .unwrap_or_default()
        .to_string();

    let mut doc = SchemaDoc::default();
    for el in root.descendants() {
        match el.local_name() {
            "element" => {
                let Some(name) = el.attr("name") else {
                    continue;
                };
                let id = match el.attr("id").map(ConceptId::parse) {
                    Some(id) if id.name == name && !id.prefix.is_empty() => id,
                    _ => ConceptId::new(target_prefix.clone(), name),
                };
                doc.elements.push(ElementDecl {
                    id,
                    data_type: el.attr("type").map(str::to_string),
                    substitution_group: el.attr("substitutionGroup").map(str::to_string),
                    is_abstract: el.attr("abstract").map(|v| v.trim() == "true"),
                    balance: el.attr("xbrli:balance").and_then(BalanceType::parse),
                    period_type: el.attr("xbrli:periodType").and_then(PeriodType::parse),
                });
            }
            "roleType" => {
                if let Some(uri) = el.attr("roleURI") {
                    doc.role_types.push(RoleType {
                        uri: uri.to_string(),
                        definition: el
                            .child("definition")
                            .map(|d| d.trimmed_text().to_string())
                            .filter(|d| !d.is_empty()),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(doc)
}
