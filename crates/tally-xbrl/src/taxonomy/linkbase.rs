//! Extended-link parsing shared by the label, presentation, calculation and
//! definition linkbases.

use super::concept::{ConceptId, Label};
use crate::error::Diagnostics;
use crate::xml::{self, XmlElement};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Sibling ordering key.
///
/// Arcs with an explicit `order` sort by it; arcs without one sort after them
/// in document order. Ties on `order` fall back to document order, so the key
/// is total among siblings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderKey {
    /// Explicit `order` attribute
    pub order: Option<f64>,
    /// Position of the arc across all parsed linkbase documents
    pub seq: usize,
}

impl OrderKey {
    fn sort_value(&self) -> f64 {
        self.order.unwrap_or(f64::INFINITY)
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_value()
            .total_cmp(&other.sort_value())
            .then(self.seq.cmp(&other.seq))
    }
}

/// Which linkbase an extended link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum LinkKind {
    Label,
    Presentation,
    Calculation,
    Definition,
}

impl LinkKind {
    const fn element(self) -> &'static str {
        match self {
            Self::Label => "labelLink",
            Self::Presentation => "presentationLink",
            Self::Calculation => "calculationLink",
            Self::Definition => "definitionLink",
        }
    }

    const fn arc(self) -> &'static str {
        match self {
            Self::Label => "labelArc",
            Self::Presentation => "presentationArc",
            Self::Calculation => "calculationArc",
            Self::Definition => "definitionArc",
        }
    }
}

/// A resolved concept-to-concept arc.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Arc {
    pub(crate) role: String,
    pub(crate) from: ConceptId,
    pub(crate) to: ConceptId,
    pub(crate) arcrole: String,
    pub(crate) order: OrderKey,
    pub(crate) weight: Option<f64>,
    pub(crate) preferred_label: Option<String>,
    pub(crate) target_role: Option<String>,
    pub(crate) priority: i32,
    pub(crate) prohibited: bool,
}

/// Arcs and label assignments collected from one kind of linkbase.
#[derive(Debug, Default)]
pub(crate) struct LinkSet {
    pub(crate) arcs: Vec<Arc>,
    pub(crate) labels: Vec<(ConceptId, Label)>,
    /// Every concept referenced by a locator
    pub(crate) referenced: Vec<ConceptId>,
}

/// Parses every document of one linkbase kind.
///
/// `seq` is shared across documents so document order is global. A document
/// that is not well-formed is recorded as structural and skipped.
pub(crate) fn parse_all(kind: LinkKind, documents: &[Vec<u8>], diagnostics: &mut Diagnostics) -> LinkSet {
    let mut set = LinkSet::default();
    let mut seq = 0usize;
    for (index, bytes) in documents.iter().enumerate() {
        let root = match xml::parse(bytes) {
            Ok(root) => root,
            Err(e) => {
                diagnostics.structural(format!("{}[{index}]", kind.element()), e.to_string());
                continue;
            }
        };
        for link in root
            .descendants()
            .into_iter()
            .filter(|e| e.local_name() == kind.element())
        {
            parse_link(kind, link, &mut seq, &mut set, diagnostics);
        }
    }
    set.arcs = apply_prohibitions(set.arcs);
    set
}

fn parse_link(
    kind: LinkKind,
    link: &XmlElement,
    seq: &mut usize,
    set: &mut LinkSet,
    diagnostics: &mut Diagnostics,
) {
    let role = link.attr("xlink:role").unwrap_or_default().to_string();
    let mut locators: HashMap<&str, Vec<ConceptId>> = HashMap::new();
    let mut resources: HashMap<&str, Vec<Label>> = HashMap::new();

    for child in &link.children {
        match child.local_name() {
            "loc" => {
                let (Some(label), Some(href)) = (child.attr("xlink:label"), child.attr("xlink:href"))
                else {
                    diagnostics.structural(kind.element(), "locator without label or href");
                    continue;
                };
                match ConceptId::from_href(href) {
                    Some(id) => {
                        set.referenced.push(id.clone());
                        locators.entry(label).or_default().push(id);
                    }
                    None => diagnostics.structural(
                        kind.element(),
                        format!("locator {label} has unresolvable href {href}"),
                    ),
                }
            }
            "label" if kind == LinkKind::Label => {
                let Some(label) = child.attr("xlink:label") else {
                    diagnostics.structural(kind.element(), "label resource without xlink:label");
                    continue;
                };
                resources.entry(label).or_default().push(Label {
                    role: child
                        .attr("xlink:role")
                        .unwrap_or(super::roles::STANDARD_LABEL)
                        .to_string(),
                    lang: child.attr("xml:lang").unwrap_or_default().to_string(),
                    text: child.trimmed_text().to_string(),
                });
            }
            _ => {}
        }
    }

    for arc in link.children_named(kind.arc()) {
        *seq += 1;
        let (Some(from), Some(to)) = (arc.attr("xlink:from"), arc.attr("xlink:to")) else {
            diagnostics.structural(kind.arc(), "arc without from or to");
            continue;
        };
        let Some(sources) = locators.get(from) else {
            diagnostics.structural(kind.arc(), format!("arc source {from} has no locator"));
            continue;
        };

        if kind == LinkKind::Label {
            let Some(targets) = resources.get(to) else {
                diagnostics.structural(kind.arc(), format!("arc target {to} has no label"));
                continue;
            };
            for concept in sources {
                for label in targets {
                    set.labels.push((concept.clone(), label.clone()));
                }
            }
            continue;
        }

        let Some(targets) = locators.get(to) else {
            diagnostics.structural(kind.arc(), format!("arc target {to} has no locator"));
            continue;
        };

        let order = match arc.attr("order").map(|o| o.trim().parse::<f64>()) {
            Some(Ok(o)) if o.is_finite() => Some(o),
            Some(_) => {
                diagnostics.structural(kind.arc(), format!("unparseable order on arc {from}->{to}"));
                None
            }
            None => None,
        };
        let weight = match arc.attr("weight").map(|w| w.trim().parse::<f64>()) {
            Some(Ok(w)) => Some(w),
            Some(Err(_)) => {
                diagnostics.structural(kind.arc(), format!("unparseable weight on arc {from}->{to}"));
                continue;
            }
            None => None,
        };
        if kind == LinkKind::Calculation && weight.is_none() {
            diagnostics.structural(kind.arc(), format!("calculation arc {from}->{to} has no weight"));
            continue;
        }

        for source in sources {
            for target in targets {
                set.arcs.push(Arc {
                    role: role.clone(),
                    from: source.clone(),
                    to: target.clone(),
                    arcrole: arc.attr("xlink:arcrole").unwrap_or_default().to_string(),
                    order: OrderKey { order, seq: *seq },
                    weight,
                    preferred_label: arc.attr("preferredLabel").map(str::to_string),
                    target_role: arc.attr("xbrldt:targetRole").map(str::to_string),
                    priority: arc
                        .attr("priority")
                        .and_then(|p| p.trim().parse().ok())
                        .unwrap_or(0),
                    prohibited: arc.attr("use") == Some("prohibited"),
                });
            }
        }
    }
}

/// Removes prohibited arcs and the arcs they override.
///
/// A prohibiting arc removes equivalent arcs (same role, endpoints and
/// arcrole) whose priority does not exceed its own.
fn apply_prohibitions(arcs: Vec<Arc>) -> Vec<Arc> {
    let prohibitions: Vec<&Arc> = arcs.iter().filter(|a| a.prohibited).collect();
    if prohibitions.is_empty() {
        return arcs;
    }
    let keep: Vec<bool> = arcs
        .iter()
        .map(|arc| {
            !arc.prohibited
                && !prohibitions.iter().any(|p| {
                    p.role == arc.role
                        && p.from == arc.from
                        && p.to == arc.to
                        && p.arcrole == arc.arcrole
                        && arc.priority <= p.priority
                })
        })
        .collect();
    arcs.into_iter()
        .zip(keep)
        .filter_map(|(arc, keep)| keep.then_some(arc))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presentation(arcs: &str) -> Vec<u8> {
        format!(
            r#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:presentationLink xlink:type="extended" xlink:role="http://acme.com/role/BS">
    <link:loc xlink:type="locator" xlink:href="acme.xsd#us-gaap_AssetsAbstract" xlink:label="loc_abs"/>
    <link:loc xlink:type="locator" xlink:href="acme.xsd#us-gaap_Cash" xlink:label="loc_cash"/>
    <link:loc xlink:type="locator" xlink:href="acme.xsd#us-gaap_Assets" xlink:label="loc_assets"/>
    {arcs}
  </link:presentationLink>
</link:linkbase>"#
        )
        .into_bytes()
    }

    #[test]
    fn test_missing_order_falls_back_to_document_order() {
        let doc = presentation(
            r#"<link:presentationArc xlink:type="arc" xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="loc_abs" xlink:to="loc_assets"/>
               <link:presentationArc xlink:type="arc" xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="loc_abs" xlink:to="loc_cash"/>"#,
        );
        let mut diagnostics = Diagnostics::default();
        let set = parse_all(LinkKind::Presentation, &[doc], &mut diagnostics);

        assert_eq!(set.arcs.len(), 2);
        assert!(set.arcs[0].order < set.arcs[1].order);
        assert_eq!(set.arcs[0].order.order, None);
        assert!(diagnostics.is_clean());
    }

    #[test]
    fn test_explicit_order_beats_document_order() {
        let doc = presentation(
            r#"<link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="loc_abs" xlink:to="loc_assets" order="2"/>
               <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="loc_abs" xlink:to="loc_cash" order="1.0"/>"#,
        );
        let set = parse_all(LinkKind::Presentation, &[doc], &mut Diagnostics::default());
        let cash = set.arcs.iter().find(|a| a.to.name == "Cash").unwrap();
        let assets = set.arcs.iter().find(|a| a.to.name == "Assets").unwrap();
        assert!(cash.order < assets.order);
    }

    #[test]
    fn test_dangling_arc_is_structural_issue() {
        let doc = presentation(
            r#"<link:presentationArc xlink:from="loc_abs" xlink:to="loc_missing" order="1"/>"#,
        );
        let mut diagnostics = Diagnostics::default();
        let set = parse_all(LinkKind::Presentation, &[doc], &mut diagnostics);
        assert!(set.arcs.is_empty());
        assert_eq!(diagnostics.structural_count(), 1);
    }

    #[test]
    fn test_truncated_document_is_skipped() {
        let good = presentation(
            r#"<link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="loc_abs" xlink:to="loc_cash" order="1"/>"#,
        );
        let truncated = br#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase"><link:presentationLink>"#.to_vec();
        let mut diagnostics = Diagnostics::default();
        let set = parse_all(LinkKind::Presentation, &[truncated, good], &mut diagnostics);

        assert_eq!(set.arcs.len(), 1);
        assert_eq!(diagnostics.structural_count(), 1);
        assert_eq!(diagnostics.issues[0].source, "presentationLink[0]");
    }

    #[test]
    fn test_prohibited_arc_removes_base_arc() {
        let doc = presentation(
            r#"<link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="loc_abs" xlink:to="loc_cash" order="1"/>
               <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="loc_abs" xlink:to="loc_cash" order="1" use="prohibited" priority="1"/>
               <link:presentationArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/parent-child" xlink:from="loc_abs" xlink:to="loc_assets" order="2"/>"#,
        );
        let set = parse_all(LinkKind::Presentation, &[doc], &mut Diagnostics::default());
        assert_eq!(set.arcs.len(), 1);
        assert_eq!(set.arcs[0].to.name, "Assets");
    }

    #[test]
    fn test_label_resources() {
        let doc = br#"<link:linkbase xmlns:link="http://www.xbrl.org/2003/linkbase" xmlns:xlink="http://www.w3.org/1999/xlink">
  <link:labelLink xlink:role="http://www.xbrl.org/2003/role/link">
    <link:loc xlink:href="acme.xsd#us-gaap_Assets" xlink:label="loc_assets"/>
    <link:label xlink:label="lab_assets" xlink:role="http://www.xbrl.org/2003/role/label" xml:lang="en-US">Assets</link:label>
    <link:label xlink:label="lab_assets" xlink:role="http://www.xbrl.org/2003/role/totalLabel" xml:lang="en-US">Total assets</link:label>
    <link:labelArc xlink:arcrole="http://www.xbrl.org/2003/arcrole/concept-label" xlink:from="loc_assets" xlink:to="lab_assets"/>
  </link:labelLink>
</link:linkbase>"#;
        let set = parse_all(LinkKind::Label, &[doc.to_vec()], &mut Diagnostics::default());
        assert_eq!(set.labels.len(), 2);
        assert!(set.labels.iter().any(|(_, l)| l.text == "Total assets"));
    }
}
