//! A small owned element tree built from quick-xml events.
//!
//! Taxonomy and instance files are small enough to hold in memory, and the
//! linkbase resolution steps need random access to locators and arcs, so the
//! streaming reader is folded into a tree once per document.

use crate::error::{Result, XbrlError};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// An XML element with its attributes, children and concatenated text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct XmlElement {
    /// Qualified name as written in the document (e.g. `link:loc`)
    pub(crate) name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<Self>,
    pub(crate) text: String,
}

impl XmlElement {
    pub(crate) fn local_name(&self) -> &str {
        local(&self.name)
    }

    /// Looks an attribute up by qualified name, falling back to local name.
    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .or_else(|| {
                let wanted = local(name);
                self.attributes.iter().find(|(k, _)| local(k) == wanted)
            })
            .map(|(_, v)| v.as_str())
    }

    /// First attribute found among `names`, each with local-name fallback.
    pub(crate) fn attr_any(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|n| self.attr(n))
    }

    pub(crate) fn child(&self, local_name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.local_name() == local_name)
    }

    pub(crate) fn children_named<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Self> + 'a {
        self.children
            .iter()
            .filter(move |c| c.local_name() == local_name)
    }

    /// Depth-first pre-order traversal, excluding `self`.
    pub(crate) fn descendants(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        let mut stack: Vec<&Self> = self.children.iter().rev().collect();
        while let Some(el) = stack.pop() {
            out.push(el);
            stack.extend(el.children.iter().rev());
        }
        out
    }

    /// Prefix bound to `namespace` by an `xmlns:` declaration on this element.
    pub(crate) fn prefix_for_namespace(&self, namespace: &str) -> Option<&str> {
        self.attributes.iter().find_map(|(k, v)| {
            k.strip_prefix("xmlns:")
                .filter(|_| v == namespace)
        })
    }

    pub(crate) fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// Local part of a qualified name.
pub(crate) fn local(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, l)| l)
}

/// Parses a complete document into its root element.
pub(crate) fn parse(bytes: &[u8]) -> Result<XmlElement> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(bytes);
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => stack.push(element_from(&e)?),
            Ok(Event::Empty(e)) => {
                let el = element_from(&e)?;
                attach(&mut stack, &mut root, el);
            }
            Ok(Event::End(_)) => {
                if let Some(el) = stack.pop() {
                    attach(&mut stack, &mut root, el);
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(current) = stack.last_mut() {
                    match t.unescape() {
                        Ok(s) => current.text.push_str(&s),
                        Err(_) => current.text.push_str(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(XbrlError::Xml(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(XbrlError::Xml(format!(
            "unclosed element <{}>",
            stack.last().map(|e| e.name.as_str()).unwrap_or_default()
        )));
    }

    root.ok_or_else(|| XbrlError::Xml("document has no root element".to_string()))
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes().with_checks(false) {
        let attr = attr.map_err(|e| XbrlError::Xml(format!("bad attribute in <{name}>: {e}")))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| XbrlError::Xml(format!("bad attribute value in <{name}>: {e}")))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, el: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None => {
            if root.is_none() {
                *root = Some(el);
            }
        }
    }
}
