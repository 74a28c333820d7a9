//! Namespace-aware parsing of permission documents into [`Element`] trees.
//!
//! Tags bound to a namespace are recorded in Clark notation (`{uri}local`),
//! which keeps the namespace visible until the merge engine strips it.
//! Namespace declarations are consumed rather than kept as attributes.

use std::fmt::Display;

use permerge_types::{Document, Element};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use tracing::debug;

use crate::error::{XmlError, XmlResult};

/// An element whose end tag has not been seen yet.
struct Open {
    element: Element,
    text: String,
}

impl Open {
    fn finish(self) -> Element {
        let mut element = self.element;
        // Whitespace between child elements is layout, not content.
        if element.children.is_empty() && !self.text.is_empty() {
            element.text = Some(self.text);
        }
        element
    }
}

/// Parse an XML string and detect the permission document kind of its root.
pub fn parse_document(xml: &str) -> XmlResult<Document> {
    let root = parse_element(xml)?;
    Ok(Document::from_root(root)?)
}

/// Parse an XML string into its root element.
///
/// Leaf text is kept verbatim (entities unescaped, CDATA included). Comments,
/// processing instructions and the doctype are skipped.
pub fn parse_element(xml: &str) -> XmlResult<Element> {
    let mut reader = NsReader::from_str(xml);
    let mut stack: Vec<Open> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let (ns, event) = match reader.read_resolved_event() {
            Ok(pair) => pair,
            Err(e) => return Err(malformed(position, e)),
        };

        match event {
            Event::Start(start) => {
                let element = open_element(&ns, &start, position)?;
                stack.push(Open {
                    element,
                    text: String::new(),
                });
            }
            Event::Empty(start) => {
                let element = open_element(&ns, &start, position)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let Some(open) = stack.pop() else {
                    return Err(malformed(position, "end tag without matching start tag"));
                };
                attach(&mut stack, &mut root, open.finish())?;
            }
            Event::Text(text) => {
                if let Some(open) = stack.last_mut() {
                    let unescaped = text.unescape().map_err(|e| malformed(position, e))?;
                    open.text.push_str(&unescaped);
                }
            }
            Event::CData(cdata) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&cdata));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.element.tag));
    }
    root.ok_or(XmlError::Empty)
}

fn open_element(
    ns: &ResolveResult<'_>,
    start: &BytesStart<'_>,
    position: u64,
) -> XmlResult<Element> {
    let qualified = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let tag = match ns {
        ResolveResult::Bound(namespace) => {
            let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
            format!("{{{}}}{}", String::from_utf8_lossy(namespace.as_ref()), local)
        }
        ResolveResult::Unbound => qualified,
        ResolveResult::Unknown(prefix) => {
            debug!(
                tag = %qualified,
                prefix = %String::from_utf8_lossy(prefix),
                "undeclared namespace prefix; keeping qualified name"
            );
            qualified
        }
    };

    let mut element = Element::new(tag);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(position, e))?;
        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let value = attr.unescape_value().map_err(|e| malformed(position, e))?;
        element
            .attributes
            .push((String::from_utf8_lossy(key).into_owned(), value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [Open], root: &mut Option<Element>, element: Element) -> XmlResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.element.push(element);
    } else if root.is_some() {
        return Err(XmlError::MultipleRoots(element.tag));
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn malformed(position: u64, err: impl Display) -> XmlError {
    XmlError::Malformed {
        position,
        message: err.to_string(),
    }
}
