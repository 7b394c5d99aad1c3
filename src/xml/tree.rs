//! Owned XML element tree.
//!
//! [`XmlElement`] is the parsed form consumed by the flattening engine: tag name
//! as written in the document, attributes in document order, text before the
//! first child element, ordered children. Parsing drives `quick-xml` events
//! with an explicit element stack, so building the tree never recurses; the
//! configurable `max_depth` bounds nesting up front, which in turn bounds every
//! recursive pass further down the pipeline.

use quick_xml::Reader;
use quick_xml::escape;
use quick_xml::events::Event;

use crate::error::{NormalizeError, NormalizeResult};

/// Nesting ceiling applied when none is configured explicitly.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// One parsed XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name exactly as written, possibly namespace-qualified (`ns:tag`).
    pub name: String,
    /// Attributes in document order, names as written, values unescaped.
    /// Namespace declarations (`xmlns`, `xmlns:*`) are excluded.
    pub attributes: Vec<(String, String)>,
    /// Character data between the start tag and the first child element, if any.
    /// Fragments after a child element belong to no node and are dropped.
    pub text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Tag name with any namespace qualifier stripped.
    pub fn local_name(&self) -> &str {
        strip_ns(&self.name)
    }

    /// Text content trimmed of surrounding whitespace; `None` when absent or
    /// whitespace-only.
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    fn push_text(&mut self, fragment: &str) {
        // Text after the first child is tail content of that child, not ours.
        if !self.children.is_empty() {
            return;
        }
        match &mut self.text {
            Some(text) => text.push_str(fragment),
            None => self.text = Some(fragment.to_string()),
        }
    }
}

/// Strip a namespace qualifier from a tag or attribute name.
///
/// Handles both the brace form (`{uri}local`) and the prefix form
/// (`ns:local`); unqualified names pass through unchanged.
pub fn strip_ns(name: &str) -> &str {
    if let Some(idx) = name.rfind('}') {
        &name[idx + 1..]
    } else if let Some(idx) = name.rfind(':') {
        &name[idx + 1..]
    } else {
        name
    }
}

/// Parse a complete document into its root [`XmlElement`].
///
/// Empty elements (`<a/>`) are expanded so they behave like `<a></a>`.
/// Documents nested deeper than `max_depth`, documents without a single root,
/// and unresolved entity references are rejected with
/// [`NormalizeError::MalformedDocument`]; syntax errors surface as
/// [`NormalizeError::Xml`].
pub fn parse_document(xml: &str, max_depth: usize) -> NormalizeResult<XmlElement> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().expand_empty_elements = true;

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(malformed("multiple root elements"));
                }
                if stack.len() >= max_depth {
                    return Err(malformed(format!(
                        "element nesting exceeds the configured limit of {max_depth}"
                    )));
                }

                let mut element = XmlElement {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    attributes: Vec::new(),
                    text: None,
                    children: Vec::new(),
                };
                for attr in e.attributes() {
                    let attr = attr?;
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    // Namespace declarations are wiring, not data.
                    if key == "xmlns" || key.starts_with("xmlns:") {
                        continue;
                    }
                    let raw = String::from_utf8_lossy(attr.value.as_ref()).into_owned();
                    let value = escape::unescape(&raw)
                        .map_err(|e| {
                            malformed(format!("invalid value for attribute '{key}': {e}"))
                        })?
                        .into_owned();
                    element.attributes.push((key, value));
                }
                stack.push(element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed("closing tag without a matching opening tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(e) => {
                let bytes = e.into_inner();
                let text = String::from_utf8_lossy(&bytes);
                match stack.last_mut() {
                    Some(element) => element.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(malformed("text content outside the root element")),
                }
            }
            Event::CData(e) => {
                let bytes = e.into_inner();
                let text = String::from_utf8_lossy(&bytes);
                match stack.last_mut() {
                    Some(element) => element.push_text(&text),
                    None => return Err(malformed("CDATA outside the root element")),
                }
            }
            Event::GeneralRef(e) => {
                let bytes = e.into_inner();
                let name = String::from_utf8_lossy(&bytes);
                let resolved = resolve_entity(&name).ok_or_else(|| {
                    malformed(format!("unresolved entity reference '&{name};'"))
                })?;
                match stack.last_mut() {
                    Some(element) => element.push_text(&resolved),
                    None => return Err(malformed("entity reference outside the root element")),
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!("unclosed element '{}'", open.name)));
    }
    root.ok_or_else(|| malformed("document has no root element"))
}

/// Resolve a general entity reference body (the part between `&` and `;`).
///
/// Supports the five predefined entities plus decimal (`#65`) and hex
/// (`#x41`) character references.
fn resolve_entity(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = if let Some(hex) = code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            code.parse::<u32>().ok()?
        };
        char::from_u32(value).map(|c| c.to_string())
    } else {
        escape::resolve_predefined_entity(name).map(|s| s.to_string())
    }
}

fn malformed(message: impl Into<String>) -> NormalizeError {
    NormalizeError::MalformedDocument {
        message: message.into(),
    }
}
