//! A small owned element tree built on quick-xml events.
//!
//! xCard and hCard both need random access to children (parameters before
//! values, classes nested at any depth), so documents are read into this tree
//! first. Element names are stored as local names; HTML names are lowercased.
//! In the XML dialect each element also keeps the namespace URI its prefix
//! (or the default `xmlns`) resolves to.

use std::borrow::Cow;
use std::io;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::{NsReader, Writer};

use crate::error::{RfcError, RfcResult};

/// HTML elements that never have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Input dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Well-formed XML.
    Xml,
    /// XHTML-ish HTML: void elements, unquoted attributes and stray end tags
    /// are tolerated.
    Html,
}

/// A child node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its attributes and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Resolved namespace URI. Always `None` for HTML and for built trees.
    pub namespace: Option<String>,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// An element holding a single text node.
    #[must_use]
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.push_text(text);
        element
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Attribute value, matched case-insensitively.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn push_element(&mut self, element: Self) {
        self.children.push(XmlNode::Element(element));
    }

    pub fn insert_element(&mut self, index: usize, element: Self) {
        let index = index.min(self.children.len());
        self.children.insert(index, XmlNode::Element(element));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(XmlNode::Text(text));
        }
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Whether the element is bound to the namespace `uri`.
    #[must_use]
    pub fn in_namespace(&self, uri: &str) -> bool {
        self.namespace.as_deref() == Some(uri)
    }

    /// Child elements with the given local name.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    /// First child element with the given local name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.elements().find(|e| e.name == name)
    }

    /// All descendant elements, depth first, excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }

    /// Concatenated text of every descendant text node.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_descendants<'a>(element: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in element.elements() {
        out.push(child);
        collect_descendants(child, out);
    }
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for node in &element.children {
        match node {
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::Element(child) => collect_text(child, out),
        }
    }
}

/// Parses a document into a synthetic root element named `#document`.
///
/// ## Errors
/// Returns [`RfcError::XmlError`] for malformed XML. In the HTML dialect
/// mismatched end tags are tolerated.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_document(input: &str, dialect: Dialect) -> RfcResult<XmlElement> {
    let mut reader = NsReader::from_str(input);
    {
        let config = reader.config_mut();
        if dialect == Dialect::Html {
            config.check_end_names = false;
            config.allow_unmatched_ends = true;
        }
    }

    let mut stack = vec![XmlElement::new("#document")];
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let (namespace, event) = match dialect {
            Dialect::Xml => {
                let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
                (namespace_uri(&resolved), event)
            }
            Dialect::Html => (None, reader.read_event_into(&mut buf)?),
        };
        match event {
            Event::Start(ref e) => {
                let mut element = start_element(&reader, e, dialect)?;
                element.namespace = namespace;
                if dialect == Dialect::Html && VOID_ELEMENTS.contains(&element.name.as_str()) {
                    append_child(&mut stack, element);
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(ref e) => {
                let mut element = start_element(&reader, e, dialect)?;
                element.namespace = namespace;
                append_child(&mut stack, element);
            }
            Event::End(ref e) => {
                let name = local_name(&reader, e.local_name().as_ref(), dialect)?;
                close_element(&mut stack, &name);
            }
            Event::Text(ref e) => {
                let text = reader.decoder().decode(e.as_ref())?;
                push_text(&mut stack, &text);
            }
            Event::CData(ref e) => {
                let text = reader.decoder().decode(e.as_ref())?;
                push_text(&mut stack, &text);
            }
            Event::GeneralRef(ref e) => {
                let name = reader.decoder().decode(e.as_ref())?;
                push_text(&mut stack, &resolve_reference(&name));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // Unclosed elements are folded into their parents.
    while stack.len() > 1 {
        if let Some(element) = stack.pop() {
            append_child(&mut stack, element);
        }
    }
    stack
        .pop()
        .ok_or_else(|| RfcError::InvalidDocument("empty document".to_string()))
}

/// Unbound and unknown prefixes both count as no namespace.
fn namespace_uri(resolved: &ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Some(String::from_utf8_lossy(uri).into_owned()),
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    }
}

fn local_name(reader: &NsReader<&[u8]>, bytes: &[u8], dialect: Dialect) -> RfcResult<String> {
    let name = reader.decoder().decode(bytes)?;
    Ok(match dialect {
        Dialect::Xml => name.into_owned(),
        Dialect::Html => name.to_ascii_lowercase(),
    })
}

fn start_element(
    reader: &NsReader<&[u8]>,
    e: &BytesStart<'_>,
    dialect: Dialect,
) -> RfcResult<XmlElement> {
    let mut element = XmlElement::new(local_name(reader, e.local_name().as_ref(), dialect)?);
    let attributes: Vec<_> = match dialect {
        Dialect::Xml => e.attributes().flatten().collect(),
        Dialect::Html => e.html_attributes().flatten().collect(),
    };
    for attr in attributes {
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let raw = reader.decoder().decode(&attr.value)?;
        element.attributes.push((key, unescape_lenient(&raw).into_owned()));
    }
    Ok(element)
}

fn append_child(stack: &mut [XmlElement], element: XmlElement) {
    if let Some(parent) = stack.last_mut() {
        parent.push_element(element);
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) {
    if let Some(parent) = stack.last_mut() {
        // Merge with a preceding text node so entity references do not split
        // values.
        if let Some(XmlNode::Text(previous)) = parent.children.last_mut() {
            previous.push_str(text);
        } else {
            parent.push_text(text);
        }
    }
}

fn close_element(stack: &mut Vec<XmlElement>, name: &str) {
    let Some(position) = stack.iter().rposition(|e| e.name == name) else {
        return;
    };
    if position == 0 {
        return;
    }
    while stack.len() > position {
        if let Some(element) = stack.pop() {
            append_child(stack, element);
        }
    }
}

/// Resolves an entity reference name (`amp`, `#x41`, `nbsp`). Unknown
/// entities are kept verbatim.
fn resolve_reference(name: &str) -> String {
    let raw = format!("&{name};");
    match quick_xml::escape::unescape(&raw) {
        Ok(resolved) => resolved.into_owned(),
        Err(_) => html_entity(name).map_or(raw, str::to_string),
    }
}

fn unescape_lenient(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw))
}

fn html_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "nbsp" => "\u{a0}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        _ => return None,
    })
}

/// Serializes an element tree with an XML declaration.
///
/// ## Errors
/// Returns [`RfcError::IoError`] if writing fails.
pub fn write_document(root: &XmlElement, pretty: bool) -> RfcResult<String> {
    let mut writer = if pretty {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    };
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| RfcError::IoError(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn write_element<W: io::Write>(writer: &mut Writer<W>, element: &XmlElement) -> RfcResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for node in &element.children {
        match node {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
