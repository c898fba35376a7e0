//! The property element handed to scribes.

use super::dom::{XmlElement, XmlNode};

/// Element holding a property's parameters.
pub const PARAMETERS: &str = "parameters";

/// An xCard property element such as `<fn><text>John</text></fn>`.
///
/// Scribes see only value children; the `<parameters>` child is handled by
/// the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XCardElement {
    element: XmlElement,
}

impl XCardElement {
    /// An empty property element named after the lowercased property name.
    #[must_use]
    pub fn new(property_name: &str) -> Self {
        Self {
            element: XmlElement::new(property_name.to_ascii_lowercase()),
        }
    }

    #[must_use]
    pub fn from_element(element: XmlElement) -> Self {
        Self { element }
    }

    #[must_use]
    pub fn into_element(self) -> XmlElement {
        self.element
    }

    #[must_use]
    pub fn as_element(&self) -> &XmlElement {
        &self.element
    }

    /// Local name of the property element.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.element.name
    }

    /// Appends `<name>value</name>`.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.element.push_element(XmlElement::with_text(name, value));
    }

    /// Text of the first value child called `name`.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<String> {
        self.element.child(name).map(XmlElement::text)
    }

    /// Text of every value child called `name`.
    #[must_use]
    pub fn all(&self, name: &str) -> Vec<String> {
        self.element
            .elements_named(name)
            .map(XmlElement::text)
            .collect()
    }

    /// Name and text of the first value child, whatever its name.
    #[must_use]
    pub fn first_value(&self) -> Option<(String, String)> {
        self.values().next().map(|e| (e.name.clone(), e.text()))
    }

    #[must_use]
    pub fn has_child(&self, name: &str) -> bool {
        self.element.child(name).is_some()
    }

    /// Trimmed text of the element, ignoring parameters.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.element.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(child) if child.name != PARAMETERS => {
                    out.push_str(&child.text());
                }
                XmlNode::Element(_) => {}
            }
        }
        out.trim().to_string()
    }

    fn values(&self) -> impl Iterator<Item = &XmlElement> {
        self.element.elements().filter(|e| e.name != PARAMETERS)
    }
}
