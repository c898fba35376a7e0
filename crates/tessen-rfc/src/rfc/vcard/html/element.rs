//! The hCard property element handed to scribes.

use crate::rfc::vcard::xml::dom::{XmlElement, XmlNode};

/// Class marking the part of an element that holds its value.
const VALUE_CLASS: &str = "value";
/// Class marking TYPE values inside a property element.
const TYPE_CLASS: &str = "type";

/// An HTML element carrying an hCard property class.
#[derive(Debug, Clone, Copy)]
pub struct HCardElement<'a> {
    element: &'a XmlElement,
}

impl<'a> HCardElement<'a> {
    #[must_use]
    pub fn new(element: &'a XmlElement) -> Self {
        Self { element }
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> &'a str {
        &self.element.name
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.attr(name)
    }

    /// Lowercased entries of the `class` attribute.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        class_list(self.element)
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        has_class(self.element, class)
    }

    /// The element's value.
    ///
    /// Descendants marked `class="value"` take precedence. Otherwise `abbr`
    /// uses its `title`, `data` and `input` their `value`, `img` and `area`
    /// their `alt`, and anything else its text with `<br>` as a line break.
    #[must_use]
    pub fn value(&self) -> String {
        let parts: Vec<String> = self
            .descendants_with_class(VALUE_CLASS)
            .into_iter()
            .map(|e| Self::new(e).own_value())
            .collect();
        if parts.is_empty() {
            self.own_value()
        } else {
            parts.concat()
        }
    }

    fn own_value(&self) -> String {
        let attribute = match self.tag() {
            "abbr" => self.attr("title"),
            "data" | "input" => self.attr("value"),
            "img" | "area" => self.attr("alt"),
            _ => None,
        };
        match attribute {
            Some(value) => value.trim().to_string(),
            None => {
                let mut lines = vec![String::new()];
                collect_lines(self.element, &mut lines);
                join_lines(&lines)
            }
        }
    }

    /// The URL an element links to: `href`, `src` or `data` depending on
    /// the tag.
    #[must_use]
    pub fn link_value(&self) -> Option<String> {
        let attribute = match self.tag() {
            "a" | "area" | "link" => "href",
            "img" | "audio" | "video" | "source" | "embed" => "src",
            "object" => "data",
            _ => return None,
        };
        self.attr(attribute)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Values of descendants marked `class="type"`, lowercased.
    #[must_use]
    pub fn types(&self) -> Vec<String> {
        self.descendants_with_class(TYPE_CLASS)
            .into_iter()
            .map(|e| Self::new(e).value().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Value of the first descendant with the given class.
    #[must_use]
    pub fn first_value(&self, class: &str) -> Option<String> {
        self.descendants_with_class(class)
            .first()
            .map(|e| Self::new(e).value())
    }

    /// Values of every descendant with the given class.
    #[must_use]
    pub fn all_values(&self, class: &str) -> Vec<String> {
        self.descendants_with_class(class)
            .into_iter()
            .map(|e| Self::new(e).value())
            .collect()
    }

    fn descendants_with_class(&self, class: &str) -> Vec<&'a XmlElement> {
        self.element
            .descendants()
            .into_iter()
            .filter(|e| has_class(e, class))
            .collect()
    }
}

pub(super) fn class_list(element: &XmlElement) -> Vec<String> {
    element
        .attr("class")
        .map(|classes| {
            classes
                .split_ascii_whitespace()
                .map(str::to_ascii_lowercase)
                .collect()
        })
        .unwrap_or_default()
}

pub(super) fn has_class(element: &XmlElement, class: &str) -> bool {
    element.attr("class").is_some_and(|classes| {
        classes
            .split_ascii_whitespace()
            .any(|c| c.eq_ignore_ascii_case(class))
    })
}

/// Rendered text, split into lines at `<br>`. Source line breaks are plain
/// whitespace.
fn collect_lines(element: &XmlElement, lines: &mut Vec<String>) {
    for node in &element.children {
        match node {
            XmlNode::Text(text) => {
                if let Some(line) = lines.last_mut() {
                    line.push_str(text);
                }
            }
            XmlNode::Element(child) if child.name == "br" => lines.push(String::new()),
            XmlNode::Element(child) => collect_lines(child, lines),
        }
    }
}

/// Collapses whitespace runs inside each line and trims the result.
fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::xml::dom::{Dialect, parse_document};

    fn first_with_class(root: &XmlElement, class: &str) -> XmlElement {
        root.descendants()
            .into_iter()
            .find(|e| has_class(e, class))
            .cloned()
            .unwrap()
    }

    #[test]
    fn value_class_wins() {
        let root = parse_document(
            r#"<div class="tel"><span class="type">Home</span>: <span class="value">555</span>-<span class="value">0100</span></div>"#,
            Dialect::Html,
        )
        .unwrap();
        let tel = first_with_class(&root, "tel");
        let element = HCardElement::new(&tel);
        assert_eq!(element.value(), "5550100");
        assert_eq!(element.types(), vec!["home"]);
    }

    #[test]
    fn tag_specific_values() {
        let root = parse_document(
            r#"<p><abbr class="a" title="2024-01-15">Jan 15</abbr><img class="b" src="me.png" alt="Me"/><a class="c" href=" https://x.test ">X</a></p>"#,
            Dialect::Html,
        )
        .unwrap();
        let abbr = first_with_class(&root, "a");
        assert_eq!(HCardElement::new(&abbr).value(), "2024-01-15");
        let img = first_with_class(&root, "b");
        assert_eq!(HCardElement::new(&img).value(), "Me");
        assert_eq!(HCardElement::new(&img).link_value().as_deref(), Some("me.png"));
        let link = first_with_class(&root, "c");
        assert_eq!(HCardElement::new(&link).link_value().as_deref(), Some("https://x.test"));
        assert_eq!(HCardElement::new(&abbr).link_value(), None);
    }

    #[test]
    fn text_whitespace_and_breaks() {
        let root = parse_document(
            "<div class=\"note\">  Line   one<br/>\n   Line two  </div>",
            Dialect::Html,
        )
        .unwrap();
        let note = first_with_class(&root, "note");
        assert_eq!(HCardElement::new(&note).value(), "Line one\nLine two");
    }

    #[test]
    fn class_lookups() {
        let root = parse_document(
            r#"<div class="Adr Work"><span class="locality">Austin</span><span class="street-address">1 Main</span><span class="street-address">Apt 2</span></div>"#,
            Dialect::Html,
        )
        .unwrap();
        let adr = first_with_class(&root, "adr");
        let element = HCardElement::new(&adr);
        assert_eq!(element.classes(), vec!["adr", "work"]);
        assert_eq!(element.first_value("locality").as_deref(), Some("Austin"));
        assert_eq!(element.all_values("street-address"), vec!["1 Main", "Apt 2"]);
        assert_eq!(element.first_value("region"), None);
    }
}
