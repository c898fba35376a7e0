//! hCard reader.

use std::io::Read;

use super::element::{HCardElement, class_list, has_class};
use crate::error::RfcResult;
use crate::rfc::vcard::core::{VCard, VCardParameters, VCardProperty, VCardVersion, names};
use crate::rfc::vcard::registry::ScribeRegistry;
use crate::rfc::vcard::scribe::ParseContext;
use crate::rfc::vcard::warning::{DocumentWarnings, ParsedVCard, PropertyWarnings};
use crate::rfc::vcard::xml::dom::{Dialect, XmlElement, parse_document};

/// Root class of an hCard.
const VCARD_CLASS: &str = "vcard";

/// hCard classes whose names differ from the property name.
const CLASS_ALIASES: &[(&str, &str)] = &[("category", names::CATEGORIES)];

/// Classes that never name a property, even when a scribe of that name is
/// registered.
const NON_PROPERTY_CLASSES: &[&str] = &["value", "type", VCARD_CLASS];

/// Parses every hCard in an HTML page with the built-in scribes.
///
/// ## Errors
/// Returns [`RfcError::XmlError`](crate::error::RfcError::XmlError) if the
/// page cannot be tokenized.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_html(input: &str) -> RfcResult<Vec<ParsedVCard>> {
    let registry = ScribeRegistry::new();
    HCardReader::new(input, &registry)?.collect()
}

/// Pull reader over the hCards of an HTML page.
///
/// Each element with `class="vcard"` is one card; nested cards are read as
/// cards of their own and are not part of their parent. hCard is a profile of
/// vCard 3.0, so cards are read at that version.
#[derive(Debug)]
pub struct HCardReader<'r> {
    cards: std::vec::IntoIter<XmlElement>,
    registry: &'r ScribeRegistry,
}

impl<'r> HCardReader<'r> {
    /// ## Errors
    /// Returns [`RfcError::XmlError`](crate::error::RfcError::XmlError) if the
    /// page cannot be tokenized.
    pub fn new(input: &str, registry: &'r ScribeRegistry) -> RfcResult<Self> {
        let root = parse_document(input, Dialect::Html)?;
        let cards: Vec<XmlElement> = root
            .descendants()
            .into_iter()
            .filter(|e| has_class(e, VCARD_CLASS))
            .cloned()
            .collect();
        tracing::debug!(count = cards.len(), "Found hCard elements");
        Ok(Self {
            cards: cards.into_iter(),
            registry,
        })
    }

    /// ## Errors
    /// Returns [`RfcError::IoError`](crate::error::RfcError::IoError) if the
    /// stream cannot be read.
    pub fn from_reader(mut reader: impl Read, registry: &'r ScribeRegistry) -> RfcResult<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::new(&input, registry)
    }

    fn parse_card(&self, root: &XmlElement) -> ParsedVCard {
        let version = VCardVersion::V3_0;
        let mut card = VCard::with_version(version);
        let mut warnings = DocumentWarnings::new();

        let mut elements = Vec::new();
        collect_property_elements(root, &mut elements);

        for element in elements {
            for class in class_list(element) {
                let Some(name) = self.property_name(&class) else {
                    continue;
                };
                let scribe = self.registry.resolve(&name);
                let mut ctx = ParseContext::new(version, VCardParameters::new());
                let parsed = scribe.parse_html(&HCardElement::new(element), &mut ctx);
                let mut messages = std::mem::take(&mut ctx.warnings);

                match parsed {
                    Ok(value) => card.add_property(VCardProperty {
                        group: None,
                        name: name.clone(),
                        params: ctx.params,
                        value,
                    }),
                    Err(err) => {
                        tracing::debug!(property = %name, error = %err, "Dropping property");
                        messages.push(err.to_string());
                    }
                }
                warnings.push_property(PropertyWarnings::new(name, None, messages));
            }
        }

        ParsedVCard { card, warnings }
    }

    /// Maps a class to a registered property name.
    fn property_name(&self, class: &str) -> Option<String> {
        if NON_PROPERTY_CLASSES.contains(&class) {
            return None;
        }
        let name = CLASS_ALIASES
            .iter()
            .find(|(alias, _)| *alias == class)
            .map_or_else(|| class.to_ascii_uppercase(), |(_, name)| (*name).to_string());
        (name != names::VERSION && self.registry.contains(&name)).then_some(name)
    }
}

impl Iterator for HCardReader<'_> {
    type Item = RfcResult<ParsedVCard>;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.cards.next()?;
        Some(Ok(self.parse_card(&element)))
    }
}

/// Descendants of a card root in document order, not descending into nested
/// cards.
fn collect_property_elements<'a>(element: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in element.elements() {
        if has_class(child, VCARD_CLASS) {
            continue;
        }
        out.push(child);
        collect_property_elements(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::{Geo, Telephone, VCardValue};

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Contacts</title><meta charset="utf-8"></head>
<body>
  <div class="vcard">
    <a class="url fn" href="https://john.example.com">John Doe</a>
    <div class="n">
      <span class="given-name">John</span> <span class="family-name">Doe</span>
    </div>
    <div class="tel"><span class="type">Work</span>: <span class="value">+1-555-0100</span></div>
    <a class="email" href="mailto:john@example.com?subject=hi">Mail me</a>
    <div class="adr">
      <span class="type">home</span>
      <span class="street-address">1 Main St</span>
      <span class="locality">Austin</span>, <span class="region">TX</span>
    </div>
    <abbr class="geo" title="30.267153;-97.743061">Austin</abbr>
    <span class="category">friend</span>
    <div class="note">Likes<br>coffee</div>
  </div>
</body>
</html>"#;

    #[test]
    fn parses_page() {
        let parsed = parse_html(PAGE).unwrap();
        assert_eq!(parsed.len(), 1);
        let card = &parsed[0].card;
        assert_eq!(card.version, VCardVersion::V3_0);
        assert_eq!(card.formatted_name(), Some("John Doe"));
        assert_eq!(
            card.get_property("URL").unwrap().value,
            VCardValue::Uri("https://john.example.com".to_string())
        );
        assert_eq!(card.name().unwrap().given, vec!["John"]);
        assert_eq!(card.emails(), vec!["john@example.com"]);

        let tel = card.get_property("TEL").unwrap();
        assert!(tel.has_type("work"));
        assert_eq!(
            tel.value,
            VCardValue::Telephone(Telephone::Text("+1-555-0100".to_string()))
        );

        let adr = &card.addresses()[0];
        assert_eq!(adr.locality, vec!["Austin"]);
        assert!(card.get_property("ADR").unwrap().has_type("home"));

        assert_eq!(
            card.get_property("GEO").unwrap().value,
            VCardValue::Geo(Geo::new(30.267_153, -97.743_061))
        );
        assert!(card.get_property("CATEGORIES").is_some());
        assert_eq!(card.get_property("NOTE").unwrap().as_text(), Some("Likes\ncoffee"));
    }

    #[test]
    fn geo_without_longitude_is_dropped() {
        let page = r#"<div class="vcard"><span class="fn">A</span>
            <div class="geo"><span class="latitude">30.2</span></div></div>"#;
        let parsed = parse_html(page).unwrap();
        assert!(parsed[0].card.get_property("GEO").is_none());
        assert_eq!(parsed[0].warnings.for_property("GEO").count(), 1);
    }

    #[test]
    fn nested_cards_are_separate() {
        let page = r#"<div class="vcard"><span class="fn">Parent</span>
            <div class="vcard"><span class="fn">Child</span></div></div>"#;
        let parsed = parse_html(page).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].card.get_properties("FN").len(), 1);
        assert_eq!(parsed[0].card.formatted_name(), Some("Parent"));
        assert_eq!(parsed[1].card.formatted_name(), Some("Child"));
    }

    #[test]
    fn page_without_cards() {
        assert!(parse_html("<p>nothing here</p>").unwrap().is_empty());
    }
}
