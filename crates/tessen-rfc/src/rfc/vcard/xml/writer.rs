//! xCard writer.

use std::io;

use super::dom::{XmlElement, write_document};
use super::element::{PARAMETERS, XCardElement};
use crate::error::RfcResult;
use crate::rfc::vcard::core::{VCard, VCardParameters, VCardVersion, names};
use crate::rfc::vcard::normalize::{PreparedEntry, PreparedProperty, prepare_card};
use crate::rfc::vcard::options::WriteOptions;
use crate::rfc::vcard::registry::ScribeRegistry;
use crate::rfc::vcard::scribe::WriteContext;
use crate::rfc::vcard::warning::{DocumentWarnings, PropertyWarnings, Written};

/// Writes cards as an xCard document with the built-in scribes.
///
/// ## Errors
/// Returns an error only if XML serialization fails.
#[tracing::instrument(skip(cards), fields(count = cards.len()))]
pub fn write_xml(cards: &[VCard]) -> RfcResult<Written> {
    let registry = ScribeRegistry::new();
    XCardWriter::new(&registry, WriteOptions::default()).write(cards)
}

/// xCard writer. Output is always version 4.0; the target version in the
/// options is ignored.
#[derive(Debug, Clone)]
pub struct XCardWriter<'r> {
    registry: &'r ScribeRegistry,
    options: WriteOptions,
}

impl<'r> XCardWriter<'r> {
    #[must_use]
    pub fn new(registry: &'r ScribeRegistry, options: WriteOptions) -> Self {
        Self { registry, options }
    }

    /// Writes every card into one `<vcards>` document.
    ///
    /// ## Errors
    /// Returns an error only if XML serialization fails.
    pub fn write(&self, cards: &[VCard]) -> RfcResult<Written> {
        let namespace = VCardVersion::V4_0.xml_namespace().unwrap_or_default();
        let mut root = XmlElement::new("vcards").with_attribute("xmlns", namespace);
        let mut warnings = Vec::with_capacity(cards.len());

        for card in cards {
            let (element, card_warnings) = self.write_card(card);
            root.push_element(element);
            warnings.push(card_warnings);
        }

        let output = write_document(&root, self.options.pretty)?;
        tracing::debug!(bytes = output.len(), "Wrote xCard document");
        Ok(Written { output, warnings })
    }

    /// ## Errors
    /// Returns [`RfcError::IoError`](crate::error::RfcError::IoError) if the
    /// sink fails.
    pub fn write_to(&self, cards: &[VCard], mut sink: impl io::Write) -> RfcResult<Vec<DocumentWarnings>> {
        let Written { output, warnings } = self.write(cards)?;
        sink.write_all(output.as_bytes())?;
        Ok(warnings)
    }

    /// Builds the `<vcard>` element for one card.
    #[must_use]
    pub fn write_card(&self, card: &VCard) -> (XmlElement, DocumentWarnings) {
        let version = VCardVersion::V4_0;
        let mut warnings = DocumentWarnings::new();
        let mut vcard = XmlElement::new("vcard");

        let properties: Vec<_> = card
            .properties
            .iter()
            .filter(|p| !p.name.eq_ignore_ascii_case(names::VERSION))
            .cloned()
            .collect();
        // Consecutive properties of one group share a <group> element.
        let mut open_group: Option<(String, XmlElement)> = None;
        for entry in prepare_card(&properties, self.registry, version, self.options.strict) {
            let item = match entry {
                PreparedEntry::Ready(item) => item,
                PreparedEntry::Dropped(dropped) => {
                    warnings.push_property(dropped);
                    continue;
                }
            };
            let group = item.property.group.clone();
            let (element, property_warnings) = self.write_property(item);
            warnings.push_property(property_warnings);
            let Some(element) = element else {
                continue;
            };

            let Some(group) = group else {
                if let Some((_, container)) = open_group.take() {
                    vcard.push_element(container);
                }
                vcard.push_element(element);
                continue;
            };
            if let Some((current, container)) = open_group.as_mut()
                && *current == group
            {
                container.push_element(element);
                continue;
            }
            if let Some((_, container)) = open_group.take() {
                vcard.push_element(container);
            }
            let mut container = XmlElement::new("group").with_attribute("name", group.as_str());
            container.push_element(element);
            open_group = Some((group, container));
        }
        if let Some((_, container)) = open_group {
            vcard.push_element(container);
        }

        (vcard, warnings)
    }

    fn write_property(&self, item: PreparedProperty<'_>) -> (Option<XmlElement>, PropertyWarnings) {
        let PreparedProperty {
            property,
            scribe,
            mut params,
            mut warnings,
        } = item;
        let mut ctx = WriteContext::new(VCardVersion::V4_0, self.options.strict);
        let mut element = XCardElement::new(&property.name);
        let result = scribe.write_xml(&property.value, &mut element, &mut ctx);
        warnings.append(&mut ctx.warnings);

        let element = match result {
            Ok(()) => {
                // The value element names the data type.
                params.remove("VALUE");
                let mut element = element.into_element();
                if let Some(parameters) = parameters_element(&params) {
                    element.insert_element(0, parameters);
                }
                Some(element)
            }
            Err(err) => {
                tracing::debug!(property = %property.name, error = %err, "Skipping property");
                warnings.push(err.to_string());
                None
            }
        };
        (element, PropertyWarnings::new(property.name.clone(), None, warnings))
    }
}

/// Builds `<parameters>`, or `None` when there is nothing to write.
fn parameters_element(params: &VCardParameters) -> Option<XmlElement> {
    let mut parameters = XmlElement::new(PARAMETERS);
    for param in params {
        let value_element = match param.name.as_str() {
            "PREF" => "integer",
            "GEO" => "uri",
            _ => "text",
        };
        let mut element = XmlElement::new(param.name.to_ascii_lowercase());
        for value in &param.values {
            element.push_element(XmlElement::with_text(value_element, value.as_str()));
        }
        parameters.push_element(element);
    }
    (!parameters.children.is_empty()).then_some(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::{Address, StructuredName, VCardProperty, VCardValue};
    use crate::rfc::vcard::xml::parse_xml;

    fn card() -> VCard {
        let mut card = VCard::new();
        card.add_property(VCardProperty::text(names::FN, "John Doe"));
        card.add_property(VCardProperty::new(
            names::N,
            StructuredName::simple("Doe", "John"),
        ));
        card.add_property(
            VCardProperty::telephone("555-0100")
                .with_param("TYPE", "work")
                .with_param("TYPE", "pref"),
        );
        card.add_property(VCardProperty::text(names::EMAIL, "a@example.com").with_group("item1"));
        card.add_property(VCardProperty::text("X-LABEL", "a@example.com").with_group("item1"));
        card
    }

    #[test]
    fn writes_namespace_and_properties() {
        let written = write_xml(&[card()]).unwrap();
        let xml = &written.output;
        assert!(xml.contains(r#"<vcards xmlns="urn:ietf:params:xml:ns:vcard-4.0">"#));
        assert!(xml.contains("<fn><text>John Doe</text></fn>"));
        assert!(xml.contains("<surname>Doe</surname><given>John</given>"));
        assert!(xml.contains(
            "<tel><parameters><type><text>work</text></type><pref><integer>1</integer></pref></parameters><text>555-0100</text></tel>"
        ));
        assert!(written.is_clean());
    }

    #[test]
    fn consecutive_group_members_share_an_element() {
        let xml = write_xml(&[card()]).unwrap().output;
        assert_eq!(xml.matches("<group name=\"item1\">").count(), 1);
        assert!(xml.contains(
            "<group name=\"item1\"><email><text>a@example.com</text></email><x-label><unknown>a@example.com</unknown></x-label></group>"
        ));
    }

    #[test]
    fn adr_writes_every_slot() {
        let mut card = VCard::new();
        card.add_property(VCardProperty::new(
            names::ADR,
            VCardValue::Address(Address {
                locality: vec!["Austin".into()],
                ..Address::default()
            }),
        ));
        let xml = write_xml(&[card]).unwrap().output;
        assert!(xml.contains("<pobox/><ext/><street/><locality>Austin</locality>"));
    }

    #[test]
    fn writes_then_reads_back() {
        let written = write_xml(&[card()]).unwrap();
        let parsed = parse_xml(&written.output).unwrap();
        let card = &parsed[0].card;
        assert_eq!(card.formatted_name(), Some("John Doe"));
        assert_eq!(card.get_property("TEL").unwrap().pref(), Some(1));
        assert_eq!(
            card.get_property("EMAIL").unwrap().group.as_deref(),
            Some("item1")
        );
    }

    #[test]
    fn pretty_output_is_indented() {
        let registry = ScribeRegistry::new();
        let written = XCardWriter::new(&registry, WriteOptions::default().pretty(true))
            .write(&[card()])
            .unwrap();
        assert!(written.output.contains("\n  <vcard>"));
    }

    #[test]
    fn strict_warnings_follow_card_order() {
        let mut card = VCard::new();
        card.add_property(VCardProperty::text(names::FN, "Jane"));
        card.add_property(VCardProperty::text(names::MAILER, "PigeonMail"));
        card.add_property(VCardProperty::text(names::NOTE, "hi"));

        let registry = ScribeRegistry::new();
        let written = XCardWriter::new(&registry, WriteOptions::default().strict(true))
            .write(&[card])
            .unwrap();
        assert!(!written.output.to_ascii_lowercase().contains("mailer"));
        let order: Vec<&str> = written.warnings[0]
            .properties
            .iter()
            .map(|p| p.property.as_str())
            .collect();
        assert_eq!(order, vec!["FN", "MAILER", "NOTE"]);
    }
}
