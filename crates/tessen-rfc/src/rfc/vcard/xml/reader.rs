//! xCard reader.

use std::io::Read;

use super::dom::{Dialect, XmlElement, parse_document};
use super::element::{PARAMETERS, XCardElement};
use crate::error::RfcResult;
use crate::rfc::vcard::core::{VCard, VCardParameter, VCardParameters, VCardProperty, VCardVersion, names};
use crate::rfc::vcard::registry::ScribeRegistry;
use crate::rfc::vcard::scribe::{ParseContext, version_list};
use crate::rfc::vcard::warning::{DocumentWarnings, ParsedVCard, PropertyWarnings};

const VCARD: &str = "vcard";
const GROUP: &str = "group";

fn xcard_namespace() -> &'static str {
    VCardVersion::V4_0.xml_namespace().unwrap_or_default()
}

/// Parses every `<vcard>` element of an xCard document with the built-in
/// scribes.
///
/// ## Errors
/// Returns [`RfcError::XmlError`](crate::error::RfcError::XmlError) if the
/// document is not well-formed XML.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_xml(input: &str) -> RfcResult<Vec<ParsedVCard>> {
    let registry = ScribeRegistry::new();
    XCardReader::new(input, &registry)?.collect()
}

/// Pull reader over the `<vcard>` elements of an xCard document.
///
/// The document is parsed up front; each card is decoded on demand. xCard only
/// exists for version 4.0, so only `<vcard>` elements in the
/// `urn:ietf:params:xml:ns:vcard-4.0` namespace are read.
#[derive(Debug)]
pub struct XCardReader<'r> {
    cards: std::vec::IntoIter<XmlElement>,
    registry: &'r ScribeRegistry,
}

impl<'r> XCardReader<'r> {
    /// ## Errors
    /// Returns [`RfcError::XmlError`](crate::error::RfcError::XmlError) for
    /// malformed XML.
    pub fn new(input: &str, registry: &'r ScribeRegistry) -> RfcResult<Self> {
        let root = parse_document(input, Dialect::Xml)?;
        let cards: Vec<XmlElement> = root
            .descendants()
            .into_iter()
            .filter(|e| e.name == VCARD && e.in_namespace(xcard_namespace()))
            .cloned()
            .collect();
        tracing::debug!(count = cards.len(), "Found xCard elements");
        Ok(Self {
            cards: cards.into_iter(),
            registry,
        })
    }

    /// ## Errors
    /// Returns [`RfcError::IoError`](crate::error::RfcError::IoError) if the
    /// stream cannot be read, or an XML error for malformed input.
    pub fn from_reader(mut reader: impl Read, registry: &'r ScribeRegistry) -> RfcResult<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::new(&input, registry)
    }

    fn parse_card(&self, element: &XmlElement) -> ParsedVCard {
        let mut card = VCard::with_version(VCardVersion::V4_0);
        let mut warnings = DocumentWarnings::new();

        for child in element.elements() {
            if !child.in_namespace(xcard_namespace()) {
                tracing::trace!(element = %child.name, namespace = ?child.namespace, "Ignoring foreign element");
                continue;
            }
            if child.name == GROUP {
                let group = child.attr("name").map(str::to_string);
                if group.is_none() {
                    warnings.push_document("<group> element without a name attribute");
                }
                for property in child
                    .elements()
                    .filter(|e| e.in_namespace(xcard_namespace()))
                {
                    self.parse_property(property, group.clone(), &mut card, &mut warnings);
                }
            } else {
                self.parse_property(child, None, &mut card, &mut warnings);
            }
        }

        ParsedVCard { card, warnings }
    }

    fn parse_property(
        &self,
        element: &XmlElement,
        group: Option<String>,
        card: &mut VCard,
        warnings: &mut DocumentWarnings,
    ) {
        let name = element.name.to_ascii_uppercase();
        if name == names::VERSION {
            return;
        }

        let scribe = self.registry.resolve_xml(&element.name);
        let mut messages = Vec::new();
        if !scribe.supported_versions().contains(&VCardVersion::V4_0) {
            messages.push(format!(
                "not supported by version 4.0; it is defined for {}",
                version_list(scribe.supported_versions())
            ));
        }

        let params = element
            .child(PARAMETERS)
            .map(read_parameters)
            .unwrap_or_default();
        let mut ctx = ParseContext::new(VCardVersion::V4_0, params);
        let parsed = scribe.parse_xml(&XCardElement::from_element(element.clone()), &mut ctx);
        messages.append(&mut ctx.warnings);

        match parsed {
            Ok(value) => card.add_property(VCardProperty {
                group,
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

impl Iterator for XCardReader<'_> {
    type Item = RfcResult<ParsedVCard>;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.cards.next()?;
        Some(Ok(self.parse_card(&element)))
    }
}

/// Reads `<parameters>`: each child is a parameter whose value elements
/// (`<text>`, `<integer>`, `<uri>`) carry its values.
fn read_parameters(element: &XmlElement) -> VCardParameters {
    element
        .elements()
        .map(|param| {
            let values: Vec<String> = if param.elements().next().is_some() {
                param.elements().map(XmlElement::text).collect()
            } else {
                vec![param.text()]
            };
            VCardParameter::multi(param.name.to_ascii_uppercase(), values)
        })
        .collect()
}
