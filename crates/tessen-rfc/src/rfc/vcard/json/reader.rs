//! jCard reader.

use std::io::Read;

use serde_json::Value;

use super::value::JCardValue;
use crate::error::{RfcError, RfcResult};
use crate::rfc::vcard::core::{
    VCard, VCardDataType, VCardParameter, VCardParameters, VCardProperty, VCardVersion, names,
};
use crate::rfc::vcard::registry::ScribeRegistry;
use crate::rfc::vcard::scribe::{ParseContext, version_list};
use crate::rfc::vcard::warning::{DocumentWarnings, ParsedVCard, PropertyWarnings};

const VCARD: &str = "vcard";
/// Parameter key holding the property group.
pub(super) const GROUP: &str = "group";

/// Parses a jCard document with the built-in scribes.
///
/// The document may be one `["vcard", [...]]` array or an array of them.
///
/// ## Errors
/// Returns [`RfcError::JsonError`] for malformed JSON and
/// [`RfcError::InvalidDocument`] when the JSON is not shaped like jCard.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_json(input: &str) -> RfcResult<Vec<ParsedVCard>> {
    let registry = ScribeRegistry::new();
    JCardReader::new(input, &registry)?.collect()
}

/// Pull reader over the cards of a jCard document.
#[derive(Debug)]
pub struct JCardReader<'r> {
    cards: std::vec::IntoIter<Value>,
    registry: &'r ScribeRegistry,
}

impl<'r> JCardReader<'r> {
    /// ## Errors
    /// Returns [`RfcError::JsonError`] for malformed JSON and
    /// [`RfcError::InvalidDocument`] when the top level is not a vcard array.
    pub fn new(input: &str, registry: &'r ScribeRegistry) -> RfcResult<Self> {
        let document: Value = serde_json::from_str(input)?;
        let cards = match document {
            Value::Array(items) if is_vcard(&items) => vec![Value::Array(items)],
            Value::Array(items) if items.iter().all(|i| i.as_array().is_some_and(|a| is_vcard(a))) => items,
            _ => {
                return Err(RfcError::InvalidDocument(
                    "expected a [\"vcard\", [...]] array or an array of them".to_string(),
                ));
            }
        };
        tracing::debug!(count = cards.len(), "Found jCard arrays");
        Ok(Self {
            cards: cards.into_iter(),
            registry,
        })
    }

    /// ## Errors
    /// Returns [`RfcError::IoError`] if the stream cannot be read, otherwise
    /// as [`JCardReader::new`].
    pub fn from_reader(mut reader: impl Read, registry: &'r ScribeRegistry) -> RfcResult<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::new(&input, registry)
    }

    fn parse_card(&self, card_array: &Value) -> ParsedVCard {
        let mut card = VCard::with_version(VCardVersion::V4_0);
        let mut warnings = DocumentWarnings::new();

        let properties = card_array
            .get(1)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if card_array.get(1).and_then(Value::as_array).is_none() {
            warnings.push_document("vcard array has no property list");
        }

        for (index, property) in properties.iter().enumerate() {
            match property.as_array() {
                Some(items) => self.parse_property(items, &mut card, &mut warnings),
                None => warnings.push_document(format!(
                    "property #{} is not an array and was skipped",
                    index + 1
                )),
            }
        }

        ParsedVCard { card, warnings }
    }

    /// Decodes `[name, {params}, type, value...]`.
    fn parse_property(&self, items: &[Value], card: &mut VCard, warnings: &mut DocumentWarnings) {
        let [name, params, data_type, values @ ..] = items else {
            warnings.push_document(format!(
                "property array needs a name, parameters and a data type; found {} items",
                items.len()
            ));
            return;
        };
        let (Some(name), Some(params), Some(data_type)) =
            (name.as_str(), params.as_object(), data_type.as_str())
        else {
            warnings.push_document("property array has the wrong item types and was skipped");
            return;
        };

        let name = name.to_ascii_uppercase();
        if name == names::VERSION {
            return;
        }

        let scribe = self.registry.resolve(&name);
        let mut messages = Vec::new();
        if !scribe.supported_versions().contains(&VCardVersion::V4_0) {
            messages.push(format!(
                "not supported by version 4.0; it is defined for {}",
                version_list(scribe.supported_versions())
            ));
        }

        let (group, params) = read_parameters(params);
        let data_type = VCardDataType::from_name(data_type);
        let mut ctx = ParseContext::new(VCardVersion::V4_0, params);
        let parsed = scribe.parse_json(
            &JCardValue::from_json_values(values),
            Some(&data_type),
            &mut ctx,
        );
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

impl Iterator for JCardReader<'_> {
    type Item = RfcResult<ParsedVCard>;

    fn next(&mut self) -> Option<Self::Item> {
        let card = self.cards.next()?;
        Some(Ok(self.parse_card(&card)))
    }
}

fn is_vcard(items: &[Value]) -> bool {
    items
        .first()
        .and_then(Value::as_str)
        .is_some_and(|s| s.eq_ignore_ascii_case(VCARD))
}

/// Splits the group out of a parameter object. Array values are
/// multi-valued parameters.
fn read_parameters(object: &serde_json::Map<String, Value>) -> (Option<String>, VCardParameters) {
    let mut group = None;
    let mut params = VCardParameters::new();
    for (key, value) in object {
        let values: Vec<String> = match value {
            Value::Array(items) => items.iter().map(scalar).collect(),
            other => vec![scalar(other)],
        };
        if key.eq_ignore_ascii_case(GROUP) {
            group = values.into_iter().next().filter(|g| !g.is_empty());
            continue;
        }
        params.push(VCardParameter::multi(key.to_ascii_uppercase(), values));
    }
    (group, params)
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::{Telephone, VCardValue};

    const DOC: &str = r#"["vcard", [
        ["version", {}, "text", "4.0"],
        ["fn", {}, "text", "John Doe"],
        ["n", {}, "text", ["Doe", "John", "", "", ""]],
        ["tel", {"type": ["work", "voice"], "pref": "1"}, "uri", "tel:+1-555-555-1234"],
        ["email", {"group": "item1"}, "text", "john@example.com"],
        ["categories", {}, "text", "friend", "coworker"],
        ["x-shoe-size", {}, "integer", 42],
        ["geo", {}, "uri", "not a geo uri"]
    ]]"#;

    #[test]
    fn parses_properties() {
        let parsed = parse_json(DOC).unwrap();
        assert_eq!(parsed.len(), 1);
        let card = &parsed[0].card;
        assert_eq!(card.version, VCardVersion::V4_0);
        assert_eq!(card.formatted_name(), Some("John Doe"));
        assert_eq!(card.name().unwrap().given, vec!["John"]);

        let tel = card.get_property("TEL").unwrap();
        assert!(tel.has_type("work"));
        assert_eq!(tel.pref(), Some(1));
        assert!(matches!(tel.value, VCardValue::Telephone(Telephone::Uri(_))));

        let email = card.get_property("EMAIL").unwrap();
        assert_eq!(email.group.as_deref(), Some("item1"));
        assert!(!email.params.contains("GROUP"));
    }

    #[test]
    fn extended_keeps_its_data_type() {
        let parsed = parse_json(DOC).unwrap();
        let shoe = parsed[0].card.get_property("X-SHOE-SIZE").unwrap();
        assert_eq!(shoe.value, VCardValue::Extended("42".to_string()));
        assert_eq!(shoe.params.value_type(), Some(VCardDataType::Integer));
    }

    #[test]
    fn bad_property_is_local() {
        let parsed = parse_json(DOC).unwrap();
        assert!(parsed[0].card.get_property("GEO").is_none());
        assert_eq!(parsed[0].warnings.for_property("GEO").count(), 1);

        let doc = r#"["vcard", [["fn", {}], ["fn", {}, "text", "A"]]]"#;
        let parsed = parse_json(doc).unwrap();
        assert_eq!(parsed[0].card.formatted_name(), Some("A"));
        assert_eq!(parsed[0].warnings.document.len(), 1);
    }

    #[test]
    fn array_of_cards() {
        let doc = r#"[["vcard", [["fn", {}, "text", "A"]]], ["vcard", [["fn", {}, "text", "B"]]]]"#;
        assert_eq!(parse_json(doc).unwrap().len(), 2);
    }

    #[test]
    fn wrong_shape_is_fatal() {
        assert!(matches!(
            parse_json(r#"{"vcard": []}"#),
            Err(RfcError::InvalidDocument(_))
        ));
        assert!(matches!(parse_json("[\"vcard\""), Err(RfcError::JsonError(_))));
    }
}
