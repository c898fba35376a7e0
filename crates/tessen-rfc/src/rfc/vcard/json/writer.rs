//! jCard writer.

use std::io;

use serde_json::{Map, Value, json};

use super::reader::GROUP;
use crate::error::RfcResult;
use crate::rfc::vcard::core::{VCard, VCardParameters, VCardVersion, names};
use crate::rfc::vcard::normalize::{PreparedEntry, PreparedProperty, prepare_card};
use crate::rfc::vcard::options::WriteOptions;
use crate::rfc::vcard::registry::ScribeRegistry;
use crate::rfc::vcard::scribe::WriteContext;
use crate::rfc::vcard::warning::{DocumentWarnings, PropertyWarnings, Written};

/// Data type reported when neither the scribe nor VALUE names one.
const UNKNOWN: &str = "unknown";

/// Writes cards as jCard with the built-in scribes.
///
/// ## Errors
/// Returns [`RfcError::JsonError`](crate::error::RfcError::JsonError) if
/// serialization fails.
#[tracing::instrument(skip(cards), fields(count = cards.len()))]
pub fn write_json(cards: &[VCard]) -> RfcResult<Written> {
    let registry = ScribeRegistry::new();
    JCardWriter::new(&registry, WriteOptions::default()).write(cards)
}

/// jCard writer. Output is always version 4.0.
///
/// One card is written as a bare `["vcard", [...]]` array; several cards as
/// an array of those.
#[derive(Debug, Clone)]
pub struct JCardWriter<'r> {
    registry: &'r ScribeRegistry,
    options: WriteOptions,
}

impl<'r> JCardWriter<'r> {
    #[must_use]
    pub fn new(registry: &'r ScribeRegistry, options: WriteOptions) -> Self {
        Self { registry, options }
    }

    /// ## Errors
    /// Returns [`RfcError::JsonError`](crate::error::RfcError::JsonError) if
    /// serialization fails.
    pub fn write(&self, cards: &[VCard]) -> RfcResult<Written> {
        let mut arrays = Vec::with_capacity(cards.len());
        let mut warnings = Vec::with_capacity(cards.len());
        for card in cards {
            let (array, card_warnings) = self.write_card(card);
            arrays.push(array);
            warnings.push(card_warnings);
        }

        let document = match <[Value; 1]>::try_from(arrays) {
            Ok([single]) => single,
            Err(arrays) => Value::Array(arrays),
        };
        let output = if self.options.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        tracing::debug!(bytes = output.len(), "Wrote jCard document");
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

    /// Builds the `["vcard", [...]]` array for one card.
    #[must_use]
    pub fn write_card(&self, card: &VCard) -> (Value, DocumentWarnings) {
        let mut warnings = DocumentWarnings::new();
        let mut properties = vec![json!([
            names::VERSION.to_ascii_lowercase(),
            {},
            "text",
            VCardVersion::V4_0.as_str()
        ])];

        let source: Vec<_> = card
            .properties
            .iter()
            .filter(|p| !p.name.eq_ignore_ascii_case(names::VERSION))
            .cloned()
            .collect();
        for entry in prepare_card(&source, self.registry, VCardVersion::V4_0, self.options.strict) {
            let item = match entry {
                PreparedEntry::Ready(item) => item,
                PreparedEntry::Dropped(dropped) => {
                    warnings.push_property(dropped);
                    continue;
                }
            };
            let (array, property_warnings) = self.write_property(item);
            warnings.push_property(property_warnings);
            if let Some(array) = array {
                properties.push(array);
            }
        }

        (json!(["vcard", properties]), warnings)
    }

    fn write_property(&self, item: PreparedProperty<'_>) -> (Option<Value>, PropertyWarnings) {
        let PreparedProperty {
            property,
            scribe,
            mut params,
            mut warnings,
        } = item;
        let mut ctx = WriteContext::new(VCardVersion::V4_0, self.options.strict);
        let result = scribe.write_json(&property.value, &mut ctx);
        warnings.append(&mut ctx.warnings);

        let array = match result {
            Ok(value) => {
                let data_type = scribe
                    .json_data_type(&property.value)
                    .or_else(|| params.value_type())
                    .map_or_else(|| UNKNOWN.to_string(), |dt| dt.name_for(VCardVersion::V4_0));
                // The data type is positional in jCard.
                params.remove("VALUE");

                let mut items = vec![
                    Value::from(property.name.to_ascii_lowercase()),
                    Value::Object(parameters_object(property.group.as_deref(), &params)),
                    Value::from(data_type),
                ];
                items.extend(value.to_json_values());
                Some(Value::Array(items))
            }
            Err(err) => {
                tracing::debug!(property = %property.name, error = %err, "Skipping property");
                warnings.push(err.to_string());
                None
            }
        };
        (array, PropertyWarnings::new(property.name.clone(), None, warnings))
    }
}

/// Lowercase keys; one value as a string, several as an array. Repeated
/// parameters are merged.
fn parameters_object(group: Option<&str>, params: &VCardParameters) -> Map<String, Value> {
    let mut merged: Vec<(String, Vec<&str>)> = Vec::new();
    for param in params {
        let key = param.name.to_ascii_lowercase();
        let values = param.values.iter().map(String::as_str);
        match merged.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.extend(values),
            None => merged.push((key, values.collect())),
        }
    }

    let mut object = Map::new();
    if let Some(group) = group {
        object.insert(GROUP.to_string(), Value::from(group));
    }
    for (key, values) in merged {
        let value = match values.as_slice() {
            [single] => Value::from(*single),
            many => Value::Array(many.iter().map(|v| Value::from(*v)).collect()),
        };
        object.insert(key, value);
    }
    object
}
