//! Card validation against a target version.
//!
//! Validation is advisory: it reports what a writer would drop, downgrade or
//! complain about, and never changes the card.

use std::fmt;

use crate::rfc::vcard::core::{VCard, VCardVersion, names};
use crate::rfc::vcard::registry::ScribeRegistry;
use crate::rfc::vcard::scribe::version_list;
use crate::rfc::vcard::warning::PropertyWarnings;

/// Validation results for one card.
///
/// Unlike reader warnings, only properties with at least one message are
/// listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationWarnings {
    pub version: VCardVersion,
    /// Card-level problems, such as a missing required property.
    pub card: Vec<String>,
    pub properties: Vec<PropertyWarnings>,
}

impl ValidationWarnings {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.card.is_empty() && self.properties.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.card.len()
            + self
                .properties
                .iter()
                .map(|p| p.messages.len())
                .sum::<usize>()
    }

    /// Messages recorded for properties with the given name.
    pub fn for_property<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.properties
            .iter()
            .filter(move |p| p.property.eq_ignore_ascii_case(name))
            .flat_map(|p| p.messages.iter().map(String::as_str))
    }
}

impl fmt::Display for ValidationWarnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.card {
            writeln!(f, "{message}")?;
        }
        for property in &self.properties {
            writeln!(f, "{property}")?;
        }
        Ok(())
    }
}

/// Checks `card` for problems when written at `version`.
#[must_use]
#[tracing::instrument(skip(card, registry), fields(properties = card.properties.len()))]
pub fn validate(card: &VCard, registry: &ScribeRegistry, version: VCardVersion) -> ValidationWarnings {
    let mut warnings = ValidationWarnings {
        version,
        ..ValidationWarnings::default()
    };

    if matches!(version, VCardVersion::V3_0 | VCardVersion::V4_0)
        && card.get_property(names::FN).is_none()
    {
        warnings
            .card
            .push(format!("FN is required by version {}", version.as_str()));
    }
    if matches!(version, VCardVersion::V2_1 | VCardVersion::V3_0)
        && card.get_property(names::N).is_none()
    {
        warnings
            .card
            .push(format!("N is required by version {}", version.as_str()));
    }

    for property in &card.properties {
        let scribe = registry.resolve(&property.name);
        let mut messages = Vec::new();

        if !scribe.supported_versions().contains(&version) {
            messages.push(format!(
                "not supported by version {}; it is defined for {}",
                version.as_str(),
                version_list(scribe.supported_versions())
            ));
        }

        for type_value in property.params.types() {
            if let Some(known) = scribe
                .type_values()
                .iter()
                .find(|tv| tv.value.eq_ignore_ascii_case(type_value))
                && !known.supports(version)
            {
                messages.push(format!(
                    "TYPE={type_value} is not supported by version {}",
                    version.as_str()
                ));
            }
        }

        if version == VCardVersion::V4_0
            && let Some(value_type) = property.params.value_type()
            && scribe.default_data_type(version).is_some()
            && scribe.data_type(&property.value, version).as_ref() != Some(&value_type)
        {
            messages.push(format!(
                "VALUE={} does not match the value held by the property",
                value_type.name()
            ));
        }

        messages.extend(scribe.validate(&property.value, &property.params, version));

        if !messages.is_empty() {
            warnings
                .properties
                .push(PropertyWarnings::new(property.name.clone(), None, messages));
        }
    }

    tracing::debug!(count = warnings.len(), "Validation finished");
    warnings
}
