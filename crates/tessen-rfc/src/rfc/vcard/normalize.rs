//! Version-aware parameter normalization.
//!
//! Before a property is written, its parameters are copied and adjusted for
//! the target version. The stored card is never mutated.
//!
//! ## Rules
//!
//! 1. VALUE is written only when the value's data type differs from the
//!    scribe's default for the version.
//! 2. At 4.0 `TYPE=pref` becomes `PREF=1`. Below 4.0 PREF does not exist:
//!    among properties of the same name that carry a PREF, the lowest one
//!    (first on ties) gets `TYPE=pref` and PREF is stripped from all of them.
//! 3. The scribe's own hook runs first (e.g. ADR drops LABEL below 4.0).
//! 4. TYPE values the scribe defines for other versions only produce a
//!    warning; strict mode also drops them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::rfc::vcard::core::{VCardParameters, VCardProperty, VCardVersion, types};
use crate::rfc::vcard::registry::ScribeRegistry;
use crate::rfc::vcard::scribe::{VCardPropertyScribe, version_list};
use crate::rfc::vcard::warning::PropertyWarnings;

/// The PREF winner per property name, computed once per card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefElection {
    winners: HashMap<String, usize>,
}

impl PrefElection {
    /// Elects, for each property name, the index of the property with the
    /// lowest PREF. Properties without PREF do not take part.
    #[must_use]
    pub fn new(properties: &[VCardProperty]) -> Self {
        let mut best: HashMap<String, (u32, usize)> = HashMap::new();
        for (index, property) in properties.iter().enumerate() {
            let Some(pref) = property.params.pref() else {
                continue;
            };
            let name = property.name.to_ascii_uppercase();
            match best.get(&name) {
                Some((current, _)) if *current <= pref => {}
                _ => {
                    best.insert(name, (pref, index));
                }
            }
        }
        Self {
            winners: best
                .into_iter()
                .map(|(name, (_, index))| (name, index))
                .collect(),
        }
    }

    /// Returns whether the property at `index` named `name` won.
    #[must_use]
    pub fn is_winner(&self, name: &str, index: usize) -> bool {
        self.winners.get(&name.to_ascii_uppercase()) == Some(&index)
    }
}

/// Parameters ready to be written, with the warnings raised preparing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedParameters {
    pub params: VCardParameters,
    pub warnings: Vec<String>,
}

/// Computes the parameters to write for `property`, the `index`-th property
/// of its card.
#[must_use]
pub fn prepare_parameters(
    property: &VCardProperty,
    index: usize,
    scribe: &dyn VCardPropertyScribe,
    version: VCardVersion,
    strict: bool,
    election: &PrefElection,
) -> PreparedParameters {
    let mut params = property.params.clone();
    let mut warnings = Vec::new();

    scribe.prepare_parameters(&property.value, &mut params, version);

    // VALUE
    if let Some(data_type) = scribe.data_type(&property.value, version) {
        if scribe.default_data_type(version).as_ref() == Some(&data_type) {
            params.remove("VALUE");
        } else {
            params.put("VALUE", data_type.name_for(version));
        }
    }

    // TYPE=pref / PREF
    match version {
        VCardVersion::V4_0 => {
            if params.remove_type(types::PREF) && params.pref().is_none() {
                params.set_pref(Some(1));
            }
        }
        VCardVersion::V2_1 | VCardVersion::V3_0 => {
            if params.remove("PREF") && election.is_winner(&property.name, index) {
                params.add_type(types::PREF);
            }
        }
    }

    // TYPE values defined for other versions
    let type_values = scribe.type_values();
    if !type_values.is_empty() {
        let unsupported: Vec<String> = params
            .types()
            .into_iter()
            .filter_map(|value| {
                type_values
                    .iter()
                    .find(|tv| tv.value.eq_ignore_ascii_case(value))
                    .filter(|tv| !tv.supports(version))
                    .map(|tv| (value.to_string(), tv.versions))
            })
            .map(|(value, versions)| {
                warnings.push(format!(
                    "TYPE={value} is not supported by version {}; it is defined for {}",
                    version.as_str(),
                    version_list(versions)
                ));
                value
            })
            .collect();
        if strict {
            for value in unsupported {
                params.remove_type(&value);
            }
        }
    }

    PreparedParameters { params, warnings }
}

/// A property resolved against a registry and ready for a writer.
#[derive(Debug)]
pub struct PreparedProperty<'a> {
    pub property: &'a VCardProperty,
    pub scribe: Arc<dyn VCardPropertyScribe>,
    pub params: VCardParameters,
    pub warnings: Vec<String>,
}

/// One entry per source property, in card order.
#[derive(Debug)]
pub enum PreparedEntry<'a> {
    Ready(PreparedProperty<'a>),
    /// Left out by strict mode; only its warnings remain.
    Dropped(PropertyWarnings),
}

/// Resolves every property of a card and prepares its parameters.
///
/// Properties the target version does not define are kept with a warning,
/// or dropped with a warning in strict mode. The result has one entry per
/// property in the order given, so writers report warnings in card order.
#[must_use]
pub fn prepare_card<'a>(
    properties: &'a [VCardProperty],
    registry: &ScribeRegistry,
    version: VCardVersion,
    strict: bool,
) -> Vec<PreparedEntry<'a>> {
    let election = PrefElection::new(properties);
    let mut prepared = Vec::with_capacity(properties.len());

    for (index, property) in properties.iter().enumerate() {
        let scribe = registry.resolve(&property.name);
        let mut warnings = Vec::new();
        if !scribe.supported_versions().contains(&version) {
            warnings.push(format!(
                "{} is not supported by version {}; it is defined for {}",
                property.name,
                version.as_str(),
                version_list(scribe.supported_versions())
            ));
            if strict {
                tracing::debug!(property = %property.name, "Dropping unsupported property");
                prepared.push(PreparedEntry::Dropped(PropertyWarnings::new(
                    property.name.clone(),
                    None,
                    warnings,
                )));
                continue;
            }
        }
        let parameters =
            prepare_parameters(property, index, scribe.as_ref(), version, strict, &election);
        warnings.extend(parameters.warnings);
        prepared.push(PreparedEntry::Ready(PreparedProperty {
            property,
            scribe,
            params: parameters.params,
            warnings,
        }));
    }

    prepared
}
