//! vCard document type.

use super::property::{VCardProperty, names};
use super::structured::{Address, Organization, StructuredName, Telephone, VCardKind};
use super::value::VCardValue;
use super::version::VCardVersion;

/// A complete vCard: ordered properties plus one version.
///
/// VERSION, BEGIN and END are not stored as properties; the version lives in
/// [`VCard::version`] and the codecs write the envelope.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VCard {
    pub version: VCardVersion,
    /// All properties in order of appearance.
    pub properties: Vec<VCardProperty>,
}

impl VCard {
    /// Creates a new vCard 4.0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_version(version: VCardVersion) -> Self {
        Self {
            version,
            properties: Vec::new(),
        }
    }

    pub fn add_property(&mut self, prop: VCardProperty) {
        self.properties.push(prop);
    }

    /// Removes every property called `name`, returning how many were removed.
    pub fn remove_properties(&mut self, name: &str) -> usize {
        let before = self.properties.len();
        self.properties.retain(|p| !p.name.eq_ignore_ascii_case(name));
        before - self.properties.len()
    }

    /// Returns all properties with the given name.
    #[must_use]
    pub fn get_properties(&self, name: &str) -> Vec<&VCardProperty> {
        self.properties
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(name))
            .collect()
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&VCardProperty> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns the FN (formatted name) value.
    #[must_use]
    pub fn formatted_name(&self) -> Option<&str> {
        self.get_property(names::FN)?.as_text()
    }

    /// Returns the N (structured name) value.
    #[must_use]
    pub fn name(&self) -> Option<&StructuredName> {
        self.get_property(names::N)?.value.as_structured_name()
    }

    /// Returns the UID value, whether stored as text or URI.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        match &self.get_property(names::UID)?.value {
            VCardValue::Text(s) | VCardValue::Uri(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the KIND value.
    #[must_use]
    pub fn kind(&self) -> VCardKind {
        match self.get_property(names::KIND).map(|p| &p.value) {
            Some(VCardValue::Kind(kind)) => kind.clone(),
            Some(VCardValue::Text(s)) => VCardKind::from_str(s),
            _ => VCardKind::default(),
        }
    }

    #[must_use]
    pub fn emails(&self) -> Vec<&str> {
        self.get_properties(names::EMAIL)
            .iter()
            .filter_map(|p| p.as_text())
            .collect()
    }

    /// Returns all TEL values.
    #[must_use]
    pub fn telephones(&self) -> Vec<&Telephone> {
        self.get_properties(names::TEL)
            .iter()
            .filter_map(|p| p.value.as_telephone())
            .collect()
    }

    #[must_use]
    pub fn addresses(&self) -> Vec<&Address> {
        self.get_properties(names::ADR)
            .iter()
            .filter_map(|p| p.value.as_address())
            .collect()
    }

    #[must_use]
    pub fn organization(&self) -> Option<&Organization> {
        match &self.get_property(names::ORG)?.value {
            VCardValue::Organization(o) => Some(o),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.kind(), VCardKind::Group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vcard_new() {
        let card = VCard::new();
        assert_eq!(card.version, VCardVersion::V4_0);
        assert!(card.properties.is_empty());
    }

    #[test]
    fn lookups_are_case_insensitive() {
        let mut card = VCard::with_version(VCardVersion::V3_0);
        card.add_property(VCardProperty::text("fn", "Jane Doe"));
        card.add_property(VCardProperty::telephone("555-1234"));
        card.add_property(VCardProperty::telephone("555-9876"));
        assert_eq!(card.formatted_name(), Some("Jane Doe"));
        assert_eq!(card.telephones().len(), 2);
        assert_eq!(card.remove_properties("tel"), 2);
        assert!(card.telephones().is_empty());
    }

    #[test]
    fn kind_defaults_to_individual() {
        let mut card = VCard::new();
        assert_eq!(card.kind(), VCardKind::Individual);
        card.add_property(VCardProperty::new("KIND", VCardValue::Kind(VCardKind::Group)));
        assert!(card.is_group());
    }
}
