//! vCard property types.

use super::parameter::VCardParameters;
use super::structured::{Telephone, TelUri};
use super::value::VCardValue;

/// A vCard property.
#[derive(Debug, Clone, PartialEq)]
pub struct VCardProperty {
    /// Optional property group (e.g., "item1" in "item1.TEL").
    pub group: Option<String>,
    /// Property name (normalized to uppercase).
    pub name: String,
    /// Parameters in order of appearance.
    pub params: VCardParameters,
    pub value: VCardValue,
}

impl VCardProperty {
    /// Creates a property with any value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<VCardValue>) -> Self {
        Self {
            group: None,
            name: name.into().to_ascii_uppercase(),
            params: VCardParameters::new(),
            value: value.into(),
        }
    }

    /// Creates a property with a text value.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, VCardValue::Text(value.into()))
    }

    /// Creates a property with a URI value.
    #[must_use]
    pub fn uri(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, VCardValue::Uri(value.into()))
    }

    /// Creates a TEL property holding a plain text number.
    #[must_use]
    pub fn telephone(number: impl Into<String>) -> Self {
        Self::new(names::TEL, Telephone::Text(number.into()))
    }

    /// Creates a TEL property holding a `tel:` URI.
    #[must_use]
    pub fn tel_uri(uri: TelUri) -> Self {
        Self::new(names::TEL, Telephone::Uri(uri))
    }

    /// Creates a UID property with a random `urn:uuid:` value.
    #[must_use]
    pub fn random_uid() -> Self {
        Self::uri(names::UID, format!("urn:uuid:{}", uuid::Uuid::new_v4()))
    }

    /// Sets the group, builder style.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Adds a parameter value, builder style.
    #[must_use]
    pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.add(name, value);
        self
    }

    /// Returns whether the property has the specified TYPE value.
    #[must_use]
    pub fn has_type(&self, type_value: &str) -> bool {
        self.params.has_type(type_value)
    }

    #[must_use]
    pub fn pref(&self) -> Option<u32> {
        self.params.pref()
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_text()
    }

    pub fn add_type(&mut self, type_value: impl Into<String>) {
        self.params.add_type(type_value);
    }
}

/// Common property names.
pub mod names {
    // Identification
    pub const FN: &str = "FN";
    pub const N: &str = "N";
    pub const NICKNAME: &str = "NICKNAME";
    pub const PHOTO: &str = "PHOTO";
    pub const BDAY: &str = "BDAY";
    pub const ANNIVERSARY: &str = "ANNIVERSARY";
    pub const GENDER: &str = "GENDER";
    pub const BIRTHPLACE: &str = "BIRTHPLACE";
    pub const DEATHPLACE: &str = "DEATHPLACE";
    pub const DEATHDATE: &str = "DEATHDATE";

    // Delivery addressing
    pub const ADR: &str = "ADR";
    pub const LABEL: &str = "LABEL";

    // Communications
    pub const TEL: &str = "TEL";
    pub const EMAIL: &str = "EMAIL";
    pub const IMPP: &str = "IMPP";
    pub const LANG: &str = "LANG";
    pub const MAILER: &str = "MAILER";

    // Geographical
    pub const TZ: &str = "TZ";
    pub const GEO: &str = "GEO";

    // Organizational
    pub const TITLE: &str = "TITLE";
    pub const ROLE: &str = "ROLE";
    pub const LOGO: &str = "LOGO";
    pub const ORG: &str = "ORG";
    pub const MEMBER: &str = "MEMBER";
    pub const RELATED: &str = "RELATED";
    pub const ORG_DIRECTORY: &str = "ORG-DIRECTORY";

    // Personal
    pub const EXPERTISE: &str = "EXPERTISE";
    pub const HOBBY: &str = "HOBBY";
    pub const INTEREST: &str = "INTEREST";

    // Explanatory
    pub const CATEGORIES: &str = "CATEGORIES";
    pub const NOTE: &str = "NOTE";
    pub const PRODID: &str = "PRODID";
    pub const REV: &str = "REV";
    pub const SORT_STRING: &str = "SORT-STRING";
    pub const SOUND: &str = "SOUND";
    pub const UID: &str = "UID";
    pub const CLIENTPIDMAP: &str = "CLIENTPIDMAP";
    pub const URL: &str = "URL";

    // Security
    pub const CLASS: &str = "CLASS";
    pub const KEY: &str = "KEY";

    // Calendar
    pub const FBURL: &str = "FBURL";
    pub const CALADRURI: &str = "CALADRURI";
    pub const CALURI: &str = "CALURI";

    // General
    pub const BEGIN: &str = "BEGIN";
    pub const END: &str = "END";
    pub const VERSION: &str = "VERSION";
    pub const SOURCE: &str = "SOURCE";
    pub const NAME: &str = "NAME";
    pub const KIND: &str = "KIND";
    pub const XML: &str = "XML";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_uppercased() {
        let prop = VCardProperty::text("fn", "John");
        assert_eq!(prop.name, "FN");
        assert_eq!(prop.as_text(), Some("John"));
    }

    #[test]
    fn builder_helpers() {
        let prop = VCardProperty::telephone("555-1234")
            .with_group("item1")
            .with_param("type", "home");
        assert_eq!(prop.group.as_deref(), Some("item1"));
        assert!(prop.has_type("HOME"));
    }

    #[test]
    fn random_uid_is_urn() {
        let uid = VCardProperty::random_uid();
        let value = uid.value.as_uri().unwrap();
        assert!(value.starts_with("urn:uuid:"));
        assert_eq!(value.len(), "urn:uuid:".len() + 36);
    }
}
