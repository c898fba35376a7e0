//! Text-or-URI scribe (RELATED, BIRTHPLACE, DEATHPLACE).

use super::{ParseContext, ScribeError, ScribeResult, TypeValue, VCardPropertyScribe, WriteContext};
use crate::rfc::vcard::core::{
    TextOrUri, VCardDataType, VCardParameters, VCardValue, VCardVersion, names, types,
};
use crate::rfc::vcard::html::HCardElement;
use crate::rfc::vcard::json::JCardValue;
use crate::rfc::vcard::text::escape::{escape_text, unescape_text};
use crate::rfc::vcard::xml::XCardElement;

const RELATED_TYPES: &[TypeValue] = &[
    TypeValue::new(types::CONTACT, VCardVersion::V4_ONLY),
    TypeValue::new(types::ACQUAINTANCE, VCardVersion::V4_ONLY),
    TypeValue::new(types::FRIEND, VCardVersion::V4_ONLY),
    TypeValue::new(types::MET, VCardVersion::V4_ONLY),
    TypeValue::new(types::CO_WORKER, VCardVersion::V4_ONLY),
    TypeValue::new(types::COLLEAGUE, VCardVersion::V4_ONLY),
    TypeValue::new(types::CO_RESIDENT, VCardVersion::V4_ONLY),
    TypeValue::new(types::NEIGHBOR, VCardVersion::V4_ONLY),
    TypeValue::new(types::CHILD, VCardVersion::V4_ONLY),
    TypeValue::new(types::PARENT, VCardVersion::V4_ONLY),
    TypeValue::new(types::SIBLING, VCardVersion::V4_ONLY),
    TypeValue::new(types::SPOUSE, VCardVersion::V4_ONLY),
    TypeValue::new(types::KIN, VCardVersion::V4_ONLY),
    TypeValue::new(types::MUSE, VCardVersion::V4_ONLY),
    TypeValue::new(types::CRUSH, VCardVersion::V4_ONLY),
    TypeValue::new(types::DATE, VCardVersion::V4_ONLY),
    TypeValue::new(types::SWEETHEART, VCardVersion::V4_ONLY),
    TypeValue::new(types::ME, VCardVersion::V4_ONLY),
    TypeValue::new(types::AGENT, VCardVersion::V4_ONLY),
    TypeValue::new(types::EMERGENCY, VCardVersion::V4_ONLY),
];

/// Properties whose value is free text or a URI, chosen by VALUE.
#[derive(Debug, Clone)]
pub struct TextOrUriScribe {
    name: &'static str,
    default: VCardDataType,
    types: &'static [TypeValue],
}

impl TextOrUriScribe {
    #[must_use]
    pub const fn related() -> Self {
        Self {
            name: names::RELATED,
            default: VCardDataType::Uri,
            types: RELATED_TYPES,
        }
    }

    #[must_use]
    pub const fn birthplace() -> Self {
        Self {
            name: names::BIRTHPLACE,
            default: VCardDataType::Text,
            types: &[],
        }
    }

    #[must_use]
    pub const fn deathplace() -> Self {
        Self {
            name: names::DEATHPLACE,
            default: VCardDataType::Text,
            types: &[],
        }
    }

    fn value_of<'v>(&self, value: &'v VCardValue) -> ScribeResult<&'v TextOrUri> {
        match value {
            VCardValue::TextOrUri(v) if v.as_str().trim().is_empty() => Err(ScribeError::skip(
                format!("{} has neither text nor a URI", self.name),
            )),
            VCardValue::TextOrUri(v) => Ok(v),
            other => Err(ScribeError::mismatch(self.name, other)),
        }
    }

    fn build(&self, text: String, data_type: Option<&VCardDataType>) -> VCardValue {
        let as_uri = match data_type {
            Some(VCardDataType::Uri) => true,
            Some(VCardDataType::Text) => false,
            _ => self.default == VCardDataType::Uri,
        };
        VCardValue::TextOrUri(if as_uri {
            TextOrUri::Uri(text)
        } else {
            TextOrUri::Text(text)
        })
    }
}

impl VCardPropertyScribe for TextOrUriScribe {
    fn property_name(&self) -> &str {
        self.name
    }

    fn supported_versions(&self) -> &[VCardVersion] {
        VCardVersion::V4_ONLY
    }

    fn type_values(&self) -> &[TypeValue] {
        self.types
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(self.default.clone())
    }

    fn data_type(&self, value: &VCardValue, version: VCardVersion) -> Option<VCardDataType> {
        match value {
            VCardValue::TextOrUri(TextOrUri::Text(_)) => Some(VCardDataType::Text),
            VCardValue::TextOrUri(TextOrUri::Uri(_)) => Some(VCardDataType::Uri),
            _ => self.default_data_type(version),
        }
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        Ok(match self.value_of(value)? {
            TextOrUri::Text(text) => escape_text(text),
            TextOrUri::Uri(uri) => uri.clone(),
        })
    }

    fn parse_text(
        &self,
        raw: &str,
        data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let text = if self.default == VCardDataType::Uri && data_type != Some(&VCardDataType::Text)
        {
            raw.to_string()
        } else {
            unescape_text(raw)
        };
        Ok(self.build(text, data_type))
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        match self.value_of(value)? {
            TextOrUri::Text(text) => element.append(VCardDataType::Text.name(), text.as_str()),
            TextOrUri::Uri(uri) => element.append(VCardDataType::Uri.name(), uri.as_str()),
        }
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, _ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        if let Some(uri) = element.first(VCardDataType::Uri.name()) {
            return Ok(VCardValue::TextOrUri(TextOrUri::Uri(uri)));
        }
        element
            .first(VCardDataType::Text.name())
            .map(|text| VCardValue::TextOrUri(TextOrUri::Text(text)))
            .ok_or_else(|| ScribeError::missing_xml_elements(&["text", "uri"]))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(VCardValue::TextOrUri(match element.link_value() {
            Some(link) => TextOrUri::Uri(link),
            None => TextOrUri::Text(element.value()),
        }))
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        Ok(JCardValue::single(self.value_of(value)?.as_str()))
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(self.build(value.as_single(), data_type))
    }

    fn validate(
        &self,
        value: &VCardValue,
        _params: &VCardParameters,
        _version: VCardVersion,
    ) -> Vec<String> {
        match value {
            VCardValue::TextOrUri(v) if v.as_str().trim().is_empty() => {
                vec![format!("{} has neither text nor a URI", self.name)]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_defaults_to_uri() {
        let scribe = TextOrUriScribe::related();
        let mut ctx = ParseContext::new(VCardVersion::V4_0, VCardParameters::new());
        let value = scribe
            .parse_text("urn:uuid:03a0e51f-d1aa-4385-8a53-e29025acd8af", None, &mut ctx)
            .unwrap();
        assert!(matches!(value, VCardValue::TextOrUri(TextOrUri::Uri(_))));

        let text = scribe
            .parse_text("Please contact my assistant\\, Jane", Some(&VCardDataType::Text), &mut ctx)
            .unwrap();
        assert_eq!(
            text,
            VCardValue::TextOrUri(TextOrUri::Text("Please contact my assistant, Jane".into()))
        );
        assert_eq!(scribe.data_type(&text, VCardVersion::V4_0), Some(VCardDataType::Text));
    }

    #[test]
    fn birthplace_defaults_to_text() {
        let scribe = TextOrUriScribe::birthplace();
        let mut ctx = ParseContext::new(VCardVersion::V4_0, VCardParameters::new());
        let value = scribe.parse_text("Maida Vale\\, London", None, &mut ctx).unwrap();
        assert_eq!(
            value,
            VCardValue::TextOrUri(TextOrUri::Text("Maida Vale, London".into()))
        );
        let mut write = WriteContext::new(VCardVersion::V4_0, false);
        assert_eq!(scribe.write_text(&value, &mut write).unwrap(), "Maida Vale\\, London");
    }

    #[test]
    fn empty_is_skipped() {
        let scribe = TextOrUriScribe::deathplace();
        let mut ctx = WriteContext::new(VCardVersion::V4_0, false);
        let err = scribe
            .write_text(&VCardValue::TextOrUri(TextOrUri::Text(String::new())), &mut ctx)
            .unwrap_err();
        assert!(matches!(err, ScribeError::Skip(_)));
    }
}
