//! TEL scribe.

use super::{ParseContext, ScribeError, ScribeResult, TypeValue, VCardPropertyScribe, WriteContext};
use crate::rfc::vcard::core::{
    TelUri, Telephone, VCardDataType, VCardParameters, VCardValue, VCardVersion, names, types,
};
use crate::rfc::vcard::html::HCardElement;
use crate::rfc::vcard::json::JCardValue;
use crate::rfc::vcard::text::escape::{escape_text, unescape_text};
use crate::rfc::vcard::xml::XCardElement;

use VCardVersion::V4_0;

const TEL_TYPES: &[TypeValue] = &[
    TypeValue::new(types::HOME, VCardVersion::ALL),
    TypeValue::new(types::WORK, VCardVersion::ALL),
    TypeValue::new(types::VOICE, VCardVersion::ALL),
    TypeValue::new(types::FAX, VCardVersion::ALL),
    TypeValue::new(types::CELL, VCardVersion::ALL),
    TypeValue::new(types::VIDEO, VCardVersion::ALL),
    TypeValue::new(types::PAGER, VCardVersion::ALL),
    TypeValue::new(types::TEXT, VCardVersion::V4_ONLY),
    TypeValue::new(types::TEXTPHONE, VCardVersion::V4_ONLY),
    TypeValue::new(types::MSG, VCardVersion::LEGACY),
    TypeValue::new(types::BBS, VCardVersion::LEGACY),
    TypeValue::new(types::MODEM, VCardVersion::LEGACY),
    TypeValue::new(types::CAR, VCardVersion::LEGACY),
    TypeValue::new(types::ISDN, VCardVersion::LEGACY),
    TypeValue::new(types::PCS, VCardVersion::LEGACY),
    TypeValue::new(types::PREF, VCardVersion::LEGACY),
];

/// TEL: free text everywhere, `tel:` URIs at 4.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct TelephoneScribe;

impl TelephoneScribe {
    fn telephone_of(value: &VCardValue) -> ScribeResult<&Telephone> {
        value
            .as_telephone()
            .ok_or_else(|| ScribeError::mismatch(names::TEL, value))
    }

    /// Text form used when a URI cannot be written, e.g. `+1-555-1234 x101`.
    fn downgraded(uri: &TelUri, ctx: &mut WriteContext) -> String {
        ctx.warn(format!(
            "tel URIs are not supported by version {}; writing \"{}\" as text",
            ctx.version.as_str(),
            uri.to_text()
        ));
        uri.to_text()
    }

    fn from_uri_text(uri: &str, ctx: &mut ParseContext) -> VCardValue {
        match TelUri::parse(uri) {
            Some(tel) => VCardValue::Telephone(Telephone::Uri(tel)),
            None => {
                ctx.warn(format!("could not parse tel URI \"{uri}\"; treating it as text"));
                VCardValue::Telephone(Telephone::Text(uri.to_string()))
            }
        }
    }
}

impl VCardPropertyScribe for TelephoneScribe {
    fn property_name(&self) -> &str {
        names::TEL
    }

    fn type_values(&self) -> &[TypeValue] {
        TEL_TYPES
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn data_type(&self, value: &VCardValue, version: VCardVersion) -> Option<VCardDataType> {
        match value {
            VCardValue::Telephone(Telephone::Uri(_)) if version == V4_0 => {
                Some(VCardDataType::Uri)
            }
            _ => Some(VCardDataType::Text),
        }
    }

    fn write_text(&self, value: &VCardValue, ctx: &mut WriteContext) -> ScribeResult<String> {
        match Self::telephone_of(value)? {
            Telephone::Text(number) => Ok(escape_text(number)),
            Telephone::Uri(uri) if ctx.version == V4_0 => Ok(uri.to_uri()),
            Telephone::Uri(uri) => Ok(escape_text(&Self::downgraded(uri, ctx))),
        }
    }

    fn parse_text(
        &self,
        raw: &str,
        data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let text = unescape_text(raw);
        let uri_hint = data_type == Some(&VCardDataType::Uri)
            || (data_type.is_none()
                && ctx.version == V4_0
                && text.get(..4).is_some_and(|s| s.eq_ignore_ascii_case("tel:")));
        if uri_hint {
            return Ok(Self::from_uri_text(text.trim(), ctx));
        }
        Ok(VCardValue::Telephone(Telephone::Text(text)))
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        match Self::telephone_of(value)? {
            Telephone::Text(number) => element.append(VCardDataType::Text.name(), number.as_str()),
            Telephone::Uri(uri) => element.append(VCardDataType::Uri.name(), uri.to_uri()),
        }
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        if let Some(uri) = element.first(VCardDataType::Uri.name()) {
            return Ok(Self::from_uri_text(uri.trim(), ctx));
        }
        element
            .first(VCardDataType::Text.name())
            .map(|text| VCardValue::Telephone(Telephone::Text(text)))
            .ok_or_else(|| ScribeError::missing_xml_elements(&["text", "uri"]))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        for type_value in element.types() {
            ctx.params.add_type(type_value);
        }
        if let Some(href) = element.attr("href")
            && let Some(tel) = TelUri::parse(href)
        {
            return Ok(VCardValue::Telephone(Telephone::Uri(tel)));
        }
        Ok(VCardValue::Telephone(Telephone::Text(element.value())))
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        Ok(match Self::telephone_of(value)? {
            Telephone::Text(number) => JCardValue::single(number.as_str()),
            Telephone::Uri(uri) => JCardValue::single(uri.to_uri()),
        })
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let text = value.as_single();
        if data_type == Some(&VCardDataType::Uri) {
            return Ok(Self::from_uri_text(text.trim(), ctx));
        }
        Ok(VCardValue::Telephone(Telephone::Text(text)))
    }

    fn validate(
        &self,
        value: &VCardValue,
        _params: &VCardParameters,
        version: VCardVersion,
    ) -> Vec<String> {
        match value.as_telephone() {
            Some(Telephone::Text(number)) if number.trim().is_empty() => {
                vec!["TEL has neither a number nor a URI".to_string()]
            }
            Some(Telephone::Uri(_)) if version != V4_0 => vec![format!(
                "tel URIs are not supported by version {}; the number will be written as text",
                version.as_str()
            )],
            _ => Vec::new(),
        }
    }
}
