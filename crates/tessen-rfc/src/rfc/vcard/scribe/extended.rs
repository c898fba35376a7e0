//! Passthrough scribe for properties nothing else claims.

use super::{ParseContext, ScribeError, ScribeResult, VCardPropertyScribe, WriteContext};
use crate::rfc::vcard::core::{VCardDataType, VCardValue, VCardVersion};
use crate::rfc::vcard::html::HCardElement;
use crate::rfc::vcard::json::JCardValue;
use crate::rfc::vcard::text::escape::{escape_text, unescape_text};
use crate::rfc::vcard::xml::XCardElement;

/// Keeps the raw wire value of an unregistered property.
///
/// Never fails on parse. Values are stored as [`VCardValue::Extended`] with
/// escapes intact, so a text round trip is byte-for-byte.
#[derive(Debug, Clone)]
pub struct ExtendedScribe {
    name: String,
}

impl ExtendedScribe {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
        }
    }

    fn raw_of(&self, value: &VCardValue) -> ScribeResult<String> {
        match value {
            VCardValue::Extended(raw) => Ok(raw.clone()),
            VCardValue::Text(text) => Ok(escape_text(text)),
            VCardValue::Uri(uri) => Ok(uri.clone()),
            VCardValue::Integer(i) => Ok(i.to_string()),
            VCardValue::Float(f) => Ok(f.to_string()),
            VCardValue::Boolean(b) => Ok(b.to_string()),
            other => Err(ScribeError::mismatch(&self.name, other)),
        }
    }

    fn restore_value_param(data_type: Option<&VCardDataType>, ctx: &mut ParseContext) {
        if let Some(dt) = data_type {
            ctx.params.set_value_type(Some(dt));
        }
    }
}

impl VCardPropertyScribe for ExtendedScribe {
    fn property_name(&self) -> &str {
        &self.name
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        None
    }

    fn json_data_type(&self, _value: &VCardValue) -> Option<VCardDataType> {
        None
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        self.raw_of(value)
    }

    fn parse_text(
        &self,
        raw: &str,
        data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Self::restore_value_param(data_type, ctx);
        Ok(VCardValue::Extended(raw.to_string()))
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        element.append("unknown", unescape_text(&self.raw_of(value)?));
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, _ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        let text = element
            .first("unknown")
            .or_else(|| element.first_value().map(|(_, v)| v))
            .unwrap_or_else(|| element.text());
        Ok(VCardValue::Extended(escape_text(&text)))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(VCardValue::Extended(escape_text(&element.value())))
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        Ok(JCardValue::single(unescape_text(&self.raw_of(value)?)))
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        if let Some(dt) = data_type
            && dt.name() != "unknown"
        {
            Self::restore_value_param(Some(dt), ctx);
        }
        Ok(VCardValue::Extended(escape_text(&value.as_single())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::VCardParameters;

    #[test]
    fn raw_value_is_preserved() {
        let scribe = ExtendedScribe::new("x-custom");
        assert_eq!(scribe.property_name(), "X-CUSTOM");

        let mut ctx = ParseContext::new(VCardVersion::V3_0, VCardParameters::new());
        let value = scribe.parse_text("a\\,b;c", None, &mut ctx).unwrap();
        assert_eq!(value, VCardValue::Extended("a\\,b;c".into()));

        let mut write = WriteContext::new(VCardVersion::V3_0, false);
        assert_eq!(scribe.write_text(&value, &mut write).unwrap(), "a\\,b;c");
    }

    #[test]
    fn value_parameter_restored() {
        let scribe = ExtendedScribe::new("X-COUNT");
        let mut ctx = ParseContext::new(VCardVersion::V4_0, VCardParameters::new());
        scribe
            .parse_text("12", Some(&VCardDataType::Integer), &mut ctx)
            .unwrap();
        assert_eq!(ctx.params.value_type(), Some(VCardDataType::Integer));
    }

    #[test]
    fn text_values_are_escaped() {
        let scribe = ExtendedScribe::new("X-NOTE");
        let mut write = WriteContext::new(VCardVersion::V4_0, false);
        assert_eq!(
            scribe
                .write_text(&VCardValue::Text("a,b".into()), &mut write)
                .unwrap(),
            "a\\,b"
        );
    }
}
