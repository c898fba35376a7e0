//! GEO scribe.

use super::{ParseContext, ScribeError, ScribeResult, VCardPropertyScribe, WriteContext};
use crate::rfc::vcard::core::{Geo, VCardDataType, VCardValue, VCardVersion, names};
use crate::rfc::vcard::html::HCardElement;
use crate::rfc::vcard::json::JCardValue;
use crate::rfc::vcard::text::escape::unescape_text;
use crate::rfc::vcard::xml::XCardElement;

/// GEO: `lat;long` below 4.0, a `geo:` URI at 4.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoScribe;

impl GeoScribe {
    fn geo_of(value: &VCardValue) -> ScribeResult<&Geo> {
        value
            .as_geo()
            .ok_or_else(|| ScribeError::mismatch(names::GEO, value))
    }

    fn parse_any(text: &str) -> ScribeResult<VCardValue> {
        let text = text.trim();
        Geo::parse_uri(text)
            .or_else(|| Geo::parse_pair(text))
            .map(VCardValue::Geo)
            .ok_or_else(|| ScribeError::unparseable(format!("could not parse GEO value \"{text}\"")))
    }

    fn coordinate(value: Option<String>, which: &str) -> ScribeResult<f64> {
        let value = value.ok_or_else(|| ScribeError::unparseable(format!("{which} missing")))?;
        value
            .trim()
            .parse()
            .map_err(|_| ScribeError::unparseable(format!("could not parse {which} \"{value}\"")))
    }
}

impl VCardPropertyScribe for GeoScribe {
    fn property_name(&self) -> &str {
        names::GEO
    }

    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType> {
        match version {
            VCardVersion::V4_0 => Some(VCardDataType::Uri),
            VCardVersion::V2_1 | VCardVersion::V3_0 => Some(VCardDataType::Float),
        }
    }

    fn write_text(&self, value: &VCardValue, ctx: &mut WriteContext) -> ScribeResult<String> {
        let geo = Self::geo_of(value)?;
        Ok(match ctx.version {
            VCardVersion::V4_0 => geo.to_uri(),
            VCardVersion::V2_1 | VCardVersion::V3_0 => geo.to_pair(),
        })
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Self::parse_any(&unescape_text(raw))
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        element.append(VCardDataType::Uri.name(), Self::geo_of(value)?.to_uri());
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, _ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        element
            .first(VCardDataType::Uri.name())
            .ok_or_else(|| ScribeError::missing_xml_elements(&["uri"]))
            .and_then(|uri| Self::parse_any(&uri))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let latitude = element.first_value("latitude");
        let longitude = element.first_value("longitude");
        if latitude.is_none() && longitude.is_none() {
            return Self::parse_any(&element.value());
        }
        let latitude = Self::coordinate(latitude, "latitude")?;
        let longitude = Self::coordinate(longitude, "longitude")?;
        Geo::checked(latitude, longitude)
            .map(VCardValue::Geo)
            .ok_or_else(|| {
                ScribeError::unparseable(format!(
                    "coordinates {latitude},{longitude} are out of range"
                ))
            })
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        Ok(JCardValue::single(Self::geo_of(value)?.to_uri()))
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Self::parse_any(&value.as_single())
    }
}
