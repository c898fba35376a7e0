//! Binary resource scribe (PHOTO, LOGO, SOUND, KEY).
//!
//! Inline data travels as base64 in 2.1 (`ENCODING=BASE64`) and 3.0
//! (`ENCODING=b`), with the media subtype in TYPE. 4.0 embeds it in a `data:`
//! URI; linked resources carry MEDIATYPE instead.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::{ParseContext, ScribeError, ScribeResult, VCardPropertyScribe, WriteContext};
use crate::rfc::vcard::core::{
    BinaryValue, VCardDataType, VCardParameters, VCardValue, VCardVersion, names,
};
use crate::rfc::vcard::html::HCardElement;
use crate::rfc::vcard::json::JCardValue;
use crate::rfc::vcard::text::escape::unescape_text;
use crate::rfc::vcard::xml::XCardElement;

use VCardVersion::{V2_1, V3_0, V4_0};

/// What kind of resource a binary property holds; picks media type guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaKind {
    Image,
    Audio,
    Key,
}

impl MediaKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Key => "application",
        }
    }
}

/// Known TYPE subtypes and their media types.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("JPEG", "image/jpeg"),
    ("GIF", "image/gif"),
    ("PNG", "image/png"),
    ("BMP", "image/bmp"),
    ("TIFF", "image/tiff"),
    ("WAVE", "audio/wav"),
    ("MP3", "audio/mpeg"),
    ("OGG", "audio/ogg"),
    ("AIFF", "audio/aiff"),
    ("PGP", "application/pgp-keys"),
    ("X509", "application/x-x509-ca-cert"),
];

#[derive(Debug, Clone)]
pub struct BinaryScribe {
    name: &'static str,
    kind: MediaKind,
}

impl BinaryScribe {
    #[must_use]
    pub const fn photo() -> Self {
        Self {
            name: names::PHOTO,
            kind: MediaKind::Image,
        }
    }

    #[must_use]
    pub const fn logo() -> Self {
        Self {
            name: names::LOGO,
            kind: MediaKind::Image,
        }
    }

    #[must_use]
    pub const fn sound() -> Self {
        Self {
            name: names::SOUND,
            kind: MediaKind::Audio,
        }
    }

    #[must_use]
    pub const fn key() -> Self {
        Self {
            name: names::KEY,
            kind: MediaKind::Key,
        }
    }

    fn binary_of<'v>(&self, value: &'v VCardValue) -> ScribeResult<&'v BinaryValue> {
        match value {
            VCardValue::Binary(binary) => Ok(binary),
            other => Err(ScribeError::mismatch(self.name, other)),
        }
    }

    /// Maps a TYPE subtype (`JPEG`) to a media type (`image/jpeg`).
    fn media_type_for(&self, type_value: &str) -> String {
        let upper = type_value.trim().to_ascii_uppercase();
        if upper.contains('/') {
            return upper.to_ascii_lowercase();
        }
        MEDIA_TYPES
            .iter()
            .find(|(subtype, _)| *subtype == upper)
            .map_or_else(
                || format!("{}/{}", self.kind.prefix(), upper.to_ascii_lowercase()),
                |(_, media)| (*media).to_string(),
            )
    }

    /// Maps a media type back to the TYPE subtype written below 4.0.
    fn subtype_for(media_type: &str) -> String {
        MEDIA_TYPES
            .iter()
            .find(|(_, media)| media.eq_ignore_ascii_case(media_type))
            .map_or_else(
                || {
                    media_type
                        .rsplit('/')
                        .next()
                        .unwrap_or(media_type)
                        .to_ascii_uppercase()
                },
                |(subtype, _)| (*subtype).to_string(),
            )
    }

    fn data_uri(data: &[u8], media_type: Option<&str>) -> String {
        format!(
            "data:{};base64,{}",
            media_type.unwrap_or("application/octet-stream"),
            STANDARD.encode(data)
        )
    }

    fn parse_data_uri(uri: &str) -> Option<BinaryValue> {
        let rest = uri.strip_prefix("data:")?;
        let (meta, payload) = rest.split_once(',')?;
        let media = meta.strip_suffix(";base64")?;
        let data = decode_base64(payload).ok()?;
        Some(BinaryValue::Inline {
            data,
            media_type: (!media.is_empty()).then(|| media.to_ascii_lowercase()),
        })
    }

    /// Reads a URI or `data:` URI, taking the media type from MEDIATYPE.
    fn from_uri(uri: &str, ctx: &mut ParseContext) -> BinaryValue {
        let uri = uri.trim();
        if let Some(inline) = Self::parse_data_uri(uri) {
            return inline;
        }
        let media_type = ctx.params.media_type().map(str::to_string);
        ctx.params.remove("MEDIATYPE");
        BinaryValue::Uri {
            uri: uri.to_string(),
            media_type,
        }
    }

    fn take_type_media(&self, ctx: &mut ParseContext) -> Option<String> {
        let subtype = ctx.params.types().into_iter().next()?.to_string();
        ctx.params.remove_type(&subtype);
        Some(self.media_type_for(&subtype))
    }
}

fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact)
}

impl VCardPropertyScribe for BinaryScribe {
    fn property_name(&self) -> &str {
        self.name
    }

    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType> {
        match version {
            V2_1 | V3_0 => Some(VCardDataType::Binary),
            V4_0 => Some(VCardDataType::Uri),
        }
    }

    fn data_type(&self, value: &VCardValue, version: VCardVersion) -> Option<VCardDataType> {
        match (value, version) {
            (VCardValue::Binary(BinaryValue::Uri { .. }), V2_1 | V3_0) => Some(VCardDataType::Uri),
            _ => self.default_data_type(version),
        }
    }

    fn prepare_parameters(
        &self,
        value: &VCardValue,
        params: &mut VCardParameters,
        version: VCardVersion,
    ) {
        let VCardValue::Binary(binary) = value else {
            return;
        };
        match (binary, version) {
            (BinaryValue::Inline { media_type, .. }, V2_1 | V3_0) => {
                params.set_encoding(if version == V2_1 { "BASE64" } else { "b" });
                params.remove("MEDIATYPE");
                if let Some(media) = media_type {
                    params.add_type(Self::subtype_for(media));
                }
            }
            (BinaryValue::Inline { .. }, V4_0) => {
                params.remove("ENCODING");
                params.remove("MEDIATYPE");
            }
            (BinaryValue::Uri { media_type, .. }, V2_1 | V3_0) => {
                params.remove("MEDIATYPE");
                if let Some(media) = media_type {
                    params.add_type(Self::subtype_for(media));
                }
            }
            (BinaryValue::Uri { media_type, .. }, V4_0) => {
                params.remove("ENCODING");
                params.remove("MEDIATYPE");
                if let Some(media) = media_type {
                    params.set_media_type(media.as_str());
                }
            }
        }
    }

    fn write_text(&self, value: &VCardValue, ctx: &mut WriteContext) -> ScribeResult<String> {
        Ok(match (self.binary_of(value)?, ctx.version) {
            (BinaryValue::Inline { data, .. }, V2_1 | V3_0) => STANDARD.encode(data),
            (BinaryValue::Inline { data, media_type }, V4_0) => {
                Self::data_uri(data, media_type.as_deref())
            }
            (BinaryValue::Uri { uri, .. }, _) => uri.clone(),
        })
    }

    fn parse_text(
        &self,
        raw: &str,
        data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let encoded = ctx
            .params
            .encoding()
            .is_some_and(|e| e.eq_ignore_ascii_case("b") || e.eq_ignore_ascii_case("base64"));
        if encoded || data_type == Some(&VCardDataType::Binary) {
            let data = decode_base64(raw).map_err(|e| {
                ScribeError::unparseable(format!("invalid base64 {} data: {e}", self.name))
            })?;
            ctx.params.remove("ENCODING");
            let media_type = self.take_type_media(ctx);
            return Ok(VCardValue::Binary(BinaryValue::Inline { data, media_type }));
        }
        let uri = unescape_text(raw);
        let mut binary = Self::from_uri(&uri, ctx);
        if let BinaryValue::Uri { media_type, .. } = &mut binary
            && media_type.is_none()
            && ctx.version != V4_0
        {
            *media_type = self.take_type_media(ctx);
        }
        Ok(VCardValue::Binary(binary))
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        let uri = match self.binary_of(value)? {
            BinaryValue::Inline { data, media_type } => Self::data_uri(data, media_type.as_deref()),
            BinaryValue::Uri { uri, .. } => uri.clone(),
        };
        element.append(VCardDataType::Uri.name(), uri);
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        element
            .first(VCardDataType::Uri.name())
            .map(|uri| VCardValue::Binary(Self::from_uri(&uri, ctx)))
            .ok_or_else(|| ScribeError::missing_xml_elements(&["uri"]))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let link = element.link_value().ok_or_else(|| {
            ScribeError::unparseable(format!("{} element has no src, href or data", self.name))
        })?;
        if let Some(media) = element.attr("type") {
            ctx.params.set_media_type(media);
        }
        Ok(VCardValue::Binary(Self::from_uri(&link, ctx)))
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        Ok(JCardValue::single(match self.binary_of(value)? {
            BinaryValue::Inline { data, media_type } => Self::data_uri(data, media_type.as_deref()),
            BinaryValue::Uri { uri, .. } => uri.clone(),
        }))
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(VCardValue::Binary(Self::from_uri(&value.as_single(), ctx)))
    }

    fn validate(
        &self,
        value: &VCardValue,
        _params: &VCardParameters,
        _version: VCardVersion,
    ) -> Vec<String> {
        match value {
            VCardValue::Binary(BinaryValue::Uri { uri, .. }) if uri.trim().is_empty() => {
                vec![format!("{} has an empty URL", self.name)]
            }
            VCardValue::Binary(BinaryValue::Inline { data, .. }) if data.is_empty() => {
                vec![format!("{} has no data", self.name)]
            }
            _ => Vec::new(),
        }
    }
}
