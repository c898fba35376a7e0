//! TZ scribe.
//!
//! A timezone carries an offset, a free text value (usually an IANA zone
//! name), or both. Which half is written and which VALUE is announced
//! depends on the version:
//!
//! | set      | 2.1                 | 3.0                   | 4.0                      |
//! |----------|---------------------|-----------------------|--------------------------|
//! | offset   | `-0500`             | `-05:00`              | `-0500`, VALUE=utc-offset |
//! | text     | zone offset or skip | text, VALUE=text      | text                     |
//! | both     | `-0500`             | `-05:00`              | text                     |

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};

use super::{ParseContext, ScribeError, ScribeResult, VCardPropertyScribe, WriteContext};
use crate::rfc::vcard::core::{
    Timezone, VCardDataType, VCardParameters, VCardUtcOffset, VCardValue, VCardVersion, names,
};
use crate::rfc::vcard::html::HCardElement;
use crate::rfc::vcard::json::JCardValue;
use crate::rfc::vcard::text::escape::{escape_text, unescape_text};
use crate::rfc::vcard::xml::XCardElement;

use VCardVersion::{V2_1, V3_0, V4_0};

#[derive(Debug, Clone, Copy, Default)]
pub struct TimezoneScribe;

impl TimezoneScribe {
    fn timezone_of(value: &VCardValue) -> ScribeResult<&Timezone> {
        value
            .as_timezone()
            .ok_or_else(|| ScribeError::mismatch(names::TZ, value))
    }

    /// Standard (non-DST) offset of an IANA zone as currently defined.
    ///
    /// Zones occasionally redefine their standard offset, so the answer is
    /// tied to the moment of writing; use [`Self::zone_offset_at`] for a
    /// reproducible result.
    #[must_use]
    pub fn zone_offset(name: &str) -> Option<VCardUtcOffset> {
        Self::zone_offset_at(name, Utc::now())
    }

    /// Standard (non-DST) offset of an IANA zone in force at `instant`.
    #[must_use]
    pub fn zone_offset_at(name: &str, instant: DateTime<Utc>) -> Option<VCardUtcOffset> {
        let tz = name.trim().parse::<Tz>().ok()?;
        let offset = tz.offset_from_utc_datetime(&instant.naive_utc());
        let minutes = i32::try_from(offset.base_utc_offset().num_minutes()).ok()?;
        Some(VCardUtcOffset::from_minutes(minutes))
    }

    fn offset_text(offset: VCardUtcOffset, version: VCardVersion) -> String {
        offset.format(version == V3_0)
    }

    fn empty() -> ScribeError {
        ScribeError::skip("TZ has neither an offset nor a text value")
    }
}

impl VCardPropertyScribe for TimezoneScribe {
    fn property_name(&self) -> &str {
        names::TZ
    }

    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType> {
        match version {
            V2_1 | V3_0 => Some(VCardDataType::UtcOffset),
            V4_0 => Some(VCardDataType::Text),
        }
    }

    fn data_type(&self, value: &VCardValue, version: VCardVersion) -> Option<VCardDataType> {
        let Some(tz) = value.as_timezone() else {
            return self.default_data_type(version);
        };
        match (tz.offset.is_some(), tz.text.is_some(), version) {
            (true, false, V4_0) => Some(VCardDataType::UtcOffset),
            (false, true, V3_0) | (_, true, V4_0) => Some(VCardDataType::Text),
            _ => self.default_data_type(version),
        }
    }

    fn json_data_type(&self, value: &VCardValue) -> Option<VCardDataType> {
        match value.as_timezone() {
            Some(tz) if tz.text.is_none() && tz.offset.is_some() => Some(VCardDataType::UtcOffset),
            _ => Some(VCardDataType::Text),
        }
    }

    fn write_text(&self, value: &VCardValue, ctx: &mut WriteContext) -> ScribeResult<String> {
        let tz = Self::timezone_of(value)?;
        match (tz.offset, tz.text.as_deref(), ctx.version) {
            (None, None, _) => Err(Self::empty()),
            (_, Some(text), V4_0) => Ok(escape_text(text)),
            (Some(offset), _, version) => Ok(Self::offset_text(offset, version)),
            (None, Some(text), V2_1) => Self::zone_offset(text)
                .map(|offset| Self::offset_text(offset, V2_1))
                .ok_or_else(|| {
                    ScribeError::skip(format!(
                        "version 2.1 requires a UTC offset and \"{text}\" is not a known timezone"
                    ))
                }),
            (None, Some(text), _) => Ok(escape_text(text)),
        }
    }

    fn parse_text(
        &self,
        raw: &str,
        data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let text = unescape_text(raw);
        let trimmed = text.trim();
        let offset = VCardUtcOffset::parse(trimmed);
        let wants_text = data_type == Some(&VCardDataType::Text);
        let wants_offset = data_type == Some(&VCardDataType::UtcOffset);

        let tz = match ctx.version {
            V2_1 => match offset {
                Some(offset) if !wants_text => Timezone::offset(offset),
                _ => {
                    return Err(ScribeError::unparseable(format!(
                        "could not parse UTC offset \"{trimmed}\""
                    )));
                }
            },
            V3_0 => match offset {
                _ if wants_text => Timezone::text(text),
                Some(offset) => Timezone::offset(offset),
                None => {
                    ctx.warn(format!(
                        "could not parse UTC offset \"{trimmed}\"; treating it as text"
                    ));
                    Timezone::text(text)
                }
            },
            V4_0 => match offset {
                _ if wants_text => Timezone::text(text),
                Some(offset) => Timezone::offset(offset),
                None if wants_offset => {
                    return Err(ScribeError::unparseable(format!(
                        "could not parse UTC offset \"{trimmed}\""
                    )));
                }
                None => Timezone::text(text),
            },
        };
        Ok(VCardValue::Timezone(tz))
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        let tz = Self::timezone_of(value)?;
        match (&tz.text, tz.offset) {
            (Some(text), _) => element.append(VCardDataType::Text.name(), text.as_str()),
            (None, Some(offset)) => {
                element.append(VCardDataType::UtcOffset.name(), offset.format(false));
            }
            (None, None) => return Err(Self::empty()),
        }
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, _ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        if let Some(text) = element.first(VCardDataType::Text.name()) {
            return Ok(VCardValue::Timezone(Timezone::text(text)));
        }
        let Some(offset) = element.first(VCardDataType::UtcOffset.name()) else {
            return Err(ScribeError::missing_xml_elements(&["text", "utc-offset"]));
        };
        VCardUtcOffset::parse(&offset)
            .map(|o| VCardValue::Timezone(Timezone::offset(o)))
            .ok_or_else(|| {
                ScribeError::unparseable(format!("could not parse UTC offset \"{offset}\""))
            })
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let value = element.value();
        match VCardUtcOffset::parse(&value) {
            Some(offset) => Ok(VCardValue::Timezone(Timezone::offset(offset))),
            None => {
                ctx.warn(format!(
                    "could not parse UTC offset \"{}\"; treating it as text",
                    value.trim()
                ));
                Ok(VCardValue::Timezone(Timezone::text(value)))
            }
        }
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        let tz = Self::timezone_of(value)?;
        match (&tz.text, tz.offset) {
            (Some(text), _) => Ok(JCardValue::single(text.as_str())),
            (None, Some(offset)) => Ok(JCardValue::single(offset.format(true))),
            (None, None) => Err(Self::empty()),
        }
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let text = value.as_single();
        let offset = VCardUtcOffset::parse(&text);
        match data_type {
            Some(VCardDataType::UtcOffset) => offset
                .map(|o| VCardValue::Timezone(Timezone::offset(o)))
                .ok_or_else(|| {
                    ScribeError::unparseable(format!("could not parse UTC offset \"{text}\""))
                }),
            Some(VCardDataType::Text) => Ok(VCardValue::Timezone(Timezone::text(text))),
            _ => Ok(VCardValue::Timezone(match offset {
                Some(o) => Timezone::offset(o),
                None => Timezone::text(text),
            })),
        }
    }

    fn validate(
        &self,
        value: &VCardValue,
        _params: &VCardParameters,
        version: VCardVersion,
    ) -> Vec<String> {
        let Some(tz) = value.as_timezone() else {
            return Vec::new();
        };
        let mut warnings = Vec::new();
        if tz.is_empty() {
            warnings.push("TZ has neither an offset nor a text value".to_string());
            if version == V2_1 {
                warnings.push("version 2.1 requires a UTC offset".to_string());
            }
        } else if version == V2_1 && tz.offset.is_none() {
            warnings.push(
                "text timezones are not supported by version 2.1; it will be converted to an offset if possible"
                    .to_string(),
            );
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset() -> VCardUtcOffset {
        VCardUtcOffset::new(-5, 0)
    }

    fn write(tz: Timezone, version: VCardVersion) -> ScribeResult<String> {
        let mut ctx = WriteContext::new(version, false);
        TimezoneScribe.write_text(&VCardValue::Timezone(tz), &mut ctx)
    }

    fn parse(raw: &str, dt: Option<VCardDataType>, version: VCardVersion) -> (ScribeResult<VCardValue>, usize) {
        let mut ctx = ParseContext::new(version, VCardParameters::new());
        let result = TimezoneScribe.parse_text(raw, dt.as_ref(), &mut ctx);
        (result, ctx.warnings.len())
    }

    #[test]
    fn write_offset_per_version() {
        assert_eq!(write(Timezone::offset(offset()), V2_1).unwrap(), "-0500");
        assert_eq!(write(Timezone::offset(offset()), V3_0).unwrap(), "-05:00");
        assert_eq!(write(Timezone::offset(offset()), V4_0).unwrap(), "-0500");
    }

    #[test]
    fn write_text_per_version() {
        let tz = || Timezone::text("America/New_York");
        assert_eq!(write(tz(), V2_1).unwrap(), "-0500");
        assert_eq!(write(tz(), V3_0).unwrap(), "America/New_York");
        assert_eq!(write(tz(), V4_0).unwrap(), "America/New_York");
    }

    #[test]
    fn unknown_zone_text_skipped_at_v21() {
        let err = write(Timezone::text("Somewhere/Else"), V2_1).unwrap_err();
        assert!(matches!(err, ScribeError::Skip(_)));
    }

    #[test]
    fn write_both_per_version() {
        let tz = || Timezone::both(offset(), "America/New_York");
        assert_eq!(write(tz(), V2_1).unwrap(), "-0500");
        assert_eq!(write(tz(), V3_0).unwrap(), "-05:00");
        assert_eq!(write(tz(), V4_0).unwrap(), "America/New_York");
    }

    #[test]
    fn write_empty_is_skip() {
        for version in VCardVersion::ALL {
            assert!(matches!(
                write(Timezone::default(), *version),
                Err(ScribeError::Skip(_))
            ));
        }
    }

    #[test]
    fn data_types_per_version() {
        let only_offset = VCardValue::Timezone(Timezone::offset(offset()));
        let only_text = VCardValue::Timezone(Timezone::text("EST"));
        let both = VCardValue::Timezone(Timezone::both(offset(), "EST"));
        let s = TimezoneScribe;

        assert_eq!(s.data_type(&only_offset, V4_0), Some(VCardDataType::UtcOffset));
        assert_eq!(s.data_type(&only_offset, V3_0), s.default_data_type(V3_0));
        assert_eq!(s.data_type(&only_text, V3_0), Some(VCardDataType::Text));
        assert_eq!(s.data_type(&only_text, V4_0), s.default_data_type(V4_0));
        assert_eq!(s.data_type(&both, V4_0), s.default_data_type(V4_0));
        assert_eq!(s.data_type(&both, V2_1), s.default_data_type(V2_1));
    }

    #[test]
    fn parse_v21() {
        let (ok, _) = parse("-05:00", None, V2_1);
        assert_eq!(ok.unwrap(), VCardValue::Timezone(Timezone::offset(offset())));

        let (bad, _) = parse("EST", None, V2_1);
        assert!(matches!(bad, Err(ScribeError::Unparseable(_))));

        let (text, _) = parse("-05:00", Some(VCardDataType::Text), V2_1);
        assert!(matches!(text, Err(ScribeError::Unparseable(_))));
    }

    #[test]
    fn parse_v30_falls_back_to_text() {
        let (value, warnings) = parse("EST", None, V3_0);
        assert_eq!(value.unwrap(), VCardValue::Timezone(Timezone::text("EST")));
        assert_eq!(warnings, 1);

        let (value, warnings) = parse("-0500", None, V3_0);
        assert_eq!(value.unwrap(), VCardValue::Timezone(Timezone::offset(offset())));
        assert_eq!(warnings, 0);
    }

    #[test]
    fn parse_v40() {
        let (value, warnings) = parse("America/New_York", None, V4_0);
        assert_eq!(
            value.unwrap(),
            VCardValue::Timezone(Timezone::text("America/New_York"))
        );
        assert_eq!(warnings, 0);

        let (value, _) = parse("-0500", None, V4_0);
        assert_eq!(value.unwrap(), VCardValue::Timezone(Timezone::offset(offset())));

        let (bad, _) = parse("EST", Some(VCardDataType::UtcOffset), V4_0);
        assert!(matches!(bad, Err(ScribeError::Unparseable(_))));
    }

    #[test]
    fn validate_counts() {
        let empty = VCardValue::Timezone(Timezone::default());
        let params = VCardParameters::new();
        assert_eq!(TimezoneScribe.validate(&empty, &params, V2_1).len(), 2);
        assert_eq!(TimezoneScribe.validate(&empty, &params, V3_0).len(), 1);
        assert_eq!(TimezoneScribe.validate(&empty, &params, V4_0).len(), 1);

        let text = VCardValue::Timezone(Timezone::text("EST"));
        assert_eq!(TimezoneScribe.validate(&text, &params, V2_1).len(), 1);
        assert!(TimezoneScribe.validate(&text, &params, V4_0).is_empty());
    }

    #[test]
    fn zone_offset_follows_the_reference_instant() {
        let in_2010 = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
        let in_2020 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            TimezoneScribe::zone_offset_at("America/Caracas", in_2010),
            Some(VCardUtcOffset::from_minutes(-270))
        );
        assert_eq!(
            TimezoneScribe::zone_offset_at("America/Caracas", in_2020),
            Some(VCardUtcOffset::from_minutes(-240))
        );
        let july = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(
            TimezoneScribe::zone_offset_at("America/New_York", july),
            Some(VCardUtcOffset::new(-5, 0))
        );
    }

    #[test]
    fn zone_offset_uses_standard_time() {
        assert_eq!(
            TimezoneScribe::zone_offset("America/New_York"),
            Some(VCardUtcOffset::new(-5, 0))
        );
        assert_eq!(TimezoneScribe::zone_offset("Nowhere/Special"), None);
    }
}
