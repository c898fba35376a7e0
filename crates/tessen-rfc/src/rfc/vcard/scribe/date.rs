//! Date and timestamp scribes (BDAY, ANNIVERSARY, DEATHDATE, REV).

use super::{ParseContext, ScribeError, ScribeResult, VCardPropertyScribe, WriteContext};
use crate::rfc::vcard::core::{
    DateAndOrTime, Timestamp, VCardDataType, VCardParameters, VCardValue, VCardVersion, names,
};
use crate::rfc::vcard::html::HCardElement;
use crate::rfc::vcard::json::JCardValue;
use crate::rfc::vcard::text::escape::{escape_text, unescape_text};
use crate::rfc::vcard::xml::XCardElement;

use VCardVersion::V4_0;

/// Date-and-or-time properties.
///
/// Partial dates, time-only values and free text exist only in 4.0; writing
/// one at 2.1 or 3.0 skips the property.
#[derive(Debug, Clone)]
pub struct DateOrTimeScribe {
    name: &'static str,
    versions: &'static [VCardVersion],
}

impl DateOrTimeScribe {
    #[must_use]
    pub const fn new(name: &'static str, versions: &'static [VCardVersion]) -> Self {
        Self { name, versions }
    }

    #[must_use]
    pub const fn birthday() -> Self {
        Self::new(names::BDAY, VCardVersion::ALL)
    }

    #[must_use]
    pub const fn anniversary() -> Self {
        Self::new(names::ANNIVERSARY, VCardVersion::V4_ONLY)
    }

    #[must_use]
    pub const fn deathdate() -> Self {
        Self::new(names::DEATHDATE, VCardVersion::V4_ONLY)
    }

    fn date_of<'v>(&self, value: &'v VCardValue) -> ScribeResult<&'v DateAndOrTime> {
        value
            .as_date_and_or_time()
            .ok_or_else(|| ScribeError::mismatch(self.name, value))
    }

    /// xCard child element name for a value.
    fn element_name(value: &DateAndOrTime) -> &'static str {
        match value {
            DateAndOrTime::Date(_) => "date",
            DateAndOrTime::DateTime { .. } => "date-time",
            DateAndOrTime::Time { .. } => "time",
            DateAndOrTime::Text(_) => "text",
        }
    }

    fn parse_date(&self, text: &str) -> ScribeResult<VCardValue> {
        DateAndOrTime::parse(text)
            .map(VCardValue::DateAndOrTime)
            .ok_or_else(|| {
                ScribeError::unparseable(format!(
                    "could not parse {} date \"{}\"",
                    self.name,
                    text.trim()
                ))
            })
    }
}

impl VCardPropertyScribe for DateOrTimeScribe {
    fn property_name(&self) -> &str {
        self.name
    }

    fn supported_versions(&self) -> &[VCardVersion] {
        self.versions
    }

    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType> {
        match version {
            V4_0 => Some(VCardDataType::DateAndOrTime),
            _ => Some(VCardDataType::Date),
        }
    }

    fn data_type(&self, value: &VCardValue, version: VCardVersion) -> Option<VCardDataType> {
        let Some(date) = value.as_date_and_or_time() else {
            return self.default_data_type(version);
        };
        match (date, version) {
            (DateAndOrTime::Text(_), _) => Some(VCardDataType::Text),
            (_, V4_0) => Some(VCardDataType::DateAndOrTime),
            (d, _) if d.has_time() => Some(VCardDataType::DateTime),
            _ => Some(VCardDataType::Date),
        }
    }

    fn json_data_type(&self, value: &VCardValue) -> Option<VCardDataType> {
        Some(match value.as_date_and_or_time() {
            Some(DateAndOrTime::Text(_)) => VCardDataType::Text,
            Some(DateAndOrTime::DateTime { .. }) => VCardDataType::DateTime,
            Some(DateAndOrTime::Time { .. }) => VCardDataType::Time,
            Some(DateAndOrTime::Date(_)) => VCardDataType::Date,
            None => VCardDataType::DateAndOrTime,
        })
    }

    fn write_text(&self, value: &VCardValue, ctx: &mut WriteContext) -> ScribeResult<String> {
        let date = self.date_of(value)?;
        if ctx.version != V4_0 && date.is_partial() {
            let what = if date.is_text() { "text" } else { "partial" };
            return Err(ScribeError::skip(format!(
                "{what} {} values are not supported by version {}",
                self.name,
                ctx.version.as_str()
            )));
        }
        Ok(match date {
            DateAndOrTime::Text(text) => escape_text(text),
            other => other.format(false),
        })
    }

    fn parse_text(
        &self,
        raw: &str,
        data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let text = unescape_text(raw);
        if data_type == Some(&VCardDataType::Text) {
            return Ok(VCardValue::DateAndOrTime(DateAndOrTime::text(text)));
        }
        self.parse_date(&text)
    }

    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        _ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        let date = self.date_of(value)?;
        element.append(Self::element_name(date), date.format(false));
        Ok(())
    }

    fn parse_xml(&self, element: &XCardElement, _ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        if let Some(text) = element.first("text") {
            return Ok(VCardValue::DateAndOrTime(DateAndOrTime::text(text)));
        }
        ["date-and-or-time", "date-time", "date", "time"]
            .iter()
            .find_map(|name| element.first(name))
            .ok_or_else(|| {
                ScribeError::missing_xml_elements(&[
                    "date",
                    "date-time",
                    "time",
                    "date-and-or-time",
                    "text",
                ])
            })
            .and_then(|text| self.parse_date(&text))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let raw = element
            .attr("datetime")
            .map(str::to_string)
            .unwrap_or_else(|| element.value());
        match DateAndOrTime::parse(&raw) {
            Some(date) => Ok(VCardValue::DateAndOrTime(date)),
            None => {
                ctx.warn(format!(
                    "could not parse {} date \"{}\"; treating it as text",
                    self.name,
                    raw.trim()
                ));
                Ok(VCardValue::DateAndOrTime(DateAndOrTime::text(raw.trim())))
            }
        }
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        Ok(JCardValue::single(self.date_of(value)?.format(true)))
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let text = value.as_single();
        if data_type == Some(&VCardDataType::Text) {
            return Ok(VCardValue::DateAndOrTime(DateAndOrTime::text(text)));
        }
        self.parse_date(&text)
    }

    fn validate(
        &self,
        value: &VCardValue,
        _params: &VCardParameters,
        version: VCardVersion,
    ) -> Vec<String> {
        match value.as_date_and_or_time() {
            Some(date) if version != V4_0 && date.is_partial() => vec![format!(
                "{} value \"{}\" requires version 4.0",
                self.name,
                date.format(true)
            )],
            _ => Vec::new(),
        }
    }
}

/// REV.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampScribe;

impl TimestampScribe {
    fn timestamp_of(value: &VCardValue) -> ScribeResult<&Timestamp> {
        match value {
            VCardValue::Timestamp(ts) => Ok(ts),
            other => Err(ScribeError::mismatch(names::REV, other)),
        }
    }

    fn parse_timestamp(text: &str) -> ScribeResult<VCardValue> {
        Timestamp::parse(text)
            .map(VCardValue::Timestamp)
            .ok_or_else(|| {
                ScribeError::unparseable(format!("could not parse REV timestamp \"{}\"", text.trim()))
            })
    }
}

impl VCardPropertyScribe for TimestampScribe {
    fn property_name(&self) -> &str {
        names::REV
    }

    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType> {
        match version {
            V4_0 => Some(VCardDataType::Timestamp),
            _ => Some(VCardDataType::DateTime),
        }
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        Ok(Self::timestamp_of(value)?.format(false))
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Self::parse_timestamp(&unescape_text(raw))
    }

    fn parse_xml(&self, element: &XCardElement, _ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        element
            .first("timestamp")
            .or_else(|| element.first_value().map(|(_, v)| v))
            .ok_or_else(|| ScribeError::missing_xml_elements(&["timestamp"]))
            .and_then(|text| Self::parse_timestamp(&text))
    }

    fn parse_html(
        &self,
        element: &HCardElement<'_>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        let raw = element
            .attr("datetime")
            .map(str::to_string)
            .unwrap_or_else(|| element.value());
        Self::parse_timestamp(&raw)
    }

    fn write_json(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        Ok(JCardValue::single(Self::timestamp_of(value)?.format(true)))
    }

    fn parse_json(
        &self,
        value: &JCardValue,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Self::parse_timestamp(&value.as_single())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::core::VCardDate;

    fn write(value: &VCardValue, version: VCardVersion) -> ScribeResult<String> {
        let mut ctx = WriteContext::new(version, false);
        DateOrTimeScribe::birthday().write_text(value, &mut ctx)
    }

    #[test]
    fn full_date_basic_everywhere() {
        let value = VCardValue::DateAndOrTime(DateAndOrTime::full_date(1980, 3, 22).unwrap());
        for version in VCardVersion::ALL {
            assert_eq!(write(&value, *version).unwrap(), "19800322");
        }
    }

    #[test]
    fn partial_date_skipped_below_v4() {
        let value = VCardValue::DateAndOrTime(DateAndOrTime::Date(VCardDate::MonthDay {
            month: 3,
            day: 22,
        }));
        assert_eq!(write(&value, V4_0).unwrap(), "--0322");
        assert!(matches!(
            write(&value, VCardVersion::V3_0),
            Err(ScribeError::Skip(_))
        ));
    }

    #[test]
    fn text_value_only_at_v4() {
        let value = VCardValue::DateAndOrTime(DateAndOrTime::text("circa 1800"));
        let scribe = DateOrTimeScribe::birthday();
        assert_eq!(write(&value, V4_0).unwrap(), "circa 1800");
        assert_eq!(scribe.data_type(&value, V4_0), Some(VCardDataType::Text));
        assert!(matches!(
            write(&value, VCardVersion::V2_1),
            Err(ScribeError::Skip(_))
        ));
    }

    #[test]
    fn legacy_data_type_follows_time() {
        let scribe = DateOrTimeScribe::birthday();
        let date = VCardValue::DateAndOrTime(DateAndOrTime::parse("19800322").unwrap());
        let date_time = VCardValue::DateAndOrTime(DateAndOrTime::parse("19800322T101500Z").unwrap());
        assert_eq!(scribe.data_type(&date, VCardVersion::V3_0), Some(VCardDataType::Date));
        assert_eq!(
            scribe.data_type(&date_time, VCardVersion::V3_0),
            Some(VCardDataType::DateTime)
        );
        assert_eq!(
            scribe.data_type(&date_time, V4_0),
            Some(VCardDataType::DateAndOrTime)
        );
    }

    #[test]
    fn parse_extended_and_text() {
        let scribe = DateOrTimeScribe::birthday();
        let mut ctx = ParseContext::new(V4_0, VCardParameters::new());
        assert_eq!(
            scribe.parse_text("1980-03-22", None, &mut ctx).unwrap(),
            VCardValue::DateAndOrTime(DateAndOrTime::full_date(1980, 3, 22).unwrap())
        );
        assert_eq!(
            scribe
                .parse_text("circa 1800", Some(&VCardDataType::Text), &mut ctx)
                .unwrap(),
            VCardValue::DateAndOrTime(DateAndOrTime::text("circa 1800"))
        );
        assert!(matches!(
            scribe.parse_text("circa 1800", None, &mut ctx),
            Err(ScribeError::Unparseable(_))
        ));
    }

    #[test]
    fn rev_formats() {
        let value = TimestampScribe
            .parse_text(
                "2024-01-15T10:30:00Z",
                None,
                &mut ParseContext::new(V4_0, VCardParameters::new()),
            )
            .unwrap();
        let mut ctx = WriteContext::new(VCardVersion::V3_0, false);
        assert_eq!(
            TimestampScribe.write_text(&value, &mut ctx).unwrap(),
            "20240115T103000Z"
        );
        let json = TimestampScribe.write_json(&value, &mut ctx).unwrap();
        assert_eq!(json.as_single(), "2024-01-15T10:30:00Z");
    }
}
