//! Value data types (the `VALUE` parameter).

use std::fmt;

use super::version::VCardVersion;

/// The wire-level shape of a property value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VCardDataType {
    Text,
    Uri,
    /// 2.1 `CID` content identifier.
    ContentId,
    /// 3.0 inline binary (`VALUE=binary`).
    Binary,
    Date,
    Time,
    DateTime,
    DateAndOrTime,
    Timestamp,
    Boolean,
    Integer,
    Float,
    UtcOffset,
    LanguageTag,
    /// Any data type name not known to this library, lowercased.
    Other(String),
}

impl VCardDataType {
    /// Returns the canonical lowercase name, as used by xCard and jCard.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Uri => "uri",
            Self::ContentId => "content-id",
            Self::Binary => "binary",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date-time",
            Self::DateAndOrTime => "date-and-or-time",
            Self::Timestamp => "timestamp",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::UtcOffset => "utc-offset",
            Self::LanguageTag => "language-tag",
            Self::Other(name) => name,
        }
    }

    /// Returns the name written to a text `VALUE` parameter at `version`.
    ///
    /// 2.1 spells URIs `URL` and content identifiers `CID`.
    #[must_use]
    pub fn name_for(&self, version: VCardVersion) -> String {
        match (self, version) {
            (Self::Uri, VCardVersion::V2_1) => "url".to_string(),
            (Self::ContentId, VCardVersion::V2_1) => "cid".to_string(),
            (Self::ContentId, _) => "uri".to_string(),
            _ => self.name().to_string(),
        }
    }

    /// Parses a data type name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "uri" | "url" => Self::Uri,
            "cid" | "content-id" => Self::ContentId,
            "binary" => Self::Binary,
            "date" => Self::Date,
            "time" => Self::Time,
            "date-time" => Self::DateTime,
            "date-and-or-time" => Self::DateAndOrTime,
            "timestamp" => Self::Timestamp,
            "boolean" => Self::Boolean,
            "integer" => Self::Integer,
            "float" => Self::Float,
            "utc-offset" => Self::UtcOffset,
            "language-tag" => Self::LanguageTag,
            other => Self::Other(other.to_string()),
        }
    }

    /// Versions whose `VALUE` parameter may carry this data type.
    #[must_use]
    pub fn supported_versions(&self) -> &'static [VCardVersion] {
        match self {
            Self::ContentId => &[VCardVersion::V2_1],
            Self::Binary => &[VCardVersion::V3_0],
            Self::DateAndOrTime
            | Self::Timestamp
            | Self::LanguageTag => VCardVersion::V4_ONLY,
            Self::Boolean | Self::Integer | Self::Float | Self::Time => VCardVersion::MODERN,
            _ => VCardVersion::ALL,
        }
    }
}

impl fmt::Display for VCardDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
