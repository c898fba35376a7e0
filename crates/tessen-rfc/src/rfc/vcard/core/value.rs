//! vCard property values.

use super::datetime::{DateAndOrTime, Timestamp};
use super::structured::{
    Address, BinaryValue, ClientPidMap, Gender, Geo, Organization, StructuredName, Telephone,
    TextOrUri, Timezone, VCardKind,
};

/// A typed property value.
///
/// One variant per value shape; the property name decides which scribe
/// interprets it.
#[derive(Debug, Clone, PartialEq)]
pub enum VCardValue {
    Text(String),
    /// Comma-separated text list (NICKNAME, CATEGORIES).
    TextList(Vec<String>),
    Uri(String),
    Binary(BinaryValue),
    StructuredName(StructuredName),
    Address(Address),
    Organization(Organization),
    Gender(Gender),
    ClientPidMap(ClientPidMap),
    DateAndOrTime(DateAndOrTime),
    Timestamp(Timestamp),
    Telephone(Telephone),
    Geo(Geo),
    Timezone(Timezone),
    /// Text or URI (RELATED, BIRTHPLACE, DEATHPLACE).
    TextOrUri(TextOrUri),
    Kind(VCardKind),
    LanguageTag(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    /// Raw wire value of a property no scribe interprets.
    Extended(String),
}

impl VCardValue {
    /// Returns a short name for the value shape, used in warnings.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::TextList(_) => "text list",
            Self::Uri(_) => "uri",
            Self::Binary(_) => "binary",
            Self::StructuredName(_) => "structured name",
            Self::Address(_) => "address",
            Self::Organization(_) => "organization",
            Self::Gender(_) => "gender",
            Self::ClientPidMap(_) => "client pid map",
            Self::DateAndOrTime(_) => "date-and-or-time",
            Self::Timestamp(_) => "timestamp",
            Self::Telephone(_) => "telephone",
            Self::Geo(_) => "geo",
            Self::Timezone(_) => "timezone",
            Self::TextOrUri(_) => "text or uri",
            Self::Kind(_) => "kind",
            Self::LanguageTag(_) => "language tag",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Extended(_) => "extended",
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Extended(s) | Self::LanguageTag(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Uri(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_structured_name(&self) -> Option<&StructuredName> {
        match self {
            Self::StructuredName(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Self::Address(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_telephone(&self) -> Option<&Telephone> {
        match self {
            Self::Telephone(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timezone(&self) -> Option<&Timezone> {
        match self {
            Self::Timezone(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_geo(&self) -> Option<&Geo> {
        match self {
            Self::Geo(g) => Some(g),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date_and_or_time(&self) -> Option<&DateAndOrTime> {
        match self {
            Self::DateAndOrTime(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<String> for VCardValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for VCardValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<StructuredName> for VCardValue {
    fn from(n: StructuredName) -> Self {
        Self::StructuredName(n)
    }
}

impl From<Address> for VCardValue {
    fn from(a: Address) -> Self {
        Self::Address(a)
    }
}

impl From<Organization> for VCardValue {
    fn from(o: Organization) -> Self {
        Self::Organization(o)
    }
}

impl From<Telephone> for VCardValue {
    fn from(t: Telephone) -> Self {
        Self::Telephone(t)
    }
}

impl From<Geo> for VCardValue {
    fn from(g: Geo) -> Self {
        Self::Geo(g)
    }
}

impl From<Timezone> for VCardValue {
    fn from(t: Timezone) -> Self {
        Self::Timezone(t)
    }
}

impl From<DateAndOrTime> for VCardValue {
    fn from(d: DateAndOrTime) -> Self {
        Self::DateAndOrTime(d)
    }
}

impl From<Timestamp> for VCardValue {
    fn from(t: Timestamp) -> Self {
        Self::Timestamp(t)
    }
}

impl From<BinaryValue> for VCardValue {
    fn from(b: BinaryValue) -> Self {
        Self::Binary(b)
    }
}

impl From<i64> for VCardValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}
