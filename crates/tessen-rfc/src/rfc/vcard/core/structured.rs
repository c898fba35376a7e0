//! Structured vCard types.
//!
//! These types represent property values with more than one field, like N,
//! ADR, ORG, TEL, GEO and TZ.

use std::fmt;

use super::datetime::VCardUtcOffset;

/// The five components of N (RFC 6350 §6.2.2).
///
/// All components are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredName {
    /// Surnames.
    pub family: Vec<String>,
    /// First names.
    pub given: Vec<String>,
    /// Middle names.
    pub additional: Vec<String>,
    /// Such as "Dr.".
    pub prefixes: Vec<String>,
    /// Such as "Jr.".
    pub suffixes: Vec<String>,
}

impl StructuredName {
    /// Number of components on the wire.
    pub const ARITY: usize = 5;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A name with one surname and one first name.
    #[must_use]
    pub fn simple(family: impl Into<String>, given: impl Into<String>) -> Self {
        Self {
            family: vec![family.into()],
            given: vec![given.into()],
            ..Self::default()
        }
    }

    /// Builds a name from wire components, tolerating short input.
    #[must_use]
    pub fn from_components(mut components: Vec<Vec<String>>) -> Self {
        components.resize(Self::ARITY, Vec::new());
        let mut it = components.into_iter();
        Self {
            family: it.next().unwrap_or_default(),
            given: it.next().unwrap_or_default(),
            additional: it.next().unwrap_or_default(),
            prefixes: it.next().unwrap_or_default(),
            suffixes: it.next().unwrap_or_default(),
        }
    }

    /// Returns the components in wire order.
    #[must_use]
    pub fn components(&self) -> [&[String]; Self::ARITY] {
        [
            &self.family,
            &self.given,
            &self.additional,
            &self.prefixes,
            &self.suffixes,
        ]
    }

    /// True when every component is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components().iter().all(|c| c.is_empty())
    }

    /// First names then surnames, space separated.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut parts = Vec::new();
        if !self.given.is_empty() {
            parts.push(self.given.join(" "));
        }
        if !self.family.is_empty() {
            parts.push(self.family.join(" "));
        }
        parts.join(" ")
    }
}

/// The seven components of ADR (RFC 6350 §6.3.1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// Post office box.
    pub po_box: Vec<String>,
    /// Apartment or suite.
    pub extended: Vec<String>,
    /// Street address.
    pub street: Vec<String>,
    /// Locality (city).
    pub locality: Vec<String>,
    /// State or province.
    pub region: Vec<String>,
    /// Postal code.
    pub postal_code: Vec<String>,
    /// Country name.
    pub country: Vec<String>,
}

impl Address {
    /// Number of components on the wire.
    pub const ARITY: usize = 7;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an address from wire components, tolerating short input.
    #[must_use]
    pub fn from_components(mut components: Vec<Vec<String>>) -> Self {
        components.resize(Self::ARITY, Vec::new());
        let mut it = components.into_iter();
        Self {
            po_box: it.next().unwrap_or_default(),
            extended: it.next().unwrap_or_default(),
            street: it.next().unwrap_or_default(),
            locality: it.next().unwrap_or_default(),
            region: it.next().unwrap_or_default(),
            postal_code: it.next().unwrap_or_default(),
            country: it.next().unwrap_or_default(),
        }
    }

    /// Returns the components in wire order.
    #[must_use]
    pub fn components(&self) -> [&[String]; Self::ARITY] {
        [
            &self.po_box,
            &self.extended,
            &self.street,
            &self.locality,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
    }

    /// True when every component is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components().iter().all(|c| c.is_empty())
    }

    /// Non-empty components joined with ", ".
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.locality,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .flat_map(|v| v.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// ORG value (RFC 6350 §6.6.4).
///
/// The organization name followed by its units, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organization {
    pub name: String,
    pub units: Vec<String>,
}

impl Organization {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_units(name: impl Into<String>, units: Vec<String>) -> Self {
        Self {
            name: name.into(),
            units,
        }
    }

    /// Returns name and units in wire order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.units.iter().map(String::as_str))
            .collect()
    }

    /// Builds from wire order values.
    #[must_use]
    pub fn from_values(values: Vec<String>) -> Self {
        let mut it = values.into_iter();
        Self {
            name: it.next().unwrap_or_default(),
            units: it.collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.units.is_empty()
    }
}

/// GENDER value (RFC 6350 §6.2.7).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gender {
    /// One of M, F, O, N or U.
    pub sex: Option<Sex>,
    /// Free-form identity text.
    pub identity: Option<String>,
}

impl Gender {
    #[must_use]
    pub fn sex(sex: Sex) -> Self {
        Self {
            sex: Some(sex),
            identity: None,
        }
    }

    #[must_use]
    pub fn full(sex: Sex, identity: impl Into<String>) -> Self {
        Self {
            sex: Some(sex),
            identity: Some(identity.into()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sex.is_none() && self.identity.as_deref().is_none_or(str::is_empty)
    }
}

/// Sex component of GENDER property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
    Other,
    /// Not applicable.
    None,
    Unknown,
}

impl Sex {
    /// Case-insensitive.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'M' | 'm' => Some(Self::Male),
            'F' | 'f' => Some(Self::Female),
            'O' | 'o' => Some(Self::Other),
            'N' | 'n' => Some(Self::None),
            'U' | 'u' => Some(Self::Unknown),
            _ => Option::None,
        }
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Male => 'M',
            Self::Female => 'F',
            Self::Other => 'O',
            Self::None => 'N',
            Self::Unknown => 'U',
        }
    }
}

/// CLIENTPIDMAP value (RFC 6350 §6.7.7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientPidMap {
    /// Positive integer matched by PID parameters.
    pub source_id: u32,
    /// Identifies the client that owns the source id.
    pub uri: String,
}

impl ClientPidMap {
    #[must_use]
    pub fn new(source_id: u32, uri: impl Into<String>) -> Self {
        Self {
            source_id,
            uri: uri.into(),
        }
    }
}

/// Telephone URI (RFC 3966).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelUri {
    /// Global or local number text.
    pub number: String,
    pub extension: Option<String>,
    pub isdn_subaddress: Option<String>,
    pub phone_context: Option<String>,
    /// Any other `name=value` parameters, in order.
    pub parameters: Vec<(String, String)>,
}

impl TelUri {
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_extension(number: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            extension: Some(ext.into()),
            ..Self::default()
        }
    }

    /// Parses a `tel:` URI. Returns `None` when the scheme or number is invalid.
    #[must_use]
    pub fn parse(uri: &str) -> Option<Self> {
        let uri = uri.trim();
        let scheme = uri.get(..4)?;
        if !scheme.eq_ignore_ascii_case("tel:") {
            return None;
        }
        let mut parts = uri[4..].split(';');
        let number = parts.next()?.to_string();
        let valid_char = |c: char| c.is_ascii_hexdigit() || "+-.()*#".contains(c);
        if number.is_empty() || !number.chars().all(valid_char) {
            return None;
        }

        let mut tel = Self::new(number);
        for part in parts {
            let (name, value) = part.split_once('=').unwrap_or((part, ""));
            match name.to_ascii_lowercase().as_str() {
                "ext" => tel.extension = Some(value.to_string()),
                "isub" => tel.isdn_subaddress = Some(value.to_string()),
                "phone-context" => tel.phone_context = Some(value.to_string()),
                _ => tel.parameters.push((name.to_string(), value.to_string())),
            }
        }
        Some(tel)
    }

    /// Formats as a `tel:` URI string.
    #[must_use]
    pub fn to_uri(&self) -> String {
        self.to_string()
    }

    /// Formats for legacy text values, e.g. `+1-555-555-1234 x101`.
    #[must_use]
    pub fn to_text(&self) -> String {
        match &self.extension {
            Some(ext) => format!("{} x{ext}", self.number),
            None => self.number.clone(),
        }
    }
}

impl fmt::Display for TelUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tel:{}", self.number)?;
        if let Some(ext) = &self.extension {
            write!(f, ";ext={ext}")?;
        }
        if let Some(isub) = &self.isdn_subaddress {
            write!(f, ";isub={isub}")?;
        }
        if let Some(ctx) = &self.phone_context {
            write!(f, ";phone-context={ctx}")?;
        }
        for (name, value) in &self.parameters {
            write!(f, ";{name}={value}")?;
        }
        Ok(())
    }
}

/// Telephone number (TEL property): free text or a `tel:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Telephone {
    Text(String),
    Uri(TelUri),
}

/// Geographical position (GEO property).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geo {
    pub latitude: f64,
    pub longitude: f64,
}

impl Geo {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// A position with finite coordinates, latitude within ±90 and longitude
    /// within ±180.
    #[must_use]
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then(|| Self::new(latitude, longitude))
    }

    /// Parses a `geo:` URI (RFC 5870), ignoring altitude and parameters.
    #[must_use]
    pub fn parse_uri(uri: &str) -> Option<Self> {
        let uri = uri.trim();
        let scheme = uri.get(..4)?;
        if !scheme.eq_ignore_ascii_case("geo:") {
            return None;
        }
        let coords = uri[4..].split(';').next()?;
        let mut parts = coords.split(',');
        let latitude = parts.next()?.trim().parse().ok()?;
        let longitude = parts.next()?.trim().parse().ok()?;
        Self::checked(latitude, longitude)
    }

    /// Parses the legacy `lat;long` text form (commas are also accepted).
    #[must_use]
    pub fn parse_pair(text: &str) -> Option<Self> {
        let (lat, long) = text.split_once(';').or_else(|| text.split_once(','))?;
        Self::checked(lat.trim().parse().ok()?, long.trim().parse().ok()?)
    }

    /// Formats as a `geo:` URI with six decimal places.
    #[must_use]
    pub fn to_uri(&self) -> String {
        format!(
            "geo:{},{}",
            format_coordinate(self.latitude),
            format_coordinate(self.longitude)
        )
    }

    /// Formats as the legacy `lat;long` text form.
    #[must_use]
    pub fn to_pair(&self) -> String {
        format!(
            "{};{}",
            format_coordinate(self.latitude),
            format_coordinate(self.longitude)
        )
    }
}

/// Six decimal places, trailing zeros trimmed.
fn format_coordinate(value: f64) -> String {
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Timezone (TZ property): a UTC offset, a free text / IANA name, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timezone {
    pub offset: Option<VCardUtcOffset>,
    pub text: Option<String>,
}

impl Timezone {
    #[must_use]
    pub fn offset(offset: VCardUtcOffset) -> Self {
        Self {
            offset: Some(offset),
            text: None,
        }
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            offset: None,
            text: Some(text.into()),
        }
    }

    #[must_use]
    pub fn both(offset: VCardUtcOffset, text: impl Into<String>) -> Self {
        Self {
            offset: Some(offset),
            text: Some(text.into()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offset.is_none() && self.text.is_none()
    }
}

/// A value that is either free text or a URI (RELATED, BIRTHPLACE, DEATHPLACE).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOrUri {
    Text(String),
    Uri(String),
}

impl TextOrUri {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Uri(s) => s,
        }
    }
}

/// Binary resource (PHOTO, LOGO, SOUND, KEY): inline data or a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryValue {
    Inline {
        data: Vec<u8>,
        /// Media type such as `image/jpeg`.
        media_type: Option<String>,
    },
    Uri {
        uri: String,
        media_type: Option<String>,
    },
}

impl BinaryValue {
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        match self {
            Self::Inline { media_type, .. } | Self::Uri { media_type, .. } => {
                media_type.as_deref()
            }
        }
    }
}

/// KIND value (RFC 6350 §6.1.4).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VCardKind {
    #[default]
    Individual,
    Group,
    Organization,
    Location,
    /// An x-name or an unregistered kind.
    Other(String),
}

impl VCardKind {
    #[must_use]
    #[expect(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "individual" => Self::Individual,
            "group" => Self::Group,
            "org" | "organization" => Self::Organization,
            "location" => Self::Location,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Individual => "individual",
            Self::Group => "group",
            Self::Organization => "org",
            Self::Location => "location",
            Self::Other(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_name_simple() {
        let name = StructuredName::simple("Doe", "John");
        assert_eq!(name.display_name(), "John Doe");
        assert!(StructuredName::new().is_empty());
    }

    #[test]
    fn address_from_short_components() {
        let addr = Address::from_components(vec![vec![], vec![], vec!["Main St".to_string()]]);
        assert_eq!(addr.street, vec!["Main St"]);
        assert!(addr.country.is_empty());
        assert_eq!(addr.components().len(), Address::ARITY);
    }

    #[test]
    fn address_one_line() {
        let addr = Address {
            street: vec!["123 Main St".to_string()],
            locality: vec!["Anytown".to_string()],
            region: vec!["CA".to_string()],
            ..Address::default()
        };
        assert_eq!(addr.one_line(), "123 Main St, Anytown, CA");
    }

    #[test]
    fn organization_values() {
        let org = Organization::with_units("Acme", vec!["R&D".to_string()]);
        assert_eq!(org.values(), vec!["Acme", "R&D"]);
        assert_eq!(Organization::from_values(vec!["Acme".into(), "R&D".into()]), org);
    }

    #[test]
    fn sex_from_char() {
        assert_eq!(Sex::from_char('M'), Some(Sex::Male));
        assert_eq!(Sex::from_char('f'), Some(Sex::Female));
        assert_eq!(Sex::from_char('X'), None);
    }

    #[test]
    fn tel_uri_round_trip() {
        let tel = TelUri::parse("tel:+1-418-656-9254;ext=102").unwrap();
        assert_eq!(tel.number, "+1-418-656-9254");
        assert_eq!(tel.extension.as_deref(), Some("102"));
        assert_eq!(tel.to_uri(), "tel:+1-418-656-9254;ext=102");
        assert_eq!(tel.to_text(), "+1-418-656-9254 x102");
    }

    #[test]
    fn tel_uri_rejects_other_schemes() {
        assert!(TelUri::parse("http://example.com").is_none());
        assert!(TelUri::parse("tel:").is_none());
        assert!(TelUri::parse("tel:555 1234").is_none());
    }

    #[test]
    fn geo_uri_and_pair() {
        let geo = Geo::parse_uri("geo:37.386013,-122.082932").unwrap();
        assert!((geo.latitude - 37.386_013).abs() < 1e-9);
        assert_eq!(geo.to_pair(), "37.386013;-122.082932");
        assert_eq!(Geo::new(12.0, -34.5).to_uri(), "geo:12,-34.5");
        assert!(Geo::parse_pair("1.5;abc").is_none());
    }

    #[test]
    fn geo_rejects_non_finite_and_out_of_range() {
        assert!(Geo::parse_pair("nan;inf").is_none());
        assert!(Geo::parse_uri("geo:NaN,1").is_none());
        assert!(Geo::parse_uri("geo:91,0").is_none());
        assert!(Geo::parse_pair("0;-180.5").is_none());
        assert_eq!(Geo::checked(-90.0, 180.0), Some(Geo::new(-90.0, 180.0)));
    }

    #[test]
    fn kind_parsing() {
        assert_eq!(VCardKind::from_str("ORG"), VCardKind::Organization);
        assert_eq!(VCardKind::from_str("x-robot").as_str(), "x-robot");
    }
}
