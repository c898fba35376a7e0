//! vCard versions.

use std::fmt;

/// vCard version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum VCardVersion {
    /// vCard 2.1 (versit consortium).
    V2_1,
    /// vCard 3.0 (RFC 2426).
    V3_0,
    /// vCard 4.0 (RFC 6350).
    #[default]
    V4_0,
}

impl VCardVersion {
    /// Every version, oldest first.
    pub const ALL: &'static [Self] = &[Self::V2_1, Self::V3_0, Self::V4_0];

    /// Versions 2.1 and 3.0.
    pub const LEGACY: &'static [Self] = &[Self::V2_1, Self::V3_0];

    /// Versions 3.0 and 4.0.
    pub const MODERN: &'static [Self] = &[Self::V3_0, Self::V4_0];

    /// Version 4.0 only.
    pub const V4_ONLY: &'static [Self] = &[Self::V4_0];

    /// Parses from version string.
    #[must_use]
    #[expect(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "2.1" => Some(Self::V2_1),
            "3.0" => Some(Self::V3_0),
            "4.0" => Some(Self::V4_0),
            _ => None,
        }
    }

    /// Returns the version string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V2_1 => "2.1",
            Self::V3_0 => "3.0",
            Self::V4_0 => "4.0",
        }
    }

    /// XML namespace of the xCard format for this version.
    ///
    /// Only 4.0 has an xCard representation.
    #[must_use]
    pub const fn xml_namespace(self) -> Option<&'static str> {
        match self {
            Self::V4_0 => Some("urn:ietf:params:xml:ns:vcard-4.0"),
            Self::V2_1 | Self::V3_0 => None,
        }
    }
}

impl core::str::FromStr for VCardVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VCardVersion::from_str(s).ok_or_else(|| format!("unknown vCard version: {s}"))
    }
}

impl fmt::Display for VCardVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_tokens() {
        for version in VCardVersion::ALL {
            assert_eq!(VCardVersion::from_str(version.as_str()), Some(*version));
        }
        assert_eq!(VCardVersion::from_str(" 3.0 "), Some(VCardVersion::V3_0));
        assert_eq!(VCardVersion::from_str("5.0"), None);
    }

    #[test]
    fn only_v4_has_namespace() {
        assert!(VCardVersion::V2_1.xml_namespace().is_none());
        assert!(VCardVersion::V3_0.xml_namespace().is_none());
        assert_eq!(
            VCardVersion::V4_0.xml_namespace(),
            Some("urn:ietf:params:xml:ns:vcard-4.0")
        );
    }

    #[test]
    fn versions_are_ordered() {
        assert!(VCardVersion::V2_1 < VCardVersion::V3_0);
        assert!(VCardVersion::V3_0 < VCardVersion::V4_0);
    }
}
