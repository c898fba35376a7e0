//! Reader and writer options.
//!
//! Options are plain values. They can be built directly or derived from the
//! loaded [`Settings`](tessen_core::config::Settings) sections.

use tessen_core::config::{ReaderConfig, WriterConfig};
use tessen_core::error::{CoreError, CoreResult};

use crate::rfc::vcard::core::VCardVersion;
use crate::rfc::vcard::text::fold::DEFAULT_LINE_OCTETS;

/// Options shared by the text, xCard and jCard writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Target version. `None` writes each card in its own version. xCard and
    /// jCard always write 4.0.
    pub version: Option<VCardVersion>,
    /// Drop properties and TYPE values unsupported by the target version.
    pub strict: bool,
    /// Text line folding length in octets. Zero disables folding.
    pub fold_length: usize,
    /// Add a PRODID to text output when the card has none (3.0 and 4.0).
    pub include_prodid: bool,
    /// Apply RFC 6868 caret encoding to text parameter values (4.0 only).
    pub caret_encoding: bool,
    /// Indent xCard and jCard output.
    pub pretty: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            version: None,
            strict: false,
            fold_length: DEFAULT_LINE_OCTETS,
            include_prodid: true,
            caret_encoding: true,
            pretty: false,
        }
    }
}

impl WriteOptions {
    #[must_use]
    pub fn with_version(mut self, version: VCardVersion) -> Self {
        self.version = Some(version);
        self
    }

    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn without_prodid(mut self) -> Self {
        self.include_prodid = false;
        self
    }
}

impl TryFrom<&WriterConfig> for WriteOptions {
    type Error = CoreError;

    fn try_from(config: &WriterConfig) -> Result<Self, Self::Error> {
        let version = config
            .target_version
            .as_deref()
            .map(|token| parse_version("writer.target_version", token))
            .transpose()?;
        Ok(Self {
            version,
            strict: config.strict,
            fold_length: config.fold_length,
            include_prodid: config.include_prodid,
            caret_encoding: true,
            pretty: config.pretty,
        })
    }
}

/// Options for the text reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOptions {
    /// Version assumed when a text card has no VERSION property.
    pub default_version: VCardVersion,
}

impl TryFrom<&ReaderConfig> for ReadOptions {
    type Error = CoreError;

    fn try_from(config: &ReaderConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            default_version: parse_version("reader.default_version", &config.default_version)?,
        })
    }
}

fn parse_version(setting: &'static str, token: &str) -> CoreResult<VCardVersion> {
    VCardVersion::from_str(token.trim()).ok_or_else(|| CoreError::UnknownVersion {
        setting,
        value: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_default_config() {
        let options = WriteOptions::try_from(&WriterConfig::default()).expect("valid config");
        assert_eq!(options, WriteOptions::default());
    }

    #[test]
    fn target_version_is_parsed() {
        let config = WriterConfig {
            target_version: Some("3.0".to_string()),
            ..WriterConfig::default()
        };
        let options = WriteOptions::try_from(&config).expect("valid config");
        assert_eq!(options.version, Some(VCardVersion::V3_0));
    }

    #[test]
    fn unknown_version_is_a_config_error() {
        let config = ReaderConfig {
            default_version: "5.0".to_string(),
        };
        let err = ReadOptions::try_from(&config).unwrap_err();
        assert_eq!(
            err,
            CoreError::UnknownVersion {
                setting: "reader.default_version",
                value: "5.0".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "reader.default_version: unknown vCard version \"5.0\""
        );
    }
}
