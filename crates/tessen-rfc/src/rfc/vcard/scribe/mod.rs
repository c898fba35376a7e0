//! Property scribes.
//!
//! A scribe is the codec strategy for one property kind. It converts between
//! the typed [`VCardValue`] and each of the four syntaxes, picks the data type
//! written to the wire, adjusts parameters for a version, and validates.
//!
//! ## Usage
//!
//! Scribes are looked up through the
//! [`ScribeRegistry`](crate::rfc::vcard::registry::ScribeRegistry). A custom
//! scribe only has to implement the text pair; the XML, HTML and JSON methods
//! fall back to the text codec.
//!
//! ```rust
//! use tessen_rfc::rfc::vcard::core::{VCardDataType, VCardValue};
//! use tessen_rfc::rfc::vcard::scribe::{
//!     ParseContext, ScribeError, ScribeResult, VCardPropertyScribe, WriteContext,
//! };
//! use tessen_rfc::rfc::vcard::core::VCardVersion;
//!
//! #[derive(Debug)]
//! struct SalaryScribe;
//!
//! impl VCardPropertyScribe for SalaryScribe {
//!     fn property_name(&self) -> &str {
//!         "X-SALARY"
//!     }
//!
//!     fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
//!         Some(VCardDataType::Integer)
//!     }
//!
//!     fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
//!         match value {
//!             VCardValue::Integer(i) => Ok(i.to_string()),
//!             other => Err(ScribeError::mismatch(self.property_name(), other)),
//!         }
//!     }
//!
//!     fn parse_text(
//!         &self,
//!         raw: &str,
//!         _data_type: Option<&VCardDataType>,
//!         _ctx: &mut ParseContext,
//!     ) -> ScribeResult<VCardValue> {
//!         raw.trim()
//!             .parse()
//!             .map(VCardValue::Integer)
//!             .map_err(|e| ScribeError::unparseable(format!("invalid salary: {e}")))
//!     }
//! }
//! ```

mod binary;
mod date;
mod extended;
mod geo;
mod place;
mod structured;
mod telephone;
mod text;
mod timezone;

use std::fmt;

use thiserror::Error;

pub use binary::BinaryScribe;
pub use date::{DateOrTimeScribe, TimestampScribe};
pub use extended::ExtendedScribe;
pub use geo::GeoScribe;
pub use place::TextOrUriScribe;
pub use structured::{
    AddressScribe, ClientPidMapScribe, GenderScribe, OrganizationScribe, StructuredNameScribe,
};
pub use telephone::TelephoneScribe;
pub use text::{KindScribe, LanguageScribe, TextListScribe, TextScribe, UidScribe, UriScribe};
pub use timezone::TimezoneScribe;

use crate::rfc::vcard::core::{VCardDataType, VCardParameters, VCardValue, VCardVersion};
use crate::rfc::vcard::html::HCardElement;
use crate::rfc::vcard::json::JCardValue;
use crate::rfc::vcard::text::escape::{escape_text, unescape_text};
use crate::rfc::vcard::xml::XCardElement;

/// Property-local failure signals.
///
/// Neither aborts the surrounding document: the property is omitted and the
/// message becomes a warning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScribeError {
    /// The value cannot be represented in the requested version or syntax.
    #[error("Property skipped: {0}")]
    Skip(String),

    /// The wire data cannot be decoded into any valid value.
    #[error("Property unparseable: {0}")]
    Unparseable(String),
}

impl ScribeError {
    #[must_use]
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip(reason.into())
    }

    #[must_use]
    pub fn unparseable(reason: impl Into<String>) -> Self {
        Self::Unparseable(reason.into())
    }

    /// The value held by a property does not have the shape its scribe writes.
    #[must_use]
    pub fn mismatch(property: &str, value: &VCardValue) -> Self {
        Self::Skip(format!(
            "{property} cannot be written from a {} value",
            value.shape()
        ))
    }

    /// None of the expected xCard child elements is present.
    #[must_use]
    pub fn missing_xml_elements(names: &[&str]) -> Self {
        let names = names
            .iter()
            .map(|n| format!("<{n}>"))
            .collect::<Vec<_>>()
            .join(", ");
        Self::Unparseable(format!("property value is missing; expected one of {names}"))
    }

    /// Returns the message without the signal prefix.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Skip(reason) | Self::Unparseable(reason) => reason,
        }
    }
}

pub type ScribeResult<T> = std::result::Result<T, ScribeError>;

/// State handed to a scribe while decoding one property.
///
/// `params` starts as the property's wire parameters minus those consumed by
/// the codec (VALUE, and ENCODING/CHARSET for quoted-printable). A scribe may
/// edit it; the result becomes the stored parameter set.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub version: VCardVersion,
    pub params: VCardParameters,
    pub warnings: Vec<String>,
}

impl ParseContext {
    #[must_use]
    pub fn new(version: VCardVersion, params: VCardParameters) -> Self {
        Self {
            version,
            params,
            warnings: Vec::new(),
        }
    }

    /// Records a recoverable problem with the property being parsed.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// State handed to a scribe while encoding one property.
#[derive(Debug, Clone)]
pub struct WriteContext {
    pub version: VCardVersion,
    /// Strict mode drops data the target version cannot carry instead of
    /// passing it through.
    pub strict: bool,
    pub warnings: Vec<String>,
}

impl WriteContext {
    #[must_use]
    pub fn new(version: VCardVersion, strict: bool) -> Self {
        Self {
            version,
            strict,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// A TYPE value a scribe knows, with the versions that define it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeValue {
    pub value: &'static str,
    pub versions: &'static [VCardVersion],
}

impl TypeValue {
    #[must_use]
    pub const fn new(value: &'static str, versions: &'static [VCardVersion]) -> Self {
        Self { value, versions }
    }

    #[must_use]
    pub fn supports(&self, version: VCardVersion) -> bool {
        self.versions.contains(&version)
    }
}

/// Codec strategy for one property kind.
///
/// Implementations must be stateless with respect to a single read or write:
/// the same instance is shared by every card and may be used from several
/// threads at once.
pub trait VCardPropertyScribe: fmt::Debug + Send + Sync {
    /// Canonical uppercase property name.
    fn property_name(&self) -> &str;

    /// Versions that define this property.
    fn supported_versions(&self) -> &[VCardVersion] {
        VCardVersion::ALL
    }

    /// TYPE values this property defines.
    fn type_values(&self) -> &[TypeValue] {
        &[]
    }

    /// Data type assumed when no VALUE parameter is present. `None` means the
    /// scribe has no opinion and leaves VALUE untouched.
    fn default_data_type(&self, version: VCardVersion) -> Option<VCardDataType>;

    /// Data type of a populated value when written at `version`.
    fn data_type(&self, value: &VCardValue, version: VCardVersion) -> Option<VCardDataType> {
        let _ = value;
        self.default_data_type(version)
    }

    /// Data type reported in jCard output, where VALUE is positional.
    fn json_data_type(&self, value: &VCardValue) -> Option<VCardDataType> {
        self.data_type(value, VCardVersion::V4_0)
    }

    /// Per-kind parameter adjustments applied by the normalizer before the
    /// shared rules. `params` is already a private copy.
    fn prepare_parameters(
        &self,
        value: &VCardValue,
        params: &mut VCardParameters,
        version: VCardVersion,
    ) {
        let _ = (value, params, version);
    }

    /// Encodes the value as a text-syntax value, escaped.
    ///
    /// ## Errors
    /// Returns [`ScribeError::Skip`] when the value cannot be written at
    /// `ctx.version`.
    fn write_text(&self, value: &VCardValue, ctx: &mut WriteContext) -> ScribeResult<String>;

    /// Decodes an escaped text-syntax value.
    ///
    /// ## Errors
    /// Returns [`ScribeError::Unparseable`] when no value can be recovered.
    fn parse_text(
        &self,
        raw: &str,
        data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue>;

    /// Appends the value's children to an xCard property element.
    ///
    /// ## Errors
    /// Returns [`ScribeError::Skip`] when the value cannot be written.
    fn write_xml(
        &self,
        value: &VCardValue,
        element: &mut XCardElement,
        ctx: &mut WriteContext,
    ) -> ScribeResult<()> {
        let text = self.write_text(value, ctx)?;
        let data_type = self
            .data_type(value, ctx.version)
            .unwrap_or_else(|| VCardDataType::Other("unknown".to_string()));
        element.append(data_type.name(), unescape_text(&text));
        Ok(())
    }

    /// Decodes an xCard property element.
    ///
    /// ## Errors
    /// Returns [`ScribeError::Unparseable`] when no child element carries a value.
    fn parse_xml(&self, element: &XCardElement, ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        let default = self.default_data_type(ctx.version);
        let found = default
            .as_ref()
            .and_then(|dt| element.first(dt.name()).map(|v| (dt.clone(), v)))
            .or_else(|| {
                element
                    .first_value()
                    .map(|(name, v)| (VCardDataType::from_name(&name), v))
            });
        match found {
            Some((data_type, value)) => {
                self.parse_text(&escape_text(&value), Some(&data_type), ctx)
            }
            None => Err(ScribeError::missing_xml_elements(&[default
                .as_ref()
                .map_or("text", VCardDataType::name)])),
        }
    }

    /// Decodes an hCard element.
    ///
    /// ## Errors
    /// Returns [`ScribeError::Unparseable`] when a required sub-value is missing.
    fn parse_html(&self, element: &HCardElement<'_>, ctx: &mut ParseContext) -> ScribeResult<VCardValue> {
        self.parse_text(&escape_text(&element.value()), None, ctx)
    }

    /// Encodes the value as a jCard value.
    ///
    /// ## Errors
    /// Returns [`ScribeError::Skip`] when the value cannot be written.
    fn write_json(&self, value: &VCardValue, ctx: &mut WriteContext) -> ScribeResult<JCardValue> {
        let text = self.write_text(value, ctx)?;
        Ok(JCardValue::single(unescape_text(&text)))
    }

    /// Decodes a jCard value.
    ///
    /// ## Errors
    /// Returns [`ScribeError::Unparseable`] when no value can be recovered.
    fn parse_json(
        &self,
        value: &JCardValue,
        data_type: Option<&VCardDataType>,
        ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        self.parse_text(&escape_text(&value.as_single()), data_type, ctx)
    }

    /// Advisory checks. Never changes output.
    fn validate(
        &self,
        value: &VCardValue,
        params: &VCardParameters,
        version: VCardVersion,
    ) -> Vec<String> {
        let _ = (value, params, version);
        Vec::new()
    }
}

/// Versions named in a warning, e.g. `3.0, 4.0`.
pub(crate) fn version_list(versions: &[VCardVersion]) -> String {
    versions
        .iter()
        .map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
