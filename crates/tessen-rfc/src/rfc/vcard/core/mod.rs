//! vCard core types.
//!
//! This module provides the data model shared by every syntax:
//!
//! - [`VCard`] - Complete vCard representation
//! - [`VCardProperty`] - Individual property with parameters and value
//! - [`VCardParameters`] - Ordered, case-insensitive parameter set
//! - [`VCardValue`] - Property value variants
//! - [`VCardVersion`] and [`VCardDataType`] - Version and `VALUE` tokens
//!
//! ## Structured Types
//!
//! - [`StructuredName`], [`Address`], [`Organization`], [`Gender`]
//! - [`Telephone`] - text or [`TelUri`]
//! - [`Geo`], [`Timezone`], [`TextOrUri`], [`BinaryValue`]
//!
//! ## Date/Time Types
//!
//! - [`VCardDate`], [`VCardTime`] - Full or partial values
//! - [`DateAndOrTime`] - Combined date/time or text
//! - [`Timestamp`] - REV
//!
//! ## Example
//!
//! ```rust
//! use tessen_rfc::rfc::vcard::core::{VCard, VCardProperty};
//!
//! let mut card = VCard::new();
//! card.add_property(VCardProperty::text("FN", "John Doe"));
//! card.add_property(VCardProperty::text("EMAIL", "john@example.com"));
//! ```

mod data_type;
mod datetime;
mod parameter;
mod property;
mod structured;
mod value;
mod vcard;
mod version;

pub use data_type::VCardDataType;
pub use datetime::{DateAndOrTime, Timestamp, VCardDate, VCardTime, VCardUtcOffset};
pub use parameter::{Pid, VCardParameter, VCardParameters, types};
pub use property::{VCardProperty, names};
pub use structured::{
    Address, BinaryValue, ClientPidMap, Gender, Geo, Organization, Sex, StructuredName, TelUri,
    Telephone, TextOrUri, Timezone, VCardKind,
};
pub use value::VCardValue;
pub use vcard::VCard;
pub use version::VCardVersion;
