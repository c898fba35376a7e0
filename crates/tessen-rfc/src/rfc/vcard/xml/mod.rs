//! The XML syntax (xCard, RFC 6351).
//!
//! ## Usage
//!
//! ```rust
//! use tessen_rfc::rfc::vcard::core::{VCard, VCardProperty};
//! use tessen_rfc::rfc::vcard::xml::{parse_xml, write_xml};
//!
//! let mut card = VCard::new();
//! card.add_property(VCardProperty::text("FN", "John Doe"));
//!
//! let written = write_xml(&[card]).unwrap();
//! let parsed = parse_xml(&written.output).unwrap();
//! assert_eq!(parsed[0].card.formatted_name(), Some("John Doe"));
//! ```
//!
//! ## Features
//!
//! - `<parameters>` with typed value children
//! - `<group name="...">` wrappers for property groups
//! - Unknown elements read through the extended scribe

pub mod dom;
mod element;
mod reader;
mod writer;

pub use element::{PARAMETERS, XCardElement};
pub use reader::{XCardReader, parse_xml};
pub use writer::{XCardWriter, write_xml};
