//! vCard implementation (2.1, RFC 2426, RFC 6350).
//!
//! ## Overview
//!
//! Cards are held in one in-memory model ([`core`]) and converted to and from
//! four syntaxes: plain text, xCard ([`xml`]), hCard ([`html`], read only)
//! and jCard ([`json`]). Every property kind has a scribe that knows its
//! wire forms; the [`ScribeRegistry`] maps property names to scribes and can
//! be extended with custom ones.
//!
//! ## Usage
//!
//! ### Parsing
//!
//! ```rust
//! use tessen_rfc::rfc::vcard::parse_text;
//!
//! let input = "\
//! BEGIN:VCARD\r\n\
//! VERSION:4.0\r\n\
//! FN:John Doe\r\n\
//! EMAIL:john@example.com\r\n\
//! END:VCARD\r\n";
//!
//! let cards = parse_text(input).unwrap();
//! assert_eq!(cards[0].card.formatted_name(), Some("John Doe"));
//! assert!(cards[0].warnings.is_empty());
//! ```
//!
//! ### Writing
//!
//! ```rust
//! use tessen_rfc::rfc::vcard::core::{VCard, VCardProperty, VCardVersion};
//! use tessen_rfc::rfc::vcard::{ScribeRegistry, TextWriter, WriteOptions};
//!
//! let mut card = VCard::new();
//! card.add_property(VCardProperty::text("FN", "Jane Doe"));
//! card.add_property(VCardProperty::text("EMAIL", "jane@example.com").with_param("PREF", "1"));
//!
//! let registry = ScribeRegistry::new();
//! let options = WriteOptions::default().with_version(VCardVersion::V3_0);
//! let written = TextWriter::new(&registry, options).write(&[card]);
//! assert!(written.output.contains("EMAIL;TYPE=pref:jane@example.com"));
//! ```
//!
//! ## Warnings
//!
//! A property that cannot be read or written is left out and reported in
//! the [`DocumentWarnings`] returned next to the result. Only I/O failures
//! and documents that cannot be tokenized at all are errors.

pub mod core;
pub mod html;
pub mod json;
pub mod normalize;
pub mod options;
pub mod registry;
pub mod scribe;
pub mod text;
pub mod validate;
pub mod warning;
pub mod xml;

#[cfg(test)]
mod tests;

pub use core::{VCard, VCardParameters, VCardProperty, VCardValue, VCardVersion};
pub use html::{HCardReader, parse_html};
pub use json::{JCardReader, JCardWriter, parse_json, write_json};
pub use normalize::{PrefElection, prepare_parameters};
pub use options::{ReadOptions, WriteOptions};
pub use registry::ScribeRegistry;
pub use scribe::{ParseContext, ScribeError, ScribeResult, VCardPropertyScribe, WriteContext};
pub use text::{ParseError, TextReader, TextWriter, parse_text, parse_text_single, write_text};
pub use validate::{ValidationWarnings, validate};
pub use warning::{DocumentWarnings, ParsedVCard, PropertyWarnings, Written};
pub use xml::{XCardReader, XCardWriter, parse_xml, write_xml};
