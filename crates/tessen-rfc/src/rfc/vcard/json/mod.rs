//! The JSON syntax (jCard, RFC 7095).
//!
//! ## Usage
//!
//! ```rust
//! use tessen_rfc::rfc::vcard::core::{VCard, VCardProperty};
//! use tessen_rfc::rfc::vcard::json::{parse_json, write_json};
//!
//! let mut card = VCard::new();
//! card.add_property(VCardProperty::text("FN", "John Doe"));
//!
//! let written = write_json(&[card]).unwrap();
//! assert!(written.output.starts_with(r#"["vcard",[["version",{},"text","4.0"]"#));
//!
//! let parsed = parse_json(&written.output).unwrap();
//! assert_eq!(parsed[0].card.formatted_name(), Some("John Doe"));
//! ```

mod reader;
mod value;
mod writer;

pub use reader::{JCardReader, parse_json};
pub use value::JCardValue;
pub use writer::{JCardWriter, write_json};
