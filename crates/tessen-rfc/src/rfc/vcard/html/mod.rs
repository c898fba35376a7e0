//! The HTML syntax (hCard microformat), read only.
//!
//! ## Usage
//!
//! ```rust
//! use tessen_rfc::rfc::vcard::html::parse_html;
//!
//! let page = r#"<div class="vcard"><span class="fn">John Doe</span></div>"#;
//! let parsed = parse_html(page).unwrap();
//! assert_eq!(parsed[0].card.formatted_name(), Some("John Doe"));
//! ```
//!
//! Pages are tokenized with quick-xml in a lenient mode: void elements,
//! unquoted attributes and stray end tags are accepted, but the markup must
//! still be tokenizable.

mod element;
mod reader;

pub use element::HCardElement;
pub use reader::{HCardReader, parse_html};
