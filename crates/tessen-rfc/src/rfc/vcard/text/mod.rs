//! The text syntax (vCard 2.1, RFC 2426 and RFC 6350).
//!
//! ## Usage
//!
//! ```rust
//! use tessen_rfc::rfc::vcard::text::{parse_text, write_text};
//!
//! let input = "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:John Doe\r\nN:Doe;John;;;\r\nEND:VCARD\r\n";
//! let parsed = parse_text(input).unwrap();
//! assert_eq!(parsed[0].card.formatted_name(), Some("John Doe"));
//!
//! let cards: Vec<_> = parsed.into_iter().map(|p| p.card).collect();
//! let written = write_text(&cards).unwrap();
//! assert!(written.output.contains("FN:John Doe\r\n"));
//! ```
//!
//! ## Features
//!
//! - Line folding at 75 octets, unfolding of space and tab continuations
//! - vCard 2.1 nameless parameters and quoted-printable values
//! - RFC 6868 caret encoding for 4.0 parameter values

mod error;
pub mod escape;
pub mod fold;
mod lexer;
pub mod quoted_printable;
mod reader;
mod writer;


pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{ContentLine, UnfoldedLine, parse_content_line, unfold_lines};
pub use reader::{TextReader, parse_text, parse_text_single};
pub use writer::{TextWriter, write_text};
