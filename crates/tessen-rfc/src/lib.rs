//! vCard 2.1, 3.0 and 4.0 codecs for text, xCard, hCard and jCard.

pub mod error;
pub mod rfc;
