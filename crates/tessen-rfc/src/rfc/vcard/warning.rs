//! Warnings collected while reading or writing cards.
//!
//! Warnings never abort a document. Each processed property gets one
//! [`PropertyWarnings`] entry, in processing order, even when it has no
//! messages, so callers can line them up with the properties they walked.

use std::fmt;

use crate::rfc::vcard::core::VCard;

/// Messages recorded for one property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyWarnings {
    /// Property name as seen on the wire.
    pub property: String,
    /// 1-based line number for the text syntax.
    pub line: Option<usize>,
    pub messages: Vec<String>,
}

impl PropertyWarnings {
    #[must_use]
    pub fn new(property: impl Into<String>, line: Option<usize>, messages: Vec<String>) -> Self {
        Self {
            property: property.into(),
            line,
            messages,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl fmt::Display for PropertyWarnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {line}): ", self.property)?,
            None => write!(f, "{}: ", self.property)?,
        }
        write!(f, "{}", self.messages.join("; "))
    }
}

/// Warnings for one card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentWarnings {
    /// Card-level messages (missing VERSION, unterminated card, ...).
    pub document: Vec<String>,
    /// One entry per processed property.
    pub properties: Vec<PropertyWarnings>,
}

impl DocumentWarnings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no message was recorded anywhere.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document.is_empty() && self.properties.iter().all(PropertyWarnings::is_empty)
    }

    pub fn push_document(&mut self, message: impl Into<String>) {
        self.document.push(message.into());
    }

    pub fn push_property(&mut self, warnings: PropertyWarnings) {
        self.properties.push(warnings);
    }

    /// Total number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.document.len()
            + self
                .properties
                .iter()
                .map(|p| p.messages.len())
                .sum::<usize>()
    }

    /// Messages recorded for properties with the given name.
    pub fn for_property<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.properties
            .iter()
            .filter(move |p| p.property.eq_ignore_ascii_case(name))
            .flat_map(|p| p.messages.iter().map(String::as_str))
    }

    /// Every message formatted for display.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.document
            .iter()
            .cloned()
            .chain(
                self.properties
                    .iter()
                    .filter(|p| !p.is_empty())
                    .map(ToString::to_string),
            )
            .collect()
    }
}

/// A card produced by a reader with the warnings raised while reading it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedVCard {
    pub card: VCard,
    pub warnings: DocumentWarnings,
}

/// Writer output with per-card warnings, in card order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Written {
    pub output: String,
    pub warnings: Vec<DocumentWarnings>,
}

impl Written {
    /// True when no card raised a warning.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.iter().all(DocumentWarnings::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_entries_do_not_count() {
        let mut warnings = DocumentWarnings::new();
        warnings.push_property(PropertyWarnings::new("FN", Some(3), Vec::new()));
        assert!(warnings.is_empty());
        assert_eq!(warnings.len(), 0);
        assert_eq!(warnings.properties.len(), 1);
    }

    #[test]
    fn formatted_messages() {
        let mut warnings = DocumentWarnings::new();
        warnings.push_document("No VERSION property found");
        warnings.push_property(PropertyWarnings::new(
            "TZ",
            Some(4),
            vec!["a".into(), "b".into()],
        ));
        warnings.push_property(PropertyWarnings::new("GEO", None, vec!["c".into()]));

        assert_eq!(
            warnings.messages(),
            vec!["No VERSION property found", "TZ (line 4): a; b", "GEO: c"]
        );
        assert_eq!(warnings.len(), 4);
        assert_eq!(warnings.for_property("tz").count(), 2);
    }
}
