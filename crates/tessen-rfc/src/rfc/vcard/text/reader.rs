//! Text syntax reader.

use std::io::Read;

use super::error::ParseError;
use super::lexer::{ContentLine, UnfoldedLine, parse_content_line, unfold_lines};
use super::quoted_printable;
use crate::error::RfcResult;
use crate::rfc::vcard::core::{VCard, VCardParameters, VCardProperty, VCardVersion, names};
use crate::rfc::vcard::options::ReadOptions;
use crate::rfc::vcard::registry::ScribeRegistry;
use crate::rfc::vcard::scribe::{ParseContext, version_list};
use crate::rfc::vcard::warning::{DocumentWarnings, ParsedVCard, PropertyWarnings};

/// Parses every card in a text document with the built-in scribes.
///
/// ## Summary
/// Malformed lines and unparseable properties are reported as warnings on
/// the card that contains them; they never fail the document.
///
/// ## Errors
/// Currently infallible for in-memory input; the `Result` matches the other
/// syntaxes.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_text(input: &str) -> RfcResult<Vec<ParsedVCard>> {
    tracing::debug!("Parsing text vCard document");

    let registry = ScribeRegistry::new();
    let cards = TextReader::new(input, &registry, ReadOptions::default())
        .collect::<RfcResult<Vec<_>>>()?;

    tracing::debug!(count = cards.len(), "Parsed vCards");
    Ok(cards)
}

/// Parses the first card in a text document.
///
/// ## Errors
/// Returns [`RfcError::ParseError`] if the document contains no card.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_text_single(input: &str) -> RfcResult<ParsedVCard> {
    let registry = ScribeRegistry::new();
    TextReader::new(input, &registry, ReadOptions::default())
        .next()
        .unwrap_or_else(|| Err(ParseError::no_card().into()))
}

/// Pull reader over the cards of a text document.
///
/// Each call to `next` parses one `BEGIN:VCARD` .. `END:VCARD` block.
#[derive(Debug)]
pub struct TextReader<'r> {
    lines: Vec<UnfoldedLine>,
    pos: usize,
    registry: &'r ScribeRegistry,
    options: ReadOptions,
}

impl<'r> TextReader<'r> {
    #[must_use]
    pub fn new(input: &str, registry: &'r ScribeRegistry, options: ReadOptions) -> Self {
        let lines = unfold_lines(input);
        tracing::trace!(count = lines.len(), "Unfolded lines");
        Self {
            lines,
            pos: 0,
            registry,
            options,
        }
    }

    /// Reads a whole stream, then parses it.
    ///
    /// ## Errors
    /// Returns [`RfcError::IoError`] if the stream cannot be read or is not
    /// UTF-8.
    pub fn from_reader(
        mut reader: impl Read,
        registry: &'r ScribeRegistry,
        options: ReadOptions,
    ) -> RfcResult<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Ok(Self::new(&input, registry, options))
    }

    /// Advances to the line after the next `BEGIN:VCARD`, returning its line
    /// number.
    fn seek_begin(&mut self) -> Option<usize> {
        while self.pos < self.lines.len() {
            let line = &self.lines[self.pos];
            self.pos += 1;
            if is_marker(&line.text, names::BEGIN) {
                return Some(line.line);
            }
        }
        None
    }

    /// Collects the content lines of one card, up to and including its END.
    fn collect_card(&mut self, warnings: &mut DocumentWarnings) -> (Vec<(usize, ContentLine)>, bool) {
        let mut lines = Vec::new();
        let mut depth = 0usize;

        while self.pos < self.lines.len() {
            let UnfoldedLine { line, text } = &self.lines[self.pos];
            self.pos += 1;

            if is_marker(text, names::END) {
                if depth == 0 {
                    return (lines, true);
                }
                depth -= 1;
                continue;
            }
            if is_marker(text, names::BEGIN) {
                if depth == 0 {
                    warnings.push_document(format!(
                        "nested vCard at line {line} is not supported and was skipped"
                    ));
                }
                depth += 1;
                continue;
            }
            if depth > 0 {
                continue;
            }

            match parse_content_line(text, *line) {
                Ok(content) => lines.push((*line, content)),
                Err(err) => {
                    tracing::debug!(line = *line, error = %err, "Skipping malformed line");
                    warnings.push_document(err.to_string());
                }
            }
        }

        (lines, false)
    }

    fn resolve_version(
        &self,
        lines: &[(usize, ContentLine)],
        warnings: &mut DocumentWarnings,
    ) -> VCardVersion {
        let Some((line, content)) = lines.iter().find(|(_, l)| l.name == names::VERSION) else {
            warnings.push_document(format!(
                "VERSION property missing; assuming {}",
                self.options.default_version.as_str()
            ));
            return self.options.default_version;
        };
        VCardVersion::from_str(content.value.trim()).unwrap_or_else(|| {
            warnings.push_document(format!(
                "line {line}: unsupported version \"{}\"; assuming {}",
                content.value.trim(),
                self.options.default_version.as_str()
            ));
            self.options.default_version
        })
    }

    fn parse_card(&mut self, begin_line: usize) -> ParsedVCard {
        let mut warnings = DocumentWarnings::new();
        let (lines, closed) = self.collect_card(&mut warnings);
        let version = self.resolve_version(&lines, &mut warnings);
        let mut card = VCard::with_version(version);

        for (line, content) in lines {
            if content.name == names::VERSION {
                continue;
            }
            let name = content.name.clone();
            let (property, messages) = self.parse_property(content, version);
            if let Some(property) = property {
                card.add_property(property);
            }
            warnings.push_property(PropertyWarnings::new(name, Some(line), messages));
        }

        if !closed {
            warnings.push_document(format!(
                "vCard starting at line {begin_line} is not terminated by END:VCARD"
            ));
        }

        ParsedVCard { card, warnings }
    }

    /// Decodes one content line. Returns `None` when the property is dropped.
    fn parse_property(
        &self,
        content: ContentLine,
        version: VCardVersion,
    ) -> (Option<VCardProperty>, Vec<String>) {
        let ContentLine {
            group,
            name,
            params,
            value,
        } = content;
        let mut messages = Vec::new();
        let mut params: VCardParameters = params.into_iter().collect();

        let data_type = params.value_type();
        params.remove("VALUE");

        let value = decode_transfer_encoding(value, &mut params, &mut messages);

        let scribe = self.registry.resolve(&name);
        if !scribe.supported_versions().contains(&version) {
            messages.push(format!(
                "not supported by version {}; it is defined for {}",
                version.as_str(),
                version_list(scribe.supported_versions())
            ));
        }

        let mut ctx = ParseContext::new(version, params);
        let parsed = scribe.parse_text(&value, data_type.as_ref(), &mut ctx);
        messages.append(&mut ctx.warnings);

        match parsed {
            Ok(value) => (
                Some(VCardProperty {
                    group,
                    name,
                    params: ctx.params,
                    value,
                }),
                messages,
            ),
            Err(err) => {
                tracing::debug!(property = %name, error = %err, "Dropping property");
                messages.push(err.to_string());
                (None, messages)
            }
        }
    }
}

impl Iterator for TextReader<'_> {
    type Item = RfcResult<ParsedVCard>;

    fn next(&mut self) -> Option<Self::Item> {
        let begin_line = self.seek_begin()?;
        Some(Ok(self.parse_card(begin_line)))
    }
}

/// Returns whether a line is `BEGIN:VCARD` or `END:VCARD`.
fn is_marker(text: &str, marker: &str) -> bool {
    text.split_once(':').is_some_and(|(name, value)| {
        name.trim().eq_ignore_ascii_case(marker) && value.trim().eq_ignore_ascii_case("VCARD")
    })
}

/// Undoes quoted-printable transfer encoding, consuming ENCODING and CHARSET.
fn decode_transfer_encoding(
    value: String,
    params: &mut VCardParameters,
    messages: &mut Vec<String>,
) -> String {
    let charset = params.charset().map(str::to_string);
    params.remove("CHARSET");

    let is_qp = params
        .encoding()
        .is_some_and(|e| e.eq_ignore_ascii_case("QUOTED-PRINTABLE"));
    if !is_qp {
        return value;
    }
    params.remove("ENCODING");

    match quoted_printable::decode(&value) {
        Ok(bytes) => {
            let (decoded, known) = quoted_printable::decode_charset(&bytes, charset.as_deref());
            if !known && let Some(charset) = charset {
                messages.push(format!(
                    "unknown charset \"{charset}\"; decoded as UTF-8"
                ));
            }
            decoded
        }
        Err(reason) => {
            messages.push(format!(
                "could not decode quoted-printable value ({reason}); using it as is"
            ));
            value
        }
    }
}
