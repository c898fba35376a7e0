//! Text syntax writer.

use std::io;

use super::escape::{escape_newlines, escape_param_value};
use super::fold::{fold_line, fold_quoted_printable};
use super::quoted_printable;
use crate::error::RfcResult;
use crate::rfc::vcard::core::{VCard, VCardParameters, VCardVersion, names};
use crate::rfc::vcard::normalize::{PreparedEntry, prepare_card};
use crate::rfc::vcard::options::WriteOptions;
use crate::rfc::vcard::registry::ScribeRegistry;
use crate::rfc::vcard::scribe::WriteContext;
use crate::rfc::vcard::warning::{DocumentWarnings, PropertyWarnings, Written};

/// Writes cards with the built-in scribes and default options.
///
/// ## Summary
/// Each card is written in its own version. Properties that cannot be
/// represented are omitted and reported in [`Written::warnings`].
///
/// ## Errors
/// Currently infallible for in-memory output; the `Result` matches the other
/// syntaxes.
#[tracing::instrument(skip(cards), fields(count = cards.len()))]
pub fn write_text(cards: &[VCard]) -> RfcResult<Written> {
    let registry = ScribeRegistry::new();
    Ok(TextWriter::new(&registry, WriteOptions::default()).write(cards))
}

/// Text syntax writer bound to a registry and options.
#[derive(Debug, Clone)]
pub struct TextWriter<'r> {
    registry: &'r ScribeRegistry,
    options: WriteOptions,
}

impl<'r> TextWriter<'r> {
    #[must_use]
    pub fn new(registry: &'r ScribeRegistry, options: WriteOptions) -> Self {
        Self { registry, options }
    }

    /// Writes every card into one string.
    #[must_use]
    pub fn write(&self, cards: &[VCard]) -> Written {
        let mut written = Written::default();
        for card in cards {
            let warnings = self.write_card(card, &mut written.output);
            written.warnings.push(warnings);
        }
        tracing::debug!(bytes = written.output.len(), "Wrote text vCards");
        written
    }

    /// Writes every card to a byte sink.
    ///
    /// ## Errors
    /// Returns [`RfcError::IoError`](crate::error::RfcError::IoError) if the
    /// sink fails.
    pub fn write_to(&self, cards: &[VCard], mut sink: impl io::Write) -> RfcResult<Vec<DocumentWarnings>> {
        let Written { output, warnings } = self.write(cards);
        sink.write_all(output.as_bytes())?;
        sink.flush()?;
        Ok(warnings)
    }

    /// Appends one card to `output`, returning its warnings.
    pub fn write_card(&self, card: &VCard, output: &mut String) -> DocumentWarnings {
        let version = self.options.version.unwrap_or(card.version);
        let mut warnings = DocumentWarnings::new();

        output.push_str("BEGIN:VCARD\r\n");
        self.push_line(output, &format!("VERSION:{}", version.as_str()), false);

        if self.options.include_prodid
            && version != VCardVersion::V2_1
            && card.get_property(names::PRODID).is_none()
        {
            self.push_line(
                output,
                &format!("PRODID:{}", tessen_core::constants::PRODID),
                false,
            );
        }

        let properties: Vec<_> = card
            .properties
            .iter()
            .filter(|p| !is_envelope(&p.name))
            .cloned()
            .collect();
        for entry in prepare_card(&properties, self.registry, version, self.options.strict) {
            let mut item = match entry {
                PreparedEntry::Ready(item) => item,
                PreparedEntry::Dropped(dropped) => {
                    warnings.push_property(dropped);
                    continue;
                }
            };
            let mut ctx = WriteContext::new(version, self.options.strict);
            let result = item.scribe.write_text(&item.property.value, &mut ctx);
            item.warnings.append(&mut ctx.warnings);

            match result {
                Ok(value) => {
                    let (line, qp) = self.content_line(
                        item.property.group.as_deref(),
                        &item.property.name,
                        item.params,
                        &value,
                        version,
                    );
                    self.push_line(output, &line, qp);
                }
                Err(err) => {
                    tracing::debug!(property = %item.property.name, error = %err, "Skipping property");
                    item.warnings.push(err.to_string());
                }
            }
            warnings.push_property(PropertyWarnings::new(
                item.property.name.clone(),
                None,
                item.warnings,
            ));
        }

        output.push_str("END:VCARD\r\n");
        warnings
    }

    /// Builds one unfolded content line. The flag is set for
    /// quoted-printable values, which fold differently.
    fn content_line(
        &self,
        group: Option<&str>,
        name: &str,
        mut params: VCardParameters,
        value: &str,
        version: VCardVersion,
    ) -> (String, bool) {
        let qp = version == VCardVersion::V2_1
            && (value.contains(['\r', '\n']) || !value.is_ascii());
        let value = if qp {
            params.put("ENCODING", "QUOTED-PRINTABLE");
            if !value.is_ascii() {
                params.put("CHARSET", "UTF-8");
            }
            quoted_printable::encode(value)
        } else {
            escape_newlines(value)
        };

        let mut line = String::new();
        if let Some(group) = group {
            line.push_str(group);
            line.push('.');
        }
        line.push_str(name);
        self.write_parameters(&params, version, &mut line);
        line.push(':');
        line.push_str(&value);
        (line, qp)
    }

    fn write_parameters(&self, params: &VCardParameters, version: VCardVersion, line: &mut String) {
        let caret = self.options.caret_encoding && version == VCardVersion::V4_0;
        for param in params {
            let values: Vec<String> = param
                .values
                .iter()
                .map(|value| {
                    let (escaped, quoted) = escape_param_value(value, caret);
                    if quoted {
                        format!("\"{escaped}\"")
                    } else {
                        escaped
                    }
                })
                .collect();

            if version == VCardVersion::V2_1 {
                // 2.1 has no multi-valued parameters.
                for value in values {
                    line.push_str(&format!(";{}={value}", param.name));
                }
            } else {
                line.push_str(&format!(";{}={}", param.name, values.join(",")));
            }
        }
    }

    fn push_line(&self, output: &mut String, line: &str, qp: bool) {
        let folded = if qp {
            fold_quoted_printable(line, self.options.fold_length)
        } else {
            fold_line(line, self.options.fold_length)
        };
        output.push_str(&folded);
        output.push_str("\r\n");
    }
}

fn is_envelope(name: &str) -> bool {
    [names::BEGIN, names::END, names::VERSION]
        .iter()
        .any(|n| n.eq_ignore_ascii_case(name))
}
