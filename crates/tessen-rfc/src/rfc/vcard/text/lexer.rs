//! Line unfolding and content line parsing.
//!
//! Unfolding follows RFC 6350 §3.2, plus the vCard 2.1 quoted-printable soft
//! line break: a quoted-printable value ending in `=` continues on the next
//! physical line whether or not that line is indented.

use super::error::{ParseError, ParseResult};
use super::escape::decode_caret;
use crate::rfc::vcard::core::VCardParameter;

/// A logical line with the 1-based number of its first physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfoldedLine {
    pub line: usize,
    pub text: String,
}

/// Unfolds a document into logical lines. Blank lines are dropped.
#[must_use]
pub fn unfold_lines(input: &str) -> Vec<UnfoldedLine> {
    let mut lines: Vec<UnfoldedLine> = Vec::new();
    let mut soft_break = false;

    for (index, physical) in input.lines().enumerate() {
        let physical = physical.strip_suffix('\r').unwrap_or(physical);
        let line_num = index + 1;

        if soft_break {
            if let Some(prev) = lines.last_mut() {
                prev.text.pop();
                prev.text.push_str(physical.trim_start_matches([' ', '\t']));
                soft_break = is_soft_break(&prev.text);
                continue;
            }
        }

        if let Some(continuation) = physical.strip_prefix([' ', '\t']) {
            if let Some(prev) = lines.last_mut() {
                prev.text.push_str(continuation);
                soft_break = is_soft_break(&prev.text);
                continue;
            }
        }

        if physical.trim().is_empty() {
            continue;
        }

        let text = physical.to_string();
        soft_break = is_soft_break(&text);
        lines.push(UnfoldedLine {
            line: line_num,
            text,
        });
    }

    lines
}

fn is_soft_break(text: &str) -> bool {
    if !text.ends_with('=') {
        return false;
    }
    let Some(colon) = find_value_separator(text) else {
        return false;
    };
    text[..colon]
        .to_ascii_uppercase()
        .contains("QUOTED-PRINTABLE")
}

/// A parsed content line before value interpretation.
#[derive(Debug, Clone)]
pub struct ContentLine {
    /// Property group (e.g., "item1" in "item1.TEL").
    pub group: Option<String>,
    /// Property name (uppercase).
    pub name: String,
    /// Parameters in wire order. Nameless 2.1 parameters are resolved.
    pub params: Vec<VCardParameter>,
    /// Raw value string.
    pub value: String,
}

/// Parses a single content line into its components.
///
/// Format: `[group.]name[;param[=value]]*:value`
///
/// ## Errors
/// Returns an error if the line is malformed or missing the colon separator.
pub fn parse_content_line(line: &str, line_num: usize) -> ParseResult<ContentLine> {
    let colon_pos =
        find_value_separator(line).ok_or_else(|| ParseError::missing_separator(line_num))?;

    let (name_params, value) = line.split_at(colon_pos);
    let value = &value[1..];

    let (group, name_params) = parse_group(name_params);

    let (name, params_str) = match name_params.split_once(';') {
        Some((name, params)) => (name, Some(params)),
        None => (name_params, None),
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ParseError::invalid_name(line_num, name));
    }

    let params = match params_str {
        Some(params_str) => parse_parameters(params_str, line_num)?,
        None => Vec::new(),
    };

    Ok(ContentLine {
        group: group.map(String::from),
        name: name.to_ascii_uppercase(),
        params,
        value: value.to_string(),
    })
}

/// Finds the colon that separates name/params from value, skipping quoted
/// parameter values.
fn find_value_separator(line: &str) -> Option<usize> {
    let mut in_quotes = false;

    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => return Some(i),
            _ => {}
        }
    }

    None
}

fn parse_group(s: &str) -> (Option<&str>, &str) {
    if let Some((group, rest)) = s.split_once('.') {
        let head = rest.split(';').next().unwrap_or(rest);
        if !group.is_empty()
            && !head.is_empty()
            && group.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return (Some(group), rest);
        }
    }
    (None, s)
}

fn parse_parameters(s: &str, line_num: usize) -> ParseResult<Vec<VCardParameter>> {
    let mut params = Vec::new();
    let mut remaining = s;

    while !remaining.is_empty() {
        let (param, rest) = parse_single_parameter(remaining, line_num)?;
        if let Some(param) = param {
            params.push(param);
        }
        remaining = rest;
    }

    Ok(params)
}

/// Parses one parameter and returns the remainder of the parameter string.
fn parse_single_parameter(
    s: &str,
    line_num: usize,
) -> ParseResult<(Option<VCardParameter>, &str)> {
    let end = s.find([';', '=']).unwrap_or(s.len());

    if s[end..].starts_with('=') {
        let name = s[..end].trim();
        if name.is_empty() {
            return Err(ParseError::invalid_parameter(
                line_num,
                "parameter has a value but no name",
            ));
        }
        let (values, rest) = parse_param_values(&s[end + 1..]);
        return Ok((Some(VCardParameter::multi(name, values)), rest));
    }

    // vCard 2.1 allows a bare value such as `TEL;HOME;VOICE:`.
    let value = s[..end].trim();
    let rest = s.get(end + 1..).unwrap_or("");
    if value.is_empty() {
        return Ok((None, rest));
    }
    let name = nameless_parameter_name(value);
    Ok((Some(VCardParameter::new(name, value)), rest))
}

/// Resolves the parameter a bare 2.1 value belongs to.
fn nameless_parameter_name(value: &str) -> &'static str {
    match value.to_ascii_uppercase().as_str() {
        "QUOTED-PRINTABLE" | "BASE64" | "B" | "8BIT" | "7BIT" => "ENCODING",
        "INLINE" | "URL" | "URI" | "CONTENT-ID" | "CID" => "VALUE",
        _ => "TYPE",
    }
}

/// Parses comma-separated, possibly quoted, parameter values with RFC 6868
/// caret decoding.
fn parse_param_values(s: &str) -> (Vec<String>, &str) {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut end = s.len();

    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => values.push(decode_caret(&std::mem::take(&mut current))),
            ';' if !in_quotes => {
                end = i;
                break;
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() || !values.is_empty() {
        values.push(decode_caret(&current));
    }

    let rest = s.get(end + 1..).unwrap_or("");
    (values, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::vcard::text::error::ParseErrorKind;

    fn texts(lines: &[UnfoldedLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn unfold_crlf() {
        let lines = unfold_lines("FN:John\r\n Doe\r\nNOTE:x\r\n");
        assert_eq!(texts(&lines), vec!["FN:JohnDoe", "NOTE:x"]);
        assert_eq!(lines[1].line, 3);
    }

    #[test]
    fn unfold_bare_lf_and_tab() {
        let lines = unfold_lines("FN:John\n\tDoe\n");
        assert_eq!(texts(&lines), vec!["FN:JohnDoe"]);
    }

    #[test]
    fn unfold_filters_empty() {
        let lines = unfold_lines("LINE1:a\n\nLINE2:b\n");
        assert_eq!(texts(&lines), vec!["LINE1:a", "LINE2:b"]);
        assert_eq!(lines[1].line, 3);
    }

    #[test]
    fn unfold_quoted_printable_soft_break() {
        let input = "NOTE;ENCODING=QUOTED-PRINTABLE:line one=0D=0A=\r\nline two\r\nFN:x\r\n";
        let lines = unfold_lines(input);
        assert_eq!(
            texts(&lines),
            vec!["NOTE;ENCODING=QUOTED-PRINTABLE:line one=0D=0Aline two", "FN:x"]
        );
    }

    #[test]
    fn unfold_quoted_printable_indented_soft_break() {
        let input = "NOTE;QUOTED-PRINTABLE:abc=\r\n def\r\n";
        let lines = unfold_lines(input);
        assert_eq!(texts(&lines), vec!["NOTE;QUOTED-PRINTABLE:abcdef"]);
    }

    #[test]
    fn trailing_equals_without_qp_is_literal() {
        let lines = unfold_lines("NOTE:a=\r\nFN:b\r\n");
        assert_eq!(texts(&lines), vec!["NOTE:a=", "FN:b"]);
    }

    #[test]
    fn parse_simple_line() {
        let line = parse_content_line("FN:John Doe", 1).unwrap();
        assert!(line.group.is_none());
        assert_eq!(line.name, "FN");
        assert!(line.params.is_empty());
        assert_eq!(line.value, "John Doe");
    }

    #[test]
    fn parse_grouped_line() {
        let line = parse_content_line("item1.tel:+1-555-555-5555", 1).unwrap();
        assert_eq!(line.group, Some("item1".to_string()));
        assert_eq!(line.name, "TEL");
    }

    #[test]
    fn parse_with_parameters() {
        let line = parse_content_line("TEL;TYPE=home,voice;PREF=1:+1-555-555-5555", 1).unwrap();
        assert_eq!(line.params.len(), 2);
        assert_eq!(line.params[0].name, "TYPE");
        assert_eq!(line.params[0].values, vec!["home", "voice"]);
        assert_eq!(line.params[1].value(), Some("1"));
    }

    #[test]
    fn parse_nameless_parameters() {
        let line = parse_content_line("TEL;HOME;VOICE;QUOTED-PRINTABLE:555", 1).unwrap();
        let names: Vec<_> = line.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["TYPE", "TYPE", "ENCODING"]);
        assert_eq!(line.params[1].value(), Some("VOICE"));
    }

    #[test]
    fn parse_quoted_param_with_colon_and_caret() {
        let line = parse_content_line("ADR;LABEL=\"Main St:^nTown\":;;Main St", 1).unwrap();
        assert_eq!(line.params[0].value(), Some("Main St:\nTown"));
        assert_eq!(line.value, ";;Main St");
    }

    #[test]
    fn parse_colon_in_value() {
        let line = parse_content_line("URL:https://example.com:8080/path", 1).unwrap();
        assert_eq!(line.value, "https://example.com:8080/path");
    }

    #[test]
    fn missing_colon_is_error() {
        let err = parse_content_line("FN John", 4).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingSeparator);
        assert_eq!(err.line, 4);
    }

    #[test]
    fn invalid_name_is_error() {
        assert!(parse_content_line("F N:John", 1).is_err());
    }
}
