//! Text value and parameter escaping.
//!
//! Scribes escape backslash, comma and semicolon. Newlines are left raw in
//! scribe output; the writer encodes them per version (`\n` at 3.0/4.0,
//! quoted-printable at 2.1).

/// Escapes a text value for a property value position.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ',' => result.push_str("\\,"),
            ';' => result.push_str("\\;"),
            _ => result.push(c),
        }
    }

    result
}

/// Unescapes a text value.
///
/// vCard escapes: \n, \N (newline), \, (comma), \; (semicolon), \\ (backslash).
/// Unknown sequences are kept verbatim.
#[must_use]
pub fn unescape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('n' | 'N') => {
                chars.next();
                result.push('\n');
            }
            Some(&next @ (',' | ';' | '\\')) => {
                chars.next();
                result.push(next);
            }
            _ => result.push(c),
        }
    }

    result
}

/// Replaces raw line breaks with the `\n` escape.
#[must_use]
pub fn escape_newlines(s: &str) -> String {
    s.replace("\r\n", "\\n").replace(['\r', '\n'], "\\n")
}

/// Splits a structured value on unescaped semicolons. Components stay escaped.
#[must_use]
pub fn split_structured(s: &str) -> Vec<&str> {
    split_unescaped(s, ';')
}

/// Splits a list value on unescaped commas and unescapes each item.
///
/// An empty input yields no items.
#[must_use]
pub fn split_list(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    split_unescaped(s, ',')
        .into_iter()
        .map(unescape_text)
        .collect()
}

/// Escapes and comma-joins list items.
#[must_use]
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| escape_text(item.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Joins structured components, each a list, into `a,b;c;d`.
#[must_use]
pub fn join_structured(components: &[&[String]]) -> String {
    components
        .iter()
        .map(|component| join_list(component))
        .collect::<Vec<_>>()
        .join(";")
}

fn split_unescaped(s: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == delimiter {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }

    parts.push(&s[start..]);
    parts
}

/// Escapes a parameter value for serialization.
///
/// With `caret` enabled, RFC 6868 caret encoding is applied; otherwise
/// characters that cannot appear in a parameter value are replaced.
/// Returns `(value, needs_quotes)`.
#[must_use]
pub fn escape_param_value(s: &str, caret: bool) -> (String, bool) {
    let mut result = String::with_capacity(s.len());
    let mut needs_quotes = false;
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '^' if caret => result.push_str("^^"),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => result.push_str(if caret { "^n" } else { " " }),
            '"' => {
                result.push_str(if caret { "^'" } else { "'" });
                needs_quotes |= caret;
            }
            ':' | ';' | ',' => {
                result.push(c);
                needs_quotes = true;
            }
            _ if c.is_control() => {}
            _ => result.push(c),
        }
    }

    (result, needs_quotes)
}

/// Decodes RFC 6868 caret escapes in a parameter value.
#[must_use]
pub fn decode_caret(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '^' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('n') => {
                chars.next();
                result.push('\n');
            }
            Some('\'') => {
                chars.next();
                result.push('"');
            }
            Some('^') => {
                chars.next();
                result.push('^');
            }
            _ => result.push('^'),
        }
    }

    result
}
