//! Line folding.

/// Default maximum line length in octets per RFC 6350.
pub const DEFAULT_LINE_OCTETS: usize = 75;

/// Folds a content line so no physical line exceeds `max_octets`.
///
/// Continuation lines start with a single space. Folds happen at UTF-8
/// character boundaries. A `max_octets` of zero disables folding.
#[must_use]
pub fn fold_line(line: &str, max_octets: usize) -> String {
    if max_octets < 2 || line.len() <= max_octets {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + line.len() / max_octets * 3);
    let mut current_len = 0;

    for c in line.chars() {
        let char_len = c.len_utf8();

        if current_len + char_len > max_octets && current_len > 1 {
            result.push_str("\r\n ");
            current_len = 1;
        }

        result.push(c);
        current_len += char_len;
    }

    result
}

/// Folds a quoted-printable content line with soft line breaks.
///
/// Each broken line ends in `=` and the next starts with a space. Encoded
/// `=XX` triplets are never split.
#[must_use]
pub fn fold_quoted_printable(line: &str, max_octets: usize) -> String {
    if max_octets < 5 || line.len() <= max_octets {
        return line.to_string();
    }

    // Room for the trailing soft break marker.
    let limit = max_octets - 1;
    let bytes = line.as_bytes();
    let mut result = String::with_capacity(line.len() + line.len() / limit * 4);
    let mut start = 0;
    let mut current_len = 0;
    let mut i = 0;

    while i < bytes.len() {
        let unit = if bytes[i] == b'=' && i + 2 < bytes.len() {
            3
        } else {
            1
        };
        if current_len + unit > limit && current_len > 1 {
            result.push_str(&line[start..i]);
            result.push_str("=\r\n ");
            start = i;
            current_len = 1;
        }
        current_len += unit;
        i += unit;
    }
    result.push_str(&line[start..]);

    result
}
