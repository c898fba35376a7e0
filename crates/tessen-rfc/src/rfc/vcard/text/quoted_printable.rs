//! Quoted-printable codec for vCard 2.1 values.

/// Encodes text as quoted-printable using its UTF-8 bytes.
///
/// Printable ASCII other than `=` passes through. Everything else, including
/// line breaks, becomes an `=XX` triplet.
#[must_use]
pub fn encode(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let bytes = text.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        let trailing_space = (b == b' ' || b == b'\t') && i + 1 == bytes.len();
        if (b == b' ' || b.is_ascii_graphic()) && b != b'=' && !trailing_space {
            result.push(char::from(b));
        } else {
            result.push('=');
            result.push_str(&hex::encode_upper([b]));
        }
    }

    result
}

/// Decodes a quoted-printable value into raw bytes.
///
/// Soft line breaks (`=` followed by a line break or at the end) are dropped.
///
/// ## Errors
/// Returns a message when an `=` is followed by something other than two hex
/// digits.
pub fn decode(encoded: &str) -> Result<Vec<u8>, String> {
    let bytes = encoded.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            result.push(bytes[i]);
            i += 1;
            continue;
        }

        let rest = &bytes[i + 1..];
        match rest {
            [] => break,
            [b'\r', b'\n', ..] => i += 3,
            [b'\n', ..] => i += 2,
            [hi, lo, ..] => {
                let decoded = hex::decode([*hi, *lo])
                    .map_err(|e| format!("invalid quoted-printable sequence at {i}: {e}"))?;
                result.extend_from_slice(&decoded);
                i += 3;
            }
            [_] => return Err(format!("truncated quoted-printable sequence at {i}")),
        }
    }

    Ok(result)
}

/// Converts decoded bytes to text using a CHARSET parameter value.
///
/// Returns the text and whether the charset was recognized. Unknown charsets
/// fall back to lossy UTF-8.
#[must_use]
pub fn decode_charset(bytes: &[u8], charset: Option<&str>) -> (String, bool) {
    let charset = charset.map(str::to_ascii_lowercase);
    match charset.as_deref() {
        None | Some("utf-8" | "utf8" | "us-ascii" | "ascii") => {
            (String::from_utf8_lossy(bytes).into_owned(), true)
        }
        Some("iso-8859-1" | "latin1" | "iso8859-1" | "windows-1252" | "cp1252") => {
            (bytes.iter().copied().map(char::from).collect(), true)
        }
        Some(_) => (String::from_utf8_lossy(bytes).into_owned(), false),
    }
}
