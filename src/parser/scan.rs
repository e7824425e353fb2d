//! Byte-level scanning over normalized query text.
//!
//! The parser never tokenizes. It looks for operator characters on the
//! *surface* of a span: outside string literals and at bracket depth zero.
//! Everything here works on byte offsets. Only ASCII bytes are reported on
//! the surface, so a surface offset is always a char boundary.

/// Offsets of the characters at bracket depth zero that are not part of a
/// string literal. Opening and closing brackets of depth-one groups are
/// included; quote characters and the bytes of non-ASCII characters are not.
///
/// Returns `None` when brackets are unbalanced or mismatched, or a string
/// literal is left open.
pub(super) fn surface(text: &str) -> Option<Vec<usize>> {
    let mut positions = Vec::new();
    let mut stack: Vec<u8> = Vec::new();
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'"' | b'\'' => quote = Some(b),
            b'(' | b'[' | b'{' => {
                if stack.is_empty() {
                    positions.push(i);
                }
                stack.push(b);
            }
            b')' | b']' | b'}' => {
                let open = stack.pop()?;
                if closer_for(open) != b {
                    return None;
                }
                if stack.is_empty() {
                    positions.push(i);
                }
            }
            _ if stack.is_empty() && b.is_ascii() => positions.push(i),
            _ => {}
        }
    }

    if stack.is_empty() && quote.is_none() {
        Some(positions)
    } else {
        None
    }
}

fn closer_for(open: u8) -> u8 {
    match open {
        b'(' => b')',
        b'[' => b']',
        _ => b'}',
    }
}

/// Offset of the bracket closing the one opened at `open`.
pub(super) fn matching_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if !matches!(bytes.get(open), Some(b'(' | b'[' | b'{')) {
        return None;
    }

    let mut stack: Vec<u8> = Vec::new();
    let mut quote: Option<u8> = None;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }

        match b {
            b'"' | b'\'' => quote = Some(b),
            b'(' | b'[' | b'{' => stack.push(b),
            b')' | b']' | b'}' => {
                let opener = stack.pop()?;
                if closer_for(opener) != b {
                    return None;
                }
                if stack.is_empty() {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

/// Offset just past the string literal starting at `start`.
pub(super) fn string_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let quote = *bytes.get(start)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start + 1) {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == quote {
            return Some(i + 1);
        }
    }

    None
}

/// Split a span on a separator found on its surface. Returns the relative
/// `(start, end)` of each piece.
pub(super) fn split_surface(text: &str, separator: u8) -> Option<Vec<(usize, usize)>> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;

    for i in surface(text)? {
        if bytes[i] == separator {
            pieces.push((start, i));
            start = i + 1;
        }
    }
    pieces.push((start, text.len()));

    Some(pieces)
}

/// Length of the identifier at the start of `text`, 0 if there is none.
pub(super) fn identifier_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return 0,
    }
    bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count()
}

/// Length of the number literal at the start of `text`, 0 if there is none.
///
/// A `.` only belongs to the number when a digit follows it, so `1..3` scans
/// as `1`.
pub(super) fn number_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut len = digits(0);
    if len == 0 {
        return 0;
    }

    if bytes.get(len) == Some(&b'.') && bytes.get(len + 1).is_some_and(u8::is_ascii_digit) {
        len += 1 + digits(len + 1);
    }

    if matches!(bytes.get(len), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(len + 1), Some(b'+' | b'-')));
        let exponent = digits(len + 1 + sign);
        if exponent > 0 {
            len += 1 + sign + exponent;
        }
    }

    len
}

/// Decode the escape sequences of a string literal body.
pub(super) fn unescape(raw: &str) -> Option<String> {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        let decoded = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            '/' => '/',
            _ => return None,
        };
        result.push(decoded);
    }

    Some(result)
}
