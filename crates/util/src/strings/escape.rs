const HEX: &[u8; 16] = b"0123456789abcdef";

/// Appends `s` to `out` with JSON string escaping applied.
///
/// Escapes control characters (0x00-0x1F), the double quote and the
/// backslash. Everything else, including non-ASCII text, is copied as-is.
fn escape_into(out: &mut String, s: &str) {
    let bytes = s.as_bytes();
    let mut last = 0;

    for (i, &b) in bytes.iter().enumerate() {
        let short = match b {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x08 => "\\b",
            0x0c => "\\f",
            0x00..=0x1f => "",
            _ => continue,
        };
        // Escapable bytes are ASCII, so `last..i` is a char boundary.
        out.push_str(&s[last..i]);
        if short.is_empty() {
            out.push_str("\\u00");
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0f) as usize] as char);
        } else {
            out.push_str(short);
        }
        last = i + 1;
    }

    out.push_str(&s[last..]);
}

/// Appends `s` to `out` as a quoted JSON string.
///
/// ```
/// use json_chain_util::quote_into;
///
/// let mut out = String::new();
/// quote_into(&mut out, "say \"hi\"\n");
/// assert_eq!(out, r#""say \"hi\"\n""#);
/// ```
pub fn quote_into(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('"');
    escape_into(out, s);
    out.push('"');
}
