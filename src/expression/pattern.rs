/// Decode the byte following a backslash in a SQL string literal.
///
/// Returns `None` for bytes with no special meaning; those escape to
/// themselves (`\%` is a literal `%`, `\x` is `x`).
#[inline]
pub fn sql_unescape(escaped: u8) -> Option<u8> {
    match escaped {
        b'0' => Some(0x00),
        b'\'' => Some(b'\''),
        b'"' => Some(b'"'),
        b'b' => Some(0x08),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        b'Z' => Some(0x1a),
        b'\\' => Some(b'\\'),
        _ => None,
    }
}

/// Literal prefix of a LIKE pattern.
///
/// Copies bytes up to the first unescaped `%` or `_`, decoding backslash
/// escapes on the way. A lone trailing backslash is kept as is.
pub fn literal_prefix(pattern: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pattern.len());
    let mut i = 0;

    while i < pattern.len() {
        match pattern[i] {
            b'%' | b'_' => break,
            b'\\' => {
                let Some(&next) = pattern.get(i + 1) else {
                    out.push(b'\\');
                    break;
                };
                out.push(sql_unescape(next).unwrap_or(next));
                i += 2;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_at_first_wildcard() {
        assert_eq!(literal_prefix(b"abc%"), b"abc");
        assert_eq!(literal_prefix(b"ab_d%"), b"ab");
        assert_eq!(literal_prefix(b"%abc"), b"");
        assert_eq!(literal_prefix(b"plain"), b"plain");
        assert_eq!(literal_prefix(b""), b"");
    }

    #[test]
    fn test_escaped_wildcards_are_literal() {
        assert_eq!(literal_prefix(br"ab\%cd%ef"), b"ab%cd");
        assert_eq!(literal_prefix(br"a\_b_"), b"a_b");
    }

    #[test]
    fn test_control_escapes_decode() {
        assert_eq!(literal_prefix(br"a\nb\tc\0d\Z%"), b"a\nb\tc\x00d\x1a");
        assert_eq!(literal_prefix(br"a\\%"), br"a\");
        assert_eq!(literal_prefix(br"it\'s%"), b"it's");
    }

    #[test]
    fn test_unknown_escape_yields_character() {
        assert_eq!(literal_prefix(br"\x\y%"), b"xy");
    }

    #[test]
    fn test_trailing_backslash_is_kept() {
        assert_eq!(literal_prefix(br"abc\"), br"abc\");
    }

    #[test]
    fn test_long_backslash_runs() {
        // six backslashes decode to three, then the unescaped % stops the scan
        assert_eq!(literal_prefix(br"\\\\\\%x"), br"\\\");
        // seven backslashes: three literal, then an escaped %
        assert_eq!(literal_prefix(br"\\\\\\\%x"), br"\\\%x");
    }
}
