/// Link syntax shared by inline links (`[text](dest "title")`), reference
/// links (`[text][label]`) and reference definitions (`[label]: dest`).
pub struct LinkSyntax;

impl LinkSyntax {
    pub const OPEN: u8 = b'[';
    pub const CLOSE: u8 = b']';
    pub const MAX_LABEL_LEN: usize = 999;

    /// Scans a link label at the start of `s`. Returns the text between the
    /// brackets and the length including them. Labels may not contain
    /// unescaped brackets and must contain a non-whitespace char.
    pub fn label(s: &str) -> Option<(&str, usize)> {
        let bytes = s.as_bytes();
        if bytes.first() != Some(&Self::OPEN) {
            return None;
        }
        let mut i = 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if bytes.get(i + 1).is_some_and(u8::is_ascii_punctuation) => i += 2,
                Self::OPEN => return None,
                Self::CLOSE => {
                    let inner = &s[1..i];
                    if inner.len() > Self::MAX_LABEL_LEN || inner.trim().is_empty() {
                        return None;
                    }
                    return Some((inner, i + 1));
                }
                _ => i += 1,
            }
        }
        None
    }

    /// Scans a link destination: either `<...>` without line breaks, or a
    /// run of non-space chars with balanced parentheses. Returns the
    /// unescaped destination and the bytes consumed.
    pub fn destination(s: &str) -> Option<(String, usize)> {
        let bytes = s.as_bytes();
        if bytes.first() == Some(&b'<') {
            let mut i = 1;
            while i < bytes.len() {
                match bytes[i] {
                    b'\\' if bytes.get(i + 1).is_some_and(u8::is_ascii_punctuation) => i += 2,
                    b'>' => return Some((unescape(&s[1..i]), i + 1)),
                    b'<' | b'\n' => return None,
                    _ => i += 1,
                }
            }
            return None;
        }

        let mut depth = 0usize;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if bytes.get(i + 1).is_some_and(u8::is_ascii_punctuation) => i += 2,
                b'(' => {
                    depth += 1;
                    i += 1;
                }
                b')' if depth == 0 => break,
                b')' => {
                    depth -= 1;
                    i += 1;
                }
                b if b.is_ascii_whitespace() || b.is_ascii_control() => break,
                _ => i += 1,
            }
        }
        if i == 0 || depth != 0 {
            return None;
        }
        Some((unescape(&s[..i]), i))
    }

    /// Scans a title in `"..."`, `'...'` or `(...)`. Returns the unescaped
    /// title and the bytes consumed.
    pub fn title(s: &str) -> Option<(String, usize)> {
        let bytes = s.as_bytes();
        let close = match bytes.first()? {
            b'"' => b'"',
            b'\'' => b'\'',
            b'(' => b')',
            _ => return None,
        };
        let mut i = 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if bytes.get(i + 1).is_some_and(u8::is_ascii_punctuation) => i += 2,
                b if b == close => return Some((unescape(&s[1..i]), i + 1)),
                b'(' if close == b')' => return None,
                _ => i += 1,
            }
        }
        None
    }
}

/// Removes backslashes that escape ASCII punctuation.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_punctuation() {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Canonical form used to match reference labels: surrounding whitespace
/// trimmed, inner whitespace runs collapsed, case folded.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("[foo] x", Some(("foo", 5)))]
    #[case("[a\\]b]", Some(("a\\]b", 6)))]
    #[case("[a[b]", None)]
    #[case("[  ]", None)]
    #[case("[open", None)]
    fn labels(#[case] s: &str, #[case] expected: Option<(&str, usize)>) {
        assert_eq!(LinkSyntax::label(s), expected);
    }

    #[rstest]
    #[case("/url rest", Some(("/url", 4)))]
    #[case("<my url>", Some(("my url", 8)))]
    #[case("a(b)c)", Some(("a(b)c", 5)))]
    #[case("a(b", None)]
    #[case("\\*x", Some(("*x", 3)))]
    #[case("", None)]
    fn destinations(#[case] s: &str, #[case] expected: Option<(&str, usize)>) {
        assert_eq!(
            LinkSyntax::destination(s),
            expected.map(|(d, n)| (d.to_string(), n))
        );
    }

    #[rstest]
    #[case("\"t\" x", Some(("t", 3)))]
    #[case("'it\\'s'", Some(("it's", 7)))]
    #[case("(paren)", Some(("paren", 7)))]
    #[case("\"open", None)]
    #[case("plain", None)]
    fn titles(#[case] s: &str, #[case] expected: Option<(&str, usize)>) {
        assert_eq!(
            LinkSyntax::title(s),
            expected.map(|(t, n)| (t.to_string(), n))
        );
    }

    #[test]
    fn labels_normalize_case_and_space() {
        assert_eq!(normalize_label("  Foo \n  BAR "), "foo bar");
    }
}
