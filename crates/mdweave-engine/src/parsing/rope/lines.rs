use super::span::Span;

/// A single source line: its full span (terminator included) and where the
/// terminator begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRef {
    /// Byte span of this line, including `\n`, `\r\n` or `\r` if present.
    pub span: Span,
    /// Offset of the first terminator byte, or `span.end` for an
    /// unterminated final line.
    pub eol: usize,
}

impl LineRef {
    /// The line without its terminator.
    #[must_use]
    pub fn content(self) -> Span {
        Span::new(self.span.start, self.eol)
    }

    /// Byte length of the terminator (0, 1 or 2).
    #[must_use]
    pub fn eol_len(self) -> usize {
        self.span.end - self.eol
    }
}

/// Returns an iterator over lines with their byte spans.
///
/// Recognises `\n`, `\r\n` and lone `\r` as terminators. Text after the last
/// terminator forms a final line; an empty input yields no lines.
pub fn lines_with_spans(text: &str) -> impl Iterator<Item = LineRef> + '_ {
    let bytes = text.as_bytes();
    let mut offset = 0usize;
    std::iter::from_fn(move || {
        if offset >= bytes.len() {
            return None;
        }
        let start = offset;
        let mut i = start;
        while i < bytes.len() && bytes[i] != b'\n' && bytes[i] != b'\r' {
            i += 1;
        }
        let eol = i;
        if i < bytes.len() {
            i += if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                2
            } else {
                1
            };
        }
        offset = i;
        Some(LineRef {
            span: Span::new(start, i),
            eol,
        })
    })
}
