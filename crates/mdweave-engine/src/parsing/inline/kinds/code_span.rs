/// Code span inline type with owned delimiter constant.
///
/// A code span opens with a run of backticks and closes at the next run of
/// exactly the same length. No other inline parsing occurs inside.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';

    /// Given text starting at an opening run of `run` backticks, returns
    /// the content range and the total length up to the closing run.
    pub fn scan(s: &str, run: usize) -> Option<(usize, usize, usize)> {
        let bytes = s.as_bytes();
        let mut i = run;
        while i < bytes.len() {
            if bytes[i] != Self::TICK {
                i += 1;
                continue;
            }
            let start = i;
            while i < bytes.len() && bytes[i] == Self::TICK {
                i += 1;
            }
            if i - start == run {
                return Some((run, start, i));
            }
        }
        None
    }
}
