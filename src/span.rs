use miette::SourceSpan;

/// Byte range in the source plus the 1-based line/column of its first
/// character. Line and column travel with the span so that runtime
/// diagnostics can be reported without re-scanning the source.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(offset: usize, len: usize, line: usize, column: usize) -> Self {
        Span {
            offset,
            len,
            line,
            column,
        }
    }

    /// Covers both spans. Line/column come from whichever span starts first.
    pub fn join(self, other: Span) -> Span {
        let first = if self.offset <= other.offset { self } else { other };
        let start = self.offset.min(other.offset);
        let end = (self.offset + self.len).max(other.offset + other.len);
        Span {
            offset: start,
            len: end - start,
            line: first.line,
            column: first.column,
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Span::new(0, 0, 1, 1)
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.offset.into(), span.len)
    }
}
