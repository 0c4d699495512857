/// Source inputs and positions within them

use std::cell::OnceCell;
use std::fmt;
use std::ops::Range;

/// Identifies the input a span was taken from.
///
/// A single parse only ever sees one input; the id is carried so spans from
/// several stylesheets can later be told apart by whoever owns the inputs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default)]
pub struct InputId(pub u32);

impl InputId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InputId({})", self.0)
    }
}

/// A location in the source: byte offset plus 1-based line and column.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// The position of the first byte of any input.
    pub const fn start() -> Self {
        Self { offset: 0, line: 1, column: 1 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Start and end of a token or node in the input identified by `input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub input: InputId,
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(input: InputId, start: Position, end: Position) -> Self {
        Self { input, start, end }
    }

    /// Byte range covered by this span.
    pub fn range(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// CSS source text together with its input id.
#[derive(Debug, Clone)]
pub struct Input<'a> {
    id: InputId,
    css: &'a str,
    /// Byte offsets of every line start, built on the first position lookup
    line_starts: OnceCell<Vec<usize>>,
}

impl<'a> Input<'a> {
    pub fn new(css: &'a str) -> Self {
        Self::with_id(css, InputId::default())
    }

    pub fn with_id(css: &'a str, id: InputId) -> Self {
        Self {
            id,
            css,
            line_starts: OnceCell::new(),
        }
    }

    pub fn id(&self) -> InputId {
        self.id
    }

    pub fn css(&self) -> &'a str {
        self.css
    }

    pub fn len(&self) -> usize {
        self.css.len()
    }

    pub fn is_empty(&self) -> bool {
        self.css.is_empty()
    }

    /// Resolve a byte offset to a line/column position.
    ///
    /// Offsets past the end are clamped to the end of the input; offsets
    /// inside a multi-byte character resolve to that character.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.css.len());
        let line_starts = self.line_starts.get_or_init(|| build_line_starts(self.css));
        let line = match line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = line_starts[line];
        let column = count_chars(&self.css.as_bytes()[line_start..offset]) + 1;
        Position {
            offset,
            line: line as u32 + 1,
            column,
        }
    }

    /// Re-derive the raw text of a span taken from this input.
    ///
    /// Returns `None` if the span belongs to another input or does not fit.
    pub fn slice(&self, span: &Span) -> Option<&'a str> {
        if span.input != self.id {
            return None;
        }
        self.css.get(span.range())
    }
}

fn build_line_starts(css: &str) -> Vec<usize> {
    let mut line_starts = vec![0];
    line_starts.extend(memchr::memchr_iter(b'\n', css.as_bytes()).map(|i| i + 1));
    line_starts
}

/// Number of characters in a UTF-8 byte slice (continuation bytes skipped).
pub(crate) fn count_chars(bytes: &[u8]) -> u32 {
    bytes.iter().filter(|&&b| (b & 0xC0) != 0x80).count() as u32
}
