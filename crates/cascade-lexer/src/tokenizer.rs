//! The tokenizer: a forward-only cursor producing [`Token`]s from an [`Input`].
//!
//! Every byte of the input ends up in exactly one token, so concatenating the
//! token texts gives back the source. Scanning is a single pass; quote and
//! comment terminators are located with `memchr`.

use memchr::memmem;
use memchr::{memchr2, memchr_iter, memrchr};
use try_next::TryNextWithContext;

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::input::{count_chars, Input, InputId, Position, Span};
use crate::token::{Token, TokenKind};

/// Options for tokenizing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexOptions {
    /// Recover from unclosed strings, comments and urls instead of failing
    pub ignore_errors: bool,
}

impl LexOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }
}

/// Pull-based CSS tokenizer
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    css: &'a str,
    input: InputId,
    options: LexOptions,
    pos: usize,
    line: u32,
    column: u32,
    /// Tokens handed back with [`Tokenizer::back`], returned before scanning resumes
    returned: Vec<Token<'a>>,
    /// End offset of the previous token when it was the word `url`
    url_word_end: Option<usize>,
    /// The next token is an unquoted url body
    in_url: bool,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &Input<'a>, options: LexOptions) -> Self {
        Self {
            css: input.css(),
            input: input.id(),
            options,
            pos: 0,
            line: 1,
            column: 1,
            returned: Vec::new(),
            url_word_end: None,
            in_url: false,
            failed: false,
        }
    }

    pub fn input_id(&self) -> InputId {
        self.input
    }

    pub fn options(&self) -> LexOptions {
        self.options
    }

    /// Position of the next byte to be scanned.
    pub fn position(&self) -> Position {
        Position {
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    pub fn has_next(&self) -> bool {
        !self.returned.is_empty() || (!self.failed && self.pos < self.css.len())
    }

    pub fn end_of_file(&self) -> bool {
        !self.has_next()
    }

    /// Push a token back; it is returned by the next call to [`Tokenizer::next_token`].
    pub fn back(&mut self, token: Token<'a>) {
        self.returned.push(token);
    }

    /// Restart scanning at `offset` (clamped to the input and to a character boundary).
    pub fn seek(&mut self, offset: usize) {
        let mut offset = offset.min(self.css.len());
        while !self.css.is_char_boundary(offset) {
            offset -= 1;
        }
        self.returned.clear();
        self.url_word_end = None;
        self.in_url = false;
        self.failed = false;
        self.pos = 0;
        self.line = 1;
        self.column = 1;
        self.advance(offset);
    }

    /// Scan the next token. `Ok(None)` marks the end of input.
    ///
    /// After an error the tokenizer is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, SyntaxError> {
        if let Some(token) = self.returned.pop() {
            return Ok(Some(token));
        }
        if self.failed || self.pos >= self.css.len() {
            return Ok(None);
        }

        let css: &'a str = self.css;
        let bytes = css.as_bytes();
        let start = self.pos;

        if std::mem::take(&mut self.in_url) {
            self.url_word_end = None;
            return self.url_body(start).map(Some);
        }

        let (kind, end) = match bytes[start] {
            b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' => (TokenKind::Space, space_end(bytes, start)),
            b'{' => (TokenKind::BraceOpen, start + 1),
            b'}' => (TokenKind::BraceClose, start + 1),
            b'(' => {
                self.in_url = self.url_word_end == Some(start)
                    && bytes.get(start + 1).is_some_and(|&b| starts_url_body(b));
                (TokenKind::ParenOpen, start + 1)
            }
            b')' => (TokenKind::ParenClose, start + 1),
            b'[' => (TokenKind::BracketOpen, start + 1),
            b']' => (TokenKind::BracketClose, start + 1),
            b':' => (TokenKind::Colon, start + 1),
            b';' => (TokenKind::Semicolon, start + 1),
            b'>' | b'+' | b'~' => (TokenKind::Combinator, start + 1),
            quote @ (b'\'' | b'"') => match string_end(bytes, start, quote) {
                Some(end) => (TokenKind::String, end),
                None => return self.unclosed(SyntaxErrorKind::UnclosedString).map(Some),
            },
            b'@' => (TokenKind::AtWord, at_word_end(bytes, start + 1)),
            b'/' if bytes.get(start + 1) == Some(&b'*') => {
                match memmem::find(&bytes[start + 2..], b"*/") {
                    Some(rel) => (TokenKind::Comment, start + 2 + rel + 2),
                    None => return self.unclosed(SyntaxErrorKind::UnclosedComment).map(Some),
                }
            }
            _ => (TokenKind::Word, word_end(bytes, start)),
        };

        self.url_word_end = if kind == TokenKind::Word && css[start..end].eq_ignore_ascii_case("url") {
            Some(end)
        } else {
            None
        };

        Ok(Some(self.emit(kind, end)))
    }

    /// Body of an unquoted `url(...)`, up to the first unescaped `)`
    fn url_body(&mut self, start: usize) -> Result<Token<'a>, SyntaxError> {
        let css: &'a str = self.css;
        let bytes = css.as_bytes();
        let mut i = start;
        loop {
            match memchr2(b')', b'\\', &bytes[i..]) {
                Some(rel) if bytes[i + rel] == b'\\' => {
                    i = (i + rel + 2).min(bytes.len());
                }
                Some(rel) => return Ok(self.emit(TokenKind::Word, i + rel)),
                None => return self.unclosed(SyntaxErrorKind::UnclosedUrl),
            }
        }
    }

    /// Either fail at the current position or, when ignoring errors, turn the
    /// rest of the input into a single word.
    fn unclosed(&mut self, kind: SyntaxErrorKind) -> Result<Token<'a>, SyntaxError> {
        if self.options.ignore_errors {
            Ok(self.emit(TokenKind::Word, self.css.len()))
        } else {
            self.failed = true;
            Err(SyntaxError::new(kind, Tokenizer::position(self)))
        }
    }

    fn emit(&mut self, kind: TokenKind, end: usize) -> Token<'a> {
        let css: &'a str = self.css;
        let start = Tokenizer::position(self);
        let text = &css[start.offset..end];
        self.advance(end);
        Token::new(kind, text, Span::new(self.input, start, Tokenizer::position(self)))
    }

    /// Move to `end`, keeping line and column in step.
    fn advance(&mut self, end: usize) {
        let chunk = &self.css.as_bytes()[self.pos..end];
        match memrchr(b'\n', chunk) {
            Some(last) => {
                self.line += memchr_iter(b'\n', chunk).count() as u32;
                self.column = count_chars(&chunk[last + 1..]) + 1;
            }
            None => self.column += count_chars(chunk),
        }
        self.pos = end;
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

impl<'a> TryNextWithContext<()> for Tokenizer<'a> {
    type Item = Token<'a>;
    type Error = SyntaxError;

    fn try_next_with_context(&mut self, _context: &mut ()) -> Result<Option<Self::Item>, Self::Error> {
        self.next_token()
    }
}

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

#[inline]
fn starts_url_body(b: u8) -> bool {
    !is_space(b) && !matches!(b, b'\'' | b'"' | b')')
}

fn space_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| !is_space(b))
        .map_or(bytes.len(), |rel| start + rel)
}

/// End (exclusive) of the string opened at `start`, or `None` if it never closes
fn string_end(bytes: &[u8], start: usize, quote: u8) -> Option<usize> {
    let mut i = start + 1;
    loop {
        let at = i + memchr2(quote, b'\\', &bytes[i..])?;
        if bytes[at] == b'\\' {
            i = (at + 2).min(bytes.len());
        } else {
            return Some(at + 1);
        }
    }
}

fn at_word_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| {
            is_space(b)
                || matches!(
                    b,
                    b'"' | b'#' | b'\'' | b'(' | b')' | b'/' | b';' | b'[' | b'\\' | b']' | b'{' | b'}'
                )
        })
        .map_or(bytes.len(), |rel| from + rel)
}

#[inline]
fn is_word_delimiter(b: u8) -> bool {
    is_space(b)
        || matches!(
            b,
            b'!' | b'"' | b'\'' | b'#' | b'(' | b')' | b'[' | b']' | b'{' | b'}' | b':' | b';' | b'@' | b'>' | b'+' | b'~'
        )
}

/// End of a word starting at `start`. The first byte always belongs to the
/// word; a backslash takes the following byte with it.
fn word_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'/' if i > start && bytes.get(i + 1) == Some(&b'*') => return i,
            b if i > start && is_word_delimiter(b) => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}
