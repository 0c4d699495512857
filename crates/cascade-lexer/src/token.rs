/// Lexical tokens produced by the tokenizer

use std::fmt;

use crate::input::Span;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifiers, numbers, hashes, `!important`, `url(...)` bodies and other punctuation
    Word,
    /// Quoted string including its quotes
    String,
    /// `/* ... */` including the delimiters
    Comment,
    /// `@` followed by an identifier
    AtWord,
    BraceOpen,
    BraceClose,
    ParenOpen,
    ParenClose,
    BracketOpen,
    BracketClose,
    Colon,
    Semicolon,
    /// `>`, `+` or `~`
    Combinator,
    /// A run of whitespace
    Space,
}

impl TokenKind {
    /// Whitespace and comments, which never carry meaning between other tokens.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Space | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Word => "word",
            TokenKind::String => "string",
            TokenKind::Comment => "comment",
            TokenKind::AtWord => "at-word",
            TokenKind::BraceOpen => "`{`",
            TokenKind::BraceClose => "`}`",
            TokenKind::ParenOpen => "`(`",
            TokenKind::ParenClose => "`)`",
            TokenKind::BracketOpen => "`[`",
            TokenKind::BracketClose => "`]`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Combinator => "combinator",
            TokenKind::Space => "space",
        };
        f.write_str(name)
    }
}

/// Token produced by the tokenizer: its kind, the raw text it covers and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Byte offset of the first byte.
    pub fn start(&self) -> usize {
        self.span.start.offset
    }

    /// Byte offset one past the last byte.
    pub fn end(&self) -> usize {
        self.span.end.offset
    }
}
