//! CSS tokenizer for the cascade engine.
//!
//! Turns an [`Input`] into a forward-only stream of [`Token`]s, each carrying
//! its raw text and a [`Span`] with byte offsets and line/column positions.

mod error;
mod input;
mod token;
mod tokenizer;

pub use error::{SyntaxError, SyntaxErrorKind};
pub use input::{Input, InputId, Position, Span};
pub use token::{Token, TokenKind};
pub use tokenizer::{LexOptions, Tokenizer};

/// Create a tokenizer over `input`
pub fn tokenize<'a>(input: &Input<'a>, options: LexOptions) -> Tokenizer<'a> {
    Tokenizer::new(input, options)
}

/// Tokenize a whole string into a vector
pub fn tokenize_str(css: &str, options: LexOptions) -> Result<Vec<Token<'_>>, SyntaxError> {
    let input = Input::new(css);
    tokenize(&input, options).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use try_next::TryNextWithContext;

    /// Helper to collect all token kinds from input
    fn collect_kinds(input: &str) -> Result<Vec<TokenKind>, SyntaxError> {
        let tokens = tokenize_str(input, LexOptions::default())?;
        Ok(tokens.into_iter().map(|t| t.kind).collect())
    }

    #[test]
    fn test_empty_input() -> Result<(), SyntaxError> {
        let kinds = collect_kinds("")?;
        assert!(kinds.is_empty());
        Ok(())
    }

    #[test]
    fn test_rule_tokens() -> Result<(), SyntaxError> {
        let kinds = collect_kinds("a { color: red; }")?;
        assert_eq!(kinds, vec![
            TokenKind::Word, TokenKind::Space,
            TokenKind::BraceOpen, TokenKind::Space,
            TokenKind::Word, TokenKind::Colon, TokenKind::Space,
            TokenKind::Word, TokenKind::Semicolon, TokenKind::Space,
            TokenKind::BraceClose,
        ]);
        Ok(())
    }

    #[test]
    fn test_at_rule_tokens() -> Result<(), SyntaxError> {
        let tokens = tokenize_str("@media (min-width: 10px){}", LexOptions::default())?;
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![
            TokenKind::AtWord, TokenKind::Space,
            TokenKind::ParenOpen, TokenKind::Word, TokenKind::Colon, TokenKind::Space,
            TokenKind::Word, TokenKind::ParenClose,
            TokenKind::BraceOpen, TokenKind::BraceClose,
        ]);
        assert_eq!(tokens[0].text, "@media");
        Ok(())
    }

    #[test]
    fn test_combinators_and_brackets() -> Result<(), SyntaxError> {
        let kinds = collect_kinds("a>b+c~d[x]")?;
        assert_eq!(kinds, vec![
            TokenKind::Word, TokenKind::Combinator,
            TokenKind::Word, TokenKind::Combinator,
            TokenKind::Word, TokenKind::Combinator,
            TokenKind::Word, TokenKind::BracketOpen, TokenKind::Word, TokenKind::BracketClose,
        ]);
        Ok(())
    }

    #[test]
    fn test_strings_and_comments() -> Result<(), SyntaxError> {
        let tokens = tokenize_str(r#"'a\'b' /* c */"d""#, LexOptions::default())?;
        let texts: Vec<_> = tokens.iter().map(|t| (t.kind, t.text)).collect();
        assert_eq!(texts, vec![
            (TokenKind::String, r#"'a\'b'"#),
            (TokenKind::Space, " "),
            (TokenKind::Comment, "/* c */"),
            (TokenKind::String, r#""d""#),
        ]);
        Ok(())
    }

    #[test]
    fn test_unquoted_url_is_one_word() -> Result<(), SyntaxError> {
        let tokens = tokenize_str("url(data:image/png;base64,AA==)", LexOptions::default())?;
        let texts: Vec<_> = tokens.iter().map(|t| (t.kind, t.text)).collect();
        assert_eq!(texts, vec![
            (TokenKind::Word, "url"),
            (TokenKind::ParenOpen, "("),
            (TokenKind::Word, "data:image/png;base64,AA=="),
            (TokenKind::ParenClose, ")"),
        ]);
        Ok(())
    }

    #[test]
    fn test_quoted_url_is_not_special() -> Result<(), SyntaxError> {
        let kinds = collect_kinds("url('a;b')")?;
        assert_eq!(kinds, vec![
            TokenKind::Word, TokenKind::ParenOpen, TokenKind::String, TokenKind::ParenClose,
        ]);
        Ok(())
    }

    #[test]
    fn test_unterminated_string_fails_at_quote() {
        let err = tokenize_str("\"unterminated", LexOptions::default()).unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnclosedString);
        assert_eq!(err.position.offset, 0);
    }

    #[test]
    fn test_unterminated_string_recovers_as_word() -> Result<(), SyntaxError> {
        let tokens = tokenize_str("\"unterminated", LexOptions::new().ignore_errors(true))?;
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[0].text, "\"unterminated");
        assert_eq!((tokens[0].start(), tokens[0].end()), (0, 13));
        Ok(())
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize_str("a /* open", LexOptions::default()).unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnclosedComment);
        assert_eq!(err.position.offset, 2);

        let tokens = tokenize_str("a /* open", LexOptions::new().ignore_errors(true)).unwrap();
        assert_eq!(tokens.last().map(|t| (t.kind, t.text)), Some((TokenKind::Word, "/* open")));
    }

    #[test]
    fn test_positions_track_lines() -> Result<(), SyntaxError> {
        let tokens = tokenize_str("a {\n  b: c;\n}", LexOptions::default())?;
        let b = tokens.iter().find(|t| t.text == "b").unwrap();
        assert_eq!((b.span.start.line, b.span.start.column), (2, 3));
        let close = tokens.last().unwrap();
        assert_eq!((close.span.start.line, close.span.start.column), (3, 1));
        assert_eq!((close.span.end.line, close.span.end.column), (3, 2));
        Ok(())
    }

    #[test]
    fn test_back_returns_token_again() -> Result<(), SyntaxError> {
        let input = Input::new("a b");
        let mut tokenizer = tokenize(&input, LexOptions::default());
        let first = tokenizer.next_token()?.unwrap();
        tokenizer.back(first);
        assert_eq!(tokenizer.next_token()?, Some(first));
        assert!(tokenizer.has_next());
        Ok(())
    }

    #[test]
    fn test_seek_restarts_with_positions() -> Result<(), SyntaxError> {
        let input = Input::new("a {\n  color: red;\n}");
        let mut tokenizer = tokenize(&input, LexOptions::default());
        tokenizer.seek(6);
        let token = tokenizer.next_token()?.unwrap();
        assert_eq!(token.text, "color");
        assert_eq!((token.span.start.line, token.span.start.column), (2, 3));
        Ok(())
    }

    #[test]
    fn test_position_follows_emitted_tokens() -> Result<(), SyntaxError> {
        let input = Input::new("a {\n  b: 'c");
        let mut tokenizer = tokenize(&input, LexOptions::default());
        while tokenizer.position().offset < 9 {
            let token = tokenizer.next_token()?.unwrap();
            assert_eq!(token.span.end, tokenizer.position());
        }
        let err = tokenizer.next_token().unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnclosedString);
        assert_eq!((err.position.offset, err.position.line, err.position.column), (9, 2, 6));
        assert_eq!(err.position, tokenizer.position());
        Ok(())
    }

    #[test]
    fn test_try_next_with_context() -> Result<(), SyntaxError> {
        let input = Input::new("a;");
        let mut tokenizer = tokenize(&input, LexOptions::default());
        let mut context = ();
        let mut kinds = Vec::new();
        while let Some(token) = tokenizer.try_next_with_context(&mut context)? {
            kinds.push(token.kind);
        }
        assert_eq!(kinds, vec![TokenKind::Word, TokenKind::Semicolon]);
        assert!(tokenizer.end_of_file());
        Ok(())
    }

    #[test]
    fn test_error_exhausts_tokenizer() {
        let input = Input::new("a 'b");
        let mut tokenizer = tokenize(&input, LexOptions::default());
        assert!(tokenizer.next_token().is_ok());
        assert!(tokenizer.next_token().is_ok());
        assert!(tokenizer.next_token().is_err());
        assert_eq!(tokenizer.next_token(), Ok(None));
        assert!(tokenizer.end_of_file());
    }
}
