/// Integration tests for the tokenizer over whole stylesheets

use cascade_lexer::{tokenize, tokenize_str, Input, LexOptions, SyntaxErrorKind, TokenKind};

fn concat(css: &str, options: LexOptions) -> String {
    let tokens = tokenize_str(css, options).expect("tokenize failed");
    tokens.iter().map(|t| t.text).collect()
}

#[test]
fn test_tokens_cover_input() {
    let inputs = [
        "",
        "a{color:red}",
        "@media screen and (min-width: 100px) {\n  a > b ~ c + d { x: y !important; }\n}\n",
        "/* c */ a[href^='http'] { background: url(data:image/png;base64,AA==) }",
        "a { content: \"\\\"quoted\\\"\"; font: 12px/1.5 'Helvetica Neue', sans-serif }",
        "\t\r\n\x0c  .a\\:b#c { }",
        "h1::before{content:'→'}",
    ];
    for css in inputs {
        assert_eq!(concat(css, LexOptions::default()), css, "coverage of {:?}", css);
    }
}

#[test]
fn test_recovered_tokens_cover_input() {
    for css in ["a { b: \"open", "/* never closed", "a { b: url(x.png", "'"] {
        assert_eq!(concat(css, LexOptions::new().ignore_errors(true)), css);
    }
}

#[test]
fn test_spans_are_contiguous() {
    let css = "a {\n  b: c;\n}\n/* d */";
    let tokens = tokenize_str(css, LexOptions::default()).expect("tokenize failed");
    let mut offset = 0;
    for token in &tokens {
        assert_eq!(token.start(), offset);
        assert_eq!(&css[token.start()..token.end()], token.text);
        offset = token.end();
    }
    assert_eq!(offset, css.len());
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Comment));
}

#[test]
fn test_unclosed_url_fails() {
    let input = Input::new("a { b: url(x.png }");
    let err = tokenize(&input, LexOptions::default())
        .collect::<Result<Vec<_>, _>>()
        .unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::UnclosedUrl);
}

#[test]
fn test_has_next_and_end_of_file() {
    let input = Input::new("a b");
    let mut tokenizer = tokenize(&input, LexOptions::default());
    assert!(tokenizer.has_next());
    let mut count = 0;
    while let Some(token) = tokenizer.next_token().expect("tokenize failed") {
        assert!(!token.text.is_empty());
        count += 1;
    }
    assert_eq!(count, 3);
    assert!(tokenizer.end_of_file());
    assert!(!tokenizer.has_next());
}
