//! CSS parser for the cascade engine.
//!
//! [`parse`] builds a [`Stylesheet`]: an arena tree of rules, at-rules,
//! declarations and comments that can be walked, edited and printed back.

pub mod ast;
pub mod ast_dump;
pub mod error;
pub mod list;
mod json;
mod parser;
mod walk;

pub use ast::*;
pub use error::{ParseError, TreeError};
pub use parser::{parse, parse_input, ParseOptions, Parser};
pub use walk::Walk;

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_lexer::{Input, InputId, SyntaxErrorKind};

    fn parse_ok(input: &str) -> Stylesheet {
        let result = parse(input, ParseOptions::default());
        assert!(result.is_ok(), "Failed to parse {:?}: {:?}", input, result.as_ref().err());
        result.unwrap()
    }

    fn only_child(sheet: &Stylesheet, id: NodeId) -> NodeId {
        let children = sheet.children(id);
        assert_eq!(children.len(), 1, "expected exactly one child");
        children[0]
    }

    #[test]
    fn test_parse_empty() {
        let sheet = parse_ok("");
        assert!(sheet.children(sheet.root()).is_empty());
        assert_eq!(sheet.root_node().raws.after.as_deref(), Some(""));
    }

    #[test]
    fn test_parse_whitespace_only() {
        let sheet = parse_ok("  \n ");
        assert!(sheet.children(sheet.root()).is_empty());
        assert_eq!(sheet.root_node().raws.after.as_deref(), Some("  \n "));
    }

    #[test]
    fn test_parse_simple_rule() {
        let sheet = parse_ok("a { color : red ; }");
        let rule = only_child(&sheet, sheet.root());
        let r = sheet.rule(rule).unwrap();
        assert_eq!(r.selector, "a");
        assert_eq!(r.raws.between.as_deref(), Some(" "));
        assert_eq!(r.raws.after.as_deref(), Some(" "));
        assert_eq!(r.raws.semicolon, Some(true));

        let decl = only_child(&sheet, rule);
        let d = sheet.decl(decl).unwrap();
        assert_eq!(d.prop, "color");
        assert_eq!(d.value, "red");
        assert!(!d.important);
        assert_eq!(d.raws.before.as_deref(), Some(" "));
        assert_eq!(d.raws.between.as_deref(), Some(" : "));
        assert_eq!(d.raws.after_value.as_deref(), Some(" "));
    }

    #[test]
    fn test_parse_spans() {
        let sheet = parse_ok("a {\n  color: red;\n}\n");
        let rule = only_child(&sheet, sheet.root());
        let span = sheet.get(rule).unwrap().span().unwrap();
        assert_eq!((span.start.line, span.start.column), (1, 1));
        assert_eq!((span.end.line, span.end.column, span.end.offset), (3, 2, 19));

        let decl = only_child(&sheet, rule);
        let span = sheet.get(decl).unwrap().span().unwrap();
        assert_eq!((span.start.line, span.start.column), (2, 3));
        assert_eq!(span.end.offset, 17);
    }

    #[test]
    fn test_parse_input_keeps_input_id() {
        let input = Input::with_id("a{}", InputId::from_raw(7));
        let sheet = parse_input(&input, ParseOptions::default()).unwrap();
        let rule = only_child(&sheet, sheet.root());
        assert_eq!(sheet.get(rule).unwrap().span().unwrap().input, InputId::from_raw(7));
    }

    #[test]
    fn test_parse_at_rules() {
        let sheet = parse_ok("@charset \"utf-8\";\n@media screen and (min-width: 1px) { a { b: c } }");
        let children = sheet.children(sheet.root());
        assert_eq!(children.len(), 2);

        let charset = sheet.at_rule(children[0]).unwrap();
        assert_eq!(charset.name, "charset");
        assert_eq!(charset.params, "\"utf-8\"");
        assert!(!charset.has_body);
        assert_eq!(charset.raws.after_name.as_deref(), Some(" "));

        let media = sheet.at_rule(children[1]).unwrap();
        assert_eq!(media.name, "media");
        assert_eq!(media.params, "screen and (min-width: 1px)");
        assert!(media.has_body);
        assert_eq!(sheet.children(children[1]).len(), 1);
    }

    #[test]
    fn test_parse_important() {
        let sheet = parse_ok("a{color:red!important;margin:0 ! IMPORTANT}");
        let rule = only_child(&sheet, sheet.root());
        let decls = sheet.children(rule);
        let color = sheet.decl(decls[0]).unwrap();
        assert_eq!((color.value.as_str(), color.important), ("red", true));
        let margin = sheet.decl(decls[1]).unwrap();
        assert_eq!((margin.value.as_str(), margin.important), ("0", true));
        assert_eq!(margin.raws.important.as_deref(), Some(" ! IMPORTANT"));
    }

    #[test]
    fn test_parse_semicolon_inside_parens() {
        let sheet = parse_ok("a{background:url(data:image/png;base64,AA==) no-repeat;b:c}");
        let rule = only_child(&sheet, sheet.root());
        let decls = sheet.children(rule);
        assert_eq!(decls.len(), 2);
        assert_eq!(sheet.decl(decls[0]).unwrap().value, "url(data:image/png;base64,AA==) no-repeat");
    }

    #[test]
    fn test_parse_comments() {
        let sheet = parse_ok("/* top */a{/*inner*/color:red /* in value */}");
        let children = sheet.children(sheet.root());
        let top = sheet.comment(children[0]).unwrap();
        assert_eq!(top.text, "top");
        assert_eq!(top.raws.left.as_deref(), Some(" "));
        assert_eq!(top.raws.right.as_deref(), Some(" "));

        let inner = sheet.children(children[1]);
        assert_eq!(sheet.comment(inner[0]).unwrap().text, "inner");
        assert_eq!(sheet.decl(inner[1]).unwrap().value, "red /* in value */");
    }

    #[test]
    fn test_parse_declaration_at_root() {
        let sheet = parse_ok("color: red; margin: 0");
        let children = sheet.children(sheet.root());
        assert_eq!(children.len(), 2);
        assert_eq!(sheet.decl(children[1]).unwrap().prop, "margin");
        assert_eq!(sheet.root_node().raws.semicolon, Some(false));
    }

    #[test]
    fn test_unterminated_string_strict() {
        let err = parse("\"unterminated", ParseOptions::default()).unwrap_err();
        match &err {
            ParseError::Syntax(e) => assert_eq!(e.kind, SyntaxErrorKind::UnclosedString),
            other => panic!("expected syntax error, got {:?}", other),
        }
        assert_eq!(err.position().offset, 0);
    }

    #[test]
    fn test_unclosed_block_strict() {
        let err = parse("a { color: red;", ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::UnclosedBlock { .. }));
        assert_eq!(err.position().offset, 0);
    }

    #[test]
    fn test_unclosed_block_recovered() {
        let sheet = parse("a { color: red;", ParseOptions::new().ignore_errors(true)).unwrap();
        let rule = only_child(&sheet, sheet.root());
        assert_eq!(sheet.rule(rule).unwrap().selector, "a");
        let span = sheet.get(rule).unwrap().span().unwrap();
        assert_eq!(span.end.offset, 15);
        assert_eq!(sheet.children(rule).len(), 1);
    }

    #[test]
    fn test_unclosed_block_reports_innermost() {
        let err = parse("a { b { c: d;", ParseOptions::default()).unwrap_err();
        assert_eq!(err.position().offset, 4);
    }

    #[test]
    fn test_unexpected_close_brace() {
        let err = parse("a{} }", ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedCloseBrace { .. }));
        assert_eq!(err.position().offset, 4);

        let sheet = parse("a{} }", ParseOptions::new().ignore_errors(true)).unwrap();
        assert_eq!(sheet.children(sheet.root()).len(), 1);
        assert_eq!(sheet.root_node().raws.after.as_deref(), Some(" }"));
    }

    #[test]
    fn test_missing_colon() {
        let err = parse("a{color red}", ParseOptions::default()).unwrap_err();
        match &err {
            ParseError::MissingColon { text, position } => {
                assert_eq!(text, "color red");
                assert_eq!(position.offset, 2);
            }
            other => panic!("expected missing colon, got {:?}", other),
        }

        let sheet = parse("a{color red; b: c}", ParseOptions::new().ignore_errors(true)).unwrap();
        let rule = only_child(&sheet, sheet.root());
        let decl = only_child(&sheet, rule);
        let d = sheet.decl(decl).unwrap();
        assert_eq!(d.prop, "b");
        assert_eq!(d.raws.before.as_deref(), Some("color red; "));
    }

    #[test]
    fn test_missing_property() {
        let err = parse("a{: red}", ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::MissingProperty { .. }));
        assert_eq!(err.position().offset, 2);
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 100_000;
        let css = format!("{}{}", "a{".repeat(depth), "}".repeat(depth));
        let started = std::time::Instant::now();
        let sheet = parse_ok(&css);
        // Linear in depth; a quadratic parse takes minutes here
        assert!(started.elapsed() < std::time::Duration::from_secs(10));

        let mut id = sheet.root();
        let mut levels = 0;
        while let Some(&child) = sheet.children(id).first() {
            id = child;
            levels += 1;
        }
        assert_eq!(levels, depth);
    }

    /// Every node reached by a walk is listed exactly once by its parent.
    fn assert_well_formed(sheet: &mut Stylesheet) -> usize {
        let mut nodes = 0;
        sheet.walk(|sheet, id| {
            let parent = sheet.parent(id).expect("walked node has a parent");
            let listed = sheet.children(parent).iter().filter(|&&child| child == id).count();
            assert_eq!(listed, 1, "node listed {} times by its parent", listed);
            assert!(sheet.get(parent).is_some_and(Node::is_container));
            assert!(sheet.is_attached(id));
            nodes += 1;
            Walk::Continue
        });
        assert_eq!(sheet.parent(sheet.root()), None);
        nodes
    }

    #[test]
    fn test_parsed_tree_is_well_formed() {
        let mut sheet = parse_ok(
            "/* head */\n@import 'a.css';\n@media screen {\n  /* in media */\n  a { b: c; d { e: f } }\n  g { h: i }\n}\nj { k: l }\n",
        );
        assert_eq!(assert_well_formed(&mut sheet), 12);

        // Remove the nested rule `d` from inside `a`
        let media = sheet.children(sheet.root())[2];
        let a = sheet.children(media)[1];
        let d = sheet.children(a)[1];
        assert_eq!(sheet.rule(d).map(|r| r.selector.as_str()), Some("d"));
        sheet.remove(d).unwrap();

        assert!(!sheet.children(a).contains(&d));
        assert_eq!(sheet.children(a).len(), 1);
        assert_eq!(sheet.parent(d), None);
        assert_eq!(assert_well_formed(&mut sheet), 10);
    }
}
