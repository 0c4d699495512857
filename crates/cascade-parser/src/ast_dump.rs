/// AST dumping utilities for testing and debugging
///
/// Provides human-readable tree representations of stylesheets.

use crate::ast::*;
use std::fmt::{self, Write as FmtWrite};

/// Display adapter printing a stylesheet as an indented tree
pub struct AstDump<'s>(pub &'s Stylesheet);

impl fmt::Display for AstDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.0, self.0.root(), 0)
    }
}

/// Dump a stylesheet AST as a pretty-printed tree
pub fn dump_stylesheet(sheet: &Stylesheet) -> String {
    AstDump(sheet).to_string()
}

fn write_node(out: &mut impl FmtWrite, sheet: &Stylesheet, id: NodeId, indent: usize) -> fmt::Result {
    // Pre-order over an explicit stack; children are pushed last-first
    let mut stack = vec![(id, indent)];
    while let Some((id, indent)) = stack.pop() {
        let Some(node) = sheet.get(id) else {
            continue;
        };
        write_line(out, node, indent)?;
        stack.extend(sheet.children(id).into_iter().rev().map(|child| (child, indent + 1)));
    }
    Ok(())
}

fn write_line(out: &mut impl FmtWrite, node: &Node, indent: usize) -> fmt::Result {
    let prefix = "  ".repeat(indent);
    match node {
        Node::Root(_) => writeln!(out, "{}Root:", prefix),
        Node::AtRule(at_rule) => {
            let body = if at_rule.has_body { "" } else { " (no body)" };
            if at_rule.params.is_empty() {
                writeln!(out, "{}AtRule: @{}{}", prefix, at_rule.name, body)
            } else {
                writeln!(out, "{}AtRule: @{} {:?}{}", prefix, at_rule.name, at_rule.params, body)
            }
        }
        Node::Rule(rule) => writeln!(out, "{}Rule: {:?}", prefix, rule.selector),
        Node::Declaration(decl) => {
            let important = if decl.important { " !important" } else { "" };
            writeln!(out, "{}Decl: {} = {:?}{}", prefix, decl.prop, decl.value, important)
        }
        Node::Comment(comment) => writeln!(out, "{}Comment: {:?}", prefix, comment.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, ParseOptions};

    #[test]
    fn test_dump_nested() {
        let sheet = parse(
            "@import 'a.css';\n@media screen {\n  a > b { color: red !important; }\n}\n/* done */",
            ParseOptions::default(),
        )
        .unwrap();
        let expected = "\
Root:
  AtRule: @import \"'a.css'\" (no body)
  AtRule: @media \"screen\"
    Rule: \"a > b\"
      Decl: color = \"red\" !important
  Comment: \"done\"
";
        assert_eq!(dump_stylesheet(&sheet), expected);
    }

    #[test]
    fn test_dump_empty() {
        let sheet = Stylesheet::new();
        assert_eq!(dump_stylesheet(&sheet), "Root:\n");
    }
}
