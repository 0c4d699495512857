/// Stylesheet to CSS text
///
/// The default mode replays the raws captured by the parser, so an unedited
/// tree prints back byte for byte. Nodes built in code have no raws and get
/// a conventional layout instead. Minimized mode ignores raws altogether.

use std::fmt::{self, Write};

use cascade_parser::{AtRule, Comment, Declaration, Node, NodeId, Rule, Stylesheet};

use crate::minify;
use crate::px2rem::px_to_rem;

pub const DEFAULT_ROOT_VALUE: u32 = 16;

const INDENT: &str = "    ";

/// Options for stringifying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringifyOptions {
    /// Drop comments and all optional whitespace
    pub minimize: bool,
    /// Rewrite px lengths in declaration values to rem
    pub px2rem: bool,
    /// Pixels per rem for px2rem
    pub root_value: u32,
}

impl Default for StringifyOptions {
    fn default() -> Self {
        Self {
            minimize: false,
            px2rem: false,
            root_value: DEFAULT_ROOT_VALUE,
        }
    }
}

impl StringifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimize(mut self, minimize: bool) -> Self {
        self.minimize = minimize;
        self
    }

    pub fn px2rem(mut self, px2rem: bool) -> Self {
        self.px2rem = px2rem;
        self
    }

    pub fn root_value(mut self, root_value: u32) -> Self {
        self.root_value = root_value;
        self
    }
}

/// Output still to be written, kept on an explicit stack so nesting depth
/// never touches the call stack.
#[derive(Debug, Clone, Copy)]
enum Step<'s> {
    /// A node preceded by its `before` trivia
    Node {
        id: NodeId,
        depth: usize,
        semicolon: bool,
        first_in_root: bool,
    },
    /// The `after` trivia and closing brace of a block
    Close {
        id: NodeId,
        after: Option<&'s str>,
        depth: usize,
    },
}

/// CSS generator over a stylesheet. Implements [`fmt::Display`].
pub struct Stringifier<'s> {
    sheet: &'s Stylesheet,
    options: StringifyOptions,
}

impl<'s> Stringifier<'s> {
    pub fn new(sheet: &'s Stylesheet, options: StringifyOptions) -> Self {
        Self { sheet, options }
    }

    /// Write the whole stylesheet to `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> fmt::Result {
        let root = self.sheet.root();
        let mut steps = Vec::new();
        self.push_children(&mut steps, root, 0);
        self.run(out, steps)?;
        if !self.options.minimize {
            let after = self.sheet.root_node().raws.after.as_deref().unwrap_or("");
            out.write_str(after)?;
        }
        Ok(())
    }

    /// Write the subtree at `id` on its own, without its `before` trivia.
    pub fn write_node<W: Write>(&self, out: &mut W, id: NodeId) -> fmt::Result {
        if id == self.sheet.root() {
            return self.write_to(out);
        }
        let depth = self.sheet.depth(id);
        let mut steps = Vec::new();
        self.open(out, &mut steps, id, depth, !self.options.minimize)?;
        self.run(out, steps)
    }

    fn run<W: Write>(&self, out: &mut W, mut steps: Vec<Step<'s>>) -> fmt::Result {
        while let Some(step) = steps.pop() {
            match step {
                Step::Node {
                    id,
                    depth,
                    semicolon,
                    first_in_root,
                } => {
                    if !self.options.minimize {
                        self.before(out, id, first_in_root, depth)?;
                    }
                    self.open(out, &mut steps, id, depth, semicolon)?;
                }
                Step::Close { id, after, depth } => self.close(out, id, after, depth)?,
            }
        }
        Ok(())
    }

    /// Queue the children of `container` so they pop in document order.
    fn push_children(&self, steps: &mut Vec<Step<'s>>, container: NodeId, depth: usize) {
        let minimize = self.options.minimize;
        let children: Vec<NodeId> = self
            .sheet
            .children(container)
            .into_iter()
            .filter(|&child| !(minimize && self.sheet.comment(child).is_some()))
            .collect();
        let last = children
            .iter()
            .rposition(|&child| self.sheet.comment(child).is_none());
        let is_root = container == self.sheet.root();
        let raw_semicolon = self
            .sheet
            .get(container)
            .and_then(|node| node.raws().semicolon)
            .unwrap_or(false);

        for (i, &child) in children.iter().enumerate().rev() {
            let is_last = last == Some(i);
            let semicolon = if minimize {
                !is_last || is_root
            } else {
                !is_last || raw_semicolon
            };
            steps.push(Step::Node {
                id: child,
                depth,
                semicolon,
                first_in_root: i == 0 && is_root,
            });
        }
    }

    fn before<W: Write>(&self, out: &mut W, id: NodeId, first_in_root: bool, depth: usize) -> fmt::Result {
        let raw = self.sheet.get(id).and_then(|node| node.raws().before.as_deref());
        match raw {
            Some(before) => out.write_str(before),
            None if first_in_root => Ok(()),
            None => newline_indent(out, depth),
        }
    }

    /// Write a node up to its body; blocks queue their children and closing brace.
    fn open<W: Write>(
        &self,
        out: &mut W,
        steps: &mut Vec<Step<'s>>,
        id: NodeId,
        depth: usize,
        semicolon: bool,
    ) -> fmt::Result {
        let sheet = self.sheet;
        match sheet.get(id) {
            Some(Node::Rule(rule)) => self.rule(out, steps, id, rule, depth),
            Some(Node::AtRule(at_rule)) => self.at_rule(out, steps, id, at_rule, depth, semicolon),
            Some(Node::Declaration(decl)) => self.decl(out, decl, semicolon),
            Some(Node::Comment(comment)) => self.comment(out, comment),
            Some(Node::Root(_)) | None => Ok(()),
        }
    }

    fn rule<W: Write>(
        &self,
        out: &mut W,
        steps: &mut Vec<Step<'s>>,
        id: NodeId,
        rule: &'s Rule,
        depth: usize,
    ) -> fmt::Result {
        if self.options.minimize {
            out.write_str(&minify::selector(&rule.selector))?;
        } else {
            out.write_str(&rule.selector)?;
            out.write_str(rule.raws.between.as_deref().unwrap_or(" "))?;
        }
        self.block(out, steps, id, rule.raws.after.as_deref(), depth)
    }

    fn at_rule<W: Write>(
        &self,
        out: &mut W,
        steps: &mut Vec<Step<'s>>,
        id: NodeId,
        at_rule: &'s AtRule,
        depth: usize,
        semicolon: bool,
    ) -> fmt::Result {
        out.write_char('@')?;
        out.write_str(&at_rule.name)?;

        if self.options.minimize {
            let params = minify::params(&at_rule.params);
            if !params.is_empty() {
                out.write_char(' ')?;
                out.write_str(&params)?;
            }
            if at_rule.has_body {
                return self.block(out, steps, id, None, depth);
            }
            return if semicolon { out.write_char(';') } else { Ok(()) };
        }

        let default_after_name = if at_rule.params.is_empty() { "" } else { " " };
        out.write_str(at_rule.raws.after_name.as_deref().unwrap_or(default_after_name))?;
        out.write_str(&at_rule.params)?;

        if at_rule.has_body {
            out.write_str(at_rule.raws.between.as_deref().unwrap_or(" "))?;
            self.block(out, steps, id, at_rule.raws.after.as_deref(), depth)
        } else {
            out.write_str(at_rule.raws.between.as_deref().unwrap_or(""))?;
            if semicolon {
                out.write_char(';')?;
            }
            Ok(())
        }
    }

    /// `{`, then queue `children after }`
    fn block<W: Write>(
        &self,
        out: &mut W,
        steps: &mut Vec<Step<'s>>,
        id: NodeId,
        after: Option<&'s str>,
        depth: usize,
    ) -> fmt::Result {
        out.write_char('{')?;
        steps.push(Step::Close { id, after, depth });
        self.push_children(steps, id, depth + 1);
        Ok(())
    }

    fn close<W: Write>(&self, out: &mut W, id: NodeId, after: Option<&str>, depth: usize) -> fmt::Result {
        if !self.options.minimize {
            match after {
                Some(after) => out.write_str(after)?,
                None if self.sheet.children(id).is_empty() => {}
                None => newline_indent(out, depth)?,
            }
        }
        out.write_char('}')
    }

    fn decl<W: Write>(&self, out: &mut W, decl: &Declaration, semicolon: bool) -> fmt::Result {
        let value = if self.options.px2rem {
            px_to_rem(&decl.value, self.options.root_value)
        } else {
            decl.value.as_str().into()
        };

        out.write_str(&decl.prop)?;
        if self.options.minimize {
            out.write_char(':')?;
            out.write_str(&minify::value(&value))?;
            if decl.important {
                out.write_str("!important")?;
            }
            if semicolon {
                out.write_char(';')?;
            }
            return Ok(());
        }

        out.write_str(decl.raws.between.as_deref().unwrap_or(": "))?;
        out.write_str(&value)?;
        if decl.important {
            out.write_str(decl.raws.important.as_deref().unwrap_or(" !important"))?;
        }
        if semicolon {
            out.write_str(decl.raws.after_value.as_deref().unwrap_or(""))?;
            out.write_char(';')?;
        }
        Ok(())
    }

    fn comment<W: Write>(&self, out: &mut W, comment: &Comment) -> fmt::Result {
        out.write_str("/*")?;
        out.write_str(comment.raws.left.as_deref().unwrap_or(" "))?;
        out.write_str(&comment.text)?;
        out.write_str(comment.raws.right.as_deref().unwrap_or(" "))?;
        out.write_str("*/")
    }
}

impl fmt::Display for Stringifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

fn newline_indent<W: Write>(out: &mut W, depth: usize) -> fmt::Result {
    out.write_char('\n')?;
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    Ok(())
}

/// Generate CSS text for a stylesheet
pub fn stringify(sheet: &Stylesheet, options: &StringifyOptions) -> String {
    Stringifier::new(sheet, *options).to_string()
}
