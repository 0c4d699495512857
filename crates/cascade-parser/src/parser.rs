//! Statement parser: turns the token stream into a [`Stylesheet`].
//!
//! Tokens are buffered until a statement boundary (`;`, `{`, `}` or end of
//! input) at paren/bracket depth zero, then the buffer becomes a rule,
//! at-rule or declaration. Open blocks are tracked on an explicit stack so
//! nesting depth never touches the call stack. All raw text is sliced
//! straight out of the input, which keeps the round trip exact.

use cascade_lexer::{Input, LexOptions, Position, Span, Token, TokenKind, Tokenizer};
use tracing::debug;

use crate::ast::{AtRule, Comment, Declaration, Node, NodeId, Raws, Rule, Stylesheet};
use crate::error::ParseError;

/// Options for parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Recover from malformed input instead of failing
    pub ignore_errors: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }
}

/// How the buffered statement ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator<'a> {
    Semicolon(Token<'a>),
    CloseBrace,
    EndOfFile,
}

/// An open container and where it started
#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    node: NodeId,
    start: Position,
}

pub struct Parser<'a> {
    input: &'a Input<'a>,
    tokenizer: Tokenizer<'a>,
    options: ParseOptions,
    sheet: Stylesheet,
    stack: Vec<OpenBlock>,
    /// Statement tokens collected since the last boundary
    buffer: Vec<Token<'a>>,
    /// Paren and bracket nesting inside the buffer
    depth: usize,
    /// Trivia waiting to become the next node's `before` or a block's `after`
    spaces: String,
    /// Whether the last non-comment statement of the current block ended with `;`
    semicolon: bool,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a Input<'a>, options: ParseOptions) -> Self {
        let tokenizer = Tokenizer::new(
            input,
            LexOptions::new().ignore_errors(options.ignore_errors),
        );
        let sheet = Stylesheet::new();
        let root = OpenBlock {
            node: sheet.root(),
            start: Position::start(),
        };
        Self {
            input,
            tokenizer,
            options,
            sheet,
            stack: vec![root],
            buffer: Vec::new(),
            depth: 0,
            spaces: String::new(),
            semicolon: false,
        }
    }

    pub fn parse(mut self) -> Result<Stylesheet, ParseError> {
        while let Some(token) = self.tokenizer.next_token()? {
            if self.buffer.is_empty() {
                self.start_token(token)?;
            } else {
                self.continue_token(token)?;
            }
        }
        self.end_file()?;
        Ok(self.sheet)
    }

    /// A token seen while no statement is being collected.
    fn start_token(&mut self, token: Token<'a>) -> Result<(), ParseError> {
        match token.kind {
            TokenKind::Space | TokenKind::Semicolon => self.spaces.push_str(token.text),
            TokenKind::Comment => self.comment(token),
            TokenKind::BraceOpen => self.open_block(token),
            TokenKind::BraceClose => self.close_block(token)?,
            _ => self.push(token),
        }
        Ok(())
    }

    /// A token seen while a statement is being collected.
    fn continue_token(&mut self, token: Token<'a>) -> Result<(), ParseError> {
        match token.kind {
            TokenKind::Semicolon if self.depth == 0 => {
                self.end_statement(Terminator::Semicolon(token))?;
            }
            TokenKind::BraceOpen => self.open_block(token),
            TokenKind::BraceClose => {
                self.end_statement(Terminator::CloseBrace)?;
                self.close_block(token)?;
            }
            _ => self.push(token),
        }
        Ok(())
    }

    fn push(&mut self, token: Token<'a>) {
        match token.kind {
            TokenKind::ParenOpen | TokenKind::BracketOpen => self.depth += 1,
            TokenKind::ParenClose | TokenKind::BracketClose => {
                self.depth = self.depth.saturating_sub(1)
            }
            _ => {}
        }
        self.buffer.push(token);
    }

    fn current(&self) -> NodeId {
        self.stack.last().map_or(self.sheet.root(), |block| block.node)
    }

    /// Attach a freshly built node to the current block, handing it the pending trivia.
    fn attach(&mut self, mut node: Node) -> NodeId {
        node.raws_mut().before = Some(std::mem::take(&mut self.spaces));
        if !matches!(node, Node::Comment(_)) {
            self.semicolon = false;
        }
        let parent = self.current();
        self.sheet.append_new(parent, node)
    }

    fn span(&self, start: Position, end: Position) -> Option<Span> {
        Some(Span::new(self.input.id(), start, end))
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input.css()[start..end]
    }

    fn comment(&mut self, token: Token<'a>) {
        let inner = &token.text[2..token.text.len() - 2];
        let text = inner.trim();
        let (left, right) = if text.is_empty() {
            (inner, "")
        } else {
            let left_len = inner.len() - inner.trim_start().len();
            let right_len = inner.len() - inner.trim_end().len();
            (&inner[..left_len], &inner[inner.len() - right_len..])
        };
        self.attach(Node::Comment(Comment {
            text: text.to_string(),
            span: self.span(token.span.start, token.span.end),
            raws: Raws {
                left: Some(left.to_string()),
                right: Some(right.to_string()),
                ..Raws::default()
            },
        }));
    }

    /// Index one past the last non-space token in the buffer.
    fn content_end(&self) -> usize {
        self.buffer
            .iter()
            .rposition(|t| t.kind != TokenKind::Space)
            .map_or(0, |i| i + 1)
    }

    /// `{`: the buffer becomes a rule or an at-rule with a body.
    fn open_block(&mut self, brace: Token<'a>) {
        let content_end = self.content_end();
        let buffer = std::mem::take(&mut self.buffer);
        self.depth = 0;
        let start = buffer.first().map_or(brace.span.start, |t| t.span.start);
        let between = buffer
            .get(content_end)
            .map_or("", |space| self.slice(space.start(), brace.start()));

        let node = match buffer.first() {
            Some(first) if first.kind == TokenKind::AtWord => {
                let (name, after_name, params) = self.at_rule_parts(&buffer[..content_end]);
                Node::AtRule(AtRule {
                    name,
                    params,
                    has_body: true,
                    span: None,
                    raws: Raws {
                        after_name: Some(after_name),
                        between: Some(between.to_string()),
                        ..Raws::default()
                    },
                })
            }
            _ => {
                let selector = match buffer[..content_end].last() {
                    Some(last) => self.slice(start.offset, last.end()),
                    None => "",
                };
                Node::Rule(Rule {
                    selector: selector.to_string(),
                    span: None,
                    raws: Raws {
                        between: Some(between.to_string()),
                        ..Raws::default()
                    },
                })
            }
        };

        let id = self.attach(node);
        if let Some(node) = self.sheet.get_mut(id) {
            *node.span_mut() = Some(Span::new(self.input.id(), start, brace.span.end));
        }
        self.stack.push(OpenBlock { node: id, start });
    }

    /// Split `@name after_name params` out of at-rule tokens (trailing space already cut).
    fn at_rule_parts(&self, tokens: &[Token<'a>]) -> (String, String, String) {
        let Some((at_word, rest)) = tokens.split_first() else {
            return (String::new(), String::new(), String::new());
        };
        let name = at_word.text[1..].to_string();
        let params_from = rest
            .iter()
            .position(|t| t.kind != TokenKind::Space)
            .unwrap_or(rest.len());
        let after_name = match (rest.first(), rest.get(params_from)) {
            (Some(first), Some(param)) => self.slice(first.start(), param.start()),
            _ => "",
        };
        let params = match (rest.get(params_from), rest.last()) {
            (Some(first), Some(last)) => self.slice(first.start(), last.end()),
            _ => "",
        };
        (name, after_name.to_string(), params.to_string())
    }

    /// `;`, `}` or end of input after a non-empty buffer: a declaration or a
    /// bodyless at-rule.
    fn end_statement(&mut self, terminator: Terminator<'a>) -> Result<(), ParseError> {
        let content_end = self.content_end();
        let buffer = std::mem::take(&mut self.buffer);
        self.depth = 0;
        let Some(first) = buffer.first().copied() else {
            return Ok(());
        };
        let content = &buffer[..content_end];
        let last = content.last().copied().unwrap_or(first);

        // Whitespace between the content and the terminator
        let trailing = self.slice(last.end(), buffer.last().map_or(last.end(), |t| t.end()));
        let (end, trailing_raw, pending) = match terminator {
            Terminator::Semicolon(semi) => (semi.span.end, trailing, ""),
            Terminator::CloseBrace | Terminator::EndOfFile => (last.span.end, "", trailing),
        };
        let has_semicolon = matches!(terminator, Terminator::Semicolon(_));

        if first.kind == TokenKind::AtWord {
            let (name, after_name, params) = self.at_rule_parts(content);
            self.attach(Node::AtRule(AtRule {
                name,
                params,
                has_body: false,
                span: self.span(first.span.start, end),
                raws: Raws {
                    after_name: Some(after_name),
                    between: Some(trailing_raw.to_string()),
                    ..Raws::default()
                },
            }));
        } else {
            match self.declaration(content) {
                Ok(mut decl) => {
                    decl.span = self.span(first.span.start, end);
                    decl.raws.after_value = Some(trailing_raw.to_string());
                    self.attach(Node::Declaration(decl));
                }
                Err(err) if self.options.ignore_errors => {
                    debug!(error = %err, "keeping malformed statement as raw text");
                    let text = self.slice(first.start(), last.end());
                    self.spaces.push_str(text);
                    self.spaces.push_str(trailing_raw);
                    if let Terminator::Semicolon(semi) = terminator {
                        self.spaces.push_str(semi.text);
                    }
                    self.spaces.push_str(pending);
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }

        if has_semicolon {
            self.semicolon = true;
        }
        self.spaces.push_str(pending);
        Ok(())
    }

    /// Build a declaration from its tokens, trailing whitespace excluded.
    fn declaration(&self, tokens: &[Token<'a>]) -> Result<Declaration, ParseError> {
        let first = tokens[0];
        let last = tokens[tokens.len() - 1];
        let Some(colon) = tokens.iter().position(|t| t.kind == TokenKind::Colon) else {
            return Err(ParseError::MissingColon {
                text: self.slice(first.start(), last.end()).to_string(),
                position: first.span.start,
            });
        };
        let prop_end = tokens[..colon]
            .iter()
            .rposition(|t| t.kind != TokenKind::Space)
            .map(|i| tokens[i].end());
        let Some(prop_end) = prop_end else {
            return Err(ParseError::MissingProperty {
                position: first.span.start,
            });
        };
        let prop = self.slice(first.start(), prop_end);

        let value_from = tokens[colon + 1..]
            .iter()
            .position(|t| !t.kind.is_trivia())
            .map(|i| colon + 1 + i);
        let (between, value) = match value_from {
            Some(i) => (
                self.slice(prop_end, tokens[i].start()),
                self.slice(tokens[i].start(), last.end()),
            ),
            None => (self.slice(prop_end, last.end()), ""),
        };

        let (value, important) = split_important(value);
        Ok(Declaration {
            prop: prop.to_string(),
            value: value.to_string(),
            important: important.is_some(),
            span: None,
            raws: Raws {
                between: Some(between.to_string()),
                important: important.map(str::to_string),
                ..Raws::default()
            },
        })
    }

    /// `}`: close the innermost block.
    fn close_block(&mut self, brace: Token<'a>) -> Result<(), ParseError> {
        if self.stack.len() <= 1 {
            if !self.options.ignore_errors {
                return Err(ParseError::UnexpectedCloseBrace {
                    position: brace.span.start,
                });
            }
            debug!(position = %brace.span.start, "keeping stray `}}` as raw text");
            self.spaces.push_str(brace.text);
            return Ok(());
        }
        if let Some(block) = self.stack.pop() {
            self.finish_block(block.node, Some(brace.span.end));
        }
        Ok(())
    }

    fn finish_block(&mut self, id: NodeId, end: Option<Position>) {
        let after = std::mem::take(&mut self.spaces);
        let semicolon = std::mem::take(&mut self.semicolon);
        if let Some(node) = self.sheet.get_mut(id) {
            let raws = node.raws_mut();
            raws.after = Some(after);
            raws.semicolon = Some(semicolon);
            if let (Some(span), Some(end)) = (node.span_mut().as_mut(), end) {
                span.end = end;
            }
        }
    }

    fn end_file(&mut self) -> Result<(), ParseError> {
        if !self.buffer.is_empty() {
            self.end_statement(Terminator::EndOfFile)?;
        }
        let eof = self.input.position_at(self.input.len());

        if self.stack.len() > 1 {
            let innermost = self.stack[self.stack.len() - 1];
            if !self.options.ignore_errors {
                return Err(ParseError::UnclosedBlock {
                    position: innermost.start,
                });
            }
            debug!(open = self.stack.len() - 1, "closing unclosed blocks at end of input");
            while self.stack.len() > 1 {
                if let Some(block) = self.stack.pop() {
                    self.finish_block(block.node, Some(eof));
                }
            }
        }

        let root = self.sheet.root();
        self.finish_block(root, None);
        self.sheet.root_node_mut().span = self.span(Position::start(), eof);
        Ok(())
    }
}

/// Split a trailing `!important` off a value.
///
/// Returns the value without it and the raw important text (leading
/// whitespace included) if present.
fn split_important(value: &str) -> (&str, Option<&str>) {
    let Some(bang) = value.rfind('!') else {
        return (value, None);
    };
    if !value[bang + 1..].trim().eq_ignore_ascii_case("important") {
        return (value, None);
    }
    let cut = value[..bang].trim_end().len();
    (&value[..cut], Some(&value[cut..]))
}

/// Parse CSS text into a stylesheet
pub fn parse(css: &str, options: ParseOptions) -> Result<Stylesheet, ParseError> {
    let input = Input::new(css);
    parse_input(&input, options)
}

/// Parse an [`Input`], keeping its id in every span
pub fn parse_input(input: &Input<'_>, options: ParseOptions) -> Result<Stylesheet, ParseError> {
    Parser::new(input, options).parse()
}
