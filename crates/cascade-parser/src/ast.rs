/// Syntax tree for parsed stylesheets
///
/// Nodes live in an [`indextree`] arena owned by [`Stylesheet`]; parents and
/// children refer to each other by [`NodeId`]. Every node keeps the raw
/// formatting trivia around it in [`Raws`] so an unedited tree prints back
/// byte for byte.

use cascade_lexer::Span;
use indextree::Arena;

use crate::error::TreeError;

pub use indextree::NodeId;

/// Formatting trivia around a node.
///
/// Which fields are meaningful depends on the node:
/// - every non-root node: `before`
/// - rules: `between`, `after`, `semicolon`
/// - at-rules: `after_name`, `between`, `after`, `semicolon`
/// - declarations: `between`, `important`, `after_value`
/// - comments: `left`, `right`
/// - root: `after`, `semicolon`
///
/// `None` means "not taken from source"; the stringifier fills in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raws {
    /// Whitespace (and stray `;`) before the node
    pub before: Option<String>,
    /// Rule/at-rule: text between selector or params and `{` (or `;`).
    /// Declaration: text between the property and value, including the `:`
    pub between: Option<String>,
    /// Text between the last child and the closing `}`
    pub after: Option<String>,
    /// Whitespace between an at-rule name and its params
    pub after_name: Option<String>,
    /// Whether the last statement in the block ended with `;`
    pub semicolon: Option<bool>,
    /// The `!important` text as written, including leading whitespace
    pub important: Option<String>,
    /// Whitespace between a declaration value and its `;`
    pub after_value: Option<String>,
    /// Whitespace after `/*`
    pub left: Option<String>,
    /// Whitespace before `*/`
    pub right: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Root {
    pub span: Option<Span>,
    pub raws: Raws,
}

/// `@name params { ... }` or `@name params;`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtRule {
    /// Name without the leading `@`
    pub name: String,
    pub params: String,
    pub has_body: bool,
    pub span: Option<Span>,
    pub raws: Raws,
}

/// `selector { ... }`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub span: Option<Span>,
    pub raws: Raws,
}

/// `prop: value` with an optional `!important`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    pub important: bool,
    pub span: Option<Span>,
    pub raws: Raws,
}

/// `/* text */`, text without the delimiters and surrounding whitespace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Option<Span>,
    pub raws: Raws,
}

/// A node in the stylesheet tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Root(Root),
    AtRule(AtRule),
    Rule(Rule),
    Declaration(Declaration),
    Comment(Comment),
}

/// Node kind, without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    AtRule,
    Rule,
    Declaration,
    Comment,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::AtRule => "atrule",
            NodeKind::Rule => "rule",
            NodeKind::Declaration => "decl",
            NodeKind::Comment => "comment",
        }
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Root(_) => NodeKind::Root,
            Node::AtRule(_) => NodeKind::AtRule,
            Node::Rule(_) => NodeKind::Rule,
            Node::Declaration(_) => NodeKind::Declaration,
            Node::Comment(_) => NodeKind::Comment,
        }
    }

    /// Root, rules and at-rules can hold children.
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Root(_) | Node::AtRule(_) | Node::Rule(_))
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Node::Root(n) => n.span,
            Node::AtRule(n) => n.span,
            Node::Rule(n) => n.span,
            Node::Declaration(n) => n.span,
            Node::Comment(n) => n.span,
        }
    }

    pub fn span_mut(&mut self) -> &mut Option<Span> {
        match self {
            Node::Root(n) => &mut n.span,
            Node::AtRule(n) => &mut n.span,
            Node::Rule(n) => &mut n.span,
            Node::Declaration(n) => &mut n.span,
            Node::Comment(n) => &mut n.span,
        }
    }

    pub fn raws(&self) -> &Raws {
        match self {
            Node::Root(n) => &n.raws,
            Node::AtRule(n) => &n.raws,
            Node::Rule(n) => &n.raws,
            Node::Declaration(n) => &n.raws,
            Node::Comment(n) => &n.raws,
        }
    }

    pub fn raws_mut(&mut self) -> &mut Raws {
        match self {
            Node::Root(n) => &mut n.raws,
            Node::AtRule(n) => &mut n.raws,
            Node::Rule(n) => &mut n.raws,
            Node::Declaration(n) => &mut n.raws,
            Node::Comment(n) => &mut n.raws,
        }
    }
}

/// A parsed (or hand-built) stylesheet: the node arena plus its root.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    arena: Arena<Node>,
    root: NodeId,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Stylesheet {
    /// An empty stylesheet holding only a root node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(Node::Root(Root::default()));
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &Root {
        match self.arena[self.root].get() {
            Node::Root(root) => root,
            _ => unreachable!("stylesheet root is always a Root node"),
        }
    }

    pub fn root_node_mut(&mut self) -> &mut Root {
        match self.arena[self.root].get_mut() {
            Node::Root(root) => root,
            _ => unreachable!("stylesheet root is always a Root node"),
        }
    }

    /// Whether `id` names a node of this arena that has not been removed.
    /// Freed slots get reused, so the id stamp is checked as well.
    fn is_live(&self, id: NodeId) -> bool {
        self.arena
            .get(id)
            .is_some_and(|n| !n.is_removed() && !id.is_removed(&self.arena))
    }

    /// The node behind `id`, unless it was removed.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !self.is_live(id) {
            return None;
        }
        self.arena.get(id).map(|n| n.get())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !self.is_live(id) {
            return None;
        }
        self.arena.get_mut(id).map(|n| n.get_mut())
    }

    pub fn rule(&self, id: NodeId) -> Option<&Rule> {
        match self.get(id)? {
            Node::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn rule_mut(&mut self, id: NodeId) -> Option<&mut Rule> {
        match self.get_mut(id)? {
            Node::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn at_rule(&self, id: NodeId) -> Option<&AtRule> {
        match self.get(id)? {
            Node::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }

    pub fn at_rule_mut(&mut self, id: NodeId) -> Option<&mut AtRule> {
        match self.get_mut(id)? {
            Node::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }

    pub fn decl(&self, id: NodeId) -> Option<&Declaration> {
        match self.get(id)? {
            Node::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn decl_mut(&mut self, id: NodeId) -> Option<&mut Declaration> {
        match self.get_mut(id)? {
            Node::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn comment(&self, id: NodeId) -> Option<&Comment> {
        match self.get(id)? {
            Node::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    pub fn comment_mut(&mut self, id: NodeId) -> Option<&mut Comment> {
        match self.get_mut(id)? {
            Node::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_live(id) {
            return None;
        }
        self.arena.get(id)?.parent()
    }

    /// Children of `id` in document order; empty for leaves and removed nodes.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if self.get(id).is_none() {
            return Vec::new();
        }
        id.children(&self.arena).collect()
    }

    /// Position of `id` among its parent's children.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        parent.children(&self.arena).position(|child| child == id)
    }

    /// Whether `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.get(id).is_some() && id.ancestors(&self.arena).last() == Some(self.root)
    }

    /// Depth below the root (root children are at depth 0).
    pub fn depth(&self, id: NodeId) -> usize {
        if self.get(id).is_none() {
            return 0;
        }
        id.ancestors(&self.arena).count().saturating_sub(2)
    }

    pub(crate) fn new_node(&mut self, node: Node) -> NodeId {
        self.arena.new_node(node)
    }

    /// Create `node` as the last child of `parent`.
    ///
    /// A node created in place cannot be an ancestor of `parent`, so this
    /// skips the ancestor walk that [`Stylesheet::append`] does and stays
    /// constant time at any depth. `parent` must be a live container.
    pub(crate) fn append_new(&mut self, parent: NodeId, node: Node) -> NodeId {
        debug_assert!(self.get(parent).is_some_and(Node::is_container));
        parent.append_value(node, &mut self.arena)
    }

    pub fn create_rule(&mut self, selector: impl Into<String>) -> NodeId {
        self.new_node(Node::Rule(Rule {
            selector: selector.into(),
            ..Rule::default()
        }))
    }

    /// A bodyless at-rule; it gains a body once a child is added.
    pub fn create_at_rule(&mut self, name: impl Into<String>, params: impl Into<String>) -> NodeId {
        self.new_node(Node::AtRule(AtRule {
            name: name.into(),
            params: params.into(),
            ..AtRule::default()
        }))
    }

    pub fn create_decl(&mut self, prop: impl Into<String>, value: impl Into<String>) -> NodeId {
        self.new_node(Node::Declaration(Declaration {
            prop: prop.into(),
            value: value.into(),
            ..Declaration::default()
        }))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.new_node(Node::Comment(Comment {
            text: text.into(),
            ..Comment::default()
        }))
    }

    /// Add `node` as the last child of `parent`, moving it if it is attached elsewhere.
    pub fn append(&mut self, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.check_insert_into(parent, node)?;
        node.detach(&mut self.arena);
        parent.checked_append(node, &mut self.arena)?;
        self.mark_has_body(parent);
        Ok(())
    }

    /// Add `node` as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.check_insert_into(parent, node)?;
        node.detach(&mut self.arena);
        parent.checked_prepend(node, &mut self.arena)?;
        self.mark_has_body(parent);
        Ok(())
    }

    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(sibling).ok_or(TreeError::NoParent(sibling))?;
        self.check_insert_into(parent, node)?;
        if node == sibling {
            return Ok(());
        }
        node.detach(&mut self.arena);
        sibling.checked_insert_before(node, &mut self.arena)?;
        Ok(())
    }

    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) -> Result<(), TreeError> {
        let parent = self.parent(sibling).ok_or(TreeError::NoParent(sibling))?;
        self.check_insert_into(parent, node)?;
        if node == sibling {
            return Ok(());
        }
        node.detach(&mut self.arena);
        sibling.checked_insert_after(node, &mut self.arena)?;
        Ok(())
    }

    /// Unlink `node` (and its subtree) from its parent. The node stays valid
    /// and can be inserted again.
    pub fn detach(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.check_movable(node)?;
        node.detach(&mut self.arena);
        Ok(())
    }

    /// Detach `node` and free it together with its subtree.
    pub fn remove(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.check_movable(node)?;
        node.remove_subtree(&mut self.arena);
        Ok(())
    }

    fn check_movable(&self, node: NodeId) -> Result<(), TreeError> {
        if node == self.root {
            return Err(TreeError::RootNode);
        }
        if self.get(node).is_none() {
            return Err(TreeError::Removed(node));
        }
        Ok(())
    }

    fn check_insert_into(&self, parent: NodeId, node: NodeId) -> Result<(), TreeError> {
        self.check_movable(node)?;
        match self.get(parent) {
            None => return Err(TreeError::Removed(parent)),
            Some(p) if !p.is_container() => return Err(TreeError::NotAContainer(parent)),
            Some(_) => {}
        }
        // A leaf can only be its own ancestor
        let has_children = node.children(&self.arena).next().is_some();
        let cycle = if has_children {
            parent.ancestors(&self.arena).any(|ancestor| ancestor == node)
        } else {
            parent == node
        };
        if cycle {
            return Err(TreeError::Cycle(node));
        }
        Ok(())
    }

    fn mark_has_body(&mut self, parent: NodeId) {
        if let Some(at_rule) = self.at_rule_mut(parent) {
            at_rule.has_body = true;
        }
    }
}
