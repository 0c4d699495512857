//! Depth-first traversal with in-place mutation.
//!
//! Visitors get `&mut Stylesheet` and the id of the node being visited, so
//! they can edit the node, its siblings or the tree around it. Each
//! container's child list is snapshotted before it is walked: nodes added
//! during the walk are not visited, and nodes detached before their turn are
//! skipped.

use crate::ast::{Node, NodeId, Stylesheet};

/// Whether a walk should go on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Walk {
    #[default]
    Continue,
    Stop,
}

type Filter<'f> = &'f dyn Fn(&Node) -> bool;

impl Stylesheet {
    /// Visit every node below the root in document order.
    pub fn walk<F>(&mut self, mut visitor: F) -> Walk
    where
        F: FnMut(&mut Stylesheet, NodeId) -> Walk,
    {
        let root = self.root();
        self.walk_container(root, &|_| true, &mut visitor)
    }

    pub fn walk_rules<F>(&mut self, mut visitor: F) -> Walk
    where
        F: FnMut(&mut Stylesheet, NodeId) -> Walk,
    {
        let root = self.root();
        self.walk_container(root, &|n| matches!(n, Node::Rule(_)), &mut visitor)
    }

    pub fn walk_decls<F>(&mut self, mut visitor: F) -> Walk
    where
        F: FnMut(&mut Stylesheet, NodeId) -> Walk,
    {
        let root = self.root();
        self.walk_container(root, &|n| matches!(n, Node::Declaration(_)), &mut visitor)
    }

    /// Visit declarations whose property is exactly `prop`.
    pub fn walk_decls_matching<F>(&mut self, prop: &str, mut visitor: F) -> Walk
    where
        F: FnMut(&mut Stylesheet, NodeId) -> Walk,
    {
        let root = self.root();
        let filter = |n: &Node| matches!(n, Node::Declaration(decl) if decl.prop == prop);
        self.walk_container(root, &filter, &mut visitor)
    }

    pub fn walk_at_rules<F>(&mut self, mut visitor: F) -> Walk
    where
        F: FnMut(&mut Stylesheet, NodeId) -> Walk,
    {
        let root = self.root();
        self.walk_container(root, &|n| matches!(n, Node::AtRule(_)), &mut visitor)
    }

    /// Visit at-rules by name, compared without regard to ASCII case.
    pub fn walk_at_rules_named<F>(&mut self, name: &str, mut visitor: F) -> Walk
    where
        F: FnMut(&mut Stylesheet, NodeId) -> Walk,
    {
        let root = self.root();
        let filter =
            |n: &Node| matches!(n, Node::AtRule(at_rule) if at_rule.name.eq_ignore_ascii_case(name));
        self.walk_container(root, &filter, &mut visitor)
    }

    pub fn walk_comments<F>(&mut self, mut visitor: F) -> Walk
    where
        F: FnMut(&mut Stylesheet, NodeId) -> Walk,
    {
        let root = self.root();
        self.walk_container(root, &|n| matches!(n, Node::Comment(_)), &mut visitor)
    }

    /// Walk below `container` with an explicit stack of child snapshots, so
    /// nesting depth never touches the call stack.
    fn walk_container(
        &mut self,
        container: NodeId,
        filter: Filter<'_>,
        visitor: &mut dyn FnMut(&mut Stylesheet, NodeId) -> Walk,
    ) -> Walk {
        let mut stack: Vec<(NodeId, std::vec::IntoIter<NodeId>)> =
            vec![(container, self.children(container).into_iter())];

        loop {
            let Some((parent, children)) = stack.last_mut() else {
                return Walk::Continue;
            };
            let parent = *parent;
            let Some(child) = children.next() else {
                stack.pop();
                continue;
            };

            if self.parent(child) != Some(parent) {
                continue;
            }
            let selected = self.get(child).is_some_and(filter);
            if selected && visitor(self, child) == Walk::Stop {
                return Walk::Stop;
            }
            // Descend only while the visitor left the node where it was
            let descend =
                self.parent(child) == Some(parent) && self.get(child).is_some_and(Node::is_container);
            if descend {
                stack.push((child, self.children(child).into_iter()));
            }
        }
    }
}
