use cascade_lexer::{Position, Span};
use serde_json::{json, Map, Value};

use crate::ast::{Node, NodeId, Raws, Stylesheet};

// -----------------------
// Module-scope helpers
// -----------------------

fn position_to_json(position: Position) -> Value {
    json!({
        "offset": position.offset,
        "line": position.line,
        "column": position.column,
    })
}

fn span_to_json(span: Option<Span>) -> Value {
    match span {
        Some(span) => json!({
            "start": position_to_json(span.start),
            "end": position_to_json(span.end),
        }),
        None => Value::Null,
    }
}

fn raws_to_json(raws: &Raws) -> Value {
    let mut obj = Map::new();
    let strings = [
        ("before", &raws.before),
        ("between", &raws.between),
        ("after", &raws.after),
        ("afterName", &raws.after_name),
        ("important", &raws.important),
        ("afterValue", &raws.after_value),
        ("left", &raws.left),
        ("right", &raws.right),
    ];
    for (key, value) in strings {
        if let Some(value) = value {
            obj.insert(key.to_string(), Value::String(value.clone()));
        }
    }
    if let Some(semicolon) = raws.semicolon {
        obj.insert("semicolon".to_string(), Value::Bool(semicolon));
    }
    Value::Object(obj)
}

/// Kind, fields, raws and source of one node, without its children.
fn fields_to_json(node: &Node) -> Map<String, Value> {
    let value = match node {
        Node::Root(_) => json!({}),
        Node::AtRule(at_rule) => json!({
            "name": at_rule.name,
            "params": at_rule.params,
            "hasBody": at_rule.has_body,
        }),
        Node::Rule(rule) => json!({ "selector": rule.selector }),
        Node::Declaration(decl) => json!({
            "prop": decl.prop,
            "value": decl.value,
            "important": decl.important,
        }),
        Node::Comment(comment) => json!({ "text": comment.text }),
    };
    let mut obj = match value {
        Value::Object(obj) => obj,
        _ => Map::new(),
    };
    obj.insert("type".to_string(), json!(node.kind().as_str()));
    obj.insert("raws".to_string(), raws_to_json(node.raws()));
    obj.insert("source".to_string(), span_to_json(node.span()));
    obj
}

/// A container whose children are still being converted
struct Pending {
    obj: Map<String, Value>,
    children: std::vec::IntoIter<NodeId>,
    nodes: Vec<Value>,
}

impl Pending {
    fn new(sheet: &Stylesheet, id: NodeId, node: &Node) -> Self {
        Self {
            obj: fields_to_json(node),
            children: sheet.children(id).into_iter(),
            nodes: Vec::new(),
        }
    }

    fn finish(mut self) -> Value {
        self.obj.insert("nodes".to_string(), Value::Array(self.nodes));
        Value::Object(self.obj)
    }
}

/// Build the snapshot bottom-up with an explicit stack of open containers.
fn node_to_json(sheet: &Stylesheet, id: NodeId) -> Value {
    let Some(node) = sheet.get(id) else {
        return Value::Null;
    };
    if !node.is_container() {
        return Value::Object(fields_to_json(node));
    }

    let mut stack = vec![Pending::new(sheet, id, node)];
    while let Some(top) = stack.last_mut() {
        match top.children.next() {
            Some(child) => match sheet.get(child) {
                Some(node) if node.is_container() => stack.push(Pending::new(sheet, child, node)),
                Some(node) => top.nodes.push(Value::Object(fields_to_json(node))),
                None => top.nodes.push(Value::Null),
            },
            None => {
                let Some(done) = stack.pop() else { break };
                let value = done.finish();
                match stack.last_mut() {
                    Some(parent) => parent.nodes.push(value),
                    None => return value,
                }
            }
        }
    }
    Value::Null
}

impl Stylesheet {
    /// Structural snapshot of the tree: kind, fields, raws, source span and
    /// nested `nodes`. Input ids are left out.
    pub fn to_json(&self) -> Value {
        node_to_json(self, self.root())
    }

    /// Snapshot of the subtree at `id`; `Null` if the node was removed.
    pub fn node_to_json(&self, id: NodeId) -> Value {
        node_to_json(self, id)
    }
}
