//! Route insertion: merges a tokenized pattern into the trie.
//!
//! Static text is matched against existing prefixes byte by byte. A full
//! match descends, a partial match splits the existing node at the common
//! prefix, and an unclaimed first byte creates a new static child. Parameter
//! and catch-all tokens reuse the single param/any slot of the current node
//! when the names agree.

use super::node::{Endpoint, Node, NodeKind, RouteMethod};
use super::pattern::Token;
use crate::error::RouteError;

/// Outcome of binding a handler at the terminal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Inserted {
    /// A new binding was created.
    New,
    /// An existing binding (with this route id) got a new handler.
    Replaced(usize),
}

impl<H> Node<H> {
    /// Insert `tokens` below this node and bind `endpoint` for `method` at the end.
    pub(crate) fn insert_route(
        &mut self,
        pattern: &str,
        tokens: &[Token<'_>],
        method: &RouteMethod,
        endpoint: Endpoint<H>,
        replace: bool,
    ) -> Result<Inserted, RouteError> {
        let mut node = self;
        for token in tokens {
            node = match token {
                Token::Static(text) => node.static_descendant(text.as_bytes()),
                Token::Param(name) => node.named_slot(NodeKind::Param, pattern, name)?,
                Token::CatchAll(name) => node.named_slot(NodeKind::CatchAll, pattern, name)?,
            };
        }

        match node.endpoints.bind(method, endpoint, replace) {
            Ok(None) => Ok(Inserted::New),
            Ok(Some(route_id)) => Ok(Inserted::Replaced(route_id)),
            Err(_) => Err(RouteError::DuplicateRoute {
                method: method.to_string(),
                pattern: pattern.to_string(),
            }),
        }
    }

    /// Walk (and extend) the static children so that the returned node ends
    /// exactly after `text`.
    fn static_descendant(&mut self, text: &[u8]) -> &mut Node<H> {
        let mut node = self;
        let mut text = text;
        loop {
            let Some(&label) = text.first() else {
                return node;
            };
            let Some(idx) = node.static_child_index(label) else {
                node.static_children.push(Node::new_static(text.to_vec()));
                let last = node.static_children.len() - 1;
                return &mut node.static_children[last];
            };

            let child = &mut node.static_children[idx];
            let common = common_prefix_len(&child.prefix, text);
            if common < child.prefix.len() {
                child.split_at(common);
            }
            text = &text[common..];
            node = child;
        }
    }

    /// The param or catch-all child, created on first use. A different name
    /// at the same position is a conflict.
    fn named_slot(
        &mut self,
        kind: NodeKind,
        pattern: &str,
        name: &str,
    ) -> Result<&mut Node<H>, RouteError> {
        let slot = match kind {
            NodeKind::CatchAll => &mut self.any_child,
            _ => &mut self.param_child,
        };

        if let Some(existing) = slot.as_deref() {
            if existing.name() != name {
                return Err(RouteError::ParamConflict {
                    pattern: pattern.to_string(),
                    kind: if kind == NodeKind::CatchAll {
                        "catch-all"
                    } else {
                        "parameter"
                    },
                    existing: existing.name().to_string(),
                    new: name.to_string(),
                });
            }
        }

        let child = slot.get_or_insert_with(|| Box::new(Node::new_named(kind, name)));
        Ok(&mut **child)
    }

    /// Keep `prefix[..at]` here and push everything else (suffix, children,
    /// bindings) down into a single new static child.
    fn split_at(&mut self, at: usize) {
        let suffix = self.prefix.split_off(at);
        let child = Node {
            kind: NodeKind::Static,
            prefix: suffix,
            param_name: None,
            static_children: std::mem::take(&mut self.static_children),
            param_child: self.param_child.take(),
            any_child: self.any_child.take(),
            endpoints: std::mem::take(&mut self.endpoints),
        };
        self.static_children.push(child);
    }
}

#[inline]
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
