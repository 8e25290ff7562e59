//! Trie vertices and their per-method handler bindings.

use http::Method;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::RouteError;

/// The method a route is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    /// A single HTTP method.
    Only(Method),
    /// Every method without an explicit binding on the same path.
    Any,
}

impl RouteMethod {
    /// `true` if a request with `method` is served by this binding.
    #[must_use]
    pub fn accepts(&self, method: &Method) -> bool {
        match self {
            RouteMethod::Only(m) => m == method,
            RouteMethod::Any => true,
        }
    }
}

impl fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteMethod::Only(m) => f.write_str(m.as_str()),
            RouteMethod::Any => f.write_str("*"),
        }
    }
}

impl From<Method> for RouteMethod {
    fn from(method: Method) -> Self {
        RouteMethod::Only(method)
    }
}

impl FromStr for RouteMethod {
    type Err = RouteError;

    /// `*` and `ANY` select [`RouteMethod::Any`]; anything else must be a valid
    /// HTTP method token. Tokens are case-sensitive (`get` is not `GET`).
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "*" | "ANY" => Ok(RouteMethod::Any),
            _ => Method::from_bytes(token.as_bytes())
                .map(RouteMethod::Only)
                .map_err(|_| RouteError::InvalidMethod(token.to_string())),
        }
    }
}

/// A handler bound at a node for one method.
pub(crate) struct Endpoint<H> {
    pub handler: Arc<H>,
    pub route_id: usize,
    pub pattern: Arc<str>,
}

impl<H> Clone for Endpoint<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            route_id: self.route_id,
            pattern: Arc::clone(&self.pattern),
        }
    }
}

/// Per-method bindings of a node, in registration order.
pub(crate) struct Endpoints<H> {
    by_method: SmallVec<[(Method, Endpoint<H>); 4]>,
    any: Option<Endpoint<H>>,
}

impl<H> Default for Endpoints<H> {
    fn default() -> Self {
        Self {
            by_method: SmallVec::new(),
            any: None,
        }
    }
}

impl<H> Clone for Endpoints<H> {
    fn clone(&self) -> Self {
        Self {
            by_method: self.by_method.clone(),
            any: self.any.clone(),
        }
    }
}

impl<H> Endpoints<H> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_method.is_empty() && self.any.is_none()
    }

    /// Explicit binding first, then the any-method binding. An unparseable
    /// request method (`None`) matches nothing.
    #[inline]
    pub fn get(&self, method: Option<&Method>) -> Option<&Endpoint<H>> {
        let method = method?;
        self.by_method
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, e)| e)
            .or(self.any.as_ref())
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.by_method.iter().map(|(m, _)| m)
    }

    pub fn has_any(&self) -> bool {
        self.any.is_some()
    }

    /// Pattern of the first binding, used to describe a node that matched the
    /// path but not the method.
    pub fn first_pattern(&self) -> Option<&str> {
        self.by_method
            .first()
            .map(|(_, e)| e)
            .or(self.any.as_ref())
            .map(|e| e.pattern.as_ref())
    }

    fn slot_mut(&mut self, method: &RouteMethod) -> Option<&mut Endpoint<H>> {
        match method {
            RouteMethod::Only(method) => self
                .by_method
                .iter_mut()
                .find(|(m, _)| m == method)
                .map(|(_, e)| e),
            RouteMethod::Any => self.any.as_mut(),
        }
    }

    /// Bind `endpoint`. Returns the route id of the replaced binding when
    /// `replace` is set and the slot was taken, `Err(existing id)` when it was
    /// taken and `replace` is off.
    pub fn bind(
        &mut self,
        method: &RouteMethod,
        endpoint: Endpoint<H>,
        replace: bool,
    ) -> Result<Option<usize>, usize> {
        if let Some(slot) = self.slot_mut(method) {
            if !replace {
                return Err(slot.route_id);
            }
            slot.handler = endpoint.handler;
            return Ok(Some(slot.route_id));
        }
        match method {
            RouteMethod::Only(m) => self.by_method.push((m.clone(), endpoint)),
            RouteMethod::Any => self.any = Some(endpoint),
        }
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Static,
    Param,
    CatchAll,
}

/// A trie vertex.
///
/// Static nodes carry a byte prefix; sibling static children never share a
/// first byte. Param and catch-all nodes have an empty prefix and a name.
pub(crate) struct Node<H> {
    pub kind: NodeKind,
    pub prefix: Vec<u8>,
    pub param_name: Option<Arc<str>>,
    pub static_children: Vec<Node<H>>,
    pub param_child: Option<Box<Node<H>>>,
    pub any_child: Option<Box<Node<H>>>,
    pub endpoints: Endpoints<H>,
}

impl<H> Clone for Node<H> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            prefix: self.prefix.clone(),
            param_name: self.param_name.clone(),
            static_children: self.static_children.clone(),
            param_child: self.param_child.clone(),
            any_child: self.any_child.clone(),
            endpoints: self.endpoints.clone(),
        }
    }
}

impl<H> Node<H> {
    /// The empty-prefix sentinel every tree starts from.
    pub fn root() -> Self {
        Self::new_static(Vec::new())
    }

    pub fn new_static(prefix: Vec<u8>) -> Self {
        Self {
            kind: NodeKind::Static,
            prefix,
            param_name: None,
            static_children: Vec::new(),
            param_child: None,
            any_child: None,
            endpoints: Endpoints::default(),
        }
    }

    pub fn new_named(kind: NodeKind, name: &str) -> Self {
        Self {
            kind,
            prefix: Vec::new(),
            param_name: Some(Arc::from(name)),
            static_children: Vec::new(),
            param_child: None,
            any_child: None,
            endpoints: Endpoints::default(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.param_name.as_deref().unwrap_or_default()
    }

    /// Static child whose prefix starts with `label`.
    #[inline]
    pub fn static_child(&self, label: u8) -> Option<&Node<H>> {
        self.static_children
            .iter()
            .find(|c| c.prefix.first() == Some(&label))
    }

    pub fn static_child_index(&self, label: u8) -> Option<usize> {
        self.static_children
            .iter()
            .position(|c| c.prefix.first() == Some(&label))
    }

    /// Render the subtree, one node per line, for debugging and structural
    /// comparisons.
    pub fn dump(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let label = match self.kind {
            NodeKind::Static => format!("{:?}", String::from_utf8_lossy(&self.prefix)),
            NodeKind::Param => format!(":{}", self.name()),
            NodeKind::CatchAll => format!("*{}", self.name()),
        };
        let mut methods: Vec<String> = self.methods().map(|m| m.to_string()).collect();
        if self.endpoints.has_any() {
            methods.push("*".to_string());
        }
        out.push_str(&indent);
        out.push_str(&label);
        if !methods.is_empty() {
            out.push_str(" [");
            out.push_str(&methods.join(","));
            out.push(']');
        }
        out.push('\n');
        for child in &self.static_children {
            child.dump(out, depth + 1);
        }
        if let Some(child) = &self.param_child {
            child.dump(out, depth + 1);
        }
        if let Some(child) = &self.any_child {
            child.dump(out, depth + 1);
        }
    }

    fn methods(&self) -> impl Iterator<Item = &Method> {
        self.endpoints.methods()
    }
}
