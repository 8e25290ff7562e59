//! Router core module - route table construction and the request hot path.
//!
//! # Allocation discipline
//!
//! [`Router::find`] does not allocate for a successful lookup with at most
//! [`MAX_INLINE_PARAMS`] parameters beyond the captured values themselves.
//! The following lints keep accidental string building out of this module.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use super::insert::Inserted;
use super::lookup::{search, Capture, Search};
use super::node::{Endpoint, Endpoints, Node, RouteMethod};
use super::pattern::{self, Token};
use crate::config::{DuplicatePolicy, RouterConfig, TrailingSlash};
use crate::error::RouteError;

/// Maximum number of path parameters before heap allocation.
/// Most REST APIs have ≤4 path params (e.g., /users/:id/posts/:post_id).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names use `Arc<str>` shared with the trie, so handing them out is an
/// atomic increment. Values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Lookups slower than this are logged at warn level.
const SLOW_MATCH_THRESHOLD: Duration = Duration::from_millis(1);

/// How a lookup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// A route serves this method and path.
    Matched,
    /// No registered route reaches this path.
    NotFound,
    /// Routes exist for this path, but none for this method.
    MethodNotAllowed,
    /// The path only matches after adding or removing a trailing `/`;
    /// [`MatchResult::redirect_to`] holds the canonical path.
    RedirectTrailingSlash,
}

/// Result of [`Router::find`].
///
/// Borrows handler and pattern from the router; parameters are owned.
pub struct MatchResult<'r, H> {
    /// Outcome of the lookup.
    pub status: MatchStatus,
    /// The handler to invoke, set only for [`MatchStatus::Matched`].
    pub handler: Option<&'r H>,
    /// Parameters in left-to-right pattern order.
    pub params: ParamVec,
    /// Pattern of the matched route (e.g. `/users/:id`).
    pub pattern: Option<&'r str>,
    /// Canonical path for [`MatchStatus::RedirectTrailingSlash`].
    pub redirect_to: Option<String>,
    endpoints: Option<&'r Endpoints<H>>,
}

impl<'r, H> MatchResult<'r, H> {
    fn not_found() -> Self {
        Self {
            status: MatchStatus::NotFound,
            handler: None,
            params: ParamVec::new(),
            pattern: None,
            redirect_to: None,
            endpoints: None,
        }
    }

    /// `true` for [`MatchStatus::Matched`].
    #[inline]
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.status == MatchStatus::Matched
    }

    /// Get a path parameter by name.
    ///
    /// Uses "last write wins" semantics, although a pattern cannot bind the
    /// same name twice.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert params to a HashMap.
    /// Note: This allocates - use [`param`](Self::param) in hot paths instead.
    #[must_use]
    pub fn params_map(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Methods registered at the matched node, in registration order.
    ///
    /// Empty for [`MatchStatus::NotFound`].
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<&'r Method> {
        self.endpoints
            .map(|e| e.methods().collect())
            .unwrap_or_default()
    }

    /// Value for an `Allow` response header, e.g. `"GET, POST"`.
    ///
    /// `None` when nothing matched the path or the node has an any-method
    /// route (every method is allowed).
    #[must_use]
    pub fn allow_header(&self) -> Option<String> {
        let endpoints = self.endpoints?;
        if endpoints.has_any() {
            return None;
        }
        let methods: Vec<&str> = endpoints.methods().map(Method::as_str).collect();
        if methods.is_empty() {
            None
        } else {
            Some(methods.join(", "))
        }
    }
}

impl<H> fmt::Debug for MatchResult<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchResult")
            .field("status", &self.status)
            .field("handler", &self.handler.map(|_| ".."))
            .field("params", &self.params)
            .field("pattern", &self.pattern)
            .field("redirect_to", &self.redirect_to)
            .finish()
    }
}

/// Returned by [`Router::add`]; identifies a registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHandle {
    id: usize,
    method: RouteMethod,
    pattern: Arc<str>,
}

impl RouteHandle {
    /// Registration ordinal, stable for the lifetime of the router.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Method the route is bound to.
    #[must_use]
    pub fn method(&self) -> &RouteMethod {
        &self.method
    }

    /// Pattern as registered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// A registered route, as listed by [`Router::routes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// Registration ordinal.
    pub id: usize,
    /// Bound method.
    pub method: RouteMethod,
    /// Pattern as registered.
    pub pattern: Arc<str>,
    /// Parameter names in pattern order (`*` for an unnamed catch-all).
    pub param_names: Vec<String>,
    /// Name assigned with [`Router::name`].
    pub name: Option<String>,
}

/// Radix-tree router mapping `(method, path)` to a handler of type `H`.
///
/// Build it single-threaded with [`add`](Self::add) and friends, then share it
/// (`&Router` or `Arc<Router>`) with any number of threads for
/// [`find`](Self::find). For registration while serving traffic see
/// [`SharedRouter`](super::SharedRouter).
///
/// # Performance
///
/// - Route matching: O(k) in the path length, independent of the route count
/// - Shared prefixes are stored once
/// - Parameters are stack-allocated for up to [`MAX_INLINE_PARAMS`] values
pub struct Router<H> {
    root: Node<H>,
    config: RouterConfig,
    routes: Vec<RouteInfo>,
    names: HashMap<String, usize>,
}

impl<H> Clone for Router<H> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            config: self.config,
            routes: self.routes.clone(),
            names: self.names.clone(),
        }
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::with_config(RouterConfig::default())
    }
}

impl<H> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("routes", &self.routes.len())
            .finish()
    }
}

impl<H> Router<H> {
    /// Create an empty router with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty router with `config`.
    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            root: Node::root(),
            config,
            routes: Vec::new(),
            names: HashMap::new(),
        }
    }

    /// The configuration this router was built with.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register `handler` for `method` and `pattern`.
    ///
    /// `method` is an HTTP method token (`GET`, `PROPFIND`, ...); `*` or `ANY`
    /// register an any-method route. Patterns start with `/` and may contain
    /// `:name` segments and a final `*` / `*name` catch-all.
    ///
    /// # Errors
    ///
    /// Any [`RouteError`]: malformed method or pattern, a parameter name
    /// clash with an existing route, or a duplicate under
    /// [`DuplicatePolicy::Reject`]. A failed call may leave empty intermediate
    /// nodes behind; they never match anything.
    pub fn add(
        &mut self,
        method: &str,
        pattern: &str,
        handler: H,
    ) -> Result<RouteHandle, RouteError> {
        let method: RouteMethod = method.parse()?;
        self.insert(method, pattern, handler)
    }

    /// Typed variant of [`add`](Self::add).
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    pub fn insert(
        &mut self,
        method: RouteMethod,
        pattern: &str,
        handler: H,
    ) -> Result<RouteHandle, RouteError> {
        let parsed = pattern::parse(pattern, self.config.case_sensitive)?;
        let pattern_arc: Arc<str> = Arc::from(pattern);
        let next_id = self.routes.len();

        let endpoint = Endpoint {
            handler: Arc::new(handler),
            route_id: next_id,
            pattern: Arc::clone(&pattern_arc),
        };
        let replace = self.config.on_duplicate == DuplicatePolicy::Replace;

        match self
            .root
            .insert_route(pattern, &parsed.tokens, &method, endpoint, replace)
        {
            Ok(Inserted::New) => {
                debug!(
                    method = %method,
                    pattern = %pattern,
                    route_id = next_id,
                    "Route registered"
                );
                self.routes.push(RouteInfo {
                    id: next_id,
                    method: method.clone(),
                    pattern: Arc::clone(&pattern_arc),
                    param_names: parsed.param_names.iter().map(|n| (*n).to_owned()).collect(),
                    name: None,
                });
                Ok(RouteHandle {
                    id: next_id,
                    method,
                    pattern: pattern_arc,
                })
            }
            Ok(Inserted::Replaced(route_id)) => {
                warn!(
                    method = %method,
                    pattern = %pattern,
                    route_id,
                    "Route handler replaced"
                );
                let existing = self
                    .routes
                    .get(route_id)
                    .map_or(pattern_arc, |info| Arc::clone(&info.pattern));
                Ok(RouteHandle {
                    id: route_id,
                    method,
                    pattern: existing,
                })
            }
            Err(err) => {
                warn!(method = %method, pattern = %pattern, error = %err, "Route rejected");
                Err(err)
            }
        }
    }

    /// Register `handler` for `GET pattern`.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    pub fn get(&mut self, pattern: &str, handler: H) -> Result<RouteHandle, RouteError> {
        self.insert(RouteMethod::Only(Method::GET), pattern, handler)
    }

    /// Register `handler` for `POST pattern`.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    pub fn post(&mut self, pattern: &str, handler: H) -> Result<RouteHandle, RouteError> {
        self.insert(RouteMethod::Only(Method::POST), pattern, handler)
    }

    /// Register `handler` for `PUT pattern`.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    pub fn put(&mut self, pattern: &str, handler: H) -> Result<RouteHandle, RouteError> {
        self.insert(RouteMethod::Only(Method::PUT), pattern, handler)
    }

    /// Register `handler` for `PATCH pattern`.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    pub fn patch(&mut self, pattern: &str, handler: H) -> Result<RouteHandle, RouteError> {
        self.insert(RouteMethod::Only(Method::PATCH), pattern, handler)
    }

    /// Register `handler` for `DELETE pattern`.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    pub fn delete(&mut self, pattern: &str, handler: H) -> Result<RouteHandle, RouteError> {
        self.insert(RouteMethod::Only(Method::DELETE), pattern, handler)
    }

    /// Register `handler` for every method that has no explicit route on
    /// `pattern`.
    ///
    /// # Errors
    ///
    /// See [`add`](Self::add).
    pub fn any(&mut self, pattern: &str, handler: H) -> Result<RouteHandle, RouteError> {
        self.insert(RouteMethod::Any, pattern, handler)
    }

    /// Assign a name to a route for [`reverse`](Self::reverse).
    ///
    /// # Errors
    ///
    /// [`RouteError::DuplicateName`] if another route already has the name,
    /// [`RouteError::UnknownHandle`] if the handle comes from another router.
    pub fn name(&mut self, handle: &RouteHandle, name: &str) -> Result<(), RouteError> {
        if self.names.get(name).is_some_and(|&id| id != handle.id) {
            return Err(RouteError::DuplicateName(name.to_string()));
        }
        let info = self
            .routes
            .get_mut(handle.id)
            .filter(|info| info.pattern == handle.pattern)
            .ok_or(RouteError::UnknownHandle(handle.id))?;
        if let Some(old) = info.name.replace(name.to_string()) {
            self.names.remove(&old);
        }
        self.names.insert(name.to_string(), handle.id);
        Ok(())
    }

    /// Build a concrete path for the route called `name`, filling parameters
    /// from `values` in pattern order. Values are inserted verbatim.
    ///
    /// # Errors
    ///
    /// [`RouteError::UnknownName`] or [`RouteError::MissingReverseParam`].
    pub fn reverse(&self, name: &str, values: &[&str]) -> Result<String, RouteError> {
        let info = self
            .names
            .get(name)
            .and_then(|&id| self.routes.get(id))
            .ok_or_else(|| RouteError::UnknownName(name.to_string()))?;

        if values.len() < info.param_names.len() {
            return Err(RouteError::MissingReverseParam {
                name: name.to_string(),
                expected: info.param_names.len(),
                got: values.len(),
            });
        }

        let parsed = pattern::parse(&info.pattern, true)?;
        let mut values = values.iter();
        let mut path = String::with_capacity(info.pattern.len());
        for token in &parsed.tokens {
            match token {
                Token::Static(text) => path.push_str(text),
                Token::Param(_) | Token::CatchAll(_) => {
                    path.push_str(values.next().copied().unwrap_or_default());
                }
            }
        }
        Ok(path)
    }

    /// All registered routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// Distinct registered patterns, in registration order.
    #[must_use]
    pub fn path_patterns(&self) -> Vec<String> {
        let mut seen = Vec::<&str>::new();
        for info in &self.routes {
            if !seen.contains(&info.pattern.as_ref()) {
                seen.push(&info.pattern);
            }
        }
        seen.into_iter().map(str::to_owned).collect()
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Print all registered routes to stdout.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for info in &self.routes {
            match &info.name {
                Some(name) => println!("[route] {} {} ({name})", info.method, info.pattern),
                None => println!("[route] {} {}", info.method, info.pattern),
            }
        }
    }

    /// Render the trie, one node per line with its bound methods.
    #[must_use]
    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        for child in &self.root.static_children {
            child.dump(&mut out, 0);
        }
        out
    }

    /// Match a request.
    ///
    /// `method` is the raw request method token. A token that is not a valid
    /// HTTP method matches no route (the result is `NotFound` or
    /// `MethodNotAllowed`). Never fails and never panics.
    #[must_use]
    pub fn find(&self, method: &str, path: &str) -> MatchResult<'_, H> {
        let method = Method::from_bytes(method.as_bytes()).ok();
        self.find_timed(method.as_ref(), path)
    }

    /// Typed variant of [`find`](Self::find).
    #[must_use]
    pub fn find_method(&self, method: &Method, path: &str) -> MatchResult<'_, H> {
        self.find_timed(Some(method), path)
    }

    fn find_timed(&self, method: Option<&Method>, path: &str) -> MatchResult<'_, H> {
        let match_start = Instant::now();
        let result = self.lookup(method, path);
        let match_duration = match_start.elapsed();
        let method = method.map_or("<invalid>", Method::as_str);

        if match_duration > SLOW_MATCH_THRESHOLD {
            warn!(
                method,
                path = %path,
                status = ?result.status,
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        }

        match result.status {
            MatchStatus::Matched => trace!(
                method,
                path = %path,
                route_pattern = ?result.pattern,
                path_params = ?result.params,
                "Route matched"
            ),
            status => debug!(method, path = %path, status = ?status, "No route matched"),
        }

        result
    }

    fn lookup(&self, method: Option<&Method>, path: &str) -> MatchResult<'_, H> {
        match search(&self.root, path, method, self.config.case_sensitive) {
            Search::NotFound => self.trailing_slash_fallback(method, path),
            found => self.resolve(found, path),
        }
    }

    /// Retry with the trailing slash toggled. Only consulted when the exact
    /// path reached no node with bindings, so an exact-path
    /// `MethodNotAllowed` always wins over a redirect.
    fn trailing_slash_fallback(&self, method: Option<&Method>, path: &str) -> MatchResult<'_, H> {
        if self.config.trailing_slash == TrailingSlash::Strict
            || path.len() <= 1
            || !path.starts_with('/')
        {
            return MatchResult::not_found();
        }

        let alternate: Cow<'_, str> = match path.strip_suffix('/') {
            Some(stripped) => Cow::Borrowed(stripped),
            None => {
                let mut with_slash = String::with_capacity(path.len() + 1);
                with_slash.push_str(path);
                with_slash.push('/');
                Cow::Owned(with_slash)
            }
        };

        let found = search(&self.root, &alternate, method, self.config.case_sensitive);
        if matches!(found, Search::NotFound) {
            return MatchResult::not_found();
        }

        match self.config.trailing_slash {
            TrailingSlash::Relaxed => self.resolve(found, &alternate),
            _ => {
                let (endpoints, pattern) = match found {
                    Search::Matched {
                        endpoint,
                        endpoints,
                        ..
                    } => (Some(endpoints), Some(endpoint.pattern.as_ref())),
                    Search::MethodNotAllowed { endpoints, .. } => {
                        (Some(endpoints), endpoints.first_pattern())
                    }
                    Search::NotFound => (None, None),
                };
                MatchResult {
                    status: MatchStatus::RedirectTrailingSlash,
                    handler: None,
                    params: ParamVec::new(),
                    pattern,
                    redirect_to: Some(alternate.into_owned()),
                    endpoints,
                }
            }
        }
    }

    fn resolve<'r>(&'r self, found: Search<'r, H>, path: &str) -> MatchResult<'r, H> {
        match found {
            Search::Matched {
                endpoint,
                endpoints,
                captures,
            } => MatchResult {
                status: MatchStatus::Matched,
                handler: Some(endpoint.handler.as_ref()),
                params: self.collect_params(path, &captures),
                pattern: Some(endpoint.pattern.as_ref()),
                redirect_to: None,
                endpoints: Some(endpoints),
            },
            Search::MethodNotAllowed {
                endpoints,
                captures,
            } => MatchResult {
                status: MatchStatus::MethodNotAllowed,
                handler: None,
                params: self.collect_params(path, &captures),
                pattern: endpoints.first_pattern(),
                redirect_to: None,
                endpoints: Some(endpoints),
            },
            Search::NotFound => MatchResult::not_found(),
        }
    }

    fn collect_params(&self, path: &str, captures: &[Capture<'_>]) -> ParamVec {
        captures
            .iter()
            .map(|capture| {
                let raw = path.get(capture.start..capture.end).unwrap_or_default();
                let value = if self.config.unescape_params {
                    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), Cow::into_owned)
                } else {
                    raw.to_owned()
                };
                (Arc::clone(capture.name), value)
            })
            .collect()
    }
}
