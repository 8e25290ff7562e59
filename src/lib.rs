//! # BRRTrie
//!
//! **BRRTrie** is a compressed radix-tree (trie) HTTP request router. It maps a
//! request method and path to a handler value, extracts named path
//! parameters, and tells "no such path" apart from "path exists, wrong
//! method" and "path exists with/without a trailing slash".
//!
//! ## Overview
//!
//! Routes are registered as `(method, pattern, handler)` triples. Patterns are
//! made of three kinds of segments:
//!
//! - **Static text** - `/users/new`, matched byte for byte
//! - **Parameters** - `/users/:id`, one non-empty segment up to the next `/`
//! - **Catch-all** - `/files/*path` (or bare `*`), the rest of the path
//!
//! Lookups prefer static text over parameters over catch-alls at every
//! position and backtrack when a more specific branch dead-ends, so the most
//! specific registered route always wins regardless of registration order.
//!
//! ## Architecture
//!
//! - **[`router`]** - Trie construction, matching, [`SharedRouter`] snapshots
//! - **[`config`]** - [`RouterConfig`]: trailing-slash, duplicate and case policies
//! - **[`error`]** - [`RouteError`], returned by every registration call
//! - **[`table`]** - Route tables loaded from YAML, TOML or JSON files
//! - **[`logging`]** - `tracing` subscriber setup for the `brrtrie` binary
//! - **[`cli`]** - The `brrtrie` command-line tool
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtrie::{MatchStatus, Router};
//!
//! let mut router = Router::new();
//! router.add("GET", "/", "index").unwrap();
//! router.add("GET", "/users/:id", "get_user").unwrap();
//! router.add("PUT", "/users/:id", "update_user").unwrap();
//! router.add("GET", "/assets/*file", "assets").unwrap();
//!
//! let m = router.find("GET", "/users/42");
//! assert_eq!(m.status, MatchStatus::Matched);
//! assert_eq!(m.handler, Some(&"get_user"));
//! assert_eq!(m.param("id"), Some("42"));
//!
//! let m = router.find("DELETE", "/users/42");
//! assert_eq!(m.status, MatchStatus::MethodNotAllowed);
//! assert_eq!(m.allow_header().as_deref(), Some("GET, PUT"));
//!
//! let m = router.find("GET", "/users/42/");
//! assert_eq!(m.status, MatchStatus::RedirectTrailingSlash);
//! assert_eq!(m.redirect_to.as_deref(), Some("/users/42"));
//! ```
//!
//! ## Conflicts
//!
//! Two routes that put differently named parameters (or catch-alls) at the
//! same position are rejected at registration:
//!
//! ```rust
//! use brrtrie::{RouteError, Router};
//!
//! let mut router = Router::new();
//! router.add("GET", "/users/:id", ()).unwrap();
//! let err = router.add("GET", "/users/:name/posts", ()).unwrap_err();
//! assert!(matches!(err, RouteError::ParamConflict { .. }));
//! ```
//!
//! ## Concurrency
//!
//! A built [`Router`] is immutable during lookups and can be shared across
//! threads as `&Router` or `Arc<Router>`. To register routes while serving,
//! wrap it in a [`SharedRouter`], which publishes copy-on-write snapshots.
//!
//! ## Configuration
//!
//! See [`config`] for the `BRRTR_*` environment variables and
//! [`logging`] for `BRRTR_LOG_*`.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod router;
pub mod table;

pub use config::{DuplicatePolicy, RouterConfig, TrailingSlash};
pub use error::RouteError;
pub use router::{
    MatchResult, MatchStatus, ParamVec, RouteHandle, RouteInfo, RouteMethod, Router,
    SharedRouter,
};
pub use table::{load_router, load_table, RouteEntry, RouteTable};
