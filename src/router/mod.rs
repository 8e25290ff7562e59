//! # Router Module
//!
//! Path matching and route resolution over a compressed prefix tree.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Building the trie from `(method, pattern, handler)` registrations
//! - Matching incoming `(method, path)` pairs against it
//! - Extracting path parameters from matched routes
//! - Reporting near misses (`MethodNotAllowed`, trailing-slash variants)
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Registration**: patterns are tokenized (`pattern`) and merged into the
//!    trie (`insert`), splitting nodes where a new route diverges from an
//!    existing prefix. Conflicting parameter names are rejected here.
//!
//! 2. **Matching**: each lookup is a fresh depth-first walk (`lookup`) that
//!    prefers static children over parameters over catch-alls and backtracks
//!    when a more specific branch dead-ends.
//!
//! ```text
//! routes: GET /users, GET /users/new, GET /users/:id,
//!         GET /users/:id/files/*path, POST /uploads
//!
//! "/u"
//!   "sers" [GET]
//!     "/"
//!       "new" [GET]
//!       :id [GET]
//!         "/files/"
//!           *path [GET]
//!   "ploads" [POST]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use brrtrie::router::{MatchStatus, Router};
//!
//! let mut router = Router::new();
//! router.get("/users/new", "new_user_form").unwrap();
//! router.get("/users/:id", "get_user").unwrap();
//! router.get("/files/*path", "serve_file").unwrap();
//!
//! let m = router.find("GET", "/users/42");
//! assert_eq!(m.handler, Some(&"get_user"));
//! assert_eq!(m.param("id"), Some("42"));
//!
//! let m = router.find("GET", "/files/a/b/c.txt");
//! assert_eq!(m.param("path"), Some("a/b/c.txt"));
//!
//! assert_eq!(router.find("DELETE", "/users/42").status, MatchStatus::MethodNotAllowed);
//! ```
//!
//! ## Performance
//!
//! - O(k) matching in the path length, independent of the number of routes
//! - No locks on the read path; the router is `Sync` when the handler type is
//! - Parameters live on the stack for up to [`MAX_INLINE_PARAMS`] values

mod core;
mod insert;
mod lookup;
mod node;
mod pattern;
mod shared;

pub use self::core::{
    MatchResult, MatchStatus, ParamVec, RouteHandle, RouteInfo, Router, MAX_INLINE_PARAMS,
};
pub use node::RouteMethod;
pub use pattern::CATCH_ALL_DEFAULT_NAME;
pub use shared::SharedRouter;
