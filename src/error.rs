//! Error types for route registration.
//!
//! Only building the route table can fail. Lookups report misses as
//! [`MatchStatus`](crate::router::MatchStatus) values instead.

use thiserror::Error;

/// Errors raised while adding routes to a [`Router`](crate::router::Router).
///
/// Every variant is a configuration mistake: callers are expected to treat
/// them as fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The method token is empty or contains characters not allowed in an HTTP token.
    #[error("invalid HTTP method token: {0:?}")]
    InvalidMethod(String),

    /// The pattern is empty or does not start with `/`.
    #[error("route pattern must start with '/': {0:?}")]
    MissingLeadingSlash(String),

    /// A `:` or `*` token that does not occupy a whole path segment (e.g. `/foo:bar`).
    #[error("parameter must occupy a whole path segment in {pattern:?} (at byte {position})")]
    PartialSegment {
        /// The offending pattern.
        pattern: String,
        /// Byte offset of the `:` or `*` marker.
        position: usize,
    },

    /// A `:` marker with no name after it.
    #[error("empty parameter name in {0:?}")]
    EmptyParamName(String),

    /// The same parameter name appears twice in one pattern.
    #[error("duplicate parameter name {name:?} in {pattern:?}")]
    DuplicateParamName {
        /// The offending pattern.
        pattern: String,
        /// The repeated name.
        name: String,
    },

    /// A catch-all that is followed by more path text.
    #[error("catch-all must be the final element of {0:?}")]
    CatchAllNotLast(String),

    /// Two routes bind different parameter names at the same trie position.
    #[error(
        "{kind} {new:?} in {pattern:?} conflicts with existing {kind} {existing:?} at the same position"
    )]
    ParamConflict {
        /// Pattern being registered.
        pattern: String,
        /// `"parameter"` or `"catch-all"`.
        kind: &'static str,
        /// Name already bound at this position.
        existing: String,
        /// Name requested by the new route.
        new: String,
    },

    /// The (method, pattern) pair is already registered and duplicates are rejected.
    #[error("route {method} {pattern} is already registered")]
    DuplicateRoute {
        /// Method token, or `*` for an any-method route.
        method: String,
        /// Pattern as registered.
        pattern: String,
    },

    /// A route name was assigned twice.
    #[error("route name {0:?} is already in use")]
    DuplicateName(String),

    /// The handle does not belong to this router.
    #[error("unknown route handle #{0}")]
    UnknownHandle(usize),

    /// `reverse` was called with a name that was never assigned.
    #[error("no route named {0:?}")]
    UnknownName(String),

    /// `reverse` was given fewer values than the route has parameters.
    #[error("route {name:?} needs {expected} parameter value(s), got {got}")]
    MissingReverseParam {
        /// Route name.
        name: String,
        /// Number of parameters in the pattern.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },
}
