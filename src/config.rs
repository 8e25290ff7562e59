//! # Router Configuration Module
//!
//! Immutable settings handed to [`Router::with_config`](crate::router::Router::with_config).
//!
//! ## Environment Variables
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `BRRTR_TRAILING_SLASH` | `strict`, `redirect`, `relaxed` | `redirect` |
//! | `BRRTR_DUPLICATE_ROUTES` | `reject`, `replace` | `reject` |
//! | `BRRTR_CASE_SENSITIVE` | `true`, `false` | `true` |
//! | `BRRTR_UNESCAPE_PARAMS` | `true`, `false` | `false` |
//!
//! Unrecognised values fall back to the default.
//!
//! ## Usage
//!
//! ```rust
//! use brrtrie::config::{RouterConfig, TrailingSlash};
//!
//! let config = RouterConfig::from_env();
//! println!("trailing slash policy: {:?}", config.trailing_slash);
//!
//! let strict = RouterConfig {
//!     trailing_slash: TrailingSlash::Strict,
//!     ..RouterConfig::default()
//! };
//! assert!(strict.case_sensitive);
//! ```
//!
//! The same structure can be embedded in a route table file, see [`crate::table`].

use serde::Deserialize;
use std::env;

/// What to do when a path only matches a registered route after adding or
/// removing a trailing `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingSlash {
    /// Treat the variant as a different path (`NotFound`).
    Strict,
    /// Report the canonical path so the caller can redirect.
    #[default]
    Redirect,
    /// Serve the route registered at the variant directly.
    Relaxed,
}

impl TrailingSlash {
    /// Parse a policy name, `None` for anything unrecognised.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(TrailingSlash::Strict),
            "redirect" => Some(TrailingSlash::Redirect),
            "relaxed" | "serve" => Some(TrailingSlash::Relaxed),
            _ => None,
        }
    }
}

/// What to do when the same method and pattern are registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with [`RouteError::DuplicateRoute`](crate::RouteError::DuplicateRoute).
    #[default]
    Reject,
    /// Keep the latest handler.
    Replace,
}

impl DuplicatePolicy {
    /// Parse a policy name, `None` for anything unrecognised.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(DuplicatePolicy::Reject),
            "replace" => Some(DuplicatePolicy::Replace),
            _ => None,
        }
    }
}

/// Router behaviour switches, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Trailing-slash handling for near misses.
    pub trailing_slash: TrailingSlash,
    /// Handling of duplicate registrations.
    pub on_duplicate: DuplicatePolicy,
    /// Compare static path text case-sensitively.
    pub case_sensitive: bool,
    /// Percent-decode captured parameter values.
    pub unescape_params: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            trailing_slash: TrailingSlash::default(),
            on_duplicate: DuplicatePolicy::default(),
            case_sensitive: true,
            unescape_params: false,
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            trailing_slash: env::var("BRRTR_TRAILING_SLASH")
                .ok()
                .and_then(|v| TrailingSlash::parse(&v))
                .unwrap_or(defaults.trailing_slash),
            on_duplicate: env::var("BRRTR_DUPLICATE_ROUTES")
                .ok()
                .and_then(|v| DuplicatePolicy::parse(&v))
                .unwrap_or(defaults.on_duplicate),
            case_sensitive: env_bool("BRRTR_CASE_SENSITIVE").unwrap_or(defaults.case_sensitive),
            unescape_params: env_bool("BRRTR_UNESCAPE_PARAMS")
                .unwrap_or(defaults.unescape_params),
        }
    }
}

fn env_bool(key: &str) -> Option<bool> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
