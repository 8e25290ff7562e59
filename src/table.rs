//! # Route Tables
//!
//! Declarative route lists loaded from YAML, JSON or TOML files and built into a
//! [`Router<String>`] whose handler values are the handler names from the file.
//!
//! ```yaml
//! config:
//!   trailing_slash: redirect
//!   case_sensitive: true
//! routes:
//!   - method: GET
//!     path: /users/:id
//!     handler: get_user
//!     name: user
//!   - method: "*"
//!     path: /static/*file
//!     handler: serve_static
//! ```
//!
//! The `config` block is optional; omitted fields take the
//! [`RouterConfig`] defaults. The file format is chosen by extension:
//! `.yaml`/`.yml`, `.toml`, otherwise JSON.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::config::RouterConfig;
use crate::error::RouteError;
use crate::router::Router;

/// One `routes` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteEntry {
    pub method: String,
    pub path: String,
    pub handler: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A parsed route table file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub config: RouterConfig,
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

impl RouteTable {
    /// Register every entry, in file order, on a router built from `config`.
    ///
    /// # Errors
    ///
    /// The first [`RouteError`] hit; nothing is returned for a partial table.
    pub fn build(&self) -> Result<Router<String>, RouteError> {
        self.build_with(self.config)
    }

    /// Like [`build`](Self::build) but ignoring the file's `config` block.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build).
    pub fn build_with(&self, config: RouterConfig) -> Result<Router<String>, RouteError> {
        let mut router = Router::with_config(config);
        for entry in &self.routes {
            let handle = router.add(&entry.method, &entry.path, entry.handler.clone())?;
            if let Some(name) = &entry.name {
                router.name(&handle, name)?;
            }
        }
        info!(routes_count = router.len(), "Routing table loaded");
        Ok(router)
    }
}

/// Parse `content` as YAML.
///
/// # Errors
///
/// Malformed YAML or an unexpected shape.
pub fn parse_yaml(content: &str) -> anyhow::Result<RouteTable> {
    serde_yaml::from_str(content).context("Failed to parse YAML route table")
}

/// Parse `content` as TOML.
///
/// # Errors
///
/// Malformed TOML or an unexpected shape.
pub fn parse_toml(content: &str) -> anyhow::Result<RouteTable> {
    toml::from_str(content).context("Failed to parse TOML route table")
}

/// Parse `content` as JSON.
///
/// # Errors
///
/// Malformed JSON or an unexpected shape.
pub fn parse_json(content: &str) -> anyhow::Result<RouteTable> {
    serde_json::from_str(content).context("Failed to parse JSON route table")
}

/// Read and parse a route table, choosing the format from the extension.
///
/// # Errors
///
/// I/O failures and parse errors, annotated with the file path.
pub fn load_table(path: impl AsRef<Path>) -> anyhow::Result<RouteTable> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read route table {}", path.display()))?;

    let table = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => parse_yaml(&content),
        Some("toml") => parse_toml(&content),
        _ => parse_json(&content),
    }
    .with_context(|| format!("Invalid route table {}", path.display()))?;

    Ok(table)
}

/// Load a table file and build its router in one step.
///
/// # Errors
///
/// See [`load_table`] and [`RouteTable::build`].
pub fn load_router(path: impl AsRef<Path>) -> anyhow::Result<Router<String>> {
    let path = path.as_ref();
    let table = load_table(path)?;
    let router = table
        .build()
        .with_context(|| format!("Failed to build routes from {}", path.display()))?;
    Ok(router)
}
