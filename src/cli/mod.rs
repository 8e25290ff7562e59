//! # CLI Module
//!
//! Command-line tooling for inspecting route tables without writing a service.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List the routes of a table file, or the trie they compile to:
//!
//! ```bash
//! brrtrie routes --table routes.yaml
//! brrtrie routes --table routes.yaml --tree
//! ```
//!
//! Building the table reports conflicts, so `routes` doubles as a validator.
//!
//! ### `match`
//!
//! Resolve one request against a table:
//!
//! ```bash
//! brrtrie match --table routes.yaml GET /users/42
//! ```
//!
//! Options shared by both commands:
//! - `--table <FILE>` - Route table (`.yaml`, `.yml`, `.toml` or JSON)
//! - `--trailing-slash <POLICY>` - Override the table's trailing-slash policy
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use brrtrie::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands, TableArgs};
