use crate::config::TrailingSlash;
use crate::router::{MatchStatus, Router};
use crate::table::load_table;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;

/// Command-line interface for BRRTrie
#[derive(Parser)]
#[command(name = "brrtrie")]
#[command(about = "BRRTrie route table tool", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the routes of a table file
    Routes {
        #[command(flatten)]
        table: TableArgs,

        /// Print the compiled trie instead of the route list
        #[arg(long, default_value_t = false)]
        tree: bool,
    },
    /// Resolve a single request against a table file
    Match {
        #[command(flatten)]
        table: TableArgs,

        /// Request method token (e.g. GET)
        method: String,

        /// Request path (e.g. /users/42)
        path: String,
    },
}

/// Where the routes come from and how to build them
#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    /// Route table file (YAML, TOML or JSON)
    #[arg(short, long, env = "BRRTR_ROUTE_TABLE")]
    pub table: PathBuf,

    /// Override the table's trailing-slash policy (strict, redirect, relaxed)
    #[arg(long, value_parser = parse_trailing_slash)]
    pub trailing_slash: Option<TrailingSlash>,
}

impl TableArgs {
    fn build(&self) -> anyhow::Result<Router<String>> {
        let mut table = load_table(&self.table)?;
        if let Some(policy) = self.trailing_slash {
            table.config.trailing_slash = policy;
        }
        table
            .build()
            .with_context(|| format!("Failed to build routes from {}", self.table.display()))
    }
}

fn parse_trailing_slash(s: &str) -> Result<TrailingSlash, String> {
    TrailingSlash::parse(s).ok_or_else(|| format!("unknown trailing-slash policy '{s}'"))
}

/// Parse and run the process arguments, writing to stdout.
///
/// # Errors
///
/// Unreadable or invalid route tables.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)
}

/// Run `cli`, writing human-readable output to `out`.
///
/// A request that does not match is reported, not treated as an error.
///
/// # Errors
///
/// Unreadable or invalid route tables, or a failing writer.
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Routes { table, tree } => {
            let router = table.build()?;
            if *tree {
                out.write_all(router.dump_tree().as_bytes())?;
            } else {
                writeln!(out, "{} routes", router.len())?;
                for info in router.routes() {
                    write!(out, "{:<8} {}", info.method.to_string(), info.pattern)?;
                    if let Some(name) = &info.name {
                        write!(out, "  ({name})")?;
                    }
                    writeln!(out)?;
                }
            }
        }
        Commands::Match {
            table,
            method,
            path,
        } => {
            let router = table.build()?;
            let result = router.find(method, path);
            writeln!(out, "status: {:?}", result.status)?;
            match result.status {
                MatchStatus::Matched => {
                    if let Some(handler) = result.handler {
                        writeln!(out, "handler: {handler}")?;
                    }
                    if let Some(pattern) = result.pattern {
                        writeln!(out, "pattern: {pattern}")?;
                    }
                    for (name, value) in &result.params {
                        writeln!(out, "param {name} = {value}")?;
                    }
                }
                MatchStatus::MethodNotAllowed => {
                    if let Some(allow) = result.allow_header() {
                        writeln!(out, "allow: {allow}")?;
                    }
                }
                MatchStatus::RedirectTrailingSlash => {
                    if let Some(location) = &result.redirect_to {
                        writeln!(out, "redirect: {location}")?;
                    }
                }
                MatchStatus::NotFound => {}
            }
        }
    }
    Ok(())
}
