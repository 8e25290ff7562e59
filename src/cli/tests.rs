//! Unit tests for CLI commands

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::cli::{execute, Cli, Commands};
use crate::config::TrailingSlash;
use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

const TABLE: &str = r#"
routes:
  - {method: GET, path: /users, handler: list_users, name: users}
  - {method: GET, path: "/users/:id", handler: get_user}
  - {method: POST, path: "/users/:id", handler: update_user}
  - {method: GET, path: "/files/*path", handler: serve_file}
"#;

fn table_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(TABLE.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> String {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    execute(&cli, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_routes_command_parses() {
    let cli = Cli::try_parse_from(["brrtrie", "routes", "--table", "t.yaml", "--tree"]).unwrap();
    match cli.command {
        Commands::Routes { table, tree } => {
            assert_eq!(table.table.to_string_lossy(), "t.yaml");
            assert!(tree);
            assert_eq!(table.trailing_slash, None);
        }
        Commands::Match { .. } => panic!("Expected Routes command"),
    }
}

#[test]
fn test_match_command_parses_policy() {
    let cli = Cli::try_parse_from([
        "brrtrie",
        "match",
        "-t",
        "t.yaml",
        "--trailing-slash",
        "relaxed",
        "GET",
        "/x",
    ])
    .unwrap();
    match cli.command {
        Commands::Match {
            table,
            method,
            path,
        } => {
            assert_eq!(table.trailing_slash, Some(TrailingSlash::Relaxed));
            assert_eq!(method, "GET");
            assert_eq!(path, "/x");
        }
        Commands::Routes { .. } => panic!("Expected Match command"),
    }
}

#[test]
fn test_unknown_policy_is_rejected() {
    let result = Cli::try_parse_from([
        "brrtrie",
        "match",
        "--table",
        "t.yaml",
        "--trailing-slash",
        "loose",
        "GET",
        "/",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_routes_lists_table() {
    let file = table_file();
    let out = run(&["brrtrie", "routes", "--table", file.path().to_str().unwrap()]);
    assert!(out.starts_with("4 routes\n"));
    assert!(out.contains("/users  (users)"));
    assert!(out.contains("POST     /users/:id"));
}

#[test]
fn test_routes_tree() {
    let file = table_file();
    let out = run(&[
        "brrtrie",
        "routes",
        "--tree",
        "--table",
        file.path().to_str().unwrap(),
    ]);
    assert!(out.contains(":id [GET,POST]"));
    assert!(out.contains("*path [GET]"));
}

#[test]
fn test_match_reports_params() {
    let file = table_file();
    let path = file.path().to_str().unwrap();

    let out = run(&["brrtrie", "match", "--table", path, "GET", "/users/42"]);
    assert!(out.contains("status: Matched"));
    assert!(out.contains("handler: get_user"));
    assert!(out.contains("param id = 42"));

    let out = run(&["brrtrie", "match", "--table", path, "DELETE", "/users/42"]);
    assert!(out.contains("status: MethodNotAllowed"));
    assert!(out.contains("allow: GET, POST"));

    let out = run(&["brrtrie", "match", "--table", path, "GET", "/users/"]);
    assert!(out.contains("status: RedirectTrailingSlash"));
    assert!(out.contains("redirect: /users"));
}

#[test]
fn test_match_missing_table_is_error() {
    let cli = Cli::try_parse_from([
        "brrtrie",
        "match",
        "--table",
        "/definitely/not/here.yaml",
        "GET",
        "/",
    ])
    .unwrap();
    let mut out = Vec::new();
    assert!(execute(&cli, &mut out).is_err());
}
