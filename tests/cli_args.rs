//! Integration tests for CLI argument handling
//!
//! Covers the paths that never reach the network: help, operation listing
//! and argument validation.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_harvey"))
        .args(args)
        .env_remove("HARVEY_URL")
        .env_remove("HARVEY_USERNAME")
        .env_remove("HARVEY_PASSWORD")
        .output()
        .expect("Failed to execute harvey")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("harvey"), "Help should mention harvey");
    for subcommand in ["get", "search", "fulltext", "revision", "operations"] {
        assert!(stdout.contains(subcommand), "Help should mention {}", subcommand);
    }
}

#[test]
fn test_operations_lists_searches_and_resources() {
    let output = run_cli(&["operations"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("search-isco"));
    assert!(stdout.contains("search-kov-school"));
    assert!(stdout.contains("position-group"));
}

#[test]
fn test_unknown_operation_prints_error_and_exits() {
    let output = run_cli(&["search", "search-unicorn", "x"]);
    assert!(!output.status.success(), "Expected unknown operation to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("search-unicorn"),
        "Should name the unknown operation: {}",
        stderr
    );
}

#[test]
fn test_too_many_arguments_exits_with_error() {
    let output = run_cli(&["search", "search-school-type", "a", "b"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("search-school-type"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_integer_argument_exits_with_error() {
    let output = run_cli(&["search", "search-isco", "-", "senior"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("senior"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_resource_is_rejected() {
    let output = run_cli(&["get", "unicorn", "1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unicorn"), "stderr: {}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use harvey_client::cli::{Cli, Command};
    use harvey_client::data::ResourceKind;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "harvey",
            "get",
            "kov",
            "2413K00",
            "--language",
            "en_US",
            "--cache-dir",
            "/tmp/harvey",
        ]);
        assert_eq!(cli.language.as_deref(), Some("en_US"));
        assert_eq!(cli.cache_dir.as_deref(), Some(std::path::Path::new("/tmp/harvey")));
        assert!(matches!(
            cli.command,
            Command::Get { resource: ResourceKind::Kov, .. }
        ));
    }

    #[test]
    fn test_revision_takes_no_arguments() {
        assert!(Cli::try_parse_from(["harvey", "revision"]).is_ok());
        assert!(Cli::try_parse_from(["harvey", "revision", "extra"]).is_err());
    }

    #[test]
    fn test_missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["harvey"]).is_err());
    }
}
