//! Command-line interface parsing for the `harvey` binary
//!
//! Subcommands map one-to-one onto client operations. Search arguments are
//! positional and follow the operation's declared parameter order; `-` skips
//! a parameter.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::data::{schema, OperationSchema, QueryValue, ResourceKind};
use crate::error::HarveyError;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified resource name is not recognized
    #[error("Invalid resource: '{0}'. Run `harvey operations` for the list of resources")]
    InvalidResource(String),
}

/// Harvey classification API client
#[derive(Parser, Debug)]
#[command(name = "harvey")]
#[command(about = "Look up occupations, schools, education and regional codes in the Harvey API")]
#[command(version)]
pub struct Cli {
    /// Keep cached responses in memory only
    #[arg(long, global = true)]
    pub no_disk_cache: bool,

    /// Directory for cached responses (defaults to the XDG cache directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Accept-Language sent to the API (overrides HARVEY_LANGUAGE)
    #[arg(long, global = true, value_name = "LOCALE")]
    pub language: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch one record, e.g. `harvey get isco 7233011`
    Get {
        #[arg(value_parser = parse_resource_arg)]
        resource: ResourceKind,
        id: String,
    },
    /// Search records, e.g. `harvey search search-school Gymnazium`
    Search {
        operation: String,
        /// Positional filter values in declared order; `-` skips one
        args: Vec<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Results per page; 0 disables pagination
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Free-text ISCO search by code or title
    Fulltext {
        query: String,
        /// Field the merged results are sorted by
        #[arg(long, default_value = "title")]
        sort_by: String,
    },
    /// Print the newest ISCO revision id
    Revision,
    /// List resources and search operations with their parameters
    Operations,
}

/// Parses a resource path segment such as `kov-school`
pub fn parse_resource_arg(s: &str) -> Result<ResourceKind, CliError> {
    ResourceKind::from_path(s).ok_or_else(|| CliError::InvalidResource(s.to_string()))
}

/// Resolves a search operation and converts its textual arguments
pub fn parse_search_args(
    operation: &str,
    args: &[String],
) -> Result<(&'static OperationSchema, Vec<QueryValue>), HarveyError> {
    let op = schema(operation)?;
    let values = op.parse_args(args)?;
    Ok((op, values))
}
