//! Harvey CLI - look up classification records from the command line
//!
//! Prints API responses as pretty JSON on stdout. Errors go to stderr and
//! set a non-zero exit status.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use tracing::warn;

use harvey_client::cache::{CacheBackend, CacheManager, MemoryCache};
use harvey_client::cli::{parse_search_args, Cli, Command};
use harvey_client::client::ISCO_FULLTEXT;
use harvey_client::data::{operations, Pagination, ResourceKind};
use harvey_client::logging::init_logging;
use harvey_client::{ClientConfig, HarveyClient, HarveyError};

/// Picks where cached responses live
fn cache_backend(cli: &Cli) -> Arc<dyn CacheBackend> {
    if cli.no_disk_cache {
        return Arc::new(MemoryCache::new());
    }
    if let Some(dir) = &cli.cache_dir {
        return Arc::new(CacheManager::with_dir(dir.clone()));
    }
    match CacheManager::new() {
        Some(manager) => Arc::new(manager),
        None => {
            warn!("no cache directory available, caching in memory");
            Arc::new(MemoryCache::new())
        }
    }
}

fn build_client(cli: &Cli) -> Result<HarveyClient, HarveyError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(language) = &cli.language {
        config = config.with_language(language.clone());
    }
    Ok(HarveyClient::new(config, cache_backend(cli)))
}

fn print_operations() {
    println!("Resources:");
    for kind in ResourceKind::ALL {
        println!("  {:<18} {}", kind.path(), kind.description());
    }
    println!();
    println!("Search operations:");
    for op in operations() {
        let params: Vec<&str> = op.params.iter().map(|p| p.name).collect();
        println!("  {:<26} {}", op.name, params.join(" "));
    }
}

async fn run(cli: Cli) -> Result<Option<Value>, HarveyError> {
    match &cli.command {
        Command::Operations => {
            print_operations();
            Ok(None)
        }
        Command::Get { resource, id } => {
            let client = build_client(&cli)?;
            client.get(*resource, id).await.map(Some)
        }
        Command::Search {
            operation,
            args,
            page,
            per_page,
        } => {
            // Bad operation names and arguments fail before any configuration is needed
            let (op, values) = parse_search_args(operation, args)?;
            let client = build_client(&cli)?;
            let pagination = match per_page {
                Some(per_page) => Pagination::new(*page, *per_page),
                None => client.page(*page),
            };
            client.search(op.name, values, pagination).await.map(Some)
        }
        Command::Fulltext { query, sort_by } => {
            let client = build_client(&cli)?;
            let records = client.fulltext(&ISCO_FULLTEXT, query, sort_by).await?;
            Ok(Some(Value::Array(records)))
        }
        Command::Revision => {
            let client = build_client(&cli)?;
            let revision = client.latest_isco_revision().await?;
            Ok(Some(revision.map(Value::String).unwrap_or(Value::Null)))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("Error: failed to initialize logging: {e}");
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(Some(value)) => match serde_json::to_string_pretty(&value) {
            Ok(text) => {
                println!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        },
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
