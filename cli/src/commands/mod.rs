//! Command implementations, one module per resource.

pub mod articles;
pub mod categories;
pub mod tags;

use std::time::Duration;

use anyhow::{Context, Result};
use nnews_client::{NewsConfig, NewsContext};
use serde::Serialize;

use crate::cli::{Cli, Commands};

const MIN_TIMEOUT_SECONDS: u64 = 3;

/// Resolve configuration, build the context and dispatch `cli.command`.
pub async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli, NewsConfig::from_env());
    tracing::debug!(endpoint = %config.endpoint_base(), "using news api");
    let context = NewsContext::new(config).context("failed to set up the news api client")?;

    match cli.command {
        Commands::Articles {
            command,
        } => articles::run(&context, command).await,
        Commands::Categories {
            command,
        } => categories::run(&context, command).await,
        Commands::Tags {
            command,
        } => tags::run(&context, command).await,
    }
}

/// Apply command line overrides on top of `base`.
pub fn resolve_config(cli: &Cli, base: NewsConfig) -> NewsConfig {
    let mut config = base;
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(base_path) = &cli.base_path {
        config.base_path = base_path.clone();
    }
    if let Some(token) = &cli.token {
        config = config.with_bearer_token(token);
    }
    if let Some(seconds) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(seconds.max(MIN_TIMEOUT_SECONDS)));
    }
    config
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
