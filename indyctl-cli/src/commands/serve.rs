//! Run the mock admin API locally

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use indyctl_core::IndyConfig;
use indyctl_server::{run_server, ServerConfig};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: server.bind from config, else 127.0.0.1:4000)
    #[arg(long, short = 'b', env = "INDYCTL_BIND")]
    pub bind: Option<SocketAddr>,

    /// Stores per listing page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

fn server_config(args: &ServeArgs, config: &IndyConfig) -> Result<ServerConfig> {
    let defaults = ServerConfig::default();

    let bind_addr = match (args.bind, config.server.bind.as_deref()) {
        (Some(addr), _) => addr,
        (None, Some(raw)) => raw
            .parse()
            .with_context(|| format!("Invalid server.bind in config: {}", raw))?,
        (None, None) => defaults.bind_addr,
    };

    Ok(ServerConfig {
        bind_addr,
        cors_permissive: args.cors_permissive || config.server.cors_permissive.unwrap_or(false),
        page_size: args
            .page_size
            .or(config.server.page_size)
            .unwrap_or(defaults.page_size),
    })
}

pub async fn run_serve(args: ServeArgs, config: &IndyConfig) -> Result<()> {
    let server = server_config(&args, config)?;
    tracing::info!("Starting mock server on {}", server.bind_addr);

    run_server(server).await.context("Server error")?;
    Ok(())
}
