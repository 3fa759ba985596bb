//! `indyctl package-types` and `indyctl version`

use anyhow::{Context, Result};
use clap::Parser;

use super::{get_output_format, print_json, require, ApiContext, OutputFormat};

#[derive(Parser, Debug)]
pub struct StatsArgs {
    #[arg(long, short, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

pub async fn run_package_types(ctx: &ApiContext, args: StatsArgs) -> Result<()> {
    let result = ctx
        .client
        .package_types()
        .await
        .context("Failed to connect to API")?;
    let types = require(result, "Failed to load package types")?;

    match get_output_format(args.output, args.json) {
        OutputFormat::Json => print_json(&types)?,
        OutputFormat::Quiet => {
            for pt in &types {
                println!("{}", pt);
            }
        }
        OutputFormat::Human => {
            println!("Package types:");
            for pt in &types {
                println!("  • {}", pt);
            }
        }
    }
    Ok(())
}

pub async fn run_version(ctx: &ApiContext, args: StatsArgs) -> Result<()> {
    let result = ctx
        .client
        .version_info()
        .await
        .context("Failed to connect to API")?;
    let info = require(result, "Failed to load version info")?;

    match get_output_format(args.output, args.json) {
        OutputFormat::Json => print_json(&info)?,
        OutputFormat::Quiet => println!("{}", info.version),
        OutputFormat::Human => {
            println!("indyctl {}", env!("CARGO_PKG_VERSION"));
            println!("server  {} (commit {})", info.version, info.commit_id);
            println!("        built by {} at {}", info.builder, info.timestamp);
            println!("        {}", ctx.client.endpoint());
        }
    }
    Ok(())
}
