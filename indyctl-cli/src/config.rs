//! `indyctl config`: locate, show and initialize ~/.indyctl/config.toml

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use indyctl_core::IndyConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Show the effective configuration
    Show,
    /// Write a commented starter config
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(args: ConfigArgs, config: &IndyConfig, endpoint: Option<&str>) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", IndyConfig::config_path().display());
            Ok(())
        }
        ConfigCommands::Show => run_show(config, endpoint),
        ConfigCommands::Init(args) => run_init(args),
    }
}

fn run_show(config: &IndyConfig, endpoint: Option<&str>) -> Result<()> {
    let path = IndyConfig::config_path();
    let source = if path.exists() { "file" } else { "defaults" };
    println!("# {} ({})", path.display(), source);
    println!("# effective endpoint: {}", config.endpoint(endpoint));
    print!(
        "{}",
        toml::to_string_pretty(config).context("Failed to render config")?
    );
    Ok(())
}

fn run_init(args: InitArgs) -> Result<()> {
    let config_path = IndyConfig::config_path();

    if config_path.exists() && !args.force {
        return Err(anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(&config_path, IndyConfig::template())
        .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

    println!("✓ Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Point api.endpoint at your server");
    println!("  3. Run: indyctl version");
    Ok(())
}
