//! indyctl - command-line console for repository manager stores
//!
//! - Paged store listings with search and sort (`stores list`)
//! - Store details with disable timeouts (`stores show`)
//! - Validated create/update (`stores create`, `stores update`)
//! - Group constituent editing (`group edit`, `group new`)
//! - A local mock of the admin API (`serve`, with the `server` feature)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indyctl_core::IndyConfig;

mod commands;
mod config;
mod tracing_setup;
mod ui;

use commands::ApiContext;

#[derive(Parser, Debug)]
#[command(
    name = "indyctl",
    author,
    version,
    about = "Browse and edit repository manager stores and groups",
    long_about = "Work with remote, hosted and group stores through the admin REST API: \
                  list and search stores, inspect disable timeouts, and reorder group \
                  constituents without a browser."
)]
struct Cli {
    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP
    #[cfg(feature = "telemetry")]
    #[arg(long, global = true)]
    otel: bool,

    /// Admin API base URL (default: api.endpoint from config, else http://127.0.0.1:4000)
    #[arg(long, global = true, env = "INDYCTL_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List, show, create and update stores
    Stores(commands::stores::StoresArgs),
    /// Edit group constituents
    Group(commands::group::GroupArgs),
    /// List package types known to the server
    PackageTypes(commands::stats::StatsArgs),
    /// Show client and server versions
    Version(commands::stats::StatsArgs),
    /// Run the mock admin API
    #[cfg(feature = "server")]
    Serve(commands::serve::ServeArgs),
    /// Manage indyctl configuration (path, show, init)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let tracing_config = tracing_setup::TracingConfig {
        debug: cli.debug,
        quiet: cli.quiet,
        #[cfg(feature = "telemetry")]
        otel: cli.otel,
        #[cfg(not(feature = "telemetry"))]
        otel: false,
    };
    tracing_setup::init(&tracing_config).ok();
    ui::init_quiet_mode(cli.quiet);

    let result = run(cli).await;
    tracing_setup::shutdown_otel();
    result
}

async fn run(cli: Cli) -> Result<()> {
    let settings = IndyConfig::load().context("Failed to load ~/.indyctl/config.toml")?;
    let endpoint = cli.endpoint.as_deref();

    match cli.command {
        Commands::Stores(args) => {
            commands::run_stores(&ApiContext::new(endpoint, settings)?, args).await?
        }
        Commands::Group(args) => {
            commands::run_group(&ApiContext::new(endpoint, settings)?, args).await?
        }
        Commands::PackageTypes(args) => {
            commands::run_package_types(&ApiContext::new(endpoint, settings)?, args).await?
        }
        Commands::Version(args) => {
            commands::run_version(&ApiContext::new(endpoint, settings)?, args).await?
        }
        #[cfg(feature = "server")]
        Commands::Serve(args) => commands::run_serve(args, &settings).await?,
        Commands::Config(args) => config::run_config(args, &settings, endpoint)?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}
