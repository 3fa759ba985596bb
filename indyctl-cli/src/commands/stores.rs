//! `indyctl stores`: list, show, create and update stores

use std::collections::HashSet;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use indyctl_client::{fetch_all, ApiResult, StoreListing};
use indyctl_core::filters::{capabilities, checkmark};
use indyctl_core::time_format::{
    seconds_to_duration, timestamp_to_current_as_duration, timestamp_to_date_format,
};
use indyctl_core::{
    DisableTimeout, FormMode, PagerState, SortProp, Store, StoreForm, StoreKey, StorePager,
    StoreType,
};

use super::{
    get_output_format, interruptible_session, print_json, require, tree_prefix, ApiContext,
    OutputFormat,
};
use crate::ui;

#[derive(Parser, Debug)]
pub struct StoresArgs {
    #[command(subcommand)]
    pub command: StoresCommands,
}

#[derive(Subcommand, Debug)]
pub enum StoresCommands {
    /// List stores of one type, page by page
    List(ListArgs),
    /// Show one store with its disable timeout
    Show(ShowArgs),
    /// Create a store
    Create(WriteArgs),
    /// Update fields of an existing store
    Update(WriteArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Store type (remote, hosted, group)
    pub store_type: StoreType,

    /// Only this package type (default: all)
    #[arg(long, short = 'p')]
    pub package_type: Option<String>,

    /// Keep stores whose key contains this text (case-insensitive)
    #[arg(long, short)]
    pub search: Option<String>,

    /// Sort by key, name, packageType, type, description, disabled or disable_timeout
    #[arg(long)]
    pub sort_by: Option<SortProp>,

    /// Stop after this many pages (default: all)
    #[arg(long)]
    pub pages: Option<usize>,

    #[arg(long, short, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Store key, e.g. maven:remote:central
    pub key: StoreKey,

    #[arg(long, short, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output")]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct WriteArgs {
    /// Store key, e.g. maven:hosted:local-deployments
    #[arg(long)]
    pub key: StoreKey,

    #[arg(long, short)]
    pub description: Option<String>,

    /// Remote URL
    #[arg(long)]
    pub url: Option<String>,

    /// Seconds before a disabled store is re-enabled (0 = server default, -1 = never)
    #[arg(long, allow_hyphen_values = true)]
    pub disable_timeout: Option<i64>,

    #[arg(long)]
    pub disabled: Option<bool>,

    #[arg(long)]
    pub allow_releases: Option<bool>,

    #[arg(long)]
    pub allow_snapshots: Option<bool>,

    /// Groups only: new constituents go first
    #[arg(long)]
    pub prepend_constituent: Option<bool>,

    /// Groups only: constituent keys in priority order (replaces the list)
    #[arg(long = "constituent", value_name = "KEY")]
    pub constituents: Vec<StoreKey>,

    /// Print the submitted store as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run_stores(ctx: &ApiContext, args: StoresArgs) -> Result<()> {
    match args.command {
        StoresCommands::List(args) => run_list(ctx, args).await,
        StoresCommands::Show(args) => run_show(ctx, args).await,
        StoresCommands::Create(args) => run_write(ctx, args, WriteMode::Create).await,
        StoresCommands::Update(args) => run_write(ctx, args, WriteMode::Update).await,
    }
}

async fn run_list(ctx: &ApiContext, args: ListArgs) -> Result<()> {
    let format = get_output_format(args.output, args.json);
    let listing = StoreListing::new(&ctx.client, args.package_type.as_deref(), args.store_type);
    let mut pager = StorePager::new();
    let session = interruptible_session();

    let pb = ui::spinner(format!("Loading {} stores", args.store_type));
    let fetched = fetch_all(&listing, &mut pager, &session, args.pages).await;
    match &fetched {
        Ok(pages) => ui::finish_success(
            pb,
            format!("Loaded {} stores in {} pages", pager.items().len(), pages),
        ),
        Err(e) => ui::finish_error(pb, e.to_string()),
    }
    fetched.context("Failed to list stores")?;

    if let PagerState::Failed { message } = pager.state() {
        tracing::warn!("listing incomplete: {}", message);
    }

    let stores = pager.view(args.search.as_deref(), args.sort_by);

    match format {
        OutputFormat::Json => print_json(&stores)?,
        OutputFormat::Quiet => {
            for store in &stores {
                println!("{}", store.key_string());
            }
        }
        OutputFormat::Human => {
            let timeouts = if stores.iter().any(|s| s.disabled) {
                load_timeouts(ctx).await
            } else {
                Vec::new()
            };
            print_store_tree(args.store_type, &stores, &timeouts, pager.is_exhausted());
        }
    }

    Ok(())
}

/// Timeouts are decoration for the listing; a failure only loses the re-enable hint.
async fn load_timeouts(ctx: &ApiContext) -> Vec<DisableTimeout> {
    match ctx.client.get_all_timeouts().await {
        Ok(ApiResult::Success(list)) => list.items,
        Ok(ApiResult::Failure(failure)) => {
            tracing::warn!("failed to load disable timeouts: {}", failure);
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("failed to load disable timeouts: {}", e);
            Vec::new()
        }
    }
}

fn print_store_tree(
    store_type: StoreType,
    stores: &[Store],
    timeouts: &[DisableTimeout],
    complete: bool,
) {
    let more = if complete { "" } else { " (more available)" };
    println!("┌─ {} stores: {}{}", store_type, stores.len(), more);
    println!("│");

    if stores.is_empty() {
        println!("│  (no stores)");
        return;
    }

    for (i, store) in stores.iter().enumerate() {
        let (prefix, cont) = tree_prefix(i, stores.len());
        let key = store.store_key();

        if store.disabled {
            let expiration = timeouts
                .iter()
                .find(|t| t.matches(&key))
                .and_then(|t| t.expiration);
            println!(
                "{} {} [disabled, re-enabled in {}]",
                prefix,
                key,
                timestamp_to_current_as_duration(expiration)
            );
        } else {
            println!("{} {}", prefix, key);
        }

        if let Some(description) = store.description.as_deref().filter(|d| !d.is_empty()) {
            println!("{}{}", cont, description);
        }
        if let Some(url) = &store.url {
            println!("{}{}", cont, url);
        }
        if store.is_group() {
            println!("{}{} constituents", cont, store.constituents().len());
        }
    }
}

async fn run_show(ctx: &ApiContext, args: ShowArgs) -> Result<()> {
    let format = get_output_format(args.output, args.json);
    let session = interruptible_session();

    let store = session
        .guard(ctx.client.get_store(&args.key))
        .await?
        .context("Failed to connect to API")?;
    let store = require(store, &format!("Failed to load {}", args.key))?;

    let expiration = if store.disabled {
        match session.guard(ctx.client.get_store_timeout(&args.key)).await?? {
            ApiResult::Success(timeout) => timeout.expiration,
            ApiResult::Failure(failure) => {
                tracing::debug!("no disable timeout for {}: {}", args.key, failure);
                None
            }
        }
    } else {
        None
    };

    match format {
        OutputFormat::Json => print_json(&store)?,
        OutputFormat::Quiet => println!("{}", store.key_string()),
        OutputFormat::Human => print_store_detail(&store, expiration),
    }
    Ok(())
}

fn print_store_detail(store: &Store, expiration: Option<i64>) {
    println!("┌─ {}", store.store_key());
    if let Some(description) = &store.description {
        println!("│  {}", description);
    }
    println!("├──────────────────────────────────────────");
    if let Some(url) = &store.url {
        println!("│  url:             {}", url);
    }
    println!("│  enabled:         {}", checkmark(!store.disabled));
    println!(
        "│  disable timeout: {}",
        seconds_to_duration(store.disable_timeout.map(|s| s as f64), true)
    );
    if store.disabled {
        println!(
            "│  re-enabled at:   {} (in {})",
            timestamp_to_date_format(expiration),
            timestamp_to_current_as_duration(expiration)
        );
    }
    for line in capabilities(store) {
        println!("│  {}", line);
    }

    if store.is_group() {
        let prepend = store.prepend_constituent.unwrap_or(false);
        println!("│  prepend new:     {}", checkmark(prepend));
        println!("├─ constituents");
        let constituents = store.constituents();
        if constituents.is_empty() {
            println!("└─ (none)");
        }
        for (i, key) in constituents.iter().enumerate() {
            let (prefix, _) = tree_prefix(i, constituents.len());
            println!("{} {}. {}", prefix, i + 1, key);
        }
    } else {
        println!("└─");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Create,
    Update,
}

async fn run_write(ctx: &ApiContext, args: WriteArgs, mode: WriteMode) -> Result<()> {
    let session = interruptible_session();

    let base = match mode {
        WriteMode::Create => Store::new(&args.key),
        WriteMode::Update => {
            let existing = session
                .guard(ctx.client.get_store(&args.key))
                .await?
                .context("Failed to connect to API")?;
            require(existing, &format!("Failed to load {}", args.key))?
        }
    };
    let store = apply_write_args(base, &args)?;

    let form_mode = match mode {
        WriteMode::Create => FormMode::New,
        WriteMode::Update => FormMode::Edit,
    };
    validate(&store, form_mode)?;

    let key = store.store_key();
    match mode {
        WriteMode::Create => {
            ui::with_spinner_async(format!("Creating {}", key), format!("Created {}", key), async {
                let response = session.guard(ctx.client.create_store(&store)).await??;
                require(response, &format!("Failed to create {}", key))
            })
            .await?;
            if args.json {
                print_json(&store)?;
            } else {
                println!("✓ Created {}", key);
            }
        }
        WriteMode::Update => {
            let saved = ui::with_spinner_async(
                format!("Updating {}", key),
                format!("Updated {}", key),
                async {
                    let response = session.guard(ctx.client.update_store(&store)).await??;
                    require(response, &format!("Failed to update {}", key))
                },
            )
            .await?;
            if args.json {
                print_json(&saved)?;
            } else {
                println!("✓ Updated {}", key);
            }
        }
    }
    Ok(())
}

/// Overlay the flags that were given onto `store`.
fn apply_write_args(mut store: Store, args: &WriteArgs) -> Result<Store> {
    if let Some(description) = &args.description {
        store.description = Some(description.clone());
    }
    if let Some(url) = &args.url {
        store.url = Some(url.clone());
    }
    if let Some(timeout) = args.disable_timeout {
        store.disable_timeout = Some(timeout);
    }
    if let Some(disabled) = args.disabled {
        store.disabled = disabled;
    }
    if let Some(allow) = args.allow_releases {
        store.allow_releases = Some(allow);
    }
    if let Some(allow) = args.allow_snapshots {
        store.allow_snapshots = Some(allow);
    }

    let group_only = args.prepend_constituent.is_some() || !args.constituents.is_empty();
    if group_only && !store.is_group() {
        bail!("--prepend-constituent and --constituent only apply to group stores");
    }
    if let Some(prepend) = args.prepend_constituent {
        store.prepend_constituent = Some(prepend);
    }
    if !args.constituents.is_empty() {
        let own = store.store_key();
        if args.constituents.contains(&own) {
            bail!("{} cannot be a constituent of itself", own);
        }
        let mut seen = HashSet::new();
        if let Some(dup) = args.constituents.iter().find(|key| !seen.insert(*key)) {
            bail!("{} is listed more than once", dup);
        }
        store.constituents = Some(args.constituents.clone());
    }
    Ok(store)
}

/// Reject the store with every violated form rule listed.
pub(crate) fn validate(store: &Store, mode: FormMode) -> Result<()> {
    StoreForm::from_store(store).validate(mode).map_err(|errors| {
        let lines: Vec<String> = errors.iter().map(|e| format!("  • {}", e)).collect();
        anyhow!("Invalid store {}:\n{}", store.store_key(), lines.join("\n"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: WriteArgs,
    }

    fn write_args(argv: &[&str]) -> WriteArgs {
        let mut full = vec!["test"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    #[test]
    fn overlays_only_given_fields() {
        let args = write_args(&["--key", "maven:remote:central", "--disable-timeout", "-1"]);
        let mut base = Store::new(&args.key);
        base.description = Some("Maven Central".to_string());

        let store = apply_write_args(base, &args).unwrap();
        assert_eq!(store.disable_timeout, Some(-1));
        assert_eq!(store.description.as_deref(), Some("Maven Central"));
    }

    #[test]
    fn constituents_need_a_group() {
        let args = write_args(&[
            "--key",
            "maven:hosted:local",
            "--constituent",
            "maven:remote:central",
        ]);
        let err = apply_write_args(Store::new(&args.key), &args).unwrap_err();
        assert!(err.to_string().contains("only apply to group stores"));
    }

    #[test]
    fn group_cannot_contain_itself() {
        let args = write_args(&[
            "--key",
            "maven:group:public",
            "--constituent",
            "maven:group:public",
        ]);
        assert!(apply_write_args(Store::new(&args.key), &args).is_err());
    }

    #[test]
    fn duplicate_constituents_are_rejected() {
        let args = write_args(&[
            "--key",
            "maven:group:public",
            "--constituent",
            "maven:remote:central",
            "--constituent",
            "maven:hosted:local",
            "--constituent",
            "maven:remote:central",
        ]);
        let err = apply_write_args(Store::new(&args.key), &args).unwrap_err();
        assert!(err.to_string().contains("maven:remote:central is listed more than once"));
    }

    #[test]
    fn validation_lists_every_problem() {
        let mut store = Store::new(&StoreKey::new("maven", StoreType::Hosted, ""));
        store.disable_timeout = Some(-5);
        let message = validate(&store, FormMode::New).unwrap_err().to_string();
        assert!(message.contains("name is required"));
        assert!(message.contains("disable_timeout"));
    }

    #[test]
    fn update_keeps_existing_names() {
        let args = write_args(&["--key", "maven:group:build+1", "--description", "nightly"]);
        let store = apply_write_args(Store::new(&args.key), &args).unwrap();
        assert!(validate(&store, FormMode::Edit).is_ok());

        let long = Store::new(&StoreKey::new("maven", StoreType::Hosted, "x".repeat(60)));
        assert!(validate(&long, FormMode::Edit).is_ok());
        assert!(validate(&long, FormMode::New).is_err());
    }
}
