//! `indyctl group`: edit group constituents from the command line
//!
//! Operations are applied in order, the way they would be clicked in an
//! editor. Nothing is written unless `--save` is given.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indyctl_client::{load_group_editor, new_group_editor, GroupEditView, Session};
use indyctl_core::{ConstituentEditor, EditOp, FormMode, Outcome, StoreKey};

use super::stores::validate;
use super::{interruptible_session, print_json, require, tree_prefix, ApiContext};
use crate::ui;

#[derive(Parser, Debug)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommands,
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// Reorder, add or remove constituents of an existing group
    Edit(EditArgs),
    /// Assemble a new group
    New(NewArgs),
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    /// Package type of the group
    pub package_type: String,

    /// Group name
    pub name: String,

    /// Operation as verb:key, e.g. promote:maven:remote:central (repeatable)
    ///
    /// Verbs: add, remove, promote, demote, top, bottom
    #[arg(long = "op", value_name = "VERB:KEY")]
    pub ops: Vec<EditOp>,

    /// Set whether new constituents go first
    #[arg(long)]
    pub prepend_constituent: Option<bool>,

    /// Submit the edited group
    #[arg(long)]
    pub save: bool,

    /// Print the resulting store as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Group name
    pub name: String,

    /// Package type (default: ui.default_package_type from config)
    #[arg(long, short = 'p')]
    pub package_type: Option<String>,

    /// Constituent to append (repeatable, in priority order)
    #[arg(long = "add", value_name = "KEY")]
    pub add: Vec<StoreKey>,

    #[arg(long, short)]
    pub description: Option<String>,

    /// New constituents go first
    #[arg(long)]
    pub prepend_constituent: bool,

    /// Create the group
    #[arg(long)]
    pub save: bool,

    /// Print the resulting store as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run_group(ctx: &ApiContext, args: GroupArgs) -> Result<()> {
    match args.command {
        GroupCommands::Edit(args) => run_edit(ctx, args).await,
        GroupCommands::New(args) => run_new(ctx, args).await,
    }
}

async fn run_edit(ctx: &ApiContext, args: EditArgs) -> Result<()> {
    let session = interruptible_session();
    let label = format!("{}:group:{}", args.package_type, args.name);

    let loaded = ui::with_spinner_async(
        format!("Loading {}", label),
        format!("Loaded {}", label),
        load_group_editor(&ctx.client, &session, &args.package_type, &args.name),
    )
    .await
    .context("Failed to connect to API")?;
    let mut view = require(loaded, &format!("Failed to load {}", label))?;

    let mut editor = apply_ops(&view.editor, &args.ops)?;
    if let Some(prepend) = args.prepend_constituent {
        editor = editor.with_prepend_constituent(prepend);
    }
    view.editor = editor;

    finish(ctx, &session, &view, args.save, args.json, SaveMode::Update).await
}

async fn run_new(ctx: &ApiContext, args: NewArgs) -> Result<()> {
    let session = interruptible_session();
    let package_type = args
        .package_type
        .clone()
        .unwrap_or_else(|| ctx.config.default_package_type().to_string());

    let mut view = ui::with_spinner_async(
        "Loading available stores",
        "Loaded available stores",
        new_group_editor(&ctx.client, &session, &package_type, &args.name),
    )
    .await
    .context("Failed to connect to API")?;

    let ops: Vec<EditOp> = args.add.iter().cloned().map(EditOp::Add).collect();
    view.editor = apply_ops(&view.editor, &ops)?.with_prepend_constituent(args.prepend_constituent);
    view.store.description = args.description.clone();

    finish(ctx, &session, &view, args.save, args.json, SaveMode::Create).await
}

/// Apply operations in order; a boundary hit is reported and skipped.
fn apply_ops(editor: &ConstituentEditor, ops: &[EditOp]) -> Result<ConstituentEditor> {
    let mut current = editor.clone();
    for op in ops {
        let (next, outcome) = current
            .apply(op)
            .with_context(|| format!("Cannot {}", op))?;
        if outcome == Outcome::AtBoundary {
            tracing::warn!("{}: already at the edge, nothing moved", op);
        }
        current = next;
    }
    Ok(current)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveMode {
    Create,
    Update,
}

async fn finish(
    ctx: &ApiContext,
    session: &Session,
    view: &GroupEditView,
    save: bool,
    json: bool,
    mode: SaveMode,
) -> Result<()> {
    let store = view.to_store();

    if save {
        let form_mode = match mode {
            SaveMode::Create => FormMode::New,
            SaveMode::Update => FormMode::Edit,
        };
        validate(&store, form_mode)?;
        let key = store.store_key();
        ui::with_spinner_async(format!("Saving {}", key), format!("Saved {}", key), async {
            match mode {
                SaveMode::Create => {
                    let response = session.guard(ctx.client.create_store(&store)).await??;
                    require(response, &format!("Failed to create {}", key))
                }
                SaveMode::Update => {
                    let response = session.guard(ctx.client.update_store(&store)).await??;
                    require(response, &format!("Failed to update {}", key)).map(|_| ())
                }
            }
        })
        .await?;
    }

    if json {
        return print_json(&store);
    }

    print_editor(&view.editor);
    if save {
        println!("✓ Saved {}", store.store_key());
    } else {
        println!("(not saved, pass --save to submit)");
    }
    Ok(())
}

struct EditorSummary<'a> {
    group: String,
    prepend_constituent: bool,
    constituents: &'a [StoreKey],
    available: Vec<&'a StoreKey>,
}

fn summary(editor: &ConstituentEditor) -> EditorSummary<'_> {
    EditorSummary {
        group: editor.group().to_string(),
        prepend_constituent: editor.prepend_constituent(),
        constituents: editor.constituents(),
        available: editor.visible_available(),
    }
}

fn print_editor(editor: &ConstituentEditor) {
    let s = summary(editor);
    let order = if s.prepend_constituent { "prepend" } else { "append" };
    println!("┌─ {} ({} new constituents)", s.group, order);
    println!("│");

    if s.constituents.is_empty() {
        println!("├─ (no constituents)");
    }
    for (i, key) in s.constituents.iter().enumerate() {
        println!("├─ {}. {}", i + 1, key);
    }

    println!("│");
    println!("└─ available: {}", s.available.len());
    for (i, key) in s.available.iter().enumerate() {
        let (prefix, _) = tree_prefix(i, s.available.len());
        println!("   {} {}", prefix, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> StoreKey {
        raw.parse().unwrap()
    }

    fn editor() -> ConstituentEditor {
        ConstituentEditor::new(
            key("maven:group:public"),
            vec![key("maven:remote:a"), key("maven:remote:b")],
            vec![key("maven:remote:c"), key("npm:remote:d")],
        )
    }

    #[test]
    fn applies_ops_in_order() {
        let ops: Vec<EditOp> = ["promote:maven:remote:b", "remove:maven:remote:a"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        let edited = apply_ops(&editor(), &ops).unwrap();
        assert_eq!(edited.constituents(), &[key("maven:remote:b")]);
        assert_eq!(
            edited.available(),
            &[key("maven:remote:a"), key("maven:remote:c"), key("npm:remote:d")]
        );
    }

    #[test]
    fn boundary_is_not_an_error() {
        let ops = vec![EditOp::Promote(key("maven:remote:a"))];
        let edited = apply_ops(&editor(), &ops).unwrap();
        assert_eq!(edited, editor());
    }

    #[test]
    fn unknown_key_fails_with_op() {
        let ops = vec![EditOp::Remove(key("maven:remote:zzz"))];
        let err = apply_ops(&editor(), &ops).unwrap_err();
        assert!(err.to_string().starts_with("Cannot remove:maven:remote:zzz"));
    }

    #[test]
    fn summary_hides_other_package_types() {
        let ed = editor();
        let s = summary(&ed);
        assert_eq!(s.available, vec![&key("maven:remote:c")]);
        assert_eq!(s.group, "maven:group:public");
    }
}
