//! # CLI Layer
//!
//! This module is one possible client for flashprint, not the application
//! itself. It is the only place that knows about stdout, stderr and exit
//! codes, parses arguments, and formats results for people.
//!
//! ## Structure
//!
//! - `run()`: main dispatch (called by `main.rs`)
//! - `init_context()`: resolves the data directory and builds the API
//! - `handle_*()`: per-command handlers that call the API and render output
//!
//! Business logic is not tested here; the command layer owns it.

use super::render::{print_card_list, print_messages, print_paths, print_settings};
use super::setup::{
    print_grouped_help, print_help_for_command, print_subcommand_help, Cli, Commands,
    CoreCommands, DataCommands, MiscCommands, PrintCommands, SelectionCommands,
};
use clap::Parser;
use directories::ProjectDirs;
use flashprint::api::FlashApi;
use flashprint::commands::config::ConfigAction;
use flashprint::commands::FlashPaths;
use flashprint::error::{FlashError, Result};
use flashprint::model::CardField;
use flashprint::query::ViewQuery;
use flashprint::store::fs::FileStore;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const HOME_ENV: &str = "FLASHPRINT_HOME";

struct AppContext {
    api: FlashApi<FileStore>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // At top level use grouped help, for subcommands use clap's rendering
    if cli.help {
        print_subcommand_help(&cli.command);
        return Ok(());
    }
    if let Some(Commands::Misc(MiscCommands::Help { command })) = &cli.command {
        match command {
            Some(name) => print_help_for_command(name),
            None => print_grouped_help(),
        }
        return Ok(());
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Core(cmd)) => match cmd {
            CoreCommands::Add {
                lesson,
                front,
                back,
            } => handle_add(&mut ctx, &lesson, &front, back.as_deref().unwrap_or("")),
            CoreCommands::List { search, selected } => handle_list(&mut ctx, search, selected),
            CoreCommands::Edit { id, field, value } => handle_edit(&mut ctx, id, &field, &value),
        },
        Some(Commands::Selection(cmd)) => match cmd {
            SelectionCommands::Select { ids } => handle_select(&mut ctx, &ids, true),
            SelectionCommands::Unselect { ids } => handle_select(&mut ctx, &ids, false),
            SelectionCommands::SelectAll { search } => handle_select_all(&mut ctx, search),
            SelectionCommands::UnselectAll => {
                let result = ctx.api.unselect_all()?;
                print_messages(&result.messages);
                Ok(())
            }
            SelectionCommands::SelectUnprinted => {
                let result = ctx.api.select_unprinted()?;
                print_messages(&result.messages);
                Ok(())
            }
        },
        Some(Commands::Data(cmd)) => match cmd {
            DataCommands::Delete { id } => {
                let result = ctx.api.delete_card(id)?;
                print_messages(&result.messages);
                Ok(())
            }
            DataCommands::DeleteSelected => {
                let result = ctx.api.delete_selected()?;
                print_messages(&result.messages);
                Ok(())
            }
            DataCommands::Import { path } => handle_import(&mut ctx, &path),
            DataCommands::Export { path } => handle_export(&ctx, &path),
        },
        Some(Commands::Print(PrintCommands::Print { out, preview })) => {
            handle_print(&mut ctx, &out, preview)
        }
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Config { key, value } => handle_config(&ctx, key, value),
            MiscCommands::Help { .. } => Ok(()),
        },
        None => handle_list(&mut ctx, None, false),
    }
}

/// `RUST_LOG` wins; otherwise `-v` means debug and the default is warn.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "flashprint", "flashprint")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| FlashError::Api("Could not determine data directory".into()))
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = resolve_data_dir(cli)?;
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    let store = FileStore::new(data_dir.clone());
    let mut api = FlashApi::new(store, FlashPaths::new(data_dir));
    // No provider ships with the CLI; the setting still decides availability.
    api.load_translator(None)?;
    Ok(AppContext { api })
}

fn handle_add(ctx: &mut AppContext, lesson: &str, front: &str, back: &str) -> Result<()> {
    let result = ctx.api.add_card(lesson, front, back)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &mut AppContext, search: Option<String>, selected: bool) -> Result<()> {
    let result = match search.filter(|term| !term.trim().is_empty()) {
        Some(term) => {
            ctx.api.set_search_text(&term, Instant::now());
            ctx.api.flush_view()?
        }
        None if selected => ctx.api.show_selected_only()?,
        None => ctx.api.show_all()?,
    };
    print_card_list(&result.listed_cards);
    print_messages(&result.messages);
    Ok(())
}

fn handle_edit(ctx: &mut AppContext, id: u64, field: &str, value: &str) -> Result<()> {
    let field: CardField = field.parse().map_err(FlashError::Validation)?;
    let result = ctx.api.update_card(id, field, value)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_select(ctx: &mut AppContext, ids: &[String], selected: bool) -> Result<()> {
    let result = ctx.api.select_cards(ids, selected)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_select_all(ctx: &mut AppContext, search: Option<String>) -> Result<()> {
    let query = search.map(ViewQuery::search).unwrap_or_default();
    let result = ctx.api.select_all_matching(&query)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(ctx: &mut AppContext, path: &Path) -> Result<()> {
    let result = ctx.api.import_csv(path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, path: &Path) -> Result<()> {
    let result = ctx.api.export_csv(path)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_print(ctx: &mut AppContext, out: &Path, preview: bool) -> Result<()> {
    let job = ctx.api.prepare_print()?;
    let result = ctx.api.write_print_pages(&job, out)?;
    print_paths(&result.output_paths);
    print_messages(&result.messages);

    if preview || job.is_empty() {
        return Ok(());
    }
    let result = ctx.api.complete_print(&job)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = ctx.api.config(action)?;
    if let (Some(settings), true) = (&result.settings, result.messages.is_empty()) {
        print_settings(settings);
    }
    print_messages(&result.messages);
    Ok(())
}
