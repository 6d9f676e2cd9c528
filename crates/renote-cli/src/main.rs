//! Renote CLI - inspect and manage locally saved credit note drafts
//!
//! The draft store is the same JSON document the form layer writes; this
//! binary is the recovery/inspection tool for it.

mod cli;
mod commands;
mod error;

use std::env;
use std::path::PathBuf;

use clap::Parser;
use renote_core::JsonFileStore;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("renote=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let store = JsonFileStore::new(resolve_store_path(cli.store));
    tracing::debug!("using draft store at {}", store.path().display());

    match cli.command {
        Commands::List { json } => commands::list::run_list(json, &store),
        Commands::Show { invoice_id, json } => commands::show::run_show(invoice_id, json, &store),
        Commands::Delete { invoice_id } => commands::delete::run_delete(invoice_id, &store),
        Commands::Clear => commands::clear::run_clear(&store),
        Commands::Sweep => commands::sweep::run_sweep(&store),
        Commands::Export { format, output } => {
            commands::export::run_export(format, output.as_deref(), &store)
        }
        Commands::Completions { shell, output } => {
            commands::completions::run_completions(shell, output.as_deref())
        }
    }
}

fn resolve_store_path(cli_store: Option<PathBuf>) -> PathBuf {
    cli_store
        .or_else(|| env::var_os("RENOTE_DRAFTS_PATH").map(PathBuf::from))
        .unwrap_or_else(default_store_path)
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("renote")
        .join("drafts.json")
}
