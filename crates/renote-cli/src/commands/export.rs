use std::path::Path;

use renote_core::export::{self, render_drafts_export};
use renote_core::models::most_recent_first;
use renote_core::{DraftStore, JsonFileStore};

use crate::cli::ExportFormat;
use crate::error::CliError;

pub fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    store: &JsonFileStore,
) -> Result<(), CliError> {
    let drafts = most_recent_first(&store.cleanup_expired());
    let rendered = render_drafts_export(&drafts, core_format(format))?;

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

const fn core_format(format: ExportFormat) -> export::ExportFormat {
    match format {
        ExportFormat::Json => export::ExportFormat::Json,
        ExportFormat::Markdown => export::ExportFormat::Markdown,
    }
}
