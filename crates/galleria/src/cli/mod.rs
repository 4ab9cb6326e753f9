//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the galleria binary.

mod commands;
mod local;
mod remote;

pub use commands::{Cli, Commands};
pub use local::handle_local_command;
pub use remote::{discover, show, watch};

use commands::OutputFormat;
use galleria::{GalleriaResult, ImageRecord, JsonError, view};

/// Print a snapshot in the requested format.
pub(crate) fn print_records(
    title: &str,
    records: &[ImageRecord],
    format: OutputFormat,
) -> GalleriaResult<()> {
    match format {
        OutputFormat::Json => {
            let json = view::render_json(records).map_err(|e| JsonError::new(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Human => print!("{}", view::render_table(title, records)),
    }
    Ok(())
}
