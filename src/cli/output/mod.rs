//! CLI output formatting module
//!
//! Provides the table formatter and the `--json` printer.

pub mod table;

use anyhow::Result;
use serde::Serialize;

pub use table::TableFormatter;

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
