//! Inspect command implementation.

use super::{file_size, open_store};
use serde::Serialize;
use std::path::Path;

/// Data file inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Data file path.
    pub path: String,
    /// Data file size in bytes.
    pub file_size: u64,
    /// Number of documents that loaded.
    pub document_count: usize,
    /// Number of lines that failed to load.
    pub corrupted_count: usize,
}

/// Runs the inspect command.
pub fn run(root: &Path, name: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(root, name, false)?;
    let path = store
        .config()
        .data_path()
        .ok_or("Root directory required")?;
    if !path.exists() {
        return Err(format!("No data file found at {}", path.display()).into());
    }

    let report = store.load()?;
    let result = InspectResult {
        path: path.display().to_string(),
        file_size: file_size(&store)?,
        document_count: report.loaded,
        corrupted_count: report.corrupted.len(),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text(&result),
    }
    Ok(())
}

fn print_text(result: &InspectResult) {
    println!("Data file: {}", result.path);
    println!();
    println!("  Size:            {} bytes", result.file_size);
    println!("  Documents:       {}", result.document_count);
    println!("  Corrupted lines: {}", result.corrupted_count);
}
