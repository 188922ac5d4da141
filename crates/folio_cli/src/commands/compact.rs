//! Compact command implementation.

use super::{file_size, open_store};
use std::path::Path;
use tracing::info;

/// Compaction statistics.
#[derive(Debug)]
pub struct CompactStats {
    /// Documents kept.
    pub documents: usize,
    /// Corrupted lines dropped.
    pub corrupted_removed: usize,
    /// Documents that could not be written back.
    pub skipped: usize,
    /// Bytes before compaction.
    pub bytes_before: u64,
    /// Bytes after compaction.
    pub bytes_after: u64,
}

/// Loads the data file leniently and, unless `dry_run`, writes it back.
///
/// Writing back drops corrupted lines and duplicate `_id` lines.
pub fn compact(
    root: &Path,
    name: &str,
    dry_run: bool,
) -> Result<CompactStats, Box<dyn std::error::Error>> {
    let mut store = open_store(root, name, false)?;
    let report = store.load()?;
    let bytes_before = file_size(&store)?;

    let mut stats = CompactStats {
        documents: report.loaded,
        corrupted_removed: report.corrupted.len(),
        skipped: 0,
        bytes_before,
        bytes_after: bytes_before,
    };

    if !dry_run {
        let persisted = store.persist()?;
        stats.documents = persisted.written;
        stats.skipped = persisted.skipped;
        stats.bytes_after = file_size(&store)?;
        info!(
            before = stats.bytes_before,
            after = stats.bytes_after,
            "compacted data file"
        );
    }
    Ok(stats)
}

/// Runs the compact command.
pub fn run(root: &Path, name: &str, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("Compacting {name} in {}", root.display());
    if dry_run {
        println!("(dry run - no changes will be made)");
    }
    println!();

    let stats = compact(root, name, dry_run)?;

    println!("Compaction Analysis:");
    println!("  Documents:         {}", stats.documents);
    println!("  Corrupted lines:   {} (will be removed)", stats.corrupted_removed);
    if stats.skipped > 0 {
        println!("  Unwritable docs:   {}", stats.skipped);
    }
    println!();
    println!("  Size before: {} bytes", stats.bytes_before);
    if !dry_run {
        println!("  Size after:  {} bytes", stats.bytes_after);
    }
    Ok(())
}
