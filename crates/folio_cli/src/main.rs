//! Folio CLI
//!
//! Command-line tools for Folio data files.
//!
//! # Commands
//!
//! - `inspect` - Display document and corruption counts
//! - `verify` - Load the data file strictly and report the first bad line
//! - `compact` - Rewrite the data file without corrupted lines

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Folio command-line data file tools.
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the data file
    #[arg(global = true, short, long)]
    root: Option<PathBuf>,

    /// Database name; the data file is `<root>/<name>.txt`
    #[arg(global = true, short, long, default_value = "folio")]
    name: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display document and corruption counts
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Verify that every line of the data file loads
    Verify,

    /// Rewrite the data file, dropping corrupted lines
    Compact {
        /// Dry run - show what would be done
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect { format } => {
            let root = cli.root.ok_or("Root directory required for inspect")?;
            commands::inspect::run(&root, &cli.name, &format)?;
        }
        Commands::Verify => {
            let root = cli.root.ok_or("Root directory required for verify")?;
            commands::verify::run(&root, &cli.name)?;
        }
        Commands::Compact { dry_run } => {
            let root = cli.root.ok_or("Root directory required for compact")?;
            commands::compact::run(&root, &cli.name, dry_run)?;
        }
        Commands::Version => {
            println!("Folio CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
