//! Command-line interface definitions.
//!
//! Defines the argument parser and subcommands using clap's derive API.
//! Each subcommand corresponds to a distinct operation: repairing the
//! registry in place, previewing a repair, or inspecting the registry
//! contents.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Repair stale entries and broken dependency references in a component registry.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the repair and write the registry back.
    Fix {
        /// Registry file to repair.
        #[arg(long, default_value = "registry.json")]
        registry: PathBuf,

        /// Repository root candidate paths are resolved against.
        /// Defaults to the registry file's parent directory.
        #[arg(long)]
        root: Option<PathBuf>,

        /// JSON fix plan to apply instead of the built-in one.
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,

        /// Confirm before writing.
        #[arg(short, long)]
        interactive: bool,

        /// Emit the report as JSON instead of human-readable output.
        #[arg(long)]
        json: bool,

        /// Print additional diagnostics to stderr.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Preview the repair without ever writing.
    Check {
        /// Registry file to inspect.
        #[arg(long, default_value = "registry.json")]
        registry: PathBuf,

        /// Repository root candidate paths are resolved against.
        /// Defaults to the registry file's parent directory.
        #[arg(long)]
        root: Option<PathBuf>,

        /// JSON fix plan to apply instead of the built-in one.
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Emit the report as JSON instead of human-readable output.
        #[arg(long)]
        json: bool,

        /// Print additional diagnostics to stderr.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the registry's categories and entry ids.
    Show {
        /// Registry file to inspect.
        #[arg(long, default_value = "registry.json")]
        registry: PathBuf,

        /// Maximum tree depth to display.
        #[arg(long, default_value_t = 2)]
        depth: usize,
    },
}
