//! CLI argument parsing using clap.

use clap::{
    Args, Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

use crate::source::SourceFormat;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

const AFTER_HELP: &str = "\
Quick Start:
  $ symdex init                                   # Create .symdex/settings.toml
  $ symdex check docs/html/search                 # Validate every functions_*.js shard
  $ symdex lookup face_2515 docs/html/search      # Exact key lookup
  $ symdex lookup --label face_handle             # Exact display-label lookup
  $ symdex keys --prefix face_ --json             # List keys for a typeahead";

/// Exact-match lookup over generated documentation search indexes
#[derive(Parser)]
#[command(
    name = "symdex",
    version = env!("CARGO_PKG_VERSION"),
    about = "Exact-match lookup over generated documentation search indexes",
    long_about = "Load Doxygen searchData scripts or canonical JSON index tables and query them by key.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the index comes from. Overrides `[index]` in settings.toml.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Index files or Doxygen search/ directories (default: `index.sources`)
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<PathBuf>,

    /// Input layout
    #[arg(long, value_enum)]
    pub format: Option<SourceFormat>,

    /// Shard category to load from directories (e.g. functions, all, classes)
    #[arg(long)]
    pub category: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .symdex directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    #[command(about = "Display active settings")]
    Config,

    /// Look up one key
    #[command(about = "Show every occurrence recorded for an exact key")]
    Lookup {
        /// Key to look up (e.g. face_2515)
        key: String,

        /// Match the display label instead of the key
        #[arg(short, long)]
        label: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// List keys
    #[command(about = "List keys in authored order")]
    Keys {
        /// Only keys starting with this text
        #[arg(short, long)]
        prefix: Option<String>,

        /// Stop after this many keys
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Validate an index
    #[command(about = "Load an index and report entry and occurrence counts")]
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        source: SourceArgs,
    },
}
