//! Argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// notegraph - link resolution, backlinks and link graphs for markdown vaults
#[derive(Parser, Debug)]
#[command(name = "notegraph", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the vault directory (defaults to the current directory)
    #[arg(short, long, env = "NOTEGRAPH_VAULT", global = true)]
    pub vault: Option<String>,

    /// YAML engine configuration file
    #[arg(short, long, env = "NOTEGRAPH_CONFIG", global = true)]
    pub config: Option<String>,

    /// Log filter used when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve a wikilink target as written in a note
    Resolve {
        /// Raw target, e.g. `Project Plan#Goals`
        target: String,
        /// Note the link is written in (vault-relative or absolute)
        #[arg(short, long)]
        from: PathBuf,
    },

    /// Resolve an embed target and show the embedded section for notes
    Embed {
        /// Raw target, e.g. `diagram.png` or `Plan#^summary`
        target: String,
        /// Note the embed is written in (vault-relative or absolute)
        #[arg(short, long)]
        from: PathBuf,
    },

    /// List the headings and block ids of a note
    Anchors {
        /// Note path (vault-relative or absolute)
        note: PathBuf,
    },

    /// Print the full link graph, or the neighborhood of one note
    Graph {
        /// Restrict to the notes within `--depth` links of this note
        #[arg(long)]
        center: Option<PathBuf>,
        /// Hop limit for `--center`
        #[arg(long, default_value_t = 1)]
        depth: usize,
    },

    /// Linked and unlinked mentions of a note
    Backlinks {
        /// Note path (vault-relative or absolute)
        note: PathBuf,
    },

    /// Link counts, broken links, orphans and cycles
    Stats,
}

/// Log output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}
