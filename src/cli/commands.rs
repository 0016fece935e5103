//! CLI commands and argument parsing

use crate::api::TimelineKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Timeline pager CLI
#[derive(Parser, Debug)]
#[command(name = "timeline-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Instance host (overrides config)
    #[arg(short, long, global = true)]
    pub instance: Option<String>,

    /// Access token (overrides config and TIMELINE_PAGER_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Timeline: public, federated, local, home, tag:NAME, list:ID
    #[arg(short, long, global = true)]
    pub timeline: Option<TimelineKind>,

    /// Page size hint
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a timeline, then page toward older and newer content
    Fetch {
        /// Older pages to fetch after the initial load
        #[arg(long, default_value = "0")]
        older: usize,

        /// Newer pages to fetch after the older ones
        #[arg(long, default_value = "0")]
        newer: usize,
    },

    /// Print the root request without sending it
    Request,

    /// List known timeline kinds
    Timelines,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one page per line)
    Json,
    /// Human-readable output
    Pretty,
}
