//! CLI module
//!
//! Command-line interface for reading timelines.
//!
//! # Commands
//!
//! - `fetch` - Load a timeline and page through it
//! - `request` - Print the root request without sending it
//! - `timelines` - List the known timeline kinds

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
