//! # notegraph
//!
//! Command-line front end for the vault engine. Every subcommand opens the
//! vault, runs one query and prints the result as JSON on stdout; logs go to
//! stderr.

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::{Cli, Command, LogFormat};
pub use commands::{EmbedOutput, execute, open_engine};
pub use notegraph_vault::prelude::*;
