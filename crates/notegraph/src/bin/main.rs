//! notegraph CLI

use clap::Parser;
use notegraph::{Cli, execute, logging, open_engine, to_json_string};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format)?;

    tracing::debug!(command = ?cli.command, "notegraph v{}", env!("CARGO_PKG_VERSION"));

    let engine = open_engine(cli.vault.as_deref(), cli.config.as_deref())?;
    let output = execute(&engine, &cli.command).await?;
    println!("{}", to_json_string(&output, "command output")?);
    Ok(())
}
