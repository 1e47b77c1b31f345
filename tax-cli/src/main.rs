use clap::Parser;
use tracing::debug;

use tax_cli::cli::Cli;
use tax_cli::{commands, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.log_file.as_deref())?;
    debug!(command = ?cli.command, "starting");

    let output = commands::run(&cli.command)?;
    println!("{output}");

    Ok(())
}
