//! trie-bench - compare the standard, compressed and double-array tries
//!
//! Set `RUST_LOG=prefix_tries=debug` to see growth and relocation events.

use clap::Parser;
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use prefix_tries::cli::{commands, Cli};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
}
