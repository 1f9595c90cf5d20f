//! AnswerForge CLI - extract training answer candidates from documents.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is reserved for candidate output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract(args) => commands::extract(args),
        Command::Search(args) => commands::search(args),
    }
}
