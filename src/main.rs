//! Main entry point for quarterdiff CLI

use clap::Parser;
use quarterdiff::cli::{Cli, Commands};
use quarterdiff::commands::execute_command;
use quarterdiff::duckdb_config;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    // Only commands that read tables need the DuckDB engine
    if !matches!(cli.command, Commands::Init { .. }) {
        if let Err(e) = duckdb_config::init_duckdb() {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = execute_command(cli.command, cli.config.as_deref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
