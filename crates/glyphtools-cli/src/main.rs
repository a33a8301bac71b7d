// this_file: crates/glyphtools-cli/src/main.rs

//! glyphtools CLI: kerning and metric binning for font sources.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Info(args) => commands::info::run(&args),
        Commands::Metrics(args) => commands::metrics::run(&args),
        Commands::Category(args) => commands::category::run(&args),
        Commands::Kern(args) => commands::kern::run(&args),
        Commands::Bin(args) => commands::bin::run(&args),
        Commands::Batch(args) => commands::batch::run(&args),
    }
}

/// Initialize logging based on verbosity flag.
fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
