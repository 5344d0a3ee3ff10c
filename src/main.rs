//! Placeline - interactive address autocomplete in the terminal.

mod cli;
mod config;
mod core;
mod location;
mod logger;
mod provider;
mod resolve;
mod widget;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PlacelineConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = PlacelineConfig::load(&cli)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(async {
        match &cli.command {
            Commands::Search { text, pick } => cli::search::run_search(&config, text, *pick).await,
            Commands::Locate => cli::locate::run_locate(&config).await,
            Commands::Repl => cli::repl::run_repl(&config).await,
        }
    })
}
