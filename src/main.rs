//! preload-inject - inject preload links into bundler-generated html.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use preload_inject::cli::{self, Cli, Commands, common::load_config};
use preload_inject::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let (config_path, explicit) = cli.config_path();
    let config = load_config(&config_path, explicit)?;

    match &cli.command {
        Commands::Html { host, input, name } => {
            cli::html::run_html(&config, host, input, name.as_deref())
        }
        Commands::Tags { host, input } => cli::tags::run_tags(&config, host, input),
        Commands::Check => cli::check::run_check(&config),
    }
}
