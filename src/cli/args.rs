//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::host::HostGeneration;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "preload.toml";

/// Inject preload links into bundler-generated html
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: preload.toml)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Replace the placeholder in a rendered html document
    Html {
        #[command(flatten)]
        host: HostArgs,

        /// Rendered html document
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,

        /// Output name of the document, matched by `exclude_output_names`
        /// (default: file name of --input)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Run tag-group hooks over a JSON tag list
    #[command(visible_alias = "t")]
    Tags {
        #[command(flatten)]
        host: HostArgs,

        /// Tag groups JSON (`headTags`, `bodyTags`, `outputName`, ...)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,
    },

    /// Validate the config file and summarize its rules
    #[command(visible_alias = "c")]
    Check,
}

/// Arguments shared by commands that drive an html host.
#[derive(clap::Args, Debug, Clone)]
pub struct HostArgs {
    /// Compilation snapshot JSON (entrypoints, chunk groups, chunks, assets)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub compilation: PathBuf,

    /// Html host generation to emulate (v3, v4, v5)
    #[arg(long, default_value_t = HostGeneration::V5)]
    pub host: HostGeneration,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Config path and whether it was given explicitly.
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_CONFIG), false),
        }
    }
}
