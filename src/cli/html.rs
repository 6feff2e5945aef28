//! `html` command: placeholder injection into a rendered document.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::HostArgs;
use super::common::{load_compilation, plugin_host, write_output};
use crate::config::PreloadConfig;
use crate::hooks::HtmlDocument;

/// Run the host's html hooks over `input` and write the result.
pub fn run_html(
    config: &PreloadConfig,
    args: &HostArgs,
    input: &Path,
    name: Option<&str>,
) -> Result<()> {
    let compilation = load_compilation(&args.compilation)?;
    let html = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let output_name = match name {
        Some(name) => name.to_owned(),
        None => input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    let host = plugin_host(config, args.host)?;
    let doc = host.run_html(&compilation, HtmlDocument { html, output_name })?;
    write_output(args.output.as_deref(), &doc.html)
}
