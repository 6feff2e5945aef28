//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::config::PreloadConfig;
use crate::graph::Compilation;
use crate::hooks::PreloadPlugin;
use crate::host::{HostGeneration, HtmlHost};
use crate::log;

/// Load the config file, falling back to defaults when the default
/// `preload.toml` is simply absent.
pub fn load_config(path: &Path, explicit: bool) -> Result<PreloadConfig> {
    if !explicit && !path.exists() {
        log!("config"; "{} not found, using defaults", path.display());
        return Ok(PreloadConfig::default());
    }
    Ok(PreloadConfig::from_path(path)?)
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Load a compilation snapshot.
///
/// Graph anomalies are not rejected here; the entry callback warns about
/// them and injects what it can.
pub fn load_compilation(path: &Path) -> Result<Compilation> {
    read_json(path)
}

/// Build a host of `generation` with the plugin already applied.
pub fn plugin_host(config: &PreloadConfig, generation: HostGeneration) -> Result<HtmlHost> {
    let plugin = PreloadPlugin::from_config(config)?;
    let mut host = HtmlHost::new(generation);
    plugin.apply(&mut host)?;
    Ok(host)
}

/// Write to `output` if given, else to stdout.
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log!("inject"; "wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_default_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("preload.toml"), false).unwrap();
        assert!(config.files.is_empty());
        assert!(!config.entry_point_preload);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(&dir.path().join("custom.toml"), true).is_err());
    }

    #[test]
    fn test_load_compilation_keeps_cyclic_graph() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.json");
        fs::write(
            &path,
            r#"{
                "entrypoints": [{"name": "app", "group": 0}],
                "chunkGroups": [
                    {"chunks": [0], "children": [{"strategy": "lazy", "group": 1}]},
                    {"chunks": [], "children": [{"strategy": "lazy", "group": 0}]}
                ],
                "chunks": [{"files": ["app.js"]}]
            }"#,
        )
        .unwrap();
        let compilation = load_compilation(&path).unwrap();
        assert!(compilation.validate().is_err());
        assert_eq!(compilation.entrypoints.len(), 1);
    }

    #[test]
    fn test_load_compilation_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("build.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_compilation(&path).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_write_output_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/index.html");
        write_output(Some(path.as_path()), "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
    }
}
