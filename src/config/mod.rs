//! Plugin configuration (`preload.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error.rs   # ConfigError, ConfigDiagnostics
//! ├── rule.rs    # [[files]] rules
//! └── mod.rs     # PreloadConfig (raw) → PluginOptions (compiled)
//! ```
//!
//! # Example
//!
//! ```toml
//! entry_point_preload = true
//! mode = "placeholder"
//! placeholder = "<!-- html-webpack-inject-preload -->"
//! public_path = "auto"
//! exclude_output_names = ["^scripts-hashed"]
//!
//! [[files]]
//! match = '.*\.woff2'
//! attributes = { rel = "preload", as = "font", type = "font/woff2", crossorigin = true }
//! ```
//!
//! Options are read once per plugin instance and never change afterwards;
//! every compilation sees the same compiled `PluginOptions`.

mod error;
mod rule;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use rule::{FileRuleConfig, Rule};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, str::FromStr};

use crate::log;

/// Placeholder replaced by rendered links in text mode.
pub const DEFAULT_PLACEHOLDER: &str = "<!-- html-webpack-inject-preload -->";

// ============================================================================
// raw configuration
// ============================================================================

/// Where the pattern injector puts its links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectMode {
    /// Replace the placeholder in rendered html.
    #[default]
    Placeholder,
    /// Splice tag objects into the head list before html is rendered.
    Tags,
}

/// Root configuration structure representing `preload.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreloadConfig {
    /// Pattern rules, first match wins.
    pub files: Vec<FileRuleConfig>,

    /// Walk each entrypoint's preload children and inject links for them.
    pub entry_point_preload: bool,

    /// Output documents whose name matches any of these are left alone.
    pub exclude_output_names: Vec<String>,

    /// Marker replaced in placeholder mode.
    pub placeholder: String,

    /// Pattern injector output.
    pub mode: InjectMode,

    /// Public path override for entry-point links (`"auto"` defers to the host).
    pub public_path: Option<String>,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            entry_point_preload: false,
            exclude_output_names: Vec::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            mode: InjectMode::default(),
            public_path: None,
        }
    }
}

impl FromStr for PreloadConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}

impl PreloadConfig {
    /// Read and parse a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        content.parse()
    }

    /// Validate and compile into immutable plugin options.
    ///
    /// Every invalid field is reported, not just the first.
    pub fn compile(&self) -> Result<PluginOptions, ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        let mut rules = Vec::with_capacity(self.files.len());
        for (i, raw) in self.files.iter().enumerate() {
            match Rule::try_from(raw) {
                Ok(rule) => rules.push(rule),
                Err(e) => diag.error_with_hint(
                    format!("files[{i}].match"),
                    format!("invalid regular expression `{}`", raw.pattern),
                    e.to_string(),
                ),
            }
        }

        let mut exclude_output_names = Vec::with_capacity(self.exclude_output_names.len());
        for (i, pattern) in self.exclude_output_names.iter().enumerate() {
            match Regex::new(pattern) {
                Ok(re) => exclude_output_names.push(re),
                Err(e) => diag.error_with_hint(
                    format!("exclude_output_names[{i}]"),
                    format!("invalid regular expression `{pattern}`"),
                    e.to_string(),
                ),
            }
        }

        if self.mode == InjectMode::Placeholder
            && !self.files.is_empty()
            && self.placeholder.is_empty()
        {
            diag.error_with_hint(
                "placeholder",
                "placeholder must not be empty in placeholder mode",
                format!("use the default `{DEFAULT_PLACEHOLDER}`"),
            );
        }

        if self.public_path.as_deref() == Some("") {
            diag.hint("public_path", "empty public path keeps hrefs relative to the document");
        }

        if let Err(diag) = diag.into_result() {
            return Err(ConfigError::Diagnostics(diag));
        }

        if rules.is_empty() && !self.entry_point_preload {
            log!("config";
                "no [[files]] rules and entry_point_preload is off, nothing will be injected");
        }

        Ok(PluginOptions {
            rules,
            entry_point_preload: self.entry_point_preload,
            exclude_output_names,
            placeholder: self.placeholder.clone(),
            mode: self.mode,
            public_path: self.public_path.clone(),
        })
    }
}

// ============================================================================
// compiled configuration
// ============================================================================

/// Validated options shared by every compilation of one plugin instance.
#[derive(Debug, Clone)]
pub struct PluginOptions {
    pub rules: Vec<Rule>,
    pub entry_point_preload: bool,
    pub exclude_output_names: Vec<Regex>,
    pub placeholder: String,
    pub mode: InjectMode,
    pub public_path: Option<String>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            entry_point_preload: false,
            exclude_output_names: Vec::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            mode: InjectMode::default(),
            public_path: None,
        }
    }
}

impl PluginOptions {
    /// Whether `output_name` is excluded from injection.
    pub fn is_excluded(&self, output_name: &str) -> bool {
        self.exclude_output_names
            .iter()
            .any(|re| re.is_match(output_name))
    }

    /// Whether the pattern injector has anything to do.
    #[inline]
    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty()
    }
}
