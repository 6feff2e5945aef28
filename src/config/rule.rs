//! `[[files]]` preload rules.
//!
//! # Example
//!
//! ```toml
//! [[files]]
//! match = '\.woff2$'
//! attributes = { as = "font", type = "font/woff2", crossorigin = true }
//!
//! [[files]]
//! match = 'vendors\.[a-z0-9-]*\.css'
//! attributes = { as = "style", href = "/css/vendors-alt.css" }
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tag::Attributes;

/// A rule as written in `preload.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRuleConfig {
    /// Regular expression tested (unanchored) against each output file name.
    #[serde(rename = "match")]
    pub pattern: String,

    /// Attributes merged over `{ href, rel = "preload" }`.
    ///
    /// `href = false` drops the href but still emits the tag. This is kept
    /// for compatibility even though a preload without href does nothing.
    #[serde(default)]
    pub attributes: Attributes,
}

/// A compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Regex,
    pub attributes: Attributes,
}

impl Rule {
    pub fn new(pattern: &str, attributes: Attributes) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            attributes,
        })
    }

    #[inline]
    pub fn matches(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name)
    }
}

impl TryFrom<&FileRuleConfig> for Rule {
    type Error = regex::Error;

    fn try_from(raw: &FileRuleConfig) -> Result<Self, Self::Error> {
        Rule::new(&raw.pattern, raw.attributes.clone())
    }
}
