//! Html host hook surface.
//!
//! The plugin never inspects the host for a companion plugin by name.
//! Instead the caller hands it a [`HookRegistry`], and registration checks
//! that the hooks it needs are actually there:
//!
//! | Hook                  | Payload       | Used for                          |
//! |-----------------------|---------------|-----------------------------------|
//! | `AlterAssetTagGroups` | [`TagGroups`] | entry-point links, pattern `tags` |
//! | `AfterHtmlProcessing` | [`HtmlDocument`] | pattern `placeholder` (legacy) |
//! | `BeforeEmit`          | [`HtmlDocument`] | pattern `placeholder`          |
//!
//! Callbacks are asynchronous in shape only: they receive a [`Done`]
//! continuation and call it once, with the payload or an error.

mod error;
mod plugin;

pub use error::PluginError;
pub use plugin::PreloadPlugin;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::graph::Compilation;
use crate::tag::HtmlTag;

/// Hooks the plugin knows how to tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookName {
    AlterAssetTagGroups,
    BeforeEmit,
    AfterHtmlProcessing,
}

/// Payload carried by a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    TagGroups,
    Html,
}

impl HookKind {
    pub const fn describe(self) -> &'static str {
        match self {
            HookKind::TagGroups => "tag groups",
            HookKind::Html => "rendered html",
        }
    }
}

impl HookName {
    pub const fn kind(self) -> HookKind {
        match self {
            Self::AlterAssetTagGroups => HookKind::TagGroups,
            Self::BeforeEmit | Self::AfterHtmlProcessing => HookKind::Html,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlterAssetTagGroups => "alterAssetTagGroups",
            Self::BeforeEmit => "beforeEmit",
            Self::AfterHtmlProcessing => "afterHtmlProcessing",
        }
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Options of the html plugin instance rendering the current document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HtmlPluginOptions {
    /// Entrypoints included in this document (`None` = all).
    ///
    /// Accepts a list of names or the html plugin's `"all"` keyword.
    #[serde(deserialize_with = "chunks_or_all")]
    pub chunks: Option<Vec<String>>,
    /// Public path configured on the html plugin (`"auto"` allowed).
    pub public_path: Option<String>,
}

fn chunks_or_all<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Chunks {
        List(Vec<String>),
        Keyword(String),
    }

    match Option::<Chunks>::deserialize(d)? {
        None => Ok(None),
        Some(Chunks::List(names)) => Ok(Some(names)),
        Some(Chunks::Keyword(k)) if k == "all" => Ok(None),
        Some(Chunks::Keyword(k)) => Err(D::Error::custom(format!(
            "unknown chunks value `{k}`, expected \"all\" or a list of entry names"
        ))),
    }
}

/// Head/body tag lists about to be serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TagGroups {
    pub head_tags: Vec<HtmlTag>,
    pub body_tags: Vec<HtmlTag>,
    pub output_name: String,
    /// Public path resolved by hosts that provide one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,
    pub plugin: HtmlPluginOptions,
}

/// Rendered html of one output document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlDocument {
    pub html: String,
    pub output_name: String,
}

// ============================================================================
// Registry
// ============================================================================

/// Continuation handed to a callback; consumed by the single call.
pub type Done<T> = Box<dyn FnOnce(Result<T, PluginError>)>;

pub type TagGroupsCallback = Box<dyn Fn(&Compilation, TagGroups, Done<TagGroups>)>;
pub type HtmlCallback = Box<dyn Fn(&Compilation, HtmlDocument, Done<HtmlDocument>)>;

/// What an html host exposes to plugins.
pub trait HookRegistry {
    fn supports(&self, hook: HookName) -> bool;

    fn tap_tag_groups(
        &mut self,
        hook: HookName,
        plugin: &'static str,
        callback: TagGroupsCallback,
    ) -> Result<(), PluginError>;

    fn tap_html(
        &mut self,
        hook: HookName,
        plugin: &'static str,
        callback: HtmlCallback,
    ) -> Result<(), PluginError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_kinds() {
        assert_eq!(HookName::AlterAssetTagGroups.kind(), HookKind::TagGroups);
        assert_eq!(HookName::BeforeEmit.kind(), HookKind::Html);
        assert_eq!(HookName::AfterHtmlProcessing.to_string(), "afterHtmlProcessing");
    }

    #[test]
    fn test_tag_groups_json() {
        let groups: TagGroups = serde_json::from_str(
            r#"{
                "headTags": [{"tagName": "script", "attributes": {"src": "/app.js"}}],
                "outputName": "index.html",
                "plugin": {"chunks": ["app"]}
            }"#,
        )
        .unwrap();
        assert_eq!(groups.head_tags.len(), 1);
        assert!(groups.body_tags.is_empty());
        assert_eq!(groups.plugin.chunks.as_deref(), Some(&["app".to_string()][..]));
        assert_eq!(groups.public_path, None);
    }

    #[test]
    fn test_chunks_all_keyword() {
        let parse = |plugin: &str| {
            serde_json::from_str::<TagGroups>(&format!(r#"{{"plugin": {plugin}}}"#))
                .map(|g| g.plugin.chunks)
        };
        assert_eq!(parse(r#"{"chunks": "all"}"#).unwrap(), None);
        assert_eq!(parse(r#"{"chunks": null}"#).unwrap(), None);
        assert_eq!(parse("{}").unwrap(), None);
        assert_eq!(
            parse(r#"{"chunks": ["app"]}"#).unwrap(),
            Some(vec!["app".to_string()])
        );
        assert!(parse(r#"{"chunks": "some"}"#).is_err());
    }
}
