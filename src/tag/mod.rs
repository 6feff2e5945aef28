//! Html tag objects exchanged with the host.
//!
//! | Module        | Purpose                                     |
//! |---------------|---------------------------------------------|
//! | `attr`        | Ordered attributes + rendering              |
//! | `resource`    | File extension → `as` destination           |
//! | `public_path` | `href` prefix resolution                    |

mod attr;
pub mod public_path;
mod resource;

pub use attr::{AttrValue, Attributes};
pub use resource::ResourceType;

use serde::{Deserialize, Serialize};

/// Provenance marker written on every tag this crate creates.
pub const PLUGIN_NAME: &str = "preload-inject";

/// Provenance metadata on a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagMeta {
    /// Name of the plugin that created the tag, if any.
    pub plugin: Option<String>,
}

/// A markup tag in the host's head/body lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlTag {
    pub tag_name: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub void_tag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_html: Option<String>,
    #[serde(default)]
    pub meta: TagMeta,
}

impl HtmlTag {
    pub fn new(tag_name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes,
            void_tag: false,
            inner_html: None,
            meta: TagMeta::default(),
        }
    }

    /// A `<link>` created by this crate.
    pub fn preload_link(attributes: Attributes) -> Self {
        Self {
            tag_name: "link".into(),
            attributes,
            void_tag: true,
            inner_html: None,
            meta: TagMeta {
                plugin: Some(PLUGIN_NAME.into()),
            },
        }
    }

    #[inline]
    pub fn is(&self, tag_name: &str) -> bool {
        self.tag_name == tag_name
    }

    /// Whether this tag was created by this crate.
    pub fn is_ours(&self) -> bool {
        self.meta.plugin.as_deref() == Some(PLUGIN_NAME)
    }

    /// Serialize to markup.
    pub fn render(&self) -> String {
        let attrs = self.attributes.render();
        if self.void_tag {
            format!("<{}{}>", self.tag_name, attrs)
        } else {
            format!(
                "<{name}{attrs}>{inner}</{name}>",
                name = self.tag_name,
                inner = self.inner_html.as_deref().unwrap_or_default()
            )
        }
    }
}

/// Render a tag list back to back.
pub fn render_all<'a>(tags: impl IntoIterator<Item = &'a HtmlTag>) -> String {
    tags.into_iter().map(HtmlTag::render).collect()
}
