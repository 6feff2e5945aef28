//! In-process html host.
//!
//! Stands in for the html plugin of a bundler: it exposes a hook surface
//! matching one host generation, stores the callbacks plugins tap, and
//! runs them for each document.
//!
//! | Generation | Hooks                                 | Public path in tag data |
//! |------------|---------------------------------------|-------------------------|
//! | `v3`       | `afterHtmlProcessing`                 | no                      |
//! | `v4`       | `alterAssetTagGroups`, `beforeEmit`   | no                      |
//! | `v5`       | `alterAssetTagGroups`, `beforeEmit`   | yes                     |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::debug;
use crate::graph::Compilation;
use crate::hooks::{
    Done, HookKind, HookName, HookRegistry, HtmlCallback, HtmlDocument, PluginError, TagGroups,
    TagGroupsCallback,
};

/// Html plugin protocol generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostGeneration {
    V3,
    V4,
    #[default]
    V5,
}

impl HostGeneration {
    pub const fn hooks(self) -> &'static [HookName] {
        match self {
            Self::V3 => &[HookName::AfterHtmlProcessing],
            Self::V4 | Self::V5 => &[HookName::AlterAssetTagGroups, HookName::BeforeEmit],
        }
    }

    /// Whether tag-group payloads carry the resolved public path.
    pub const fn passes_public_path(self) -> bool {
        matches!(self, Self::V5)
    }
}

impl FromStr for HostGeneration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v3" | "3" => Ok(Self::V3),
            "v4" | "4" => Ok(Self::V4),
            "v5" | "5" => Ok(Self::V5),
            other => Err(format!("unknown host generation `{other}` (expected v3, v4 or v5)")),
        }
    }
}

impl fmt::Display for HostGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::V3 => "v3",
            Self::V4 => "v4",
            Self::V5 => "v5",
        })
    }
}

/// Html host holding tapped callbacks in tap order.
pub struct HtmlHost {
    generation: HostGeneration,
    tag_groups: Vec<(&'static str, TagGroupsCallback)>,
    html: Vec<(HookName, &'static str, HtmlCallback)>,
}

impl HtmlHost {
    pub fn new(generation: HostGeneration) -> Self {
        Self {
            generation,
            tag_groups: Vec::new(),
            html: Vec::new(),
        }
    }

    pub fn generation(&self) -> HostGeneration {
        self.generation
    }

    /// Number of callbacks tapped so far.
    pub fn tap_count(&self) -> usize {
        self.tag_groups.len() + self.html.len()
    }

    /// Run every `alterAssetTagGroups` tap over one document's tags.
    pub fn run_tag_groups(
        &self,
        compilation: &Compilation,
        mut groups: TagGroups,
    ) -> Result<TagGroups, PluginError> {
        if !self.generation.passes_public_path() {
            groups.public_path = None;
        }
        for (plugin, callback) in &self.tag_groups {
            debug!("host"; "alterAssetTagGroups → {}", plugin);
            groups = run_async(|done| callback(compilation, groups, done))?;
        }
        Ok(groups)
    }

    /// Run every html tap over one rendered document.
    pub fn run_html(
        &self,
        compilation: &Compilation,
        mut doc: HtmlDocument,
    ) -> Result<HtmlDocument, PluginError> {
        for (hook, plugin, callback) in &self.html {
            debug!("host"; "{} → {}", hook, plugin);
            doc = run_async(|done| callback(compilation, doc, done))?;
        }
        Ok(doc)
    }

    fn check(&self, hook: HookName, expected: HookKind) -> Result<(), PluginError> {
        if !self.supports(hook) {
            return Err(PluginError::MissingHook {
                plugin: "HtmlHost",
                hook,
            });
        }
        if hook.kind() != expected {
            return Err(PluginError::HookKindMismatch {
                hook,
                expected: expected.describe(),
            });
        }
        Ok(())
    }
}

impl HookRegistry for HtmlHost {
    fn supports(&self, hook: HookName) -> bool {
        self.generation.hooks().contains(&hook)
    }

    fn tap_tag_groups(
        &mut self,
        hook: HookName,
        plugin: &'static str,
        callback: TagGroupsCallback,
    ) -> Result<(), PluginError> {
        self.check(hook, HookKind::TagGroups)?;
        self.tag_groups.push((plugin, callback));
        Ok(())
    }

    fn tap_html(
        &mut self,
        hook: HookName,
        plugin: &'static str,
        callback: HtmlCallback,
    ) -> Result<(), PluginError> {
        self.check(hook, HookKind::Html)?;
        self.html.push((hook, plugin, callback));
        Ok(())
    }
}

/// Call a continuation-style callback and collect what it hands back.
fn run_async<T: 'static>(call: impl FnOnce(Done<T>)) -> Result<T, PluginError> {
    let slot: Rc<RefCell<Option<Result<T, PluginError>>>> = Rc::default();
    let sink = Rc::clone(&slot);
    call(Box::new(move |result| {
        *sink.borrow_mut() = Some(result);
    }));
    let result = slot.borrow_mut().take();
    result.unwrap_or_else(|| {
        Err(PluginError::Callback(
            "callback returned without calling done".into(),
        ))
    })
}
