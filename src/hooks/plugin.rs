//! The preload plugin: registration and hook callbacks.

use std::borrow::Cow;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use super::{
    Done, HookName, HookRegistry, HtmlCallback, HtmlDocument, PluginError, TagGroups,
    TagGroupsCallback,
};
use crate::config::{ConfigError, InjectMode, PluginOptions, PreloadConfig};
use crate::graph::{Compilation, all_output_files};
use crate::inject::{collect_links, inject_entry_preloads, inject_into_head, inject_into_html};
use crate::tag::public_path;
use crate::{debug, log};

/// Name the plugin registers its taps under.
pub const PLUGIN: &str = "PreloadInject";

/// Html hooks for placeholder mode, most preferred first.
const HTML_HOOKS: [HookName; 2] = [HookName::AfterHtmlProcessing, HookName::BeforeEmit];

/// Injects preload links through an html host's hooks.
///
/// Options are fixed at construction. Each callback sees only the
/// compilation it is called with, so one plugin instance can serve any
/// number of rebuilds.
#[derive(Debug, Clone)]
pub struct PreloadPlugin {
    options: Rc<PluginOptions>,
}

impl PreloadPlugin {
    pub fn new(options: PluginOptions) -> Self {
        Self {
            options: Rc::new(options),
        }
    }

    pub fn from_config(config: &PreloadConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.compile()?))
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    /// Tap the hooks this configuration needs.
    ///
    /// Fails before tapping anything if a required hook is missing.
    pub fn apply(&self, registry: &mut dyn HookRegistry) -> Result<(), PluginError> {
        let options = &self.options;
        let pattern_mode = options.has_rules().then_some(options.mode);

        // Check everything up front so a failure leaves nothing tapped.
        let needs_tag_groups =
            options.entry_point_preload || pattern_mode == Some(InjectMode::Tags);
        if needs_tag_groups && !registry.supports(HookName::AlterAssetTagGroups) {
            return Err(PluginError::MissingHook {
                plugin: PLUGIN,
                hook: HookName::AlterAssetTagGroups,
            });
        }
        let html_hook = match pattern_mode {
            Some(InjectMode::Placeholder) => Some(select_html_hook(registry)?),
            _ => None,
        };

        if options.entry_point_preload {
            registry.tap_tag_groups(
                HookName::AlterAssetTagGroups,
                PLUGIN,
                tag_groups_callback(Rc::clone(options), entry_preloads),
            )?;
        }

        match (pattern_mode, html_hook) {
            (Some(InjectMode::Tags), _) => registry.tap_tag_groups(
                HookName::AlterAssetTagGroups,
                PLUGIN,
                tag_groups_callback(Rc::clone(options), pattern_tags),
            )?,
            (Some(InjectMode::Placeholder), Some(hook)) => {
                debug!("inject"; "placeholder mode via `{}`", hook);
                registry.tap_html(hook, PLUGIN, html_callback(Rc::clone(options)))?;
            }
            _ => {}
        }

        Ok(())
    }
}

fn select_html_hook(registry: &dyn HookRegistry) -> Result<HookName, PluginError> {
    HTML_HOOKS
        .into_iter()
        .find(|hook| registry.supports(*hook))
        .ok_or_else(|| PluginError::NoCompatibleHook {
            plugin: PLUGIN,
            tried: HTML_HOOKS.map(HookName::as_str).join(", "),
        })
}

// ============================================================================
// Callbacks
// ============================================================================

type TagGroupsStep = fn(&PluginOptions, &Compilation, &mut TagGroups) -> Result<(), PluginError>;

/// Run `step` at the callback boundary: errors and panics both end up in
/// `done`, which is called exactly once.
fn guarded<T>(done: Done<T>, step: impl FnOnce() -> Result<T, PluginError>) {
    let result = catch_unwind(AssertUnwindSafe(step)).unwrap_or_else(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "callback panicked".into());
        Err(PluginError::Callback(message))
    });
    if let Err(e) = &result {
        log!("error"; "{}", e);
    }
    done(result);
}

fn tag_groups_callback(options: Rc<PluginOptions>, step: TagGroupsStep) -> TagGroupsCallback {
    Box::new(move |compilation: &Compilation, mut groups: TagGroups, done: Done<TagGroups>| {
        guarded(done, || {
            if !options.is_excluded(&groups.output_name) {
                step(&options, compilation, &mut groups)?;
            }
            Ok(groups)
        })
    })
}

fn html_callback(options: Rc<PluginOptions>) -> HtmlCallback {
    Box::new(move |compilation: &Compilation, mut doc: HtmlDocument, done: Done<HtmlDocument>| {
        guarded(done, || {
            if options.is_excluded(&doc.output_name) {
                return Ok(doc);
            }
            let links = collect_links(&options.rules, all_output_files(compilation));
            let injected = match inject_into_html(&doc.html, &options.placeholder, &links) {
                Cow::Owned(html) => Some(html),
                Cow::Borrowed(_) => None,
            };
            match injected {
                Some(html) => {
                    debug!("inject"; "{} link(s) into `{}`", links.len(), doc.output_name);
                    doc.html = html;
                }
                None => debug!("inject"; "no placeholder in `{}`, left as is", doc.output_name),
            }
            Ok(doc)
        })
    })
}

/// Entry-point links before each entry's script.
fn entry_preloads(
    options: &PluginOptions,
    compilation: &Compilation,
    groups: &mut TagGroups,
) -> Result<(), PluginError> {
    // Broken graphs degrade to fewer links.
    if let Err(e) = compilation.validate() {
        log!("warn"; "{}: {}", groups.output_name, e);
    }

    let public_path = public_path::resolve(&[
        options.public_path.as_deref(),
        groups.public_path.as_deref(),
        groups.plugin.public_path.as_deref(),
        compilation.output.public_path.as_deref(),
    ]);
    let report = inject_entry_preloads(
        compilation,
        groups.plugin.chunks.as_deref(),
        &public_path,
        &mut groups.head_tags,
        &mut groups.body_tags,
    );
    debug!("inject"; "`{}`: {} entry link(s), {} entr{} skipped",
        groups.output_name,
        report.total(),
        report.skipped.len(),
        if report.skipped.len() == 1 { "y" } else { "ies" });
    Ok(())
}

/// Rule links spliced into head.
fn pattern_tags(
    options: &PluginOptions,
    compilation: &Compilation,
    groups: &mut TagGroups,
) -> Result<(), PluginError> {
    let links = collect_links(&options.rules, all_output_files(compilation));
    if !links.is_empty() {
        inject_into_head(&mut groups.head_tags, links);
    }
    Ok(())
}

#[cfg(test)]
mod tests;
