//! Plugin/host protocol errors.

use thiserror::Error;

use super::HookName;

#[derive(Debug, Error)]
pub enum PluginError {
    /// The host does not expose a hook this configuration needs.
    #[error("`{plugin}` needs the `{hook}` hook, which this html host does not provide")]
    MissingHook { plugin: &'static str, hook: HookName },

    /// None of the acceptable hooks for a mode is available.
    #[error("`{plugin}` found no compatible html hook (tried {tried})")]
    NoCompatibleHook { plugin: &'static str, tried: String },

    /// A callback was tapped on a hook carrying a different payload.
    #[error("hook `{hook}` does not carry {expected}")]
    HookKindMismatch { hook: HookName, expected: &'static str },

    /// A callback failed unexpectedly while computing tags.
    #[error("preload injection failed: {0}")]
    Callback(String),
}
