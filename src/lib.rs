//! Preload link injection for bundler-generated html.
//!
//! Two independent injectors share one plugin:
//!
//! - **entry-point**: walks each entrypoint's preload children in the
//!   compilation graph and splices `<link rel="preload">` tags before the
//!   entry's script tag.
//! - **pattern**: matches every output file against configured rules and
//!   renders one link per match, either over a placeholder in finished html
//!   or into the head tag list.
//!
//! The plugin talks to an html host only through [`hooks::HookRegistry`];
//! [`host::HtmlHost`] provides an in-process host for three protocol
//! generations.

pub mod cli;
pub mod config;
pub mod graph;
pub mod hooks;
pub mod host;
pub mod inject;
pub mod logger;
pub mod tag;

pub use config::{PluginOptions, PreloadConfig};
pub use graph::Compilation;
pub use hooks::{HookRegistry, PluginError, PreloadPlugin};
pub use host::{HostGeneration, HtmlHost};
pub use tag::HtmlTag;
