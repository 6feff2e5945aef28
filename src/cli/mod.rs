//! Command-line interface module.

mod args;
pub mod check;
pub mod common;
pub mod html;
pub mod tags;

pub use args::{Cli, Commands, DEFAULT_CONFIG, HostArgs};
