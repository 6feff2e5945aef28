//! `check` command: config validation.

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::config::{InjectMode, PreloadConfig};
use crate::log;

/// Compile the config and summarize what it would inject.
pub fn run_check(config: &PreloadConfig) -> Result<()> {
    let options = config.compile()?;

    for (i, rule) in options.rules.iter().enumerate() {
        let attrs = rule.attributes.render();
        log!("check"; "files[{}] {}{}", i, rule.pattern.as_str().cyan(), attrs.dimmed());
    }

    if options.has_rules() {
        match options.mode {
            InjectMode::Placeholder => {
                log!("check"; "pattern links replace `{}`", options.placeholder)
            }
            InjectMode::Tags => log!("check"; "pattern links are spliced into head tags"),
        }
    }
    if options.entry_point_preload {
        log!("check"; "entry-point preloading enabled");
    }
    if !options.exclude_output_names.is_empty() {
        log!("check"; "{} excluded output pattern(s)", options.exclude_output_names.len());
    }

    log!("check"; "config ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_valid() {
        let config: PreloadConfig = r#"
            entry_point_preload = true
            [[files]]
            match = '\.css$'
            attributes = { as = "style" }
        "#
        .parse()
        .unwrap();
        assert!(run_check(&config).is_ok());
    }

    #[test]
    fn test_check_invalid_regex() {
        let config: PreloadConfig = r#"
            [[files]]
            match = '(unclosed'
        "#
        .parse()
        .unwrap();
        assert!(run_check(&config).is_err());
    }
}
