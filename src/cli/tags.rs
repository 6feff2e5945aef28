//! `tags` command: tag-group hooks over a JSON tag list.

use std::path::Path;

use anyhow::Result;

use super::HostArgs;
use super::common::{load_compilation, plugin_host, read_json, write_output};
use crate::config::PreloadConfig;
use crate::hooks::TagGroups;

/// Run the host's tag-group hooks over `input` and write the groups as JSON.
pub fn run_tags(config: &PreloadConfig, args: &HostArgs, input: &Path) -> Result<()> {
    let compilation = load_compilation(&args.compilation)?;
    let groups: TagGroups = read_json(input)?;

    let host = plugin_host(config, args.host)?;
    let groups = host.run_tag_groups(&compilation, groups)?;

    let mut json = serde_json::to_string_pretty(&groups)?;
    json.push('\n');
    write_output(args.output.as_deref(), &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostGeneration;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_tags_entry_preload() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("build.json"),
            r#"{
                "entrypoints": [{"name": "app", "group": 0}],
                "chunkGroups": [
                    {"name": "app", "chunks": [0], "children": [{"strategy": "preload", "group": 1}]},
                    {"chunks": [1]}
                ],
                "chunks": [{"files": ["app.js"]}, {"files": ["vendor.js", "inter.woff2"]}],
                "output": {"crossOriginLoading": "anonymous"}
            }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("tags.json"),
            r#"{
                "headTags": [{"tagName": "script", "attributes": {"src": "/static/app.js"}}],
                "outputName": "index.html",
                "publicPath": "/static/",
                "plugin": {"chunks": "all"}
            }"#,
        )
        .unwrap();
        let args = HostArgs {
            compilation: dir.path().join("build.json"),
            host: HostGeneration::V5,
            output: Some(dir.path().join("out.json")),
        };
        let config: PreloadConfig = "entry_point_preload = true".parse().unwrap();

        run_tags(&config, &args, &dir.path().join("tags.json")).unwrap();

        let json = fs::read_to_string(dir.path().join("out.json")).unwrap();
        let groups: TagGroups = serde_json::from_str(&json).unwrap();
        assert_eq!(groups.head_tags.len(), 3);
        assert_eq!(
            groups.head_tags[0].render(),
            r#"<link rel="preload" href="/static/vendor.js" as="script">"#
        );
        assert_eq!(
            groups.head_tags[1].render(),
            r#"<link rel="preload" href="/static/inter.woff2" as="font" crossorigin="anonymous">"#
        );
        assert!(groups.head_tags[0].is_ours() && groups.head_tags[1].is_ours());
    }

    #[test]
    fn test_run_tags_v3_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.json"), "{}").unwrap();
        fs::write(dir.path().join("tags.json"), "{}").unwrap();
        let args = HostArgs {
            compilation: dir.path().join("build.json"),
            host: HostGeneration::V3,
            output: None,
        };
        let config: PreloadConfig = "entry_point_preload = true".parse().unwrap();

        let err = run_tags(&config, &args, &dir.path().join("tags.json")).unwrap_err();
        assert!(err.to_string().contains("alterAssetTagGroups"));
    }
}
