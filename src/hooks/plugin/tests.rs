use super::*;
use crate::config::{DEFAULT_PLACEHOLDER, Rule};
use crate::graph::{ChunkGroupId, CrossOriginLoading, LoadingStrategy};
use crate::host::{HostGeneration, HtmlHost};
use crate::tag::{AttrValue, Attributes, HtmlTag, render_all};

fn script(src: &str) -> HtmlTag {
    HtmlTag::new("script", [("src", src)].into_iter().collect())
}

fn rule(pattern: &str, attrs: &[(&str, AttrValue)]) -> Rule {
    Rule::new(pattern, attrs.iter().cloned().collect()).unwrap()
}

fn preload_child(c: &mut Compilation, parent: ChunkGroupId, files: &[&str]) {
    let chunk = c.add_chunk(files.iter().copied());
    let group = c.add_group(None, &[chunk]);
    c.add_child(parent, LoadingStrategy::Preload, group);
}

/// `app` entry (app.js) preloading `[vendor.js, vendor.css]` then `[vendor.js]`.
fn app_compilation() -> Compilation {
    let mut c = Compilation::new();
    let main = c.add_chunk(["app.js"]);
    let app = c.add_entrypoint("app", &[main]);
    preload_child(&mut c, app, &["vendor.js", "vendor.css"]);
    preload_child(&mut c, app, &["vendor.js"]);
    c
}

fn app_groups() -> TagGroups {
    TagGroups {
        head_tags: vec![script("/app.js")],
        output_name: "index.html".into(),
        ..TagGroups::default()
    }
}

fn entry_options() -> PluginOptions {
    PluginOptions {
        entry_point_preload: true,
        ..PluginOptions::default()
    }
}

fn host_with(options: PluginOptions, generation: HostGeneration) -> HtmlHost {
    let mut host = HtmlHost::new(generation);
    PreloadPlugin::new(options).apply(&mut host).unwrap();
    host
}

fn hrefs(tags: &[HtmlTag]) -> Vec<&str> {
    tags.iter()
        .filter(|t| t.is_ours())
        .map(|t| t.attributes.get_str("href").unwrap_or_default())
        .collect()
}

// ============================================================================
// registration
// ============================================================================

#[test]
fn test_nothing_configured_taps_nothing() {
    let host = host_with(PluginOptions::default(), HostGeneration::V5);
    assert_eq!(host.tap_count(), 0);
}

#[test]
fn test_entry_mode_needs_tag_groups_hook() {
    let mut host = HtmlHost::new(HostGeneration::V3);
    let err = PreloadPlugin::new(entry_options()).apply(&mut host).unwrap_err();
    assert!(matches!(
        err,
        PluginError::MissingHook {
            hook: HookName::AlterAssetTagGroups,
            ..
        }
    ));
    assert_eq!(host.tap_count(), 0);
}

#[test]
fn test_failed_registration_taps_nothing() {
    let options = PluginOptions {
        rules: vec![rule(r"\.css$", &[])],
        mode: InjectMode::Tags,
        ..PluginOptions::default()
    };
    let mut host = HtmlHost::new(HostGeneration::V3);
    assert!(PreloadPlugin::new(options).apply(&mut host).is_err());
    assert_eq!(host.tap_count(), 0);
}

#[test]
fn test_placeholder_mode_picks_available_hook() {
    let options = PluginOptions {
        rules: vec![rule(r"\.css$", &[])],
        ..PluginOptions::default()
    };
    assert_eq!(host_with(options.clone(), HostGeneration::V3).tap_count(), 1);
    assert_eq!(host_with(options, HostGeneration::V5).tap_count(), 1);
}

#[test]
fn test_from_config() {
    let config: PreloadConfig = "entry_point_preload = true".parse().unwrap();
    let plugin = PreloadPlugin::from_config(&config).unwrap();
    assert!(plugin.options().entry_point_preload);
}

// ============================================================================
// entry-point mode
// ============================================================================

#[test]
fn test_entry_links_before_entry_script() {
    let host = host_with(entry_options(), HostGeneration::V5);
    let groups = host.run_tag_groups(&app_compilation(), app_groups()).unwrap();

    assert_eq!(
        render_all(&groups.head_tags),
        concat!(
            r#"<link rel="preload" href="/vendor.js" as="script">"#,
            r#"<link rel="preload" href="/vendor.css" as="style">"#,
            r#"<script src="/app.js"></script>"#,
        )
    );
}

#[test]
fn test_font_crossorigin_follows_global_setting() {
    let mut c = app_compilation();
    c.output.cross_origin_loading = CrossOriginLoading::UseCredentials;
    let app = c.entrypoints[0].group;
    preload_child(&mut c, app, &["inter.woff2"]);

    let host = host_with(entry_options(), HostGeneration::V5);
    let groups = host.run_tag_groups(&c, app_groups()).unwrap();

    let font = groups
        .head_tags
        .iter()
        .find(|t| t.attributes.get_str("as") == Some("font"))
        .unwrap();
    assert_eq!(
        font.render(),
        r#"<link rel="preload" href="/inter.woff2" as="font" crossorigin="use-credentials">"#
    );
    assert!(
        groups
            .head_tags
            .iter()
            .filter(|t| t.is_ours() && t.attributes.get_str("as") != Some("font"))
            .all(|t| !t.attributes.contains("crossorigin"))
    );
}

#[test]
fn test_public_path_priority() {
    let mut c = app_compilation();
    c.output.public_path = Some("https://cdn.example.com".into());

    // v5 passes its own resolved public path
    let host = host_with(entry_options(), HostGeneration::V5);
    let groups = TagGroups {
        public_path: Some("/v5/".into()),
        ..app_groups()
    };
    let groups = host.run_tag_groups(&c, groups).unwrap();
    assert_eq!(hrefs(&groups.head_tags)[0], "/v5/vendor.js");

    // v4 drops it; html plugin "auto" defers to the compilation output
    let host = host_with(entry_options(), HostGeneration::V4);
    let mut groups = TagGroups {
        public_path: Some("/v5/".into()),
        ..app_groups()
    };
    groups.plugin.public_path = Some("auto".into());
    let groups = host.run_tag_groups(&c, groups).unwrap();
    assert_eq!(hrefs(&groups.head_tags)[0], "https://cdn.example.com/vendor.js");

    // plugin-level override beats everything
    let options = PluginOptions {
        public_path: Some("/override".into()),
        ..entry_options()
    };
    let host = host_with(options, HostGeneration::V5);
    let groups = host.run_tag_groups(&c, app_groups()).unwrap();
    assert_eq!(hrefs(&groups.head_tags)[0], "/override/vendor.js");
}

#[test]
fn test_html_plugin_chunks_limit_entries() {
    let mut c = app_compilation();
    let admin_main = c.add_chunk(["admin.js"]);
    let admin = c.add_entrypoint("admin", &[admin_main]);
    preload_child(&mut c, admin, &["admin-lazy.js"]);

    let host = host_with(entry_options(), HostGeneration::V5);
    let mut groups = app_groups();
    groups.head_tags.push(script("/admin.js"));
    groups.plugin.chunks = Some(vec!["admin".into()]);

    let groups = host.run_tag_groups(&c, groups).unwrap();
    assert_eq!(hrefs(&groups.head_tags), ["/admin-lazy.js"]);
}

#[test]
fn test_broken_graph_still_injects() {
    let mut c = app_compilation();
    let app = c.entrypoints[0].group;
    // lazy back-edge app -> lazy -> app, plus a dangling chunk in a preload child
    let lazy = c.add_group(Some("lazy"), &[]);
    c.add_child(app, LoadingStrategy::Lazy, lazy);
    c.add_child(lazy, LoadingStrategy::Lazy, app);
    let broken = c.add_group(None, &[crate::graph::ChunkId(99)]);
    c.add_child(app, LoadingStrategy::Preload, broken);
    assert!(c.validate().is_err());

    let host = host_with(entry_options(), HostGeneration::V5);
    let groups = host.run_tag_groups(&c, app_groups()).unwrap();
    assert_eq!(hrefs(&groups.head_tags), ["/vendor.js", "/vendor.css"]);
}

#[test]
fn test_rebuilds_are_independent() {
    let host = host_with(entry_options(), HostGeneration::V5);

    let first = host.run_tag_groups(&app_compilation(), app_groups()).unwrap();
    assert_eq!(hrefs(&first.head_tags).len(), 2);

    // Second build: the preload child is gone.
    let mut c = Compilation::new();
    let main = c.add_chunk(["app.js"]);
    c.add_entrypoint("app", &[main]);
    let second = host.run_tag_groups(&c, app_groups()).unwrap();
    assert!(hrefs(&second.head_tags).is_empty());
    assert_eq!(second.head_tags.len(), 1);
}

#[test]
fn test_excluded_document_untouched() {
    let options = PluginOptions {
        exclude_output_names: vec![regex::Regex::new("^index").unwrap()],
        ..entry_options()
    };
    let host = host_with(options, HostGeneration::V5);
    let groups = host.run_tag_groups(&app_compilation(), app_groups()).unwrap();
    assert_eq!(groups, app_groups());
}

// ============================================================================
// pattern mode
// ============================================================================

fn pattern_options(mode: InjectMode) -> PluginOptions {
    PluginOptions {
        rules: vec![
            rule(r"\.woff2$", &[("as", "font".into()), ("crossorigin", true.into())]),
            rule(r"\.css$", &[("as", "style".into())]),
        ],
        mode,
        ..PluginOptions::default()
    }
}

fn pattern_compilation() -> Compilation {
    let mut c = app_compilation();
    c.assets = vec!["font.woff2".into(), "robots.txt".into()];
    c
}

#[test]
fn test_placeholder_replaced_v3() {
    let host = host_with(pattern_options(InjectMode::Placeholder), HostGeneration::V3);
    let doc = HtmlDocument {
        html: format!("<head>{DEFAULT_PLACEHOLDER}</head>"),
        output_name: "index.html".into(),
    };
    let doc = host.run_html(&pattern_compilation(), doc).unwrap();
    assert_eq!(
        doc.html,
        concat!(
            "<head>",
            r#"<link href="font.woff2" rel="preload" as="font" crossorigin>"#,
            r#"<link href="vendor.css" rel="preload" as="style">"#,
            "</head>"
        )
    );
}

#[test]
fn test_document_without_placeholder_unchanged() {
    let host = host_with(pattern_options(InjectMode::Placeholder), HostGeneration::V5);
    let html = "<html><head><title>no marker</title></head></html>".to_string();
    let doc = HtmlDocument {
        html: html.clone(),
        output_name: "plain.html".into(),
    };
    let doc = host.run_html(&pattern_compilation(), doc).unwrap();
    assert_eq!(doc.html, html);
}

#[test]
fn test_tags_mode_splices_before_first_link() {
    let host = host_with(pattern_options(InjectMode::Tags), HostGeneration::V4);
    let mut stylesheet = HtmlTag::new("link", Attributes::new());
    stylesheet.attributes.set("rel", "stylesheet");
    stylesheet.void_tag = true;

    let groups = TagGroups {
        head_tags: vec![HtmlTag::new("meta", Attributes::new()), stylesheet],
        ..TagGroups::default()
    };
    let groups = host.run_tag_groups(&pattern_compilation(), groups).unwrap();

    assert!(groups.head_tags[0].is("meta"));
    assert_eq!(hrefs(&groups.head_tags), ["font.woff2", "vendor.css"]);
    assert!(groups.head_tags[1].is_ours() && groups.head_tags[2].is_ours());
    assert!(!groups.head_tags[3].is_ours());
}

#[test]
fn test_both_modes_together() {
    let options = PluginOptions {
        entry_point_preload: true,
        ..pattern_options(InjectMode::Placeholder)
    };
    let host = host_with(options, HostGeneration::V5);
    assert_eq!(host.tap_count(), 2);

    let groups = host.run_tag_groups(&pattern_compilation(), app_groups()).unwrap();
    assert_eq!(hrefs(&groups.head_tags), ["/vendor.js", "/vendor.css"]);
}
