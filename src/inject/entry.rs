//! Entry-point preload injection.
//!
//! Links for an entry's preload files are placed right before the entry's
//! own `<script>` so the browser sees the hints just ahead of the script
//! that consumes them (preload priority ordering since Chrome 95).

use super::{InjectReport, SkipReason};
use crate::graph::{
    Compilation, CrossOriginLoading, EntryFiles, resolve_entry_files, unknown_entries,
};
use crate::tag::{Attributes, HtmlTag, ResourceType, public_path};
use crate::{debug, log};

/// Preload links for one entrypoint, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTags {
    pub entry: String,
    pub tags: Vec<HtmlTag>,
}

/// Build the `<link rel="preload">` tag for one output file.
///
/// Only fonts carry `crossorigin`. The value follows the global
/// cross-origin setting and is a bare marker when that setting is off.
pub fn preload_tag(
    file_name: &str,
    public_path: &str,
    cross_origin: CrossOriginLoading,
) -> HtmlTag {
    let resource = ResourceType::classify(file_name);

    let mut attrs = Attributes::new();
    attrs.set("rel", "preload");
    attrs.set("href", public_path::href_for(public_path, file_name));
    if let Some(resource) = resource {
        attrs.set("as", resource.as_str());
    }

    if resource.is_some_and(ResourceType::requires_cors) {
        attrs.set("crossorigin", cross_origin.attr_value());
    }

    HtmlTag::preload_link(attrs)
}

/// Turn resolved entry files into tags.
pub fn build_entry_tags(
    entries: &[EntryFiles],
    public_path: &str,
    cross_origin: CrossOriginLoading,
) -> Vec<EntryTags> {
    entries
        .iter()
        .map(|e| EntryTags {
            entry: e.entry.clone(),
            tags: e
                .files
                .iter()
                .map(|f| preload_tag(f, public_path, cross_origin))
                .collect(),
        })
        .collect()
}

/// Walk the graph and splice preload links before each entry's script tag.
///
/// Head tags are searched first, then body tags; links go into whichever
/// list holds the script. Requested entries missing from the compilation
/// and entries whose script can't be found are skipped with a warning.
/// Nothing here fails the build.
pub fn inject_entry_preloads(
    compilation: &Compilation,
    requested: Option<&[String]>,
    public_path: &str,
    head: &mut Vec<HtmlTag>,
    body: &mut Vec<HtmlTag>,
) -> InjectReport {
    let mut report = InjectReport::default();
    for name in unknown_entries(compilation, requested) {
        log!("warn"; "entry `{}` not found in this compilation", name);
        report.skip(name.to_owned(), SkipReason::EntryNotFound);
    }

    let entries = resolve_entry_files(compilation, requested);
    let cross_origin = compilation.output.cross_origin_loading;
    let entry_tags = build_entry_tags(&entries, public_path, cross_origin);

    for EntryTags { entry, tags } in entry_tags {
        let Some(last_file) = entry_script_file(compilation, &entry) else {
            debug!("inject"; "entry `{}` has no own output file", entry);
            report.skip(entry, SkipReason::NoEntryFile);
            continue;
        };

        let count = tags.len();
        let target = if let Some(index) = find_script(head, last_file) {
            head.splice(index..index, tags);
            "head"
        } else if let Some(index) = find_script(body, last_file) {
            body.splice(index..index, tags);
            "body"
        } else {
            log!("warn"; "cannot find script tag for entry `{}` (looking for `{}`)",
                entry, last_file);
            report.skip(entry, SkipReason::ScriptTagNotFound);
            continue;
        };

        debug!("inject"; "{} preload link(s) for `{}` in {}", count, entry, target);
        report.record(entry, count);
    }
    report
}

/// Last own output file of an entrypoint's entry chunk.
fn entry_script_file<'a>(compilation: &'a Compilation, entry: &str) -> Option<&'a str> {
    let group = compilation.entrypoint(entry)?;
    let chunk = compilation.entrypoint_chunk(group)?;
    chunk.files.last().map(String::as_str)
}

/// Index of the first `<script>` whose `src` references `file`.
fn find_script(tags: &[HtmlTag], file: &str) -> Option<usize> {
    tags.iter().position(|tag| {
        tag.is("script")
            && tag
                .attributes
                .get_str("src")
                .is_some_and(|src| src.contains(file))
    })
}
