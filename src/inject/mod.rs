//! Preload link injection.
//!
//! | Module    | Purpose                                              |
//! |-----------|------------------------------------------------------|
//! | `entry`   | Chunk-graph driven links before each entry script    |
//! | `pattern` | Rule driven links for matching output files          |
//!
//! Both operate on host-owned data (tag lists, html strings) and only ever
//! insert; existing tags are never replaced or reordered.

pub mod entry;
pub mod pattern;

pub use entry::{EntryTags, build_entry_tags, inject_entry_preloads, preload_tag};
pub use pattern::{collect_links, generate_link, inject_into_head, inject_into_html};

/// Why an entrypoint got no links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The requested entrypoint is not part of this compilation.
    EntryNotFound,
    /// The entrypoint has no chunk or its entry chunk emitted no file.
    NoEntryFile,
    /// No `<script>` in head or body references the entry's file.
    ScriptTagNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub entry: String,
    pub reason: SkipReason,
}

/// Outcome of entry-point injection for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectReport {
    /// `(entry, links inserted)` in processing order.
    pub injected: Vec<(String, usize)>,
    pub skipped: Vec<Skipped>,
}

impl InjectReport {
    pub(crate) fn record(&mut self, entry: String, count: usize) {
        self.injected.push((entry, count));
    }

    pub(crate) fn skip(&mut self, entry: String, reason: SkipReason) {
        self.skipped.push(Skipped { entry, reason });
    }

    /// Total links inserted.
    pub fn total(&self) -> usize {
        self.injected.iter().map(|(_, n)| n).sum()
    }
}
