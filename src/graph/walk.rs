//! Entry-point preload traversal.
//!
//! Html can hold several entrypoints; each entrypoint has preload child
//! groups, each group has chunks, each chunk has files. Files are what
//! the injectors need.

use rustc_hash::FxHashSet;

use super::{Compilation, LoadingStrategy};
use crate::debug;

/// Ordered, de-duplicated preload files of one entrypoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFiles {
    pub entry: String,
    pub files: Vec<String>,
}

/// Collect the files each requested entrypoint should preload.
///
/// `requested` defaults to every entrypoint of the compilation. Unknown
/// entries are skipped, and entries with nothing to preload are left out
/// of the result.
///
/// Order follows the graph: preload children in declaration order, their
/// chunks in chunk order, each chunk's files in file order. The first
/// occurrence of a file keeps its position.
///
/// Fonts pulled in by css `@font-face` have no edge in the chunk graph,
/// so they never show up here.
pub fn resolve_entry_files(
    compilation: &Compilation,
    requested: Option<&[String]>,
) -> Vec<EntryFiles> {
    let names: Vec<&str> = match requested {
        Some(names) => names.iter().map(String::as_str).collect(),
        None => compilation.entrypoint_names().collect(),
    };

    let mut seen_entries = FxHashSet::default();
    let mut result = Vec::new();

    for name in names {
        if !seen_entries.insert(name) {
            continue;
        }
        let Some(group) = compilation.entrypoint(name) else {
            debug!("graph"; "entry `{}` not in this compilation", name);
            continue;
        };

        let mut seen = FxHashSet::default();
        let mut files = Vec::new();
        for child in compilation.children_by_strategy(group, LoadingStrategy::Preload) {
            let chunks = child.chunks.iter().filter_map(|id| compilation.chunk(*id));
            for chunk in chunks {
                for file in &chunk.files {
                    if seen.insert(file.as_str()) {
                        files.push(file.clone());
                    }
                }
            }
        }

        if files.is_empty() {
            continue;
        }
        debug!("graph"; "entry `{}`: {} preload file(s)", name, files.len());
        result.push(EntryFiles {
            entry: name.to_owned(),
            files,
        });
    }

    result
}

/// Requested entry names the compilation doesn't know, de-duplicated.
pub fn unknown_entries<'a>(
    compilation: &Compilation,
    requested: Option<&'a [String]>,
) -> Vec<&'a str> {
    let mut seen = FxHashSet::default();
    requested
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .filter(|name| compilation.entrypoint(name).is_none() && seen.insert(*name))
        .collect()
}

/// Every output file name: loose assets first, then each chunk's files.
///
/// De-duplicated, first occurrence wins.
pub fn all_output_files(compilation: &Compilation) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    compilation
        .assets
        .iter()
        .chain(compilation.chunks.iter().flat_map(|c| c.files.iter()))
        .map(String::as_str)
        .filter(|f| seen.insert(*f))
        .collect()
}
