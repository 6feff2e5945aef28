//! Read-only snapshot of a host compilation's chunk graph.
//!
//! The host owns the real module/chunk graph; this is the slice of it the
//! injectors need:
//!
//! ```text
//! entrypoint "app" ─► ChunkGroup ─┬─ chunks: [ChunkId..] ─► Chunk { files }
//!                                 └─ children: [(LoadingStrategy, ChunkGroupId)..]
//! ```
//!
//! Groups and chunks live in arenas indexed by `ChunkGroupId` / `ChunkId`.
//! Every ordered collection here is meaningful: traversal follows
//! declaration order.

mod walk;

pub use walk::{EntryFiles, all_output_files, resolve_entry_files, unknown_entries};

use serde::Deserialize;
use thiserror::Error;

use crate::tag::AttrValue;

// ============================================================================
// Ids
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ChunkGroupId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(pub usize);

// ============================================================================
// Nodes
// ============================================================================

/// How a child chunk group is loaded relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStrategy {
    /// Loaded together with the parent.
    Eager,
    /// Needed soon by the parent; eligible for `<link rel="preload">`.
    Preload,
    /// Maybe needed later; browser may fetch when idle.
    Prefetch,
    /// Loaded on demand only.
    Lazy,
}

/// Edge from a chunk group to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChildEdge {
    pub strategy: LoadingStrategy,
    pub group: ChunkGroupId,
}

/// A host-produced bundle emitted as one or more files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Chunk {
    #[serde(default)]
    pub files: Vec<String>,
}

/// A named unit of chunks plus its child groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChunkGroup {
    pub name: Option<String>,
    pub chunks: Vec<ChunkId>,
    pub children: Vec<ChildEdge>,
    /// The chunk holding the entry module. Defaults to the last chunk.
    pub entry_chunk: Option<ChunkId>,
}

/// A named entrypoint pointing at its chunk group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Entrypoint {
    pub name: String,
    pub group: ChunkGroupId,
}

// ============================================================================
// Output options
// ============================================================================

/// Global `crossorigin` setting for dynamically loaded chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCrossOrigin")]
pub enum CrossOriginLoading {
    #[default]
    Disabled,
    Anonymous,
    UseCredentials,
}

impl CrossOriginLoading {
    /// Attribute value for a `crossorigin` attribute.
    ///
    /// When disabled this is the bare marker.
    pub fn attr_value(self) -> AttrValue {
        match self {
            Self::Disabled => AttrValue::Bool(true),
            Self::Anonymous => AttrValue::from("anonymous"),
            Self::UseCredentials => AttrValue::from("use-credentials"),
        }
    }
}

/// Accepts `false`, `"anonymous"` or `"use-credentials"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCrossOrigin {
    Bool(bool),
    Str(String),
}

impl TryFrom<RawCrossOrigin> for CrossOriginLoading {
    type Error = String;

    fn try_from(raw: RawCrossOrigin) -> Result<Self, Self::Error> {
        match raw {
            RawCrossOrigin::Bool(false) => Ok(Self::Disabled),
            RawCrossOrigin::Str(s) if s == "anonymous" => Ok(Self::Anonymous),
            RawCrossOrigin::Str(s) if s == "use-credentials" => Ok(Self::UseCredentials),
            RawCrossOrigin::Bool(true) => {
                Err("crossOriginLoading must be false, \"anonymous\" or \"use-credentials\"".into())
            }
            RawCrossOrigin::Str(s) => Err(format!("unknown crossOriginLoading value `{s}`")),
        }
    }
}

/// Global output settings of the compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputOptions {
    pub public_path: Option<String>,
    pub cross_origin_loading: CrossOriginLoading,
}

// ============================================================================
// Compilation
// ============================================================================

/// Snapshot rejected because it references nodes that don't exist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("entrypoint `{entry}` points at missing chunk group #{group}")]
    DanglingEntrypoint { entry: String, group: usize },

    #[error("chunk group #{parent} has child edge to missing chunk group #{child}")]
    DanglingChild { parent: usize, child: usize },

    #[error("chunk group #{group} references missing chunk #{chunk}")]
    DanglingChunk { group: usize, chunk: usize },

    #[error("chunk group #{group} is its own descendant")]
    Cycle { group: usize },
}

/// One compilation's graph, as handed to the injectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Compilation {
    pub entrypoints: Vec<Entrypoint>,
    pub chunk_groups: Vec<ChunkGroup>,
    pub chunks: Vec<Chunk>,
    /// Emitted asset names that don't belong to any chunk.
    pub assets: Vec<String>,
    pub output: OutputOptions,
}

impl Compilation {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    pub fn add_chunk<I, S>(&mut self, files: I) -> ChunkId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chunks.push(Chunk {
            files: files.into_iter().map(Into::into).collect(),
        });
        ChunkId(self.chunks.len() - 1)
    }

    pub fn add_group(&mut self, name: Option<&str>, chunks: &[ChunkId]) -> ChunkGroupId {
        self.chunk_groups.push(ChunkGroup {
            name: name.map(str::to_owned),
            chunks: chunks.to_vec(),
            children: Vec::new(),
            entry_chunk: None,
        });
        ChunkGroupId(self.chunk_groups.len() - 1)
    }

    /// Panics if `parent` was not created by this compilation.
    pub fn add_child(
        &mut self,
        parent: ChunkGroupId,
        strategy: LoadingStrategy,
        child: ChunkGroupId,
    ) {
        self.chunk_groups[parent.0].children.push(ChildEdge {
            strategy,
            group: child,
        });
    }

    /// Register an entrypoint backed by a new chunk group.
    pub fn add_entrypoint(&mut self, name: &str, chunks: &[ChunkId]) -> ChunkGroupId {
        let group = self.add_group(Some(name), chunks);
        self.entrypoints.push(Entrypoint {
            name: name.to_owned(),
            group,
        });
        group
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    pub fn entrypoint(&self, name: &str) -> Option<&ChunkGroup> {
        self.entrypoints
            .iter()
            .find(|e| e.name == name)
            .and_then(|e| self.chunk_groups.get(e.group.0))
    }

    pub fn entrypoint_names(&self) -> impl Iterator<Item = &str> {
        self.entrypoints.iter().map(|e| e.name.as_str())
    }

    pub fn group(&self, id: ChunkGroupId) -> Option<&ChunkGroup> {
        self.chunk_groups.get(id.0)
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(id.0)
    }

    /// Children of `group` loaded with `strategy`, in declaration order.
    pub fn children_by_strategy<'a>(
        &'a self,
        group: &'a ChunkGroup,
        strategy: LoadingStrategy,
    ) -> impl Iterator<Item = &'a ChunkGroup> + 'a {
        group
            .children
            .iter()
            .filter(move |edge| edge.strategy == strategy)
            .filter_map(|edge| self.group(edge.group))
    }

    /// The chunk holding the entry module of `group`.
    pub fn entrypoint_chunk(&self, group: &ChunkGroup) -> Option<&Chunk> {
        group
            .entry_chunk
            .or_else(|| group.chunks.last().copied())
            .and_then(|id| self.chunk(id))
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Reject snapshots with dangling ids or cyclic child edges.
    pub fn validate(&self) -> Result<(), GraphError> {
        for entry in &self.entrypoints {
            if self.group(entry.group).is_none() {
                return Err(GraphError::DanglingEntrypoint {
                    entry: entry.name.clone(),
                    group: entry.group.0,
                });
            }
        }

        for (index, group) in self.chunk_groups.iter().enumerate() {
            for chunk in group.chunks.iter().chain(group.entry_chunk.iter()) {
                if self.chunk(*chunk).is_none() {
                    return Err(GraphError::DanglingChunk {
                        group: index,
                        chunk: chunk.0,
                    });
                }
            }
            for edge in &group.children {
                if self.group(edge.group).is_none() {
                    return Err(GraphError::DanglingChild {
                        parent: index,
                        child: edge.group.0,
                    });
                }
            }
        }

        self.check_acyclic()
    }

    /// Iterative three-color DFS over child edges.
    fn check_acyclic(&self) -> Result<(), GraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            White,
            Grey,
            Black,
        }

        let mut marks = vec![Mark::White; self.chunk_groups.len()];
        for root in 0..self.chunk_groups.len() {
            if marks[root] != Mark::White {
                continue;
            }
            // (group, next child index)
            let mut stack = vec![(root, 0usize)];
            marks[root] = Mark::Grey;
            while let Some(top) = stack.last_mut() {
                let (node, next) = *top;
                if let Some(edge) = self.chunk_groups[node].children.get(next) {
                    top.1 += 1;
                    let child = edge.group.0;
                    match marks[child] {
                        Mark::Grey => return Err(GraphError::Cycle { group: child }),
                        Mark::White => {
                            marks[child] = Mark::Grey;
                            stack.push((child, 0));
                        }
                        Mark::Black => {}
                    }
                } else {
                    marks[node] = Mark::Black;
                    stack.pop();
                }
            }
        }
        Ok(())
    }
}
