//! # Note Graph
//!
//! Name indexing, link resolution and link-graph construction for a vault
//! of markdown notes.
//!
//! Provides:
//! - Note and asset indexes keyed by normalized name and relative path
//! - Wikilink and embed resolution with locality-based disambiguation
//! - Full and depth-limited local link graphs
//! - Linked and unlinked backlink extraction
//! - Graph statistics (broken links, orphans, cycles)
//!
//! ## Quick Start
//!
//! ```
//! use notegraph_graph::prelude::*;
//! use std::collections::HashMap;
//! use std::path::{Path, PathBuf};
//!
//! let root = Path::new("/vault");
//! let tree = vec![
//!     FileEntry::file("/vault/Alpha.md"),
//!     FileEntry::file("/vault/Beta.md"),
//! ];
//! let index = VaultIndex::build(&tree, root);
//!
//! let mut docs = HashMap::new();
//! docs.insert(PathBuf::from("/vault/Alpha.md"), "See [[beta]].".to_string());
//! docs.insert(PathBuf::from("/vault/Beta.md"), "Alpha is nice.".to_string());
//!
//! let link = resolve("beta", Path::new("/vault/Alpha.md"), &index.notes, root);
//! assert!(link.exists);
//!
//! let graph = build_full_graph(root, &index.notes, &docs);
//! assert_eq!(graph.edge_count(), 1);
//!
//! let backlinks = find_backlinks(Path::new("/vault/Alpha.md"), "Alpha", &graph, &docs);
//! assert_eq!(backlinks.unlinked.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`index`] - Name and path indexes
//! - [`resolver`] - Link and embed resolution
//! - [`graph`] - Full and local graphs
//! - [`backlinks`] - Linked and unlinked mentions
//! - [`stats`] - Graph statistics via `petgraph`
//!
//! ## Performance Characteristics
//!
//! - Index lookups: O(1) average
//! - Full graph: O(total content size)
//! - Local graph: O(edges within the radius) after an O(m) adjacency pass
//! - Backlinks: O(total content size) for the unlinked scan

pub mod backlinks;
pub mod graph;
pub mod index;
pub mod resolver;
pub mod stats;

pub use backlinks::{find_backlinks, find_backlinks_with};
pub use graph::{build_full_graph, build_local_graph, extract_link_targets};
pub use index::{Index, IndexKind, VaultIndex, normalize_name};
pub use resolver::{resolve, resolve_embed};
pub use stats::{BrokenLink, GraphStats};
pub use notegraph_core::prelude::*;

pub mod prelude {
    pub use crate::backlinks::{find_backlinks, find_backlinks_with};
    pub use crate::graph::{build_full_graph, build_local_graph, extract_link_targets};
    pub use crate::index::{Index, IndexKind, VaultIndex, normalize_name};
    pub use crate::resolver::{resolve, resolve_embed};
    pub use crate::stats::{BrokenLink, GraphStats};
    pub use notegraph_core::prelude::*;
}
