//! # Notegraph Core
//!
//! Core data models, error types and configuration for the notegraph vault
//! reference-resolution engine. Every other crate depends on these types.
//!
//! ## Architecture Principles
//!
//! - **Misses are values**: an unresolved link is `exists: false`, not an error
//! - **No global state**: configuration lives in an [`EngineConfig`] owned by the caller
//! - **No I/O in the core**: document text arrives through a [`ContentSource`]
//! - **Zero panic in libraries**: fallible edges return [`Result<T>`]
//!
//! ## Core Modules
//!
//! - [`models`] - Index entries, anchors, graph and backlink types
//! - [`error`] - Error enum and Result alias
//! - [`config`] - Engine configuration with builder and YAML loading
//! - [`source`] - The content-read seam
//! - [`cache`] - TTL cache for per-document anchors
//! - [`utils`] - Path and serialization helpers
//!
//! ## Usage
//!
//! ```
//! use notegraph_core::prelude::*;
//! use std::collections::HashMap;
//! use std::path::{Path, PathBuf};
//!
//! let mut docs: HashMap<PathBuf, String> = HashMap::new();
//! docs.insert(PathBuf::from("/vault/a.md"), "[[b]]".to_string());
//!
//! let text = docs.read_content(Path::new("/vault/a.md")).unwrap();
//! assert_eq!(text, "[[b]]");
//!
//! let config = EngineConfig::default();
//! assert!(config.validate().is_ok());
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod utils;

pub use cache::AnchorCache;
pub use config::{EngineConfig, EngineConfigBuilder};
pub use error::{Error, Result};
pub use models::*;
pub use source::{ContentSource, FnSource};
pub use utils::to_json_string;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::AnchorCache;
    pub use crate::config::EngineConfig;
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        Backlinks, Block, DocumentAnchors, FileEntry, FileType, Graph, GraphNode, Heading,
        IndexEntry, LineIndex, LinkEdge, Mention, MentionSpan, ResolvedReference, SourcePosition,
    };
    pub use crate::source::{ContentSource, FnSource};
    pub use crate::utils::to_json_string;
}
