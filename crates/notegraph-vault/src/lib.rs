//! # Vault Engine
//!
//! The long-lived, per-vault owner of the note and asset indexes, plus the
//! disk adapters that feed it.
//!
//! This crate provides:
//! - [`VaultEngine`]: load, incremental updates, resolution, anchors,
//!   graphs and backlinks behind one handle
//! - [`scan_file_tree`]: directory enumeration into `FileEntry` trees
//! - [`FsContentSource`]: size-guarded disk reads
//! - [`VaultEvent`]: create/modify/delete/rename notifications
//! - [`GraphRefresher`]: background graph rebuilds that never block readers
//!
//! ## Quick Start
//!
//! ```no_run
//! use notegraph_vault::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let mut engine = VaultEngine::open("/path/to/vault", EngineConfig::default())?;
//!     let source = engine.content_source();
//!
//!     let current = Path::new("/path/to/vault/daily/today.md");
//!     let link = engine.resolve_link("Project Plan", current);
//!     println!("{} (exists: {})", link.path.display(), link.exists);
//!
//!     let graph = engine.build_graph(&source);
//!     let backlinks = engine.backlinks(current, &graph, &source);
//!     println!("{} mentions", backlinks.total());
//!
//!     engine.apply_event(&VaultEvent::created("/path/to/vault/New.md"));
//!     Ok(())
//! }
//! ```
//!
//! ## Thread Safety
//!
//! `VaultEngine` mutations take `&mut self`, so one owner updates the
//! indexes at a time. The anchor cache is internally locked and may be
//! read through `&self` from several threads. `GraphRefresher` is cheap to
//! clone and shares its published graph behind an async `RwLock`.

pub mod engine;
pub mod events;
pub mod fs;
pub mod refresher;
pub mod scanner;

pub use engine::VaultEngine;
pub use events::VaultEvent;
pub use fs::FsContentSource;
pub use notegraph_core::prelude::*;
pub use refresher::GraphRefresher;
pub use scanner::scan_file_tree;

pub mod prelude {
    pub use crate::engine::VaultEngine;
    pub use crate::events::VaultEvent;
    pub use crate::fs::FsContentSource;
    pub use crate::refresher::GraphRefresher;
    pub use crate::scanner::scan_file_tree;
    pub use notegraph_core::prelude::*;
    pub use notegraph_graph::{GraphStats, Index, VaultIndex};
    pub use notegraph_parser::AnchorContent;
}
