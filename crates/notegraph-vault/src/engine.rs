//! Long-lived engine owning one vault's indexes and anchor cache.

use crate::events::VaultEvent;
use crate::fs::FsContentSource;
use crate::refresher::GraphRefresher;
use crate::scanner::scan_file_tree;
use notegraph_core::prelude::*;
use notegraph_graph::{
    GraphStats, Index, VaultIndex, build_full_graph, build_local_graph, find_backlinks_with,
    resolve, resolve_embed,
};
use notegraph_parser::{
    Anchor, AnchorContent, block_content, extract_anchors, heading_content_in, split_target,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::instrument;

/// Reference resolution, anchors, graphs and backlinks for one vault.
///
/// Mutations take `&mut self`; queries take `&self`. Document text is
/// supplied by the caller through a [`ContentSource`].
#[derive(Debug)]
pub struct VaultEngine {
    vault_root: PathBuf,
    config: EngineConfig,
    index: VaultIndex,
    anchors: AnchorCache,
}

impl VaultEngine {
    /// Create an engine with empty indexes
    pub fn new(vault_root: impl Into<PathBuf>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let anchors = AnchorCache::new(config.anchor_cache_ttl());
        Ok(Self {
            vault_root: vault_root.into(),
            config,
            index: VaultIndex::default(),
            anchors,
        })
    }

    /// Create an engine and index the vault directory on disk
    pub fn open(vault_root: impl Into<PathBuf>, config: EngineConfig) -> Result<Self> {
        let mut engine = Self::new(vault_root, config)?;
        engine.load_from_disk()?;
        Ok(engine)
    }

    pub fn vault_root(&self) -> &Path {
        &self.vault_root
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn index(&self) -> &VaultIndex {
        &self.index
    }

    pub fn notes(&self) -> &Index {
        &self.index.notes
    }

    pub fn assets(&self) -> &Index {
        &self.index.assets
    }

    /// Disk reader honoring the configured size ceiling
    pub fn content_source(&self) -> FsContentSource {
        FsContentSource::new(self.config.max_file_size)
    }

    /// Rebuild both indexes from a file-tree enumeration.
    #[instrument(skip(self, tree), fields(vault = ?self.vault_root), name = "engine_load")]
    pub fn load(&mut self, tree: &[FileEntry]) {
        self.index = VaultIndex::build(tree, &self.vault_root);
        self.anchors.clear();
        log::info!(
            "Indexed {}: {} notes, {} assets",
            self.vault_root.display(),
            self.index.notes.len(),
            self.index.assets.len()
        );
    }

    /// Scan the vault root and rebuild the indexes
    pub fn load_from_disk(&mut self) -> Result<()> {
        let tree = scan_file_tree(&self.vault_root, self.config.include_hidden)?;
        self.load(&tree);
        Ok(())
    }

    /// Apply one change notification. Returns true when the indexes changed,
    /// meaning a previously built graph is out of date.
    #[instrument(skip(self), name = "engine_apply_event")]
    pub fn apply_event(&mut self, event: &VaultEvent) -> bool {
        let changed = match event {
            VaultEvent::Created { path } => self.index.add(path, &self.vault_root),
            VaultEvent::Modified { path } => {
                self.anchors.invalidate(path);
                false
            }
            VaultEvent::Deleted { path } => {
                let removed = self.indexed_under(path);
                for old in &removed {
                    self.index.remove(old);
                    self.anchors.invalidate(old);
                }
                !removed.is_empty()
            }
            VaultEvent::Renamed { from, to } => {
                let moved = self.indexed_under(from);
                for old in &moved {
                    let new = match old.strip_prefix(from) {
                        Ok(rest) if !rest.as_os_str().is_empty() => to.join(rest),
                        _ => to.clone(),
                    };
                    self.index.rename(old, &new, &self.vault_root);
                    self.anchors.invalidate(old);
                    self.anchors.invalidate(&new);
                }
                if moved.is_empty() {
                    self.index.add(to, &self.vault_root)
                } else {
                    true
                }
            }
        };
        log::debug!("Applied {:?} (index changed: {})", event, changed);
        changed
    }

    /// `path` itself if indexed, otherwise every indexed path below it
    fn indexed_under(&self, path: &Path) -> Vec<PathBuf> {
        if self.index.notes.contains(path) || self.index.assets.contains(path) {
            return vec![path.to_path_buf()];
        }
        self.index
            .notes
            .paths()
            .chain(self.index.assets.paths())
            .filter(|p| p.starts_with(path))
            .cloned()
            .collect()
    }

    /// Resolve a wikilink target written in `current_path`
    pub fn resolve_link(&self, target: &str, current_path: &Path) -> ResolvedReference {
        resolve(target, current_path, &self.index.notes, &self.vault_root)
    }

    /// Resolve an embed target written in `current_path`
    pub fn resolve_embed(&self, target: &str, current_path: &Path) -> ResolvedReference {
        resolve_embed(target, current_path, &self.index, &self.vault_root)
    }

    /// Headings and blocks of `path`, served from the TTL cache when fresh.
    /// `source` is only read on a miss.
    pub fn document_anchors(
        &self,
        path: &Path,
        source: &dyn ContentSource,
    ) -> Result<Arc<DocumentAnchors>> {
        self.anchors.get_or_try_insert_with(path, || {
            let content = source.read_content(path)?;
            Ok(extract_anchors(&content, self.config.block_preview_len))
        })
    }

    /// Content shown by an embed such as `![[Other#Heading]]`.
    ///
    /// Without an anchor the whole document is returned. An unresolved note
    /// or unreadable file is an error; a missing anchor is a
    /// [`AnchorContent::NotFound`] value.
    #[instrument(skip(self, source), name = "engine_anchor_content")]
    pub fn anchor_content(
        &self,
        target: &str,
        current_path: &Path,
        source: &dyn ContentSource,
    ) -> Result<AnchorContent> {
        let resolved = self.resolve_link(target, current_path);
        if !resolved.exists {
            return Err(Error::file_not_found(resolved.path));
        }

        let parts = split_target(target);
        let anchor = match (parts.block_id, parts.heading) {
            (Some(id), _) => Anchor::Block(id),
            (None, Some(heading)) => Anchor::Heading(heading),
            (None, None) => {
                return source
                    .read_content(&resolved.path)
                    .map(AnchorContent::Found);
            }
        };

        // Slice with anchors from the text just read; cached positions may
        // belong to an older version of the document.
        let content = source.read_content(&resolved.path)?;
        let anchors = self.anchors.insert(
            resolved.path.clone(),
            extract_anchors(&content, self.config.block_preview_len),
        );

        let found = match &anchor {
            Anchor::Heading(text) => heading_content_in(&content, &anchors.headings, text),
            Anchor::Block(id) => anchors
                .block(id)
                .and_then(|_| block_content(&content, id)),
        };
        Ok(found.map_or(AnchorContent::NotFound(anchor), AnchorContent::Found))
    }

    /// Drop cached anchors past their TTL
    pub fn purge_anchor_cache(&self) -> usize {
        self.anchors.purge_expired()
    }

    /// Full link graph over the note index.
    #[instrument(skip(self, source), name = "engine_build_graph")]
    pub fn build_graph(&self, source: &dyn ContentSource) -> Graph {
        let graph = build_full_graph(&self.vault_root, &self.index.notes, source);
        log::info!(
            "Graph built: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// Neighborhood of `center` within `depth` hops of `full`
    pub fn local_graph(&self, center: &Path, full: &Graph, depth: usize) -> Graph {
        build_local_graph(center, full, depth)
    }

    /// Linked and unlinked mentions of the note at `target_path`.
    #[instrument(skip(self, graph, source), name = "engine_backlinks")]
    pub fn backlinks(
        &self,
        target_path: &Path,
        graph: &Graph,
        source: &dyn ContentSource,
    ) -> Backlinks {
        let name = self
            .index
            .notes
            .entry(target_path)
            .map(|e| e.name.clone())
            .or_else(|| {
                target_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
            })
            .unwrap_or_default();
        find_backlinks_with(
            target_path,
            &name,
            graph,
            source,
            self.config.min_unlinked_name_len,
        )
    }

    pub fn stats(&self, graph: &Graph) -> GraphStats {
        GraphStats::compute(graph)
    }

    /// Rebuild the graph in the background from a snapshot of the note
    /// index, publishing through `refresher`.
    pub fn spawn_graph_refresh<S>(&self, refresher: &GraphRefresher, source: S) -> JoinHandle<bool>
    where
        S: ContentSource + Send + 'static,
    {
        refresher.refresh(self.vault_root.clone(), self.index.notes.clone(), source)
    }
}
