//! Background full-graph rebuilds.
//!
//! Building the graph reads every note, so it runs on the blocking pool.
//! Readers keep seeing the last published graph until a newer build
//! completes. Each request gets a generation number; a build that finishes
//! after a newer request was made is dropped.

use notegraph_core::{ContentSource, Graph};
use notegraph_graph::{Index, build_full_graph};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Holder of the latest complete graph
#[derive(Debug, Clone, Default)]
pub struct GraphRefresher {
    current: Arc<RwLock<Arc<Graph>>>,
    requested: Arc<AtomicU64>,
    published: Arc<AtomicU64>,
}

impl GraphRefresher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last published graph (empty before the first build completes)
    pub async fn current(&self) -> Arc<Graph> {
        Arc::clone(&*self.current.read().await)
    }

    /// Generation of the most recent request
    pub fn requested_generation(&self) -> u64 {
        self.requested.load(Ordering::SeqCst)
    }

    /// Generation of the graph currently visible
    pub fn published_generation(&self) -> u64 {
        self.published.load(Ordering::SeqCst)
    }

    /// Start a rebuild from an index snapshot.
    ///
    /// The handle resolves to true if this build was published, false if
    /// it was superseded or the build task failed.
    pub fn refresh<S>(&self, vault_root: PathBuf, notes: Index, source: S) -> JoinHandle<bool>
    where
        S: ContentSource + Send + 'static,
    {
        let generation = self.requested.fetch_add(1, Ordering::SeqCst) + 1;
        let requested = Arc::clone(&self.requested);
        let published = Arc::clone(&self.published);
        let current = Arc::clone(&self.current);

        tokio::spawn(async move {
            let built = tokio::task::spawn_blocking(move || {
                build_full_graph(&vault_root, &notes, &source)
            })
            .await;

            let graph = match built {
                Ok(graph) => graph,
                Err(e) => {
                    log::warn!("Graph build {} failed: {}", generation, e);
                    return false;
                }
            };

            let mut slot = current.write().await;
            if requested.load(Ordering::SeqCst) != generation {
                log::debug!("Discarding superseded graph build {}", generation);
                return false;
            }
            *slot = Arc::new(graph);
            published.store(generation, Ordering::SeqCst);
            log::debug!("Published graph build {}", generation);
            true
        })
    }
}
