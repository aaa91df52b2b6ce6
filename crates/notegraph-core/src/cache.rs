//! Time-bounded cache of parsed per-document anchors.
//!
//! Cross-document anchor lookups (`![[Other#Heading]]`) would otherwise
//! re-scan the target document on every keystroke. Entries expire after a
//! fixed TTL; there is no change-notification invalidation, so a stale entry
//! may be served for up to one TTL after the document changes. Callers that
//! do learn about a change can drop the entry with [`AnchorCache::invalidate`].

use crate::error::Result;
use crate::models::DocumentAnchors;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    anchors: Arc<DocumentAnchors>,
    cached_at: Instant,
}

/// Per-path anchor cache with a fixed time-to-live.
#[derive(Debug)]
pub struct AnchorCache {
    ttl: Duration,
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl AnchorCache {
    /// Create an empty cache. A zero TTL disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.duration_since(entry.cached_at) < self.ttl
    }

    /// Fresh anchors for `path`, if any
    pub fn get(&self, path: &Path) -> Option<Arc<DocumentAnchors>> {
        let entries = self.entries.read();
        entries
            .get(path)
            .filter(|entry| self.is_fresh(entry, Instant::now()))
            .map(|entry| Arc::clone(&entry.anchors))
    }

    /// Store anchors for `path`, replacing any previous entry.
    ///
    /// Expired entries are dropped on every insert, so the map only holds
    /// paths stored within the last TTL.
    pub fn insert(&self, path: impl Into<PathBuf>, anchors: DocumentAnchors) -> Arc<DocumentAnchors> {
        let anchors = Arc::new(anchors);
        let now = Instant::now();
        let mut entries = self.entries.write();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        entries.insert(
            path.into(),
            CacheEntry {
                anchors: Arc::clone(&anchors),
                cached_at: now,
            },
        );
        anchors
    }

    /// Return fresh anchors or compute, store and return new ones.
    ///
    /// A failing `compute` leaves the cache untouched.
    pub fn get_or_try_insert_with<F>(&self, path: &Path, compute: F) -> Result<Arc<DocumentAnchors>>
    where
        F: FnOnce() -> Result<DocumentAnchors>,
    {
        if let Some(anchors) = self.get(path) {
            log::trace!("Anchor cache hit: {}", path.display());
            return Ok(anchors);
        }
        let anchors = compute()?;
        Ok(self.insert(path, anchors))
    }

    /// Drop the entry for `path`
    pub fn invalidate(&self, path: &Path) {
        self.entries.write().remove(path);
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Remove expired entries, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        before - entries.len()
    }

    /// Number of stored entries, fresh or not
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
