//! Name- and path-keyed lookup tables for notes and assets.
//!
//! An [`Index`] keeps three structures in step:
//! - normalized name → paths, in insertion order (ambiguity is preserved)
//! - vault-relative path, with and without extension → path
//! - the set of every indexed path
//!
//! No I/O happens here; the file tree comes from the caller.

use notegraph_core::utils::{relative_path_string, strip_note_extension};
use notegraph_core::{FileEntry, IndexEntry, NOTE_EXTENSION, is_asset_extension};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Hyphens, underscores and whitespace are one equivalence class
static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_\s]+").unwrap());

/// Case- and separator-insensitive form of a display name.
///
/// ```
/// use notegraph_graph::normalize_name;
///
/// assert_eq!(normalize_name("My-Note"), "my note");
/// assert_eq!(normalize_name("my_note"), "my note");
/// assert_eq!(normalize_name("My Note.md"), "my note");
/// ```
pub fn normalize_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    SEPARATOR_RUN
        .replace_all(strip_note_extension(&lower), " ")
        .trim()
        .to_string()
}

/// Which files an index accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// `.md` files
    Notes,
    /// Files on the embeddable asset allow-list
    Assets,
}

impl IndexKind {
    /// Whether a file with this extension belongs in the index
    pub fn accepts_extension(&self, ext: &str) -> bool {
        match self {
            IndexKind::Notes => ext.eq_ignore_ascii_case(NOTE_EXTENSION),
            IndexKind::Assets => is_asset_extension(ext),
        }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.accepts_extension(ext))
    }
}

/// Lookup tables for one kind of file.
#[derive(Debug, Clone)]
pub struct Index {
    kind: IndexKind,
    by_name: HashMap<String, Vec<PathBuf>>,
    by_relative_path: HashMap<String, PathBuf>,
    all_paths: BTreeSet<PathBuf>,
    entries: HashMap<PathBuf, IndexEntry>,
}

impl Index {
    /// Create an empty index
    pub fn new(kind: IndexKind) -> Self {
        Self {
            kind,
            by_name: HashMap::new(),
            by_relative_path: HashMap::new(),
            all_paths: BTreeSet::new(),
            entries: HashMap::new(),
        }
    }

    /// Build from a file-tree enumeration, recursing into directories.
    pub fn build(kind: IndexKind, tree: &[FileEntry], vault_root: &Path) -> Self {
        let mut index = Self::new(kind);
        for file in tree.iter().flat_map(FileEntry::files) {
            index.add(&file.path, vault_root);
        }
        log::debug!(
            "Built {:?} index: {} paths, {} names",
            kind,
            index.len(),
            index.by_name.len()
        );
        index
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    /// Index `path`. Returns false for files this index does not accept.
    ///
    /// Adding a path that is already present replaces its entry.
    pub fn add(&mut self, path: &Path, vault_root: &Path) -> bool {
        if !self.kind.accepts(path) {
            return false;
        }
        if self.contains(path) {
            self.remove(path);
        }

        let entry = self.make_entry(path, vault_root);
        let bucket = self.by_name.entry(normalize_name(&entry.name)).or_default();
        if !bucket.iter().any(|p| p == path) {
            bucket.push(path.to_path_buf());
        }

        // Assets sharing a stem share the extensionless key; the first owner keeps it.
        for key in relative_keys(&entry.relative_path) {
            self.by_relative_path
                .entry(key)
                .or_insert_with(|| path.to_path_buf());
        }
        self.all_paths.insert(path.to_path_buf());
        self.entries.insert(path.to_path_buf(), entry);
        true
    }

    /// Remove `path` from every table. Returns false if it was not indexed.
    pub fn remove(&mut self, path: &Path) -> bool {
        let Some(entry) = self.entries.remove(path) else {
            return false;
        };
        self.all_paths.remove(path);

        let name_key = normalize_name(&entry.name);
        if let Some(bucket) = self.by_name.get_mut(&name_key) {
            bucket.retain(|p| p != path);
            if bucket.is_empty() {
                self.by_name.remove(&name_key);
            }
        }

        for key in relative_keys(&entry.relative_path) {
            if self.by_relative_path.get(&key).is_some_and(|p| p == path) {
                match self.next_owner(&key) {
                    Some(owner) => self.by_relative_path.insert(key, owner),
                    None => self.by_relative_path.remove(&key),
                };
            }
        }
        true
    }

    /// First remaining path, in sorted order, that answers to `key`
    fn next_owner(&self, key: &str) -> Option<PathBuf> {
        self.entries()
            .find(|e| relative_keys(&e.relative_path).iter().any(|k| k == key))
            .map(|e| e.path.clone())
    }

    /// Remove `old_path`, then add `new_path`. Not atomic: between the two
    /// steps the note is absent from the index.
    pub fn rename(&mut self, old_path: &Path, new_path: &Path, vault_root: &Path) -> bool {
        let removed = self.remove(old_path);
        let added = self.add(new_path, vault_root);
        removed || added
    }

    /// Paths sharing a normalized name, in insertion order.
    pub fn lookup_name(&self, normalized: &str) -> &[PathBuf] {
        self.by_name
            .get(normalized)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Path for a vault-relative key (with or without extension).
    pub fn lookup_relative(&self, relative: &str) -> Option<&PathBuf> {
        self.by_relative_path.get(relative)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.all_paths.contains(path)
    }

    pub fn entry(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Every indexed path, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.all_paths.iter()
    }

    /// Every entry, sorted by path.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.all_paths.iter().filter_map(|p| self.entries.get(p))
    }

    pub fn len(&self) -> usize {
        self.all_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_paths.is_empty()
    }

    fn make_entry(&self, path: &Path, vault_root: &Path) -> IndexEntry {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let name = match self.kind {
            IndexKind::Notes => strip_note_extension(&file_name).to_string(),
            IndexKind::Assets => file_name,
        };

        IndexEntry {
            name,
            path: path.to_path_buf(),
            relative_path: relative_path_string(vault_root, path),
            extension,
        }
    }
}

/// `dir/file.ext` and `dir/file`
fn relative_keys(relative: &str) -> Vec<String> {
    let mut keys = vec![relative.to_string()];
    let segment_start = relative.rfind('/').map_or(0, |i| i + 1);
    if let Some(dot) = relative[segment_start..].rfind('.')
        && dot > 0
    {
        keys.push(relative[..segment_start + dot].to_string());
    }
    keys
}

/// The note and asset indexes of one vault.
#[derive(Debug, Clone)]
pub struct VaultIndex {
    pub notes: Index,
    pub assets: Index,
}

impl Default for VaultIndex {
    fn default() -> Self {
        Self {
            notes: Index::new(IndexKind::Notes),
            assets: Index::new(IndexKind::Assets),
        }
    }
}

impl VaultIndex {
    /// Build both indexes from one enumeration.
    pub fn build(tree: &[FileEntry], vault_root: &Path) -> Self {
        Self {
            notes: Index::build(IndexKind::Notes, tree, vault_root),
            assets: Index::build(IndexKind::Assets, tree, vault_root),
        }
    }

    /// Add to whichever index accepts the file.
    pub fn add(&mut self, path: &Path, vault_root: &Path) -> bool {
        self.notes.add(path, vault_root) || self.assets.add(path, vault_root)
    }

    pub fn remove(&mut self, path: &Path) -> bool {
        let removed_note = self.notes.remove(path);
        let removed_asset = self.assets.remove(path);
        removed_note || removed_asset
    }

    /// Remove then add; a rename may move a file between indexes.
    pub fn rename(&mut self, old_path: &Path, new_path: &Path, vault_root: &Path) -> bool {
        let removed = self.remove(old_path);
        let added = self.add(new_path, vault_root);
        removed || added
    }
}
