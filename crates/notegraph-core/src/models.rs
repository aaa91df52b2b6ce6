//! Core data models shared by the notegraph crates.
//!
//! These types are:
//! - **Serializable**: consumers (editor decorations, graph view, backlinks
//!   panel) receive them as JSON
//! - **Immutable by convention**: they are rebuilt, never patched in place
//! - **Path-keyed**: a note's identity is its absolute path

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canonical note extension (without the dot).
pub const NOTE_EXTENSION: &str = "md";

/// Embeddable image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["avif", "bmp", "gif", "jpeg", "jpg", "png", "svg", "webp"];
/// Embeddable audio extensions
pub const AUDIO_EXTENSIONS: &[&str] = &["flac", "m4a", "mp3", "ogg", "wav", "webm", "3gp"];
/// Embeddable video extensions
pub const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mov", "mp4", "ogv", "webm"];
/// Embeddable document extensions
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

/// Position in source text (line, column, byte offset)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub length: usize,
}

impl SourcePosition {
    /// Create a new source position
    pub fn new(line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            line,
            column,
            offset,
            length,
        }
    }

    /// Create position from byte offset using a pre-computed line index.
    pub fn from_offset_indexed(index: &LineIndex, offset: usize, length: usize) -> Self {
        let (line, column) = index.line_col(offset);
        Self {
            line,
            column,
            offset,
            length,
        }
    }
}

/// Pre-computed line starts for O(log n) line/column lookup.
///
/// Build once per document, then use for every position lookup in it.
///
/// # Example
/// ```
/// use notegraph_core::{LineIndex, SourcePosition};
///
/// let index = LineIndex::new("Line 1\nLine 2 ^block");
/// let pos = SourcePosition::from_offset_indexed(&index, 14, 6);
/// assert_eq!(pos.line, 2);
/// assert_eq!(pos.column, 8);
/// ```
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets where each line starts (line 1 = index 0)
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Build the index in O(n).
    pub fn new(content: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { line_starts }
    }

    /// Get (line, column) for a byte offset. Both are 1-based.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .max(1);
        let line_start = self.line_starts[line - 1];
        (line, offset - line_start + 1)
    }

    /// Get total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

// ============================================================================
// File enumeration (supplied by the host)
// ============================================================================

/// One node of the host's file-tree enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    #[serde(rename = "isDirectory")]
    pub is_directory: bool,
    pub children: Option<Vec<FileEntry>>,
}

impl FileEntry {
    /// A file leaf
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: file_name_of(&path),
            path,
            is_directory: false,
            children: None,
        }
    }

    /// A directory with children
    pub fn directory(path: impl Into<PathBuf>, children: Vec<FileEntry>) -> Self {
        let path = path.into();
        Self {
            name: file_name_of(&path),
            path,
            is_directory: true,
            children: Some(children),
        }
    }

    /// Depth-first iterator over every non-directory entry below (and including) `self`.
    pub fn files(&self) -> Vec<&FileEntry> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(entry) = stack.pop() {
            if entry.is_directory {
                if let Some(children) = &entry.children {
                    stack.extend(children.iter().rev());
                }
            } else {
                out.push(entry);
            }
        }
        out
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ============================================================================
// Index entries and file classification
// ============================================================================

/// Classification of an embed target, derived purely from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Audio,
    Video,
    Document,
    Note,
    Unknown,
}

impl FileType {
    /// Classify a bare extension (case-insensitive, no dot). Empty means note.
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        let ext = ext.as_str();
        if ext.is_empty() || ext == NOTE_EXTENSION {
            FileType::Note
        } else if IMAGE_EXTENSIONS.contains(&ext) {
            FileType::Image
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            FileType::Audio
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            FileType::Video
        } else if DOCUMENT_EXTENSIONS.contains(&ext) {
            FileType::Document
        } else {
            FileType::Unknown
        }
    }

    /// Classify a raw reference target such as `photo.PNG` or `folder/My Note`.
    ///
    /// A suffix that is on no allow-list is part of a note name, so
    /// `Report v1.2` is a note rather than a `.2` file.
    ///
    /// ```
    /// use notegraph_core::FileType;
    ///
    /// assert_eq!(FileType::from_target("diagram.png"), FileType::Image);
    /// assert_eq!(FileType::from_target("Meeting v1.2 notes"), FileType::Note);
    /// assert_eq!(FileType::from_target("Report v1.2"), FileType::Note);
    /// ```
    pub fn from_target(target: &str) -> Self {
        match Self::from_extension(target_extension(target).unwrap_or("")) {
            FileType::Unknown => FileType::Note,
            known => known,
        }
    }

    /// True for every category backed by the asset index.
    pub fn is_asset(&self) -> bool {
        matches!(
            self,
            FileType::Image | FileType::Audio | FileType::Video | FileType::Document
        )
    }
}

/// Extension of a reference target, if its last segment ends in `.<alnum>+`.
pub fn target_extension(target: &str) -> Option<&str> {
    let last_segment = target.rsplit(['/', '\\']).next().unwrap_or(target);
    let (stem, ext) = last_segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

/// True when `ext` is on the embeddable asset allow-list.
pub fn is_asset_extension(ext: &str) -> bool {
    FileType::from_extension(ext).is_asset()
}

/// An indexed note or asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Display name (file name without the note extension)
    pub name: String,
    /// Absolute identity
    pub path: PathBuf,
    /// Vault-rooted path using `/` separators
    pub relative_path: String,
    /// Lowercase extension without the dot
    pub extension: String,
}

// ============================================================================
// Anchors
// ============================================================================

/// A heading in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    pub level: u8, // 1-6
    /// Position-derived identity, distinct even for repeated heading text
    pub id: String,
    /// Slug of the heading text
    pub anchor: String,
    pub position: SourcePosition,
}

/// A block marked with a trailing `^id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    /// Preview of the block text with the marker removed
    pub text: String,
    pub position: SourcePosition,
}

/// Everything anchorable in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAnchors {
    pub headings: Vec<Heading>,
    pub blocks: Vec<Block>,
}

impl DocumentAnchors {
    /// Heading by case-insensitive text match
    pub fn heading(&self, text: &str) -> Option<&Heading> {
        let wanted = text.trim().to_lowercase();
        self.headings.iter().find(|h| h.text.to_lowercase() == wanted)
    }

    /// Block by exact id
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }
}

// ============================================================================
// Resolution results
// ============================================================================

/// Outcome of resolving a link or embed target.
///
/// When `exists` is false, `path` is the proposed location for creating the
/// missing note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedReference {
    pub path: PathBuf,
    pub exists: bool,
    /// Only set for embeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
}

impl ResolvedReference {
    /// An indexed target
    pub fn found(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exists: true,
            file_type: None,
        }
    }

    /// A creation candidate
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exists: false,
            file_type: None,
        }
    }

    /// Attach an embed classification
    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = Some(file_type);
        self
    }
}

// ============================================================================
// Graph
// ============================================================================

/// One authored reference from a note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkEdge {
    pub from: PathBuf,
    /// Resolved path when `exists`, otherwise the raw target text
    pub to: String,
    pub to_raw: String,
    pub exists: bool,
}

impl LinkEdge {
    /// Target path, only for edges that resolved to an indexed note.
    pub fn target_path(&self) -> Option<&Path> {
        self.exists.then(|| Path::new(&self.to))
    }

    /// Whether this edge points at `path` (and resolved)
    pub fn targets(&self, path: &Path) -> bool {
        self.target_path().is_some_and(|p| p == path)
    }
}

/// A note in the graph. Counts are derived on every build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: PathBuf,
    pub name: String,
    pub incoming_count: usize,
    pub outgoing_count: usize,
}

/// Node set plus edge list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<LinkEdge>,
}

impl Graph {
    /// Node by path
    pub fn node(&self, id: &Path) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

// ============================================================================
// Backlinks
// ============================================================================

/// Character span (start inclusive, end exclusive) within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionSpan {
    pub start: usize,
    pub end: usize,
}

/// A linked or unlinked mention of a note elsewhere in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub source_path: PathBuf,
    pub source_name: String,
    /// The containing line, trimmed
    pub context: String,
    /// 1-based
    pub line_number: usize,
    pub is_linked: bool,
    pub span: MentionSpan,
    pub heading: Option<String>,
    pub block_id: Option<String>,
}

/// Backlinks panel payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backlinks {
    pub linked: Vec<Mention>,
    pub unlinked: Vec<Mention>,
}

impl Backlinks {
    pub fn total(&self) -> usize {
        self.linked.len() + self.unlinked.len()
    }
}
