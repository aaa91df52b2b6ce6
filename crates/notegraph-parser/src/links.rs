//! Wikilink and embed scanning: `[[Note]]`, `[[folder/Note|alias]]`,
//! `[[Note#Heading]]`, `[[Note#^block]]`, `![[image.png]]`.
//!
//! Scanning is a plain pattern pass over the raw text. Links inside code
//! spans or fenced blocks are reported like any other; callers that care
//! about code must filter them.

use notegraph_core::{LineIndex, SourcePosition};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::LazyLock;

/// `[[...]]` with an optional leading `!`; the inner text holds no brackets.
static WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!)?\[\[([^\[\]]+)\]\]").unwrap());

/// Kind of reference, judged from the target text alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    /// `[[Note]]`
    Note,
    /// `[[Note#Heading]]`
    HeadingRef,
    /// `[[Note#^block]]` or `[[#^block]]`
    BlockRef,
    /// `[[#Heading]]`, a heading in the same document
    Anchor,
}

/// The pieces of a reference target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetParts {
    /// Note or asset name/path, trimmed. Empty for same-document anchors.
    pub name: String,
    pub heading: Option<String>,
    pub block_id: Option<String>,
    pub alias: Option<String>,
}

/// Split `name#anchor|alias` into its parts.
///
/// ```
/// use notegraph_parser::split_target;
///
/// let parts = split_target("Projects/Plan#^goals|the goals");
/// assert_eq!(parts.name, "Projects/Plan");
/// assert_eq!(parts.block_id.as_deref(), Some("goals"));
/// assert_eq!(parts.alias.as_deref(), Some("the goals"));
/// ```
pub fn split_target(raw: &str) -> TargetParts {
    let (reference, alias) = match raw.split_once('|') {
        Some((reference, alias)) => (reference, Some(alias.trim().to_string())),
        None => (raw, None),
    };

    let (name, anchor) = match reference.split_once('#') {
        Some((name, anchor)) => (name, Some(anchor.trim())),
        None => (reference, None),
    };

    let (heading, block_id) = match anchor {
        Some(a) if a.starts_with('^') => (None, Some(a[1..].trim().to_string())),
        Some(a) if !a.is_empty() => (Some(a.to_string()), None),
        _ => (None, None),
    };

    TargetParts {
        name: name.trim().to_string(),
        heading,
        block_id: block_id.filter(|b| !b.is_empty()),
        alias: alias.filter(|a| !a.is_empty()),
    }
}

/// Classify a wikilink target.
///
/// ```
/// use notegraph_parser::{classify_link, LinkKind};
///
/// assert_eq!(classify_link("Note"), LinkKind::Note);
/// assert_eq!(classify_link("Note#Heading"), LinkKind::HeadingRef);
/// assert_eq!(classify_link("Note#^blockid"), LinkKind::BlockRef);
/// assert_eq!(classify_link("#Heading"), LinkKind::Anchor);
/// assert_eq!(classify_link("#^blockid"), LinkKind::BlockRef);
/// ```
pub fn classify_link(target: &str) -> LinkKind {
    let target = target.split('|').next().unwrap_or(target);
    match target.find('#') {
        Some(pos) if target[pos..].starts_with("#^") => LinkKind::BlockRef,
        Some(0) => LinkKind::Anchor,
        Some(_) => LinkKind::HeadingRef,
        None => LinkKind::Note,
    }
}

/// A wikilink or embed found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiLink {
    /// Text between the brackets, alias included
    pub raw: String,
    /// Note or asset name/path (empty for same-document anchors)
    pub target: String,
    pub heading: Option<String>,
    pub block_id: Option<String>,
    pub alias: Option<String>,
    pub is_embed: bool,
    pub kind: LinkKind,
    /// Position of the whole match, `!` included
    pub position: SourcePosition,
    /// Byte range of the untrimmed name part within the scanned text
    #[serde(skip)]
    pub name_range: Range<usize>,
}

impl WikiLink {
    /// True when the link points at another document (not `[[#Heading]]`).
    pub fn has_target(&self) -> bool {
        !self.target.is_empty()
    }
}

/// Scan `content` for wikilinks and embeds, in document order.
///
/// # Example
/// ```
/// use notegraph_parser::parse_wikilinks;
///
/// let links = parse_wikilinks("See [[Note]] and ![[chart.png|300]]");
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[0].target, "Note");
/// assert!(links[1].is_embed);
/// ```
pub fn parse_wikilinks(content: &str) -> Vec<WikiLink> {
    if !content.contains("[[") {
        return Vec::new();
    }

    let index = LineIndex::new(content);
    WIKILINK
        .captures_iter(content)
        .filter_map(|caps| {
            let full = caps.get(0)?;
            let inner = caps.get(2)?;
            let raw = inner.as_str();
            let parts = split_target(raw);

            let name_len = raw.find(['#', '|']).unwrap_or(raw.len());
            let name_range = inner.start()..inner.start() + name_len;

            Some(WikiLink {
                raw: raw.to_string(),
                target: parts.name,
                heading: parts.heading,
                block_id: parts.block_id,
                alias: parts.alias,
                is_embed: caps.get(1).is_some(),
                kind: classify_link(raw),
                position: SourcePosition::from_offset_indexed(&index, full.start(), full.len()),
                name_range,
            })
        })
        .collect()
}

/// True when `line` holds any wikilink or embed.
pub fn contains_wikilink(line: &str) -> bool {
    line.contains("[[") && WIKILINK.is_match(line)
}
