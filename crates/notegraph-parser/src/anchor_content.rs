//! Anchor-content lookup for embed rendering: `![[Note#Heading]]` shows the
//! heading's section, `![[Note#^id]]` shows the marked line.

use crate::anchors::extract_headings;
use notegraph_core::Heading;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed anchor qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Heading(String),
    Block(String),
}

impl Anchor {
    /// Parse `Heading`, `^block`, or either with a leading `#`.
    ///
    /// ```
    /// use notegraph_parser::Anchor;
    ///
    /// assert_eq!(Anchor::parse("#^abc"), Some(Anchor::Block("abc".into())));
    /// assert_eq!(Anchor::parse("Intro"), Some(Anchor::Heading("Intro".into())));
    /// assert_eq!(Anchor::parse("#"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let raw = raw.strip_prefix('#').unwrap_or(raw).trim();
        match raw.strip_prefix('^') {
            Some(id) if !id.trim().is_empty() => Some(Anchor::Block(id.trim().to_string())),
            Some(_) => None,
            None if !raw.is_empty() => Some(Anchor::Heading(raw.to_string())),
            None => None,
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Heading(text) => write!(f, "#{}", text),
            Anchor::Block(id) => write!(f, "#^{}", id),
        }
    }
}

/// Result of an anchor lookup. A miss is a value, rendered as a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorContent {
    Found(String),
    NotFound(Anchor),
}

impl AnchorContent {
    pub fn is_found(&self) -> bool {
        matches!(self, AnchorContent::Found(_))
    }

    /// The content, or the not-found message
    pub fn into_text(self) -> String {
        match self {
            AnchorContent::Found(text) => text,
            missing @ AnchorContent::NotFound(_) => missing.to_string(),
        }
    }
}

impl fmt::Display for AnchorContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorContent::Found(text) => f.write_str(text),
            AnchorContent::NotFound(Anchor::Heading(text)) => {
                write!(f, "Heading \"{}\" not found", text)
            }
            AnchorContent::NotFound(Anchor::Block(id)) => write!(f, "Block \"^{}\" not found", id),
        }
    }
}

/// Text of the line carrying `^block_id`, marker removed.
///
/// ```
/// use notegraph_parser::block_content;
///
/// let doc = "intro\n- buy milk ^groceries\n";
/// assert_eq!(block_content(doc, "groceries").as_deref(), Some("- buy milk"));
/// ```
pub fn block_content(content: &str, block_id: &str) -> Option<String> {
    let marker = Regex::new(&format!(r"(?:^|\s)\^{}\s*$", regex::escape(block_id))).ok()?;
    content.lines().find_map(|line| {
        marker
            .find(line)
            .map(|m| line[..m.start()].trim().to_string())
    })
}

/// Section under the heading matching `heading` (case-insensitive), using
/// headings already extracted from `content`.
///
/// The section runs from the line after the heading up to, not including,
/// the next heading of the same or a shallower level.
pub fn heading_content_in(content: &str, headings: &[Heading], heading: &str) -> Option<String> {
    let wanted = heading.trim().to_lowercase();
    let idx = headings
        .iter()
        .position(|h| h.text.to_lowercase() == wanted)?;
    let found = &headings[idx];

    let end_line = headings[idx + 1..]
        .iter()
        .find(|h| h.level <= found.level)
        .map(|h| h.position.line);

    let lines: Vec<&str> = content.lines().collect();
    let start = found.position.line.min(lines.len());
    let end = end_line
        .map_or(lines.len(), |line| line.saturating_sub(1))
        .clamp(start, lines.len());

    Some(lines[start..end].join("\n").trim().to_string())
}

/// Section under `heading`, extracting headings from `content` first.
///
/// ```
/// use notegraph_parser::heading_content;
///
/// let doc = "# Guide\n## Install\nrun it\n### Linux\napt\n## Usage\ncall it";
/// assert_eq!(heading_content(doc, "install").as_deref(), Some("run it\n### Linux\napt"));
/// ```
pub fn heading_content(content: &str, heading: &str) -> Option<String> {
    heading_content_in(content, &extract_headings(content), heading)
}

/// Resolve an anchor against a document.
pub fn anchor_content(content: &str, anchor: &Anchor) -> AnchorContent {
    let found = match anchor {
        Anchor::Heading(text) => heading_content(content, text),
        Anchor::Block(id) => block_content(content, id),
    };
    found.map_or_else(
        || AnchorContent::NotFound(anchor.clone()),
        AnchorContent::Found,
    )
}
