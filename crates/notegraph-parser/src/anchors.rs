//! Heading and block-id extraction.
//!
//! pulldown-cmark supplies the document structure (which lines are ATX
//! headings, where paragraphs and list items begin and end, what is code or
//! frontmatter). The anchor syntax itself is matched with patterns over the
//! raw source of each node.

use lazy_static::lazy_static;
use notegraph_core::config::DEFAULT_BLOCK_PREVIEW_LEN;
use notegraph_core::{Block, DocumentAnchors, Heading, LineIndex, SourcePosition};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    /// `# Heading` .. `###### Heading`, up to three spaces of indentation
    static ref ATX_HEADING: Regex = Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.*?)\s*$").unwrap();

    /// Optional closing sequence: `## Title ##`
    static ref CLOSING_HASHES: Regex = Regex::new(r"\s+#+$").unwrap();

    /// Trailing `^block-id` at the very end of a node's text
    static ref BLOCK_ID: Regex = Regex::new(r"(?:^|\s)\^([A-Za-z0-9][A-Za-z0-9-]*)\s*$").unwrap();

    /// Leading list marker and optional task box, for previews
    static ref LIST_MARKER: Regex = Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+(?:\[[ xX]\]\s+)?").unwrap();

    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

fn cmark_options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts
}

/// Slug for a heading: lowercase, alphanumerics kept, whitespace and hyphen
/// runs collapsed into single hyphens.
///
/// ```
/// use notegraph_parser::slugify;
///
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// assert_eq!(slugify("  Multiple   spaces  "), "multiple-spaces");
/// ```
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Extract ATX headings in document order.
///
/// Heading ids come from the heading's line, so two headings with the same
/// text stay distinguishable. Lines inside code blocks or frontmatter are
/// never headings.
///
/// # Example
/// ```
/// use notegraph_parser::extract_headings;
///
/// let headings = extract_headings("# Title\n\n```\n# not a heading\n```\n## Title");
/// assert_eq!(headings.len(), 2);
/// assert_eq!(headings[1].level, 2);
/// assert_ne!(headings[0].id, headings[1].id);
/// ```
pub fn extract_headings(content: &str) -> Vec<Heading> {
    let index = LineIndex::new(content);
    let mut headings = Vec::new();

    for (event, range) in Parser::new_ext(content, cmark_options()).into_offset_iter() {
        let Event::Start(Tag::Heading { .. }) = event else {
            continue;
        };

        let line_end = content[range.start..]
            .find('\n')
            .map_or(content.len(), |i| range.start + i);
        let line_start = content[..range.start].rfind('\n').map_or(0, |i| i + 1);
        let line = &content[line_start..line_end];

        // Setext headings (underlined) do not count
        let Some(caps) = ATX_HEADING.captures(line) else {
            continue;
        };
        let level = caps[1].len() as u8;
        let text = CLOSING_HASHES.replace(&caps[2], "").trim().to_string();
        if text.is_empty() {
            continue;
        }

        let position =
            SourcePosition::from_offset_indexed(&index, line_start, line_end - line_start);
        headings.push(Heading {
            anchor: slugify(&text),
            id: format!("heading-{}", position.line),
            text,
            level,
            position,
        });
    }

    headings
}

/// An open block-level node while walking the event stream.
enum OpenNode {
    Paragraph {
        start: usize,
    },
    Item {
        start: usize,
        /// Where the item's own text stops (first nested block)
        own_end: Option<usize>,
        has_paragraph: bool,
    },
}

/// Extract `^block-id` markers with the default preview length.
///
/// ```
/// use notegraph_parser::extract_blocks;
///
/// let blocks = extract_blocks("Some text ^abc");
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].id, "abc");
/// assert_eq!(blocks[0].text, "Some text");
/// ```
pub fn extract_blocks(content: &str) -> Vec<Block> {
    extract_blocks_with_preview(content, DEFAULT_BLOCK_PREVIEW_LEN)
}

/// Extract `^block-id` markers, truncating previews to `preview_len` characters.
///
/// Only paragraphs and list items are considered. A marker preceded by an
/// unterminated `[[` belongs to link text and is skipped. When an id repeats,
/// the first occurrence in the document wins.
pub fn extract_blocks_with_preview(content: &str, preview_len: usize) -> Vec<Block> {
    if !content.contains('^') {
        return Vec::new();
    }

    let index = LineIndex::new(content);
    let mut stack: Vec<OpenNode> = Vec::new();
    let mut candidates: Vec<(usize, String, String)> = Vec::new();

    for (event, range) in Parser::new_ext(content, cmark_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::Paragraph) => {
                if let Some(OpenNode::Item { has_paragraph, .. }) = stack.last_mut() {
                    *has_paragraph = true;
                }
                stack.push(OpenNode::Paragraph { start: range.start });
            }
            Event::Start(Tag::Item) => {
                stack.push(OpenNode::Item {
                    start: range.start,
                    own_end: None,
                    has_paragraph: false,
                });
            }
            Event::Start(
                Tag::List(_)
                | Tag::CodeBlock(_)
                | Tag::BlockQuote(_)
                | Tag::Heading { .. }
                | Tag::Table(_)
                | Tag::HtmlBlock,
            ) => {
                if let Some(OpenNode::Item { own_end, .. }) = stack.last_mut()
                    && own_end.is_none()
                {
                    *own_end = Some(range.start);
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if let Some(OpenNode::Paragraph { start }) = stack.pop() {
                    collect_block(content, start..range.end, &mut candidates);
                }
            }
            Event::End(TagEnd::Item) => {
                if let Some(OpenNode::Item {
                    start,
                    own_end,
                    has_paragraph,
                }) = stack.pop()
                    && !has_paragraph
                {
                    collect_block(content, start..own_end.unwrap_or(range.end), &mut candidates);
                }
            }
            _ => {}
        }
    }

    candidates.sort_by_key(|(offset, _, _)| *offset);

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|(_, id, _)| seen.insert(id.clone()))
        .map(|(offset, id, text)| Block {
            position: SourcePosition::from_offset_indexed(&index, offset, id.len() + 1),
            text: preview(&text, preview_len),
            id,
        })
        .collect()
}

/// Match a trailing block id in `content[range]`, recording
/// `(marker offset, id, text before marker)`.
fn collect_block(
    content: &str,
    range: std::ops::Range<usize>,
    out: &mut Vec<(usize, String, String)>,
) {
    let text = &content[range.clone()];
    let Some(caps) = BLOCK_ID.captures(text) else {
        return;
    };
    let Some(id) = caps.get(1) else {
        return;
    };
    let marker_start = id.start() - 1;
    let before = &text[..marker_start];

    // `[[Note ^abc` is link text in progress, not a block marker
    if before.rfind("[[") > before.rfind("]]") {
        return;
    }

    out.push((
        range.start + marker_start,
        id.as_str().to_string(),
        before.to_string(),
    ));
}

fn preview(text: &str, max_chars: usize) -> String {
    let text = LIST_MARKER.replace(text, "");
    let text = WHITESPACE_RUN.replace_all(text.trim(), " ");
    if text.chars().count() <= max_chars {
        return text.into_owned();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated.trim_end())
}

/// Headings and blocks of one document.
pub fn extract_anchors(content: &str, preview_len: usize) -> DocumentAnchors {
    DocumentAnchors {
        headings: extract_headings(content),
        blocks: extract_blocks_with_preview(content, preview_len),
    }
}
