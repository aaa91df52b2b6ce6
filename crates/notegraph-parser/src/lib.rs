//! # Notegraph Parser
//!
//! Targeted scanning of markdown notes for the syntax the reference engine
//! needs. This is not a markdown-to-AST parser: wikilinks are matched with a
//! pattern over raw text, and `pulldown-cmark` is only consulted for block
//! structure (code blocks, paragraphs, list items, frontmatter) when looking
//! for headings and block ids.
//!
//! ## Quick Start
//!
//! ```
//! use notegraph_parser::{extract_blocks, extract_headings, parse_wikilinks};
//!
//! let content = "# Plan\n\nSee [[Roadmap#Q3|the roadmap]] ^plan-intro\n";
//!
//! let links = parse_wikilinks(content);
//! assert_eq!(links[0].target, "Roadmap");
//! assert_eq!(links[0].heading.as_deref(), Some("Q3"));
//!
//! let headings = extract_headings(content);
//! assert_eq!(headings[0].text, "Plan");
//!
//! let blocks = extract_blocks(content);
//! assert_eq!(blocks[0].id, "plan-intro");
//! ```
//!
//! ## Supported syntax
//!
//! - Wikilinks `[[Note]]`, aliases `[[Note|Alias]]`, folders `[[dir/Note]]`
//! - Heading references `[[Note#Heading]]`, block references `[[Note#^id]]`
//! - Same-document anchors `[[#Heading]]`
//! - Embeds `![[image.png]]`, `![[Note#Heading]]`
//! - ATX headings `#`..`######`
//! - Block ids: a trailing `^id` on a paragraph or list item
//!
//! ## Known limits
//!
//! Link scanning does not skip code spans, and a reference-like token inside
//! another reference is matched on its innermost brackets. These edges are
//! kept as-is so that every consumer sees the same links.

mod anchor_content;
mod anchors;
mod links;

pub use anchor_content::{
    Anchor, AnchorContent, anchor_content, block_content, heading_content, heading_content_in,
};
pub use anchors::{
    extract_anchors, extract_blocks, extract_blocks_with_preview, extract_headings, slugify,
};
pub use links::{
    LinkKind, TargetParts, WikiLink, classify_link, contains_wikilink, parse_wikilinks,
    split_target,
};

/// Convenient prelude for common imports.
pub mod prelude {
    pub use notegraph_core::{Block, DocumentAnchors, Heading, LineIndex, SourcePosition};

    pub use crate::{
        Anchor, AnchorContent, LinkKind, TargetParts, WikiLink, anchor_content, block_content,
        classify_link, extract_anchors, extract_blocks, extract_headings, heading_content,
        parse_wikilinks, split_target,
    };
}
