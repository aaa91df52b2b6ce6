//! Linked and unlinked mentions of a note.
//!
//! Linked mentions come from notes with a resolved graph edge to the
//! target. Unlinked mentions are case-insensitive occurrences of the
//! target's display name on lines that do not already link to it.

use crate::index::normalize_name;
use notegraph_core::config::DEFAULT_MIN_UNLINKED_NAME_LEN;
use notegraph_core::{Backlinks, ContentSource, Graph, Mention, MentionSpan};
use notegraph_parser::{WikiLink, parse_wikilinks};
use regex::Regex;
use std::path::{Path, PathBuf};

/// Backlinks of `target_path` with the default minimum name length.
pub fn find_backlinks(
    target_path: &Path,
    target_name: &str,
    graph: &Graph,
    source: &dyn ContentSource,
) -> Backlinks {
    find_backlinks_with(
        target_path,
        target_name,
        graph,
        source,
        DEFAULT_MIN_UNLINKED_NAME_LEN,
    )
}

/// Backlinks of `target_path`.
///
/// Notes that cannot be read are skipped. Names shorter than
/// `min_name_len` characters produce no unlinked mentions.
pub fn find_backlinks_with(
    target_path: &Path,
    target_name: &str,
    graph: &Graph,
    source: &dyn ContentSource,
    min_name_len: usize,
) -> Backlinks {
    let wanted = normalize_name(target_name);

    let mut linked = Vec::new();
    for (from, raw_targets) in linking_sources(target_path, graph) {
        let Some(content) = read(source, from) else {
            continue;
        };
        match first_linked_mention(&content, &raw_targets) {
            Some((line_number, line, link)) => {
                let span = link_span(line, &link);
                linked.push(Mention {
                    heading: link.heading,
                    block_id: link.block_id,
                    ..mention(from, graph, line_number, line, span, true)
                });
            }
            None => log::debug!(
                "No wikilink text for {} found in {}",
                target_name,
                from.display()
            ),
        }
    }

    let name = target_name.trim();
    let mut unlinked = Vec::new();
    if name.chars().count() >= min_name_len
        && let Ok(pattern) = Regex::new(&format!("(?i){}", regex::escape(name)))
    {
        for node in graph.nodes.iter().filter(|n| n.id != target_path) {
            let Some(content) = read(source, &node.id) else {
                continue;
            };
            for (idx, line) in content.lines().enumerate() {
                let Some(found) = pattern.find(line) else {
                    continue;
                };
                if line_links_to(line, &wanted) {
                    continue;
                }
                let span = char_span(line, found.start(), found.end());
                unlinked.push(mention(&node.id, graph, idx + 1, line, span, false));
            }
        }
    }

    log::debug!(
        "Backlinks for {}: {} linked, {} unlinked",
        target_path.display(),
        linked.len(),
        unlinked.len()
    );
    Backlinks { linked, unlinked }
}

/// Distinct sources with a resolved edge to `target`, in edge order, each
/// with the raw link targets that resolved there.
fn linking_sources<'a>(target: &Path, graph: &'a Graph) -> Vec<(&'a PathBuf, Vec<&'a str>)> {
    let mut sources: Vec<(&PathBuf, Vec<&str>)> = Vec::new();
    for edge in graph.edges.iter().filter(|e| e.targets(target)) {
        if edge.from == target {
            continue;
        }
        match sources.iter_mut().find(|(from, _)| *from == &edge.from) {
            Some((_, raws)) => {
                if !raws.contains(&edge.to_raw.as_str()) {
                    raws.push(&edge.to_raw);
                }
            }
            None => sources.push((&edge.from, vec![edge.to_raw.as_str()])),
        }
    }
    sources
}

fn read(source: &dyn ContentSource, path: &Path) -> Option<String> {
    match source.read_content(path) {
        Ok(content) => Some(content),
        Err(e) => {
            log::debug!("Skipping {} for backlinks: {}", path.display(), e);
            None
        }
    }
}

/// Whether a link's last path segment normalizes to `wanted`.
fn names_target(link: &WikiLink, wanted: &str) -> bool {
    if !link.has_target() {
        return false;
    }
    let basename = link.target.rsplit(['/', '\\']).next().unwrap_or(&link.target);
    normalize_name(basename) == wanted
}

fn line_links_to(line: &str, wanted: &str) -> bool {
    parse_wikilinks(line).iter().any(|l| names_target(l, wanted))
}

/// First line holding a wikilink whose target is one of `raw_targets`,
/// with that link.
fn first_linked_mention<'c>(
    content: &'c str,
    raw_targets: &[&str],
) -> Option<(usize, &'c str, WikiLink)> {
    content.lines().enumerate().find_map(|(idx, line)| {
        parse_wikilinks(line)
            .into_iter()
            .find(|l| l.has_target() && raw_targets.contains(&l.target.as_str()))
            .map(|link| (idx + 1, line, link))
    })
}

/// Character span of a link's trimmed name part within `line`.
fn link_span(line: &str, link: &WikiLink) -> MentionSpan {
    let raw_name = &line[link.name_range.clone()];
    let start = link.name_range.start + (raw_name.len() - raw_name.trim_start().len());
    char_span(line, start, start + link.target.len())
}

/// Convert a byte range within `line` to character offsets.
fn char_span(line: &str, start: usize, end: usize) -> MentionSpan {
    let start_char = line[..start].chars().count();
    MentionSpan {
        start: start_char,
        end: start_char + line[start..end].chars().count(),
    }
}

fn mention(
    path: &Path,
    graph: &Graph,
    line_number: usize,
    line: &str,
    span: MentionSpan,
    is_linked: bool,
) -> Mention {
    let source_name = graph.node(path).map_or_else(
        || {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        },
        |n| n.name.clone(),
    );
    Mention {
        source_path: path.to_path_buf(),
        source_name,
        context: line.trim().to_string(),
        line_number,
        is_linked,
        span,
        heading: None,
        block_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_full_graph;
    use crate::index::{Index, IndexKind};
    use notegraph_core::FileEntry;
    use std::collections::HashMap;

    fn root() -> PathBuf {
        PathBuf::from("/vault")
    }

    fn p(name: &str) -> PathBuf {
        root().join(name)
    }

    fn setup(docs: &[(&str, &str)]) -> (Graph, HashMap<PathBuf, String>) {
        let tree: Vec<FileEntry> = docs.iter().map(|(n, _)| FileEntry::file(p(n))).collect();
        let index = Index::build(IndexKind::Notes, &tree, &root());
        let contents: HashMap<PathBuf, String> = docs
            .iter()
            .map(|(n, c)| (p(n), c.to_string()))
            .collect();
        let graph = build_full_graph(&root(), &index, &contents);
        (graph, contents)
    }

    #[test]
    fn test_linked_and_unlinked() {
        let (graph, docs) = setup(&[
            ("Note A.md", "intro\nSee [[Note B]] for details."),
            ("Note B.md", "I am Note B."),
            ("Note C.md", "Note B is mentioned here."),
        ]);
        let backlinks = find_backlinks(&p("Note B.md"), "Note B", &graph, &docs);

        assert_eq!(backlinks.linked.len(), 1);
        let linked = &backlinks.linked[0];
        assert_eq!(linked.source_path, p("Note A.md"));
        assert_eq!(linked.source_name, "Note A");
        assert_eq!(linked.line_number, 2);
        assert_eq!(linked.context, "See [[Note B]] for details.");
        assert_eq!(linked.span, MentionSpan { start: 6, end: 12 });
        assert!(linked.is_linked);

        assert_eq!(backlinks.unlinked.len(), 1);
        let unlinked = &backlinks.unlinked[0];
        assert_eq!(unlinked.source_path, p("Note C.md"));
        assert_eq!(unlinked.line_number, 1);
        assert_eq!(unlinked.span, MentionSpan { start: 0, end: 6 });
        assert!(!unlinked.is_linked);
    }

    #[test]
    fn test_line_with_link_and_plain_mention_counted_once() {
        let (graph, docs) = setup(&[
            ("A.md", "[[Topic]] and again Topic"),
            ("Topic.md", ""),
        ]);
        let backlinks = find_backlinks(&p("Topic.md"), "Topic", &graph, &docs);
        assert_eq!(backlinks.linked.len(), 1);
        assert!(backlinks.unlinked.is_empty());
    }

    #[test]
    fn test_unlinked_is_case_insensitive_one_per_line() {
        let (graph, docs) = setup(&[
            ("A.md", "topic TOPIC Topic\nnothing\nabout topic"),
            ("Topic.md", ""),
        ]);
        let backlinks = find_backlinks(&p("Topic.md"), "Topic", &graph, &docs);
        let lines: Vec<usize> = backlinks.unlinked.iter().map(|m| m.line_number).collect();
        assert_eq!(lines, vec![1, 3]);
        assert_eq!(backlinks.unlinked[1].span, MentionSpan { start: 6, end: 11 });
    }

    #[test]
    fn test_linked_via_alias_separator_variants_and_folder() {
        let (graph, docs) = setup(&[
            ("A.md", "x [[my-topic|the topic]]"),
            ("B.md", "y [[sub/My Topic#Part]]"),
            ("sub/My Topic.md", ""),
        ]);
        let backlinks = find_backlinks(&p("sub/My Topic.md"), "My Topic", &graph, &docs);
        assert_eq!(backlinks.linked.len(), 2);
        assert_eq!(backlinks.linked[0].span, MentionSpan { start: 4, end: 12 });
        assert_eq!(backlinks.linked[1].span, MentionSpan { start: 4, end: 16 });
        assert_eq!(backlinks.linked[1].heading.as_deref(), Some("Part"));
        assert_eq!(backlinks.linked[0].heading, None);
    }

    #[test]
    fn test_linked_mention_skips_same_named_note_elsewhere() {
        let (graph, docs) = setup(&[
            ("src.md", "first [[a/Dog]]
then [[b/Dog|the other dog]]"),
            ("a/Dog.md", ""),
            ("b/Dog.md", ""),
        ]);

        let backlinks = find_backlinks(&p("b/Dog.md"), "Dog", &graph, &docs);
        assert_eq!(backlinks.linked.len(), 1);
        let linked = &backlinks.linked[0];
        assert_eq!(linked.line_number, 2);
        assert_eq!(linked.context, "then [[b/Dog|the other dog]]");
        assert_eq!(linked.span, MentionSpan { start: 7, end: 12 });

        let backlinks = find_backlinks(&p("a/Dog.md"), "Dog", &graph, &docs);
        assert_eq!(backlinks.linked[0].line_number, 1);
    }

    #[test]
    fn test_linked_block_qualifier() {
        let (graph, docs) = setup(&[("A.md", "see ![[Topic#^key]]"), ("Topic.md", "")]);
        let backlinks = find_backlinks(&p("Topic.md"), "Topic", &graph, &docs);
        assert_eq!(backlinks.linked[0].block_id.as_deref(), Some("key"));
        assert_eq!(backlinks.linked[0].span, MentionSpan { start: 7, end: 12 });
    }

    #[test]
    fn test_self_links_ignored() {
        let (graph, docs) = setup(&[("Topic.md", "[[Topic]] Topic")]);
        let backlinks = find_backlinks(&p("Topic.md"), "Topic", &graph, &docs);
        assert_eq!(backlinks.total(), 0);
    }

    #[test]
    fn test_short_names_have_no_unlinked() {
        let (graph, docs) = setup(&[("A.md", "x marks the spot"), ("x.md", "")]);
        let backlinks = find_backlinks(&p("x.md"), "x", &graph, &docs);
        assert!(backlinks.unlinked.is_empty());

        let backlinks = find_backlinks_with(&p("x.md"), "x", &graph, &docs, 1);
        assert_eq!(backlinks.unlinked.len(), 1);
    }

    #[test]
    fn test_name_with_regex_metacharacters() {
        let (graph, docs) = setup(&[
            ("A.md", "about C++ (draft) today\nC-- nope"),
            ("C++ (draft).md", ""),
        ]);
        let backlinks = find_backlinks(&p("C++ (draft).md"), "C++ (draft)", &graph, &docs);
        assert_eq!(backlinks.unlinked.len(), 1);
        assert_eq!(backlinks.unlinked[0].span, MentionSpan { start: 6, end: 17 });
    }

    #[test]
    fn test_span_counts_characters() {
        let (graph, docs) = setup(&[("A.md", "café → Topic"), ("Topic.md", "")]);
        let backlinks = find_backlinks(&p("Topic.md"), "Topic", &graph, &docs);
        assert_eq!(backlinks.unlinked[0].span, MentionSpan { start: 7, end: 12 });
    }

    #[test]
    fn test_unreadable_source_skipped() {
        let (graph, mut docs) = setup(&[
            ("A.md", "[[Topic]]"),
            ("B.md", "Topic"),
            ("Topic.md", ""),
        ]);
        docs.remove(&p("A.md"));
        docs.remove(&p("B.md"));
        let backlinks = find_backlinks(&p("Topic.md"), "Topic", &graph, &docs);
        assert_eq!(backlinks.total(), 0);
    }
}
