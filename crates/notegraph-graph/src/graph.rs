//! Full and local link graphs.
//!
//! Nodes are the indexed notes. Edges are the wikilinks and note embeds
//! found in each note; unresolved targets stay in the edge list with
//! `exists: false` so callers can render them as ghost nodes.

use crate::index::Index;
use crate::resolver::resolve;
use notegraph_core::{ContentSource, FileType, Graph, GraphNode, LinkEdge};
use notegraph_parser::parse_wikilinks;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

/// Link targets that become graph edges, in document order.
///
/// Same-document anchors and asset embeds are skipped. Links inside code
/// are not filtered.
///
/// ```
/// use notegraph_graph::extract_link_targets;
///
/// let targets = extract_link_targets("[[A]] ![[B]] ![[c.png]] [[#Local]] [[D#Sec|d]]");
/// assert_eq!(targets, vec!["A", "B", "D"]);
/// ```
pub fn extract_link_targets(content: &str) -> Vec<String> {
    parse_wikilinks(content)
        .into_iter()
        .filter(|link| link.has_target())
        .filter(|link| !link.is_embed || FileType::from_target(&link.target) == FileType::Note)
        .map(|link| link.target)
        .collect()
}

/// Build the graph of every note in `index`.
///
/// A note whose content cannot be read keeps its node but contributes no
/// edges.
pub fn build_full_graph(vault_root: &Path, index: &Index, source: &dyn ContentSource) -> Graph {
    let mut edges = Vec::new();

    for path in index.paths() {
        let content = match source.read_content(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping links of {}: {}", path.display(), e);
                continue;
            }
        };

        for target in extract_link_targets(&content) {
            let resolved = resolve(&target, path, index, vault_root);
            let to = if resolved.exists {
                resolved.path.to_string_lossy().into_owned()
            } else {
                target.clone()
            };
            edges.push(LinkEdge {
                from: path.clone(),
                to,
                to_raw: target,
                exists: resolved.exists,
            });
        }
    }

    let mut outgoing: HashMap<&Path, usize> = HashMap::new();
    let mut incoming: HashMap<&Path, usize> = HashMap::new();
    for edge in &edges {
        *outgoing.entry(edge.from.as_path()).or_default() += 1;
        if let Some(to) = edge.target_path() {
            *incoming.entry(to).or_default() += 1;
        }
    }

    let nodes = index
        .entries()
        .map(|entry| GraphNode {
            id: entry.path.clone(),
            name: entry.name.clone(),
            incoming_count: incoming.get(entry.path.as_path()).copied().unwrap_or(0),
            outgoing_count: outgoing.get(entry.path.as_path()).copied().unwrap_or(0),
        })
        .collect();

    log::debug!(
        "Built graph: {} nodes, {} edges",
        index.len(),
        edges.len()
    );
    Graph { nodes, edges }
}

/// Neighborhood of `center` within `depth` hops, following resolved edges
/// in both directions.
///
/// Every edge incident to a reached node inside the radius is kept,
/// including unresolved ones from frontier nodes. Node counts are those of
/// the full graph. An unknown center yields an empty graph; depth 0 yields
/// the center alone.
pub fn build_local_graph(center: &Path, full: &Graph, depth: usize) -> Graph {
    if full.node(center).is_none() {
        return Graph::default();
    }

    // edges touching each node: outgoing always, incoming when resolved
    let mut incident: HashMap<&Path, Vec<usize>> = HashMap::new();
    for (i, edge) in full.edges.iter().enumerate() {
        incident.entry(edge.from.as_path()).or_default().push(i);
        if let Some(to) = edge.target_path()
            && to != edge.from
        {
            incident.entry(to).or_default().push(i);
        }
    }

    let mut visited: HashSet<&Path> = HashSet::from([center]);
    let mut frontier: Vec<&Path> = vec![center];
    let mut touched: BTreeSet<usize> = BTreeSet::new();

    for _ in 0..depth {
        if frontier.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for node in &frontier {
            for &i in incident.get(node).map(Vec::as_slice).unwrap_or_default() {
                touched.insert(i);
                let edge = &full.edges[i];
                let Some(to) = edge.target_path() else {
                    continue;
                };
                for neighbor in [edge.from.as_path(), to] {
                    if visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
        }
        frontier = next;
    }

    Graph {
        nodes: full
            .nodes
            .iter()
            .filter(|n| visited.contains(n.id.as_path()))
            .cloned()
            .collect(),
        edges: touched.into_iter().map(|i| full.edges[i].clone()).collect(),
    }
}
