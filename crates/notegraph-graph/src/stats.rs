//! Summary statistics over a built [`Graph`]: broken links, orphans and
//! link cycles.

use notegraph_core::Graph;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// An edge whose target did not resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenLink {
    pub source: PathBuf,
    pub target: String,
}

/// Statistics about the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_notes: usize,
    pub total_links: usize,
    pub resolved_links: usize,
    pub broken_links: Vec<BrokenLink>,
    /// Notes with no resolved links in or out
    pub orphaned_notes: Vec<PathBuf>,
    /// Strongly connected groups of more than one note
    pub cycles: Vec<Vec<PathBuf>>,
    pub average_links_per_note: f64,
}

impl GraphStats {
    pub fn compute(graph: &Graph) -> Self {
        let total_notes = graph.node_count();
        let total_links = graph.edge_count();

        let broken_links: Vec<BrokenLink> = graph
            .edges
            .iter()
            .filter(|e| !e.exists)
            .map(|e| BrokenLink {
                source: e.from.clone(),
                target: e.to_raw.clone(),
            })
            .collect();

        let digraph = to_digraph(graph);
        let orphaned_notes = digraph
            .node_indices()
            .filter(|&i| digraph.neighbors_undirected(i).next().is_none())
            .map(|i| digraph[i].clone())
            .collect();

        let average_links_per_note = if total_notes > 0 {
            total_links as f64 / total_notes as f64
        } else {
            0.0
        };

        Self {
            total_notes,
            total_links,
            resolved_links: total_links - broken_links.len(),
            broken_links,
            orphaned_notes,
            cycles: strongly_connected(&digraph),
            average_links_per_note,
        }
    }
}

/// Resolved edges as a petgraph digraph, node weights being note paths.
pub fn to_digraph(graph: &Graph) -> DiGraph<PathBuf, ()> {
    let mut digraph = DiGraph::with_capacity(graph.node_count(), graph.edge_count());
    let mut indices: HashMap<&Path, NodeIndex> = HashMap::new();
    for node in &graph.nodes {
        indices.insert(node.id.as_path(), digraph.add_node(node.id.clone()));
    }
    for edge in &graph.edges {
        if let Some(to) = edge.target_path()
            && let (Some(&a), Some(&b)) = (indices.get(edge.from.as_path()), indices.get(to))
        {
            digraph.add_edge(a, b, ());
        }
    }
    digraph
}

/// Strongly connected components of size > 1, each sorted by path.
pub fn cycles(graph: &Graph) -> Vec<Vec<PathBuf>> {
    strongly_connected(&to_digraph(graph))
}

fn strongly_connected(digraph: &DiGraph<PathBuf, ()>) -> Vec<Vec<PathBuf>> {
    let mut cycles: Vec<Vec<PathBuf>> = kosaraju_scc(digraph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|scc| {
            let mut members: Vec<PathBuf> = scc.iter().map(|&i| digraph[i].clone()).collect();
            members.sort();
            members
        })
        .collect();
    cycles.sort();
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use notegraph_core::{GraphNode, LinkEdge};

    fn node(name: &str, incoming: usize, outgoing: usize) -> GraphNode {
        GraphNode {
            id: PathBuf::from(format!("/v/{}.md", name)),
            name: name.to_string(),
            incoming_count: incoming,
            outgoing_count: outgoing,
        }
    }

    fn edge(from: &str, to: &str, exists: bool) -> LinkEdge {
        LinkEdge {
            from: PathBuf::from(format!("/v/{}.md", from)),
            to: if exists {
                format!("/v/{}.md", to)
            } else {
                to.to_string()
            },
            to_raw: to.to_string(),
            exists,
        }
    }

    fn sample() -> Graph {
        Graph {
            nodes: vec![
                node("a", 1, 2),
                node("b", 1, 1),
                node("c", 1, 1),
                node("lonely", 0, 0),
                node("dangling", 0, 1),
            ],
            edges: vec![
                edge("a", "b", true),
                edge("b", "a", true),
                edge("a", "Ghost", false),
                edge("c", "c", true),
                edge("dangling", "Nowhere", false),
            ],
        }
    }

    #[test]
    fn test_stats_counts() {
        let stats = GraphStats::compute(&sample());
        assert_eq!(stats.total_notes, 5);
        assert_eq!(stats.total_links, 5);
        assert_eq!(stats.resolved_links, 3);
        assert_eq!(
            stats.broken_links[0],
            BrokenLink {
                source: PathBuf::from("/v/a.md"),
                target: "Ghost".to_string()
            }
        );
        assert_eq!(stats.broken_links.len(), 2);
        assert!((stats.average_links_per_note - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_orphans_ignore_unresolved_links() {
        let stats = GraphStats::compute(&sample());
        assert_eq!(
            stats.orphaned_notes,
            vec![PathBuf::from("/v/lonely.md"), PathBuf::from("/v/dangling.md")]
        );
    }

    #[test]
    fn test_self_loop_is_not_a_cycle() {
        let stats = GraphStats::compute(&sample());
        assert_eq!(
            stats.cycles,
            vec![vec![PathBuf::from("/v/a.md"), PathBuf::from("/v/b.md")]]
        );
    }

    #[test]
    fn test_digraph_skips_broken_edges() {
        let digraph = to_digraph(&sample());
        assert_eq!(digraph.node_count(), 5);
        assert_eq!(digraph.edge_count(), 3);
    }

    #[test]
    fn test_stats_serialize() {
        let json = serde_json::to_value(GraphStats::compute(&sample())).unwrap();
        assert_eq!(json["total_notes"], 5);
        assert_eq!(json["broken_links"][0]["target"], "Ghost");
    }

    #[test]
    fn test_empty_graph() {
        let stats = GraphStats::compute(&Graph::default());
        assert_eq!(stats.total_notes, 0);
        assert_eq!(stats.average_links_per_note, 0.0);
        assert!(stats.cycles.is_empty());
    }
}
