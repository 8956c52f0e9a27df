//! Label-based structural diff between two graph snapshots
//!
//! Node and edge identity across graphs is label equality: ids from
//! independently exported graphs are not comparable.

use crate::graph::{Adjacency, Graph};
use crate::label;
use crate::model::attrs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An edge reduced to `(source label, target label, edge label)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeTriple {
    pub source: String,
    pub target: String,
    pub label: String,
}

impl EdgeTriple {
    pub fn new(source: impl Into<String>, target: impl Into<String>, label: impl Into<String>) -> Self {
        EdgeTriple {
            source: source.into(),
            target: target.into(),
            label: label.into(),
        }
    }
}

/// Result of a diff: the annotated change-graph plus the raw label sets it was built from.
///
/// Node ids of [`DiffGraph::graph`] are the (possibly `+`/`-` prefixed)
/// labels; edges carry a signed `label` attribute. With `include_common`, a
/// common label that itself starts with `+` or `-` shares its node with the
/// matching signed label. The raw sets keep the two apart.
#[derive(Debug, Clone)]
pub struct DiffGraph {
    pub graph: Graph,
    pub added_nodes: BTreeSet<String>,
    pub removed_nodes: BTreeSet<String>,
    pub common_nodes: BTreeSet<String>,
    pub added_edges: BTreeSet<EdgeTriple>,
    pub removed_edges: BTreeSet<EdgeTriple>,
    pub common_edges: BTreeSet<EdgeTriple>,
}

impl DiffGraph {
    fn passthrough(graph: Graph) -> Self {
        DiffGraph {
            graph,
            added_nodes: BTreeSet::new(),
            removed_nodes: BTreeSet::new(),
            common_nodes: BTreeSet::new(),
            added_edges: BTreeSet::new(),
            removed_edges: BTreeSet::new(),
            common_edges: BTreeSet::new(),
        }
    }

    /// True when the change-graph has no nodes and no edges.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0 && self.graph.edge_count() == 0
    }

    /// True when nothing was added or removed.
    pub fn has_changes(&self) -> bool {
        !(self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.added_edges.is_empty()
            && self.removed_edges.is_empty())
    }

    pub fn to_adjacency(&self) -> Adjacency {
        self.graph.to_adjacency()
    }

    pub fn to_dot(&self) -> String {
        self.graph.to_dot()
    }
}

fn is_absent(graph: Option<&Graph>) -> bool {
    graph.map_or(true, Graph::is_empty)
}

fn node_labels(graph: &Graph) -> BTreeSet<String> {
    graph.all_nodes().map(label::node_label).collect()
}

fn edge_triples(graph: &Graph) -> BTreeSet<EdgeTriple> {
    graph
        .all_edges()
        .filter_map(|e| {
            let source = graph.node(&e.source)?;
            let target = graph.node(&e.target)?;
            Some(EdgeTriple::new(
                label::node_label(source),
                label::node_label(target),
                label::edge_label(e),
            ))
        })
        .collect()
}

fn signed(sign: char, text: &str) -> String {
    format!("{}{}", sign, text)
}

fn add_signed_edge(graph: &mut Graph, triple: &EdgeTriple, sign: char, changed: &BTreeSet<String>) {
    let endpoint = |l: &String| {
        if changed.contains(l) {
            signed(sign, l)
        } else {
            l.clone()
        }
    };
    add_diff_edge(graph, endpoint(&triple.source), endpoint(&triple.target), signed(sign, &triple.label));
}

fn add_diff_node(graph: &mut Graph, id: String) {
    graph.ensure_node(id.clone(), attrs([("label", id)]));
}

fn add_diff_edge(graph: &mut Graph, source: String, target: String, label: String) {
    add_diff_node(graph, source.clone());
    add_diff_node(graph, target.clone());
    // both endpoints were just ensured
    if let Err(e) = graph.add_edge(source, target, attrs([("label", label)])) {
        tracing::warn!("Skipping diff edge: {}", e);
    }
}

/// Compute the difference between `first` and `second`.
///
/// If exactly one side is absent or empty the other graph is returned
/// unchanged; if both are, the result is empty.
pub fn diff(first: Option<&Graph>, second: Option<&Graph>, include_common: bool) -> DiffGraph {
    let (first, second) = match (first, second) {
        (a, b) if is_absent(a) && is_absent(b) => return DiffGraph::passthrough(Graph::new()),
        (a, Some(b)) if is_absent(a) => return DiffGraph::passthrough(b.clone()),
        (Some(a), b) if is_absent(b) => return DiffGraph::passthrough(a.clone()),
        (Some(a), Some(b)) => (a, b),
        _ => return DiffGraph::passthrough(Graph::new()),
    };

    let first_nodes = node_labels(first);
    let second_nodes = node_labels(second);
    let removed_nodes: BTreeSet<String> = first_nodes.difference(&second_nodes).cloned().collect();
    let added_nodes: BTreeSet<String> = second_nodes.difference(&first_nodes).cloned().collect();
    let common_nodes: BTreeSet<String> = first_nodes.intersection(&second_nodes).cloned().collect();

    let first_edges = edge_triples(first);
    let second_edges = edge_triples(second);
    let removed_edges: BTreeSet<EdgeTriple> = first_edges.difference(&second_edges).cloned().collect();
    let added_edges: BTreeSet<EdgeTriple> = second_edges.difference(&first_edges).cloned().collect();
    let common_edges: BTreeSet<EdgeTriple> = first_edges.intersection(&second_edges).cloned().collect();

    let mut graph = Graph::new();
    for l in &removed_nodes {
        add_diff_node(&mut graph, signed('-', l));
    }
    for l in &added_nodes {
        add_diff_node(&mut graph, signed('+', l));
    }
    if include_common {
        for l in &common_nodes {
            add_diff_node(&mut graph, l.clone());
        }
    }
    for triple in &removed_edges {
        add_signed_edge(&mut graph, triple, '-', &removed_nodes);
    }
    for triple in &added_edges {
        add_signed_edge(&mut graph, triple, '+', &added_nodes);
    }
    if include_common {
        for triple in &common_edges {
            add_diff_edge(&mut graph, triple.source.clone(), triple.target.clone(), triple.label.clone());
        }
    }

    tracing::debug!(
        "Diff: +{} -{} nodes, +{} -{} edges",
        added_nodes.len(),
        removed_nodes.len(),
        added_edges.len(),
        removed_edges.len()
    );

    DiffGraph {
        graph,
        added_nodes,
        removed_nodes,
        common_nodes,
        added_edges,
        removed_edges,
        common_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeId;
    use crate::test_utils::{foo_and_bar, foo_calls_bar, graph_from};

    #[test]
    fn test_identical_graphs_have_empty_diff() {
        let a = foo_calls_bar();
        let b = foo_calls_bar();
        let d = diff(Some(&a), Some(&b), false);
        assert!(d.is_empty());
        assert!(!d.has_changes());
        assert!(d.to_adjacency().is_empty());
    }

    #[test]
    fn test_removed_edge_between_common_nodes() {
        let d = diff(Some(&foo_calls_bar()), Some(&foo_and_bar()), false);
        assert!(d.added_nodes.is_empty());
        assert!(d.removed_nodes.is_empty());
        assert!(d.added_edges.is_empty());
        assert_eq!(
            d.removed_edges.iter().collect::<Vec<_>>(),
            vec![&EdgeTriple::new("foo", "bar", "call")]
        );
        // endpoints are common, so only the edge label is signed
        assert!(d.graph.has_edge_between(&NodeId::from("foo"), &NodeId::from("bar"), "-call"));
        assert_eq!(d.graph.node_count(), 2);
    }

    #[test]
    fn test_added_node_prefixes_edge_endpoints() {
        let a = foo_and_bar();
        let b = graph_from(
            &[("1", "foo"), ("2", "bar"), ("3", "baz")],
            &[("2", "3", "flow")],
        );
        let d = diff(Some(&a), Some(&b), false);
        assert_eq!(d.added_nodes.iter().collect::<Vec<_>>(), vec!["baz"]);
        assert!(d.graph.contains_node(&NodeId::from("+baz")));
        assert!(d.graph.has_edge_between(&NodeId::from("bar"), &NodeId::from("+baz"), "+flow"));
    }

    #[test]
    fn test_include_common_keeps_unchanged_structure() {
        let a = foo_calls_bar();
        let b = graph_from(&[("1", "foo"), ("2", "bar"), ("3", "qux")], &[("1", "2", "call")]);
        let without = diff(Some(&a), Some(&b), false);
        assert_eq!(without.graph.node_count(), 1);

        let with = diff(Some(&a), Some(&b), true);
        assert_eq!(with.graph.node_count(), 3);
        assert!(with.graph.has_edge_between(&NodeId::from("foo"), &NodeId::from("bar"), "call"));
    }

    #[test]
    fn test_signed_label_collision_shares_a_node() {
        let a = graph_from(&[("1", "x"), ("2", "-x")], &[]);
        let b = graph_from(&[("1", "-x")], &[]);
        let d = diff(Some(&a), Some(&b), true);
        assert_eq!(d.removed_nodes.iter().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(d.common_nodes.iter().collect::<Vec<_>>(), vec!["-x"]);
        assert_eq!(d.graph.node_count(), 1);
        assert!(d.graph.contains_node(&NodeId::from("-x")));
    }

    #[test]
    fn test_one_side_absent_returns_the_other() {
        let a = foo_calls_bar();
        let d = diff(None, Some(&a), false);
        assert_eq!(d.graph.node_count(), 2);
        assert_eq!(d.graph.edge_count(), 1);
        assert!(!d.has_changes());

        let empty = Graph::new();
        let d = diff(Some(&a), Some(&empty), false);
        assert_eq!(d.graph.node_count(), 2);

        assert!(diff(None, None, false).is_empty());
        assert!(diff(Some(&empty), None, true).is_empty());
    }

    #[test]
    fn test_diff_is_antisymmetric() {
        let a = graph_from(&[("1", "a"), ("2", "b")], &[("1", "2", "x")]);
        let b = graph_from(&[("1", "b"), ("2", "c")], &[("1", "2", "y")]);
        let ab = diff(Some(&a), Some(&b), false);
        let ba = diff(Some(&b), Some(&a), false);
        assert_eq!(ab.added_nodes, ba.removed_nodes);
        assert_eq!(ab.removed_nodes, ba.added_nodes);
        assert_eq!(ab.added_edges, ba.removed_edges);
    }

    #[test]
    fn test_dot_view_shows_signed_labels() {
        let d = diff(Some(&foo_calls_bar()), Some(&foo_and_bar()), false);
        let dot = d.to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("-call"));
        assert!(dot.contains("foo"));
    }
}
