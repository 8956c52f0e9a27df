//! Graph fixtures shared by the unit tests

use crate::graph::Graph;
use crate::model::attrs;

/// Build a graph from `(id, label)` nodes and `(source id, target id, label)` edges.
pub fn graph_from(nodes: &[(&str, &str)], edges: &[(&str, &str, &str)]) -> Graph {
    let mut graph = Graph::new();
    for (id, label) in nodes {
        graph.add_node(*id, attrs([("label", *label)])).unwrap();
    }
    for (src, dst, label) in edges {
        graph.add_edge(*src, *dst, attrs([("label", *label)])).unwrap();
    }
    graph
}

/// A chain `0 -> 1 -> ... -> n-1` with the given node labels and `next` edges.
pub fn path_graph(labels: &[&str]) -> Graph {
    let mut graph = Graph::new();
    for (i, label) in labels.iter().enumerate() {
        graph.add_node(i.to_string(), attrs([("label", *label)])).unwrap();
    }
    for i in 1..labels.len() {
        graph
            .add_edge((i - 1).to_string(), i.to_string(), attrs([("label", "next")]))
            .unwrap();
    }
    graph
}

/// The two-node `foo -call-> bar` graph used throughout the scenarios.
pub fn foo_calls_bar() -> Graph {
    graph_from(&[("1", "foo"), ("2", "bar")], &[("1", "2", "call")])
}

/// `foo` and `bar` without the connecting edge.
pub fn foo_and_bar() -> Graph {
    graph_from(&[("1", "foo"), ("2", "bar")], &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_graph_shape() {
        let g = path_graph(&["a", "b", "c"]);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }
}
