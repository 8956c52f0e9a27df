//! SNAP summarisation: collapse nodes with equal attributes and equal neighbourhoods

use crate::graph::Graph;
use crate::model::{AttrValue, Attributes};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Prefix of supernode ids in the summary graph.
pub const SUPERNODE_PREFIX: &str = "Supernode-";

/// Attributes that define node groups and edge types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub node_attributes: Vec<String>,
    pub edge_attributes: Vec<String>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            node_attributes: vec!["label".to_string(), "CODE".to_string()],
            edge_attributes: vec!["label".to_string(), "CODE".to_string()],
        }
    }
}

type Key = Vec<Option<String>>;

fn key_of(attributes: &Attributes, names: &[String]) -> Key {
    names
        .iter()
        .map(|name| {
            attributes
                .get(name)
                .filter(|v| !v.is_null())
                .map(|v| v.to_string())
        })
        .collect()
}

fn key_attributes(key: &Key, names: &[String]) -> Attributes {
    names
        .iter()
        .zip(key)
        .filter_map(|(name, value)| Some((name.clone(), AttrValue::Str(value.clone()?))))
        .collect()
}

/// Compute the SNAP summary of `graph`.
///
/// Nodes start grouped by their configured attribute values. A group is
/// split while its members disagree on which (edge type, neighbour group)
/// pairs they reach over outgoing edges. Each final group becomes one
/// supernode; each connected ordered pair of groups one superedge listing
/// the edge types between them.
pub fn summarize(graph: &Graph, config: &SummaryConfig) -> Graph {
    let node_keys: Vec<Key> = graph
        .all_nodes()
        .map(|n| key_of(&n.attributes, &config.node_attributes))
        .collect();
    let edges: Vec<(usize, usize, Key)> = graph
        .positioned_edges()
        .map(|(s, t, e)| (s, t, key_of(&e.attributes, &config.edge_attributes)))
        .collect();

    let mut group_of = assign_groups(node_keys.iter().cloned());
    let mut group_count = count_groups(&group_of);

    loop {
        let mut signatures: Vec<BTreeSet<(Key, usize)>> = vec![BTreeSet::new(); group_of.len()];
        for (s, t, key) in &edges {
            signatures[*s].insert((key.clone(), group_of[*t]));
        }
        let refined = assign_groups(group_of.iter().copied().zip(signatures));
        let refined_count = count_groups(&refined);
        group_of = refined;
        if refined_count == group_count {
            break;
        }
        group_count = refined_count;
    }

    tracing::debug!(
        "Summarised {} nodes into {} supernodes",
        graph.node_count(),
        group_count
    );

    build_summary(graph, config, &node_keys, &edges, &group_of, group_count)
}

/// Number each distinct key, in key order, and return each item's group.
fn assign_groups<K: Ord + Clone>(keys: impl Iterator<Item = K>) -> Vec<usize> {
    let keys: Vec<K> = keys.collect();
    let distinct: BTreeMap<K, usize> = keys
        .iter()
        .cloned()
        .collect::<BTreeSet<K>>()
        .into_iter()
        .enumerate()
        .map(|(i, k)| (k, i))
        .collect();
    keys.iter().map(|k| distinct[k]).collect()
}

fn count_groups(group_of: &[usize]) -> usize {
    group_of.iter().collect::<BTreeSet<_>>().len()
}

fn build_summary(
    graph: &Graph,
    config: &SummaryConfig,
    node_keys: &[Key],
    edges: &[(usize, usize, Key)],
    group_of: &[usize],
    group_count: usize,
) -> Graph {
    let ids: Vec<String> = graph.all_nodes().map(|n| n.id.0.clone()).collect();
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); group_count];
    for (node, &group) in group_of.iter().enumerate() {
        members[group].push(node);
    }

    let mut summary = Graph::new();
    for (group, nodes) in members.iter().enumerate() {
        let Some(&first) = nodes.first() else {
            continue;
        };
        let mut attributes = key_attributes(&node_keys[first], &config.node_attributes);
        attributes.insert(
            "group".to_string(),
            AttrValue::List(nodes.iter().map(|&n| AttrValue::Str(ids[n].clone())).collect()),
        );
        summary.ensure_node(supernode_id(group), attributes);
    }

    let mut superedges: BTreeMap<(usize, usize), BTreeSet<Key>> = BTreeMap::new();
    for (s, t, key) in edges {
        superedges
            .entry((group_of[*s], group_of[*t]))
            .or_default()
            .insert(key.clone());
    }
    for ((src, dst), types) in superedges {
        let types = types
            .iter()
            .map(|key| AttrValue::Map(key_attributes(key, &config.edge_attributes)))
            .collect();
        let mut attributes = Attributes::new();
        attributes.insert("types".to_string(), AttrValue::List(types));
        if let Err(e) = summary.add_edge(supernode_id(src), supernode_id(dst), attributes) {
            tracing::warn!("Skipping superedge: {}", e);
        }
    }
    summary
}

fn supernode_id(group: usize) -> String {
    format!("{}{}", SUPERNODE_PREFIX, group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeId;
    use crate::test_utils::graph_from;

    fn group_sizes(summary: &Graph) -> Vec<usize> {
        let mut sizes: Vec<usize> = summary
            .all_nodes()
            .map(|n| match n.attributes.get("group") {
                Some(AttrValue::List(items)) => items.len(),
                _ => 0,
            })
            .collect();
        sizes.sort();
        sizes
    }

    #[test]
    fn test_equal_neighbourhoods_collapse() {
        // two "arg" nodes both pointing at the same "call"
        let g = graph_from(
            &[("1", "arg"), ("2", "arg"), ("3", "call")],
            &[("1", "3", "ast"), ("2", "3", "ast")],
        );
        let summary = summarize(&g, &SummaryConfig::default());
        assert_eq!(summary.node_count(), 2);
        assert_eq!(summary.edge_count(), 1);
        assert_eq!(group_sizes(&summary), vec![1, 2]);
    }

    #[test]
    fn test_differing_neighbourhoods_split() {
        let g = graph_from(
            &[("1", "arg"), ("2", "arg"), ("3", "call"), ("4", "ret")],
            &[("1", "3", "ast"), ("2", "4", "ast")],
        );
        let summary = summarize(&g, &SummaryConfig::default());
        assert_eq!(summary.node_count(), 4);
        assert_eq!(group_sizes(&summary), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_supernodes_keep_attribute_values() {
        let g = graph_from(&[("1", "x")], &[("1", "1", "self")]);
        let summary = summarize(&g, &SummaryConfig::default());
        let node = summary.node(&NodeId::from("Supernode-0")).unwrap();
        assert_eq!(node.attributes.get("label"), Some(&AttrValue::from("x")));
        assert!(!node.attributes.contains_key("CODE"));
        assert_eq!(summary.edge_count(), 1);
    }

    #[test]
    fn test_empty_graph_summary() {
        let summary = summarize(&Graph::new(), &SummaryConfig::default());
        assert!(summary.is_empty());
    }
}
