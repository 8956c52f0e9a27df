//! Weisfeiler-Lehman structural hashing
//!
//! Each iteration relabels every node with the digest of its own label
//! followed by the sorted labels of its undirected neighbours (optionally
//! prefixed with the connecting edge's label). Sorting makes the result
//! independent of node ids and enumeration order.
//!
//! [`graph_hash`] folds the per-iteration label histograms into a single
//! fingerprint; [`subgraph_hashes`] keeps every node's label history.

use crate::graph::Graph;
use crate::label::{self, LabelFn};
use std::collections::BTreeMap;

/// Digest width used when none is configured (16 bytes, 32 hex chars).
pub const DEFAULT_DIGEST_SIZE: usize = 16;

/// Number of relabelling rounds used when none is configured.
pub const DEFAULT_ITERATIONS: usize = 3;

/// Parameters for one hashing call.
///
/// With no label functions the initial node label is the node's degree.
/// With only an edge label function every node starts from the empty label.
#[derive(Debug, Clone, Copy)]
pub struct WlConfig {
    pub iterations: usize,
    pub digest_size: usize,
    pub node_label: Option<LabelFn>,
    pub edge_label: Option<LabelFn>,
}

impl WlConfig {
    /// Both nodes and edges labelled through the label fallback chain.
    pub fn labelled() -> Self {
        Self {
            node_label: Some(label::label),
            edge_label: Some(label::label),
            ..Self::default()
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_digest_size(mut self, digest_size: usize) -> Self {
        self.digest_size = digest_size;
        self
    }
}

impl Default for WlConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            digest_size: DEFAULT_DIGEST_SIZE,
            node_label: None,
            edge_label: None,
        }
    }
}

/// Result of [`hash`]: either the whole-graph fingerprint or the per-node histories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashOutput {
    Graph(String),
    Subgraphs(BTreeMap<String, Vec<String>>),
}

/// Hex digest of `content` after stripping newlines, tabs and spaces.
pub fn fingerprint(content: &str, digest_size: usize) -> String {
    let normalized: String = content
        .chars()
        .filter(|c| !matches!(c, '\n' | '\t' | ' '))
        .collect();
    let mut hasher = blake3::Hasher::new();
    hasher.update(normalized.as_bytes());
    let mut out = vec![0u8; digest_size];
    hasher.finalize_xof().fill(&mut out);
    hex::encode(out)
}

/// Undirected neighbourhood of every node, by position.
struct Neighbourhood {
    neighbours: Vec<Vec<(usize, String)>>,
}

impl Neighbourhood {
    fn build(graph: &Graph, edge_label: Option<LabelFn>) -> Self {
        let mut neighbours = vec![Vec::new(); graph.node_count()];
        for (src, dst, edge) in graph.positioned_edges() {
            let prefix = edge_label.map(|f| f(&edge.attributes)).unwrap_or_default();
            neighbours[src].push((dst, prefix.clone()));
            if src != dst {
                neighbours[dst].push((src, prefix));
            }
        }
        Self { neighbours }
    }
}

fn initial_labels(graph: &Graph, config: &WlConfig) -> Vec<String> {
    if let Some(node_label) = config.node_label {
        graph.all_nodes().map(|n| node_label(&n.attributes)).collect()
    } else if config.edge_label.is_some() {
        vec![String::new(); graph.node_count()]
    } else {
        graph.all_nodes().map(|n| graph.degree(&n.id).to_string()).collect()
    }
}

fn relabel(labels: &[String], hood: &Neighbourhood, digest_size: usize) -> Vec<String> {
    hood.neighbours
        .iter()
        .enumerate()
        .map(|(node, nbrs)| {
            let mut parts: Vec<String> = nbrs
                .iter()
                .map(|(nbr, prefix)| format!("{}{}", prefix, labels[*nbr]))
                .collect();
            parts.sort();
            let mut aggregate = labels[node].clone();
            for part in parts {
                aggregate.push_str(&part);
            }
            fingerprint(&aggregate, digest_size)
        })
        .collect()
}

fn sorted_histogram(labels: &[String]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for l in labels {
        *counts.entry(l.as_str()).or_insert(0) += 1;
    }
    counts.into_iter().map(|(l, c)| (l.to_string(), c)).collect()
}

/// Whole-graph WL fingerprint.
///
/// With zero iterations the fingerprint covers the hashed initial labels only.
pub fn graph_hash(graph: &Graph, config: &WlConfig) -> String {
    let hood = Neighbourhood::build(graph, config.edge_label);
    let mut labels = initial_labels(graph, config);
    let mut sequence: Vec<(String, usize)> = Vec::new();

    if config.iterations == 0 {
        let hashed: Vec<String> = labels
            .iter()
            .map(|l| fingerprint(l, config.digest_size))
            .collect();
        sequence.extend(sorted_histogram(&hashed));
    }

    for _ in 0..config.iterations {
        labels = relabel(&labels, &hood, config.digest_size);
        sequence.extend(sorted_histogram(&labels));
    }

    let digest = fingerprint(&format!("{:?}", sequence), config.digest_size);
    tracing::debug!(
        "WL hash over {} nodes, {} iterations: {}",
        graph.node_count(),
        config.iterations,
        digest
    );
    digest
}

/// Per-node label history, one fingerprint per iteration, keyed by node id.
pub fn subgraph_hashes(graph: &Graph, config: &WlConfig) -> BTreeMap<String, Vec<String>> {
    let hood = Neighbourhood::build(graph, config.edge_label);
    let mut labels = initial_labels(graph, config);
    let mut history: Vec<Vec<String>> = vec![Vec::with_capacity(config.iterations); labels.len()];

    for _ in 0..config.iterations {
        labels = relabel(&labels, &hood, config.digest_size);
        for (node, l) in labels.iter().enumerate() {
            history[node].push(l.clone());
        }
    }

    graph
        .all_nodes()
        .map(|n| n.id.0.clone())
        .zip(history)
        .collect()
}

/// Labelled hashing entry point: graph fingerprint or per-node histories.
pub fn hash(graph: &Graph, subgraph: bool, config: &WlConfig) -> HashOutput {
    if subgraph {
        HashOutput::Subgraphs(subgraph_hashes(graph, config))
    } else {
        HashOutput::Graph(graph_hash(graph, config))
    }
}
