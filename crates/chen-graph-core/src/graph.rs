//! Graph wrapper using petgraph::StableDiGraph keyed by NodeId

use crate::error::{GraphError, Result};
use crate::label;
use crate::model::*;
use petgraph::dot::Dot;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, HashMap};

/// Adjacency view: `{source: {target: [edge attributes, ...]}}`.
///
/// Every node appears as a key, including isolated ones.
pub type Adjacency = BTreeMap<String, BTreeMap<String, Vec<Attributes>>>;

/// An attributed directed multigraph.
///
/// Nodes are never removed, so node positions (`0..node_count`) follow
/// insertion order and stay dense. The algorithms rely on that.
#[derive(Clone)]
pub struct Graph {
    inner: StableDiGraph<GraphNode, GraphEdge>,
    index: HashMap<NodeId, NodeIndex>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Add a node. Fails if the id is already taken.
    pub fn add_node(&mut self, id: impl Into<NodeId>, attributes: Attributes) -> Result<NodeId> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        let idx = self.inner.add_node(GraphNode {
            id: id.clone(),
            attributes,
        });
        self.index.insert(id.clone(), idx);
        Ok(id)
    }

    /// Return the node with this id, inserting it with `attributes` if missing.
    pub fn ensure_node(&mut self, id: impl Into<NodeId>, attributes: Attributes) -> NodeId {
        let id = id.into();
        if !self.index.contains_key(&id) {
            let idx = self.inner.add_node(GraphNode {
                id: id.clone(),
                attributes,
            });
            self.index.insert(id.clone(), idx);
        }
        id
    }

    /// Add an edge. Both endpoints must already exist.
    pub fn add_edge(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        attributes: Attributes,
    ) -> Result<EdgeId> {
        let source = source.into();
        let target = target.into();
        let src_idx = *self
            .index
            .get(&source)
            .ok_or_else(|| GraphError::UnknownNode(source.clone()))?;
        let dst_idx = *self
            .index
            .get(&target)
            .ok_or_else(|| GraphError::UnknownNode(target.clone()))?;

        let id = EdgeId(self.inner.edge_count() as u64);
        self.inner.add_edge(
            src_idx,
            dst_idx,
            GraphEdge {
                id,
                source,
                target,
                attributes,
            },
        );
        Ok(id)
    }

    /// Get a node by ID.
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.index
            .get(id)
            .and_then(|&idx| self.inner.node_weight(idx))
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// True when the graph has no nodes (and therefore no edges).
    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Iterate over all nodes in insertion order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// Iterate over all edges in insertion order.
    pub fn all_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.inner
            .edge_indices()
            .filter_map(move |idx| self.inner.edge_weight(idx))
    }

    /// Get all outgoing edges from a node.
    pub fn edges_from(&self, source: &NodeId) -> impl Iterator<Item = &GraphEdge> {
        self.directed_edges(source, Direction::Outgoing)
    }

    /// Get all incoming edges to a node.
    pub fn edges_to(&self, target: &NodeId) -> impl Iterator<Item = &GraphEdge> {
        self.directed_edges(target, Direction::Incoming)
    }

    fn directed_edges(&self, id: &NodeId, dir: Direction) -> impl Iterator<Item = &GraphEdge> {
        self.index
            .get(id)
            .into_iter()
            .flat_map(move |&idx| self.inner.edges_directed(idx, dir))
            .filter_map(move |edge_ref| self.inner.edge_weight(edge_ref.id()))
    }

    /// Undirected degree; a self-loop counts twice.
    pub fn degree(&self, id: &NodeId) -> usize {
        self.edges_from(id).count() + self.edges_to(id).count()
    }

    /// Edges as `(source position, target position, edge)` triples.
    pub fn positioned_edges(&self) -> impl Iterator<Item = (usize, usize, &GraphEdge)> {
        self.inner.edge_indices().filter_map(move |idx| {
            let (source, target) = self.inner.edge_endpoints(idx)?;
            let edge = self.inner.edge_weight(idx)?;
            Some((source.index(), target.index(), edge))
        })
    }

    /// Check if an edge with the given label exists between two nodes.
    pub fn has_edge_between(&self, source: &NodeId, target: &NodeId, edge_label: &str) -> bool {
        self.edges_from(source)
            .any(|e| &e.target == target && label::label(&e.attributes) == edge_label)
    }

    /// Find a node by label (first match).
    pub fn find_node_by_label(&self, wanted: &str) -> Option<&NodeId> {
        self.all_nodes()
            .find(|n| label::label(&n.attributes) == wanted)
            .map(|n| &n.id)
    }

    /// Adjacency mapping of the whole graph.
    pub fn to_adjacency(&self) -> Adjacency {
        let mut adjacency: Adjacency = self
            .all_nodes()
            .map(|n| (n.id.0.clone(), BTreeMap::new()))
            .collect();
        for edge in self.all_edges() {
            adjacency
                .entry(edge.source.0.clone())
                .or_default()
                .entry(edge.target.0.clone())
                .or_default()
                .push(edge.attributes.clone());
        }
        adjacency
    }

    /// DOT description, labels taken from the label fallback chain.
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::with_config(&self.inner, &[]))
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
