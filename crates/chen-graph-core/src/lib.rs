//! chen-graph core: attributed graph model, structural hashing, diff and similarity engine

pub mod model;
pub mod error;
pub mod graph;
pub mod label;
pub mod hash;
pub mod diff;
pub mod edit_distance;
pub mod similarity;
pub mod aggregation;
pub mod config;


#[cfg(test)]
pub mod test_utils;

pub use model::{NodeId, EdgeId, AttrValue, Attributes, GraphNode, GraphEdge, attrs};
pub use error::GraphError;
pub use graph::{Graph, Adjacency};
pub use label::{label, node_label, edge_label, LabelFn, LABEL_KEYS};
pub use hash::{WlConfig, HashOutput, graph_hash, subgraph_hashes, hash, fingerprint};
pub use diff::{DiffGraph, EdgeTriple, diff};
pub use edit_distance::{EditPath, SearchBounds, NO_RESULT, edit_distance, search_edit_distance, optimal_edit_path, optimal_edit_paths};
pub use similarity::{SimilarityConfig, Verdict, compare, is_similar};
pub use aggregation::{SummaryConfig, summarize};
pub use config::{EngineConfig, HashSettings};
