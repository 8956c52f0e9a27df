//! Error types for graph construction and configuration

use crate::model::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("edge references unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;
