//! Errors raised while reading or writing exchange files

use chen_graph_core::GraphError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("invalid GraphML: {0}")]
    InvalidStructure(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for ExchangeError {
    fn from(e: quick_xml::Error) -> Self {
        ExchangeError::Xml(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
