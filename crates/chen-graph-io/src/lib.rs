//! chen-graph io: GraphML reader and DOT / adjacency JSON writers

pub mod error;
pub mod export;
pub mod graphml;

#[cfg(test)]
mod tests;

pub use error::ExchangeError;
pub use export::{adjacency_json, write_adjacency, write_dot};
pub use graphml::{load_graphml, parse_graphml, read_graphml};
