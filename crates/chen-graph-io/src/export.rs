//! Writers for the DOT and adjacency JSON views

use crate::error::Result;
use chen_graph_core::Adjacency;
use std::path::Path;

/// Serialize an adjacency mapping as pretty-printed JSON.
pub fn adjacency_json(adjacency: &Adjacency) -> Result<String> {
    Ok(serde_json::to_string_pretty(adjacency)?)
}

/// Write an adjacency mapping to `path` as JSON.
pub fn write_adjacency(adjacency: &Adjacency, path: &Path) -> Result<()> {
    let json_str = adjacency_json(adjacency)?;
    std::fs::write(path, json_str)?;
    tracing::debug!("Adjacency data written: {}", path.display());
    Ok(())
}

/// Write a DOT description to `path`, creating parent directories as needed.
pub fn write_dot(dot: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, dot)?;
    tracing::debug!("DOT written: {}", path.display());
    Ok(())
}
