//! CLI command implementations

use crate::Format;
use anyhow::Context;
use chen_graph_core::{
    compare, edit_distance, optimal_edit_path, Adjacency, EngineConfig, Graph, HashOutput,
    Verdict,
};
use std::path::Path;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load(path: &Path) -> anyhow::Result<Graph> {
    let graph = chen_graph_io::read_graphml(path).with_context(|| format!("reading {}", path.display()))?;
    tracing::info!(
        "Loaded {}: {} nodes, {} edges",
        path.display(),
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn render(adjacency: &Adjacency, dot: impl FnOnce() -> String, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Json => chen_graph_io::adjacency_json(adjacency)?,
        Format::Dot => dot(),
    })
}

pub fn hash(file: &Path, subgraph: bool, config: &EngineConfig) -> anyhow::Result<()> {
    let graph = load(file)?;
    match chen_graph_core::hash(&graph, subgraph, &config.wl_config()) {
        HashOutput::Graph(digest) => println!("{}", digest),
        HashOutput::Subgraphs(hashes) => println!("{}", serde_json::to_string_pretty(&hashes)?),
    }
    Ok(())
}

pub fn diff(first: &Path, second: &Path, include_common: bool, format: Format) -> anyhow::Result<()> {
    let first = load(first)?;
    let second = load(second)?;
    let changes = chen_graph_core::diff(Some(&first), Some(&second), include_common);
    tracing::info!(
        "+{} -{} nodes, +{} -{} edges",
        changes.added_nodes.len(),
        changes.removed_nodes.len(),
        changes.added_edges.len(),
        changes.removed_edges.len()
    );
    println!("{}", render(&changes.to_adjacency(), || changes.to_dot(), format)?);
    Ok(())
}

pub fn similar(first: &Path, second: &Path, config: &EngineConfig) -> anyhow::Result<()> {
    let first = load(first)?;
    let second = load(second)?;
    let verdict = compare(&first, &second, &config.similarity);
    match verdict {
        Verdict::Identical => tracing::info!("Graphs are identical"),
        Verdict::Near(d) | Verdict::Distant(d) => tracing::info!("Edit distance {}", d),
        Verdict::Unresolved => tracing::info!("No edit distance within bounds"),
    }
    println!("{}", verdict.is_similar());
    Ok(())
}

pub fn distance(first: &Path, second: &Path, exact: bool, config: &EngineConfig) -> anyhow::Result<()> {
    let first = load(first)?;
    let second = load(second)?;
    if exact {
        let path = optimal_edit_path(&first, &second, config.similarity.upper_bound);
        println!("{}", serde_json::to_string_pretty(&path)?);
    } else {
        println!("{}", edit_distance(&first, &second, &config.similarity.bounds()));
    }
    Ok(())
}

pub fn summarize(file: &Path, format: Format, config: &EngineConfig) -> anyhow::Result<()> {
    let graph = load(file)?;
    let summary = chen_graph_core::summarize(&graph, &config.summary);
    tracing::info!("{} supernodes, {} superedges", summary.node_count(), summary.edge_count());
    println!("{}", render(&summary.to_adjacency(), || summary.to_dot(), format)?);
    Ok(())
}

pub fn export(file: &Path, output: &Path, format: Format) -> anyhow::Result<()> {
    let graph = load(file)?;
    match format {
        Format::Json => chen_graph_io::write_adjacency(&graph.to_adjacency(), output)?,
        Format::Dot => chen_graph_io::write_dot(&graph.to_dot(), output)?,
    }
    tracing::info!("Wrote {}", output.display());
    Ok(())
}
