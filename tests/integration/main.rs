//! Integration tests for chen-graph
//!
//! These tests run exchange files through the reader, the engine and the CLI.

use chen_graph_core::{
    diff, edit_distance, graph_hash, is_similar, subgraph_hashes, EngineConfig, SearchBounds,
    SimilarityConfig, WlConfig, NO_RESULT,
};
use chen_graph_io::{load_graphml, parse_graphml};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn graphml(nodes: &[(&str, &str)], edges: &[(&str, &str, &str)]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
  <key id="d0" for="node" attr.name="label" attr.type="string"/>
  <key id="d1" for="edge" attr.name="label" attr.type="string"/>
  <graph edgedefault="directed">
"#,
    );
    for (id, label) in nodes {
        out.push_str(&format!("    <node id=\"{}\"><data key=\"d0\">{}</data></node>\n", id, label));
    }
    for (src, dst, label) in edges {
        out.push_str(&format!(
            "    <edge source=\"{}\" target=\"{}\"><data key=\"d1\">{}</data></edge>\n",
            src, dst, label
        ));
    }
    out.push_str("  </graph>\n</graphml>\n");
    out
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn calls() -> String {
    graphml(&[("1", "foo"), ("2", "bar")], &[("1", "2", "call")])
}

fn no_calls() -> String {
    graphml(&[("1", "foo"), ("2", "bar")], &[])
}

#[test]
fn test_engine_on_exported_graphs() {
    let dir = TempDir::new().unwrap();
    let a = load_graphml(&write(dir.path(), "a.graphml", &calls())).unwrap();
    let b = load_graphml(&write(dir.path(), "b.graphml", &no_calls())).unwrap();

    assert!(diff(Some(&a), Some(&a), false).is_empty());
    let changes = diff(Some(&a), Some(&b), false);
    assert_eq!(changes.removed_edges.len(), 1);

    assert_eq!(edit_distance(&a, &b, &SearchBounds::default()), 1);
    assert!(is_similar(&a, &b, &SimilarityConfig::default()));

    let strict = SearchBounds {
        upper_bound: 0,
        ..SearchBounds::default()
    };
    assert_eq!(edit_distance(&a, &b, &strict), NO_RESULT);
}

#[test]
fn test_hash_survives_renumbered_export() {
    let a = parse_graphml(&calls()).unwrap();
    let renumbered = parse_graphml(&graphml(&[("b", "bar"), ("a", "foo")], &[("a", "b", "call")])).unwrap();
    let config = WlConfig::labelled();
    assert_eq!(graph_hash(&a, &config), graph_hash(&renumbered, &config));

    let hashes = subgraph_hashes(&a, &config);
    assert_eq!(hashes.len(), 2);
    assert!(hashes.values().all(|h| h.len() == 3));
}

#[test]
fn test_config_file_drives_similarity() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "chen-graph.toml", "[similarity]\nedit_distance_threshold = 1\n");
    let config = EngineConfig::load(&path).unwrap();

    let a = parse_graphml(&calls()).unwrap();
    let b = parse_graphml(&no_calls()).unwrap();
    assert!(!is_similar(&a, &b, &config.similarity));
}

fn cli(args: &[&str]) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_chen-graph"))
        .args(args)
        .output()
        .expect("failed to run chen-graph");
    (output.status.success(), String::from_utf8_lossy(&output.stdout).into_owned())
}

#[test]
fn test_cli_help() {
    let (ok, stdout) = cli(&["--help"]);
    assert!(ok);
    assert!(stdout.contains("similarity"));
}

#[test]
fn test_cli_similar_and_distance() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.graphml", &calls());
    let b = write(dir.path(), "b.graphml", &no_calls());
    let (a, b) = (a.to_str().unwrap(), b.to_str().unwrap());

    let (ok, stdout) = cli(&["similar", a, b]);
    assert!(ok);
    assert_eq!(stdout.trim(), "true");

    let (ok, stdout) = cli(&["distance", a, b]);
    assert!(ok);
    assert_eq!(stdout.trim(), "1");
}

#[test]
fn test_cli_export_dot() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.graphml", &calls());
    let out = dir.path().join("a.dot");

    let (ok, _) = cli(&["export", a.to_str().unwrap(), "--output", out.to_str().unwrap()]);
    assert!(ok);
    let dot = std::fs::read_to_string(&out).unwrap();
    assert!(dot.contains("call"));
}

#[test]
fn test_cli_rejects_unreadable_input() {
    let dir = TempDir::new().unwrap();
    let bad = write(dir.path(), "bad.graphml", "not xml at all");
    let (ok, _) = cli(&["hash", bad.to_str().unwrap()]);
    assert!(!ok);
}
