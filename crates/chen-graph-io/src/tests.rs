//! File round trips through the exchange readers and writers

use crate::*;
use chen_graph_core::{diff, summarize, NodeId, SummaryConfig};
use tempfile::TempDir;

const CALLS: &str = r#"<graphml>
  <key id="l" for="all" attr.name="label" attr.type="string"/>
  <graph edgedefault="directed">
    <node id="1"><data key="l">foo</data></node>
    <node id="2"><data key="l">bar</data></node>
    <edge source="1" target="2"><data key="l">call</data></edge>
  </graph>
</graphml>"#;

#[test]
fn test_load_graphml_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("calls.graphml");
    std::fs::write(&path, CALLS).unwrap();

    let graph = load_graphml(&path).unwrap();
    assert_eq!(graph.node_count(), 2);
    assert!(graph.has_edge_between(&NodeId::from("1"), &NodeId::from("2"), "call"));
}

#[test]
fn test_load_graphml_failures_are_none() {
    let dir = TempDir::new().unwrap();
    assert!(load_graphml(&dir.path().join("missing.graphml")).is_none());

    let broken = dir.path().join("broken.graphml");
    std::fs::write(&broken, "<graphml><graph><node id=\"a\"></graphml>").unwrap();
    assert!(load_graphml(&broken).is_none());
    assert!(matches!(read_graphml(&broken), Err(ExchangeError::Xml(_))));
}

#[test]
fn test_write_adjacency() {
    let dir = TempDir::new().unwrap();
    let graph = parse_graphml(CALLS).unwrap();
    let path = dir.path().join("calls.json");
    write_adjacency(&graph.to_adjacency(), &path).unwrap();

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["1"]["2"][0]["label"], "call");
    assert!(value["2"].as_object().unwrap().is_empty());
}

#[test]
fn test_write_dot_for_diff_and_summary() {
    let dir = TempDir::new().unwrap();
    let first = parse_graphml(CALLS).unwrap();
    let second = parse_graphml(&CALLS.replace("call", "jump")).unwrap();

    let changes = diff(Some(&first), Some(&second), true);
    let path = dir.path().join("out").join("diff.dot");
    write_dot(&changes.to_dot(), &path).unwrap();
    let dot = std::fs::read_to_string(&path).unwrap();
    assert!(dot.contains("-call"));
    assert!(dot.contains("+jump"));

    let summary = summarize(&first, &SummaryConfig::default());
    let path = dir.path().join("summary.dot");
    write_dot(&summary.to_dot(), &path).unwrap();
    assert!(std::fs::read_to_string(&path).unwrap().starts_with("digraph"));
}
