//! GraphML reader
//!
//! Reads `<key>` declarations with their optional `<default>`, typed
//! `<data>` values and `<node>` / `<edge>` records. The result is always a
//! directed multigraph regardless of `edgedefault`.

use crate::error::{ExchangeError, Result};
use chen_graph_core::{AttrValue, Attributes, Graph};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;

/// Declared value type of a `<key>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyType {
    String,
    Int,
    Float,
    Boolean,
}

impl KeyType {
    fn parse(name: &str) -> Self {
        match name {
            "int" | "long" => KeyType::Int,
            "float" | "double" => KeyType::Float,
            "boolean" => KeyType::Boolean,
            _ => KeyType::String,
        }
    }

    fn value(self, raw: &str) -> Result<AttrValue> {
        let invalid = || ExchangeError::InvalidStructure(format!("cannot read {:?} as {:?}", raw, self));
        Ok(match self {
            KeyType::String => AttrValue::Str(raw.to_string()),
            KeyType::Int => AttrValue::Int(raw.trim().parse().map_err(|_| invalid())?),
            KeyType::Float => AttrValue::Float(raw.trim().parse().map_err(|_| invalid())?),
            KeyType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => AttrValue::Bool(true),
                "false" | "0" => AttrValue::Bool(false),
                _ => return Err(invalid()),
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Domain {
    Node,
    Edge,
    Other,
    All,
}

impl Domain {
    fn parse(name: &str) -> Self {
        match name {
            "node" => Domain::Node,
            "edge" => Domain::Edge,
            "all" => Domain::All,
            _ => Domain::Other,
        }
    }

    fn covers(self, other: Domain) -> bool {
        self == other || self == Domain::All
    }
}

#[derive(Debug)]
struct KeySpec {
    name: String,
    domain: Domain,
    kind: KeyType,
    default: Option<AttrValue>,
}

#[derive(Debug)]
struct NodeRecord {
    id: String,
    attributes: Attributes,
}

#[derive(Debug)]
struct EdgeRecord {
    source: String,
    target: String,
    attributes: Attributes,
}

/// Element whose `<data>` children are being collected.
enum Owner {
    None,
    Node(NodeRecord),
    Edge(EdgeRecord),
}

#[derive(Default)]
struct Document {
    keys: HashMap<String, KeySpec>,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    saw_graph: bool,
}

impl Document {
    fn key(&self, id: &str) -> Option<&KeySpec> {
        self.keys.get(id)
    }

    fn apply_defaults(&mut self) {
        let defaults = |domain: Domain| -> Vec<(String, AttrValue)> {
            self.keys
                .values()
                .filter(|k| k.domain.covers(domain))
                .filter_map(|k| Some((k.name.clone(), k.default.clone()?)))
                .collect()
        };
        let node_defaults = defaults(Domain::Node);
        let edge_defaults = defaults(Domain::Edge);
        for node in &mut self.nodes {
            for (name, value) in &node_defaults {
                node.attributes.entry(name.clone()).or_insert_with(|| value.clone());
            }
        }
        for edge in &mut self.edges {
            for (name, value) in &edge_defaults {
                edge.attributes.entry(name.clone()).or_insert_with(|| value.clone());
            }
        }
    }

    fn into_graph(mut self) -> Result<Graph> {
        if !self.saw_graph {
            return Err(ExchangeError::InvalidStructure("no <graph> element".to_string()));
        }
        self.apply_defaults();
        let mut graph = Graph::new();
        for node in self.nodes {
            graph.add_node(node.id, node.attributes)?;
        }
        for edge in self.edges {
            graph.add_edge(edge.source, edge.target, edge.attributes)?;
        }
        Ok(graph)
    }
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().filter_map(std::result::Result::ok) {
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required(e: &BytesStart<'_>, name: &[u8]) -> Result<String> {
    attribute(e, name)?.ok_or_else(|| {
        ExchangeError::InvalidStructure(format!(
            "<{}> without {} attribute",
            String::from_utf8_lossy(e.local_name().as_ref()),
            String::from_utf8_lossy(name)
        ))
    })
}

fn read_key(e: &BytesStart<'_>) -> Result<(String, KeySpec)> {
    let id = required(e, b"id")?;
    let name = attribute(e, b"attr.name")?.unwrap_or_else(|| id.clone());
    let domain = Domain::parse(&attribute(e, b"for")?.unwrap_or_else(|| "all".to_string()));
    let kind = KeyType::parse(&attribute(e, b"attr.type")?.unwrap_or_default());
    Ok((
        id,
        KeySpec {
            name,
            domain,
            kind,
            default: None,
        },
    ))
}

fn read_node(e: &BytesStart<'_>) -> Result<NodeRecord> {
    Ok(NodeRecord {
        id: required(e, b"id")?,
        attributes: Attributes::new(),
    })
}

fn read_edge(e: &BytesStart<'_>) -> Result<EdgeRecord> {
    Ok(EdgeRecord {
        source: required(e, b"source")?,
        target: required(e, b"target")?,
        attributes: Attributes::new(),
    })
}

/// Parse GraphML text into a graph.
pub fn parse_graphml(content: &str) -> Result<Graph> {
    let mut reader = Reader::from_str(content);
    let mut doc = Document::default();
    let mut owner = Owner::None;
    let mut current_key: Option<String> = None;
    let mut current_data: Option<String> = None;
    let mut in_default = false;
    let mut text = String::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            ExchangeError::Xml(format!("at position {}: {}", reader.buffer_position(), e))
        })?;
        match event {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"key" => {
                    let (id, declared) = read_key(e)?;
                    doc.keys.insert(id.clone(), declared);
                    current_key = Some(id);
                }
                b"default" => {
                    in_default = true;
                    text.clear();
                }
                b"graph" => doc.saw_graph = true,
                b"node" => owner = Owner::Node(read_node(e)?),
                b"edge" => owner = Owner::Edge(read_edge(e)?),
                b"data" => {
                    current_data = Some(required(e, b"key")?);
                    text.clear();
                }
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"key" => {
                    let (id, declared) = read_key(e)?;
                    doc.keys.insert(id, declared);
                }
                b"graph" => doc.saw_graph = true,
                b"node" => doc.nodes.push(read_node(e)?),
                b"edge" => doc.edges.push(read_edge(e)?),
                _ => {}
            },
            Event::Text(ref e) => {
                if in_default || current_data.is_some() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(ref e) => {
                if in_default || current_data.is_some() {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"key" => current_key = None,
                b"default" => {
                    in_default = false;
                    if let Some(declared) = current_key.as_ref().and_then(|id| doc.keys.get_mut(id)) {
                        declared.default = Some(declared.kind.value(&text)?);
                    }
                }
                b"data" => {
                    let Some(key_id) = current_data.take() else {
                        continue;
                    };
                    let (name, value) = match doc.key(&key_id) {
                        Some(declared) => (declared.name.clone(), declared.kind.value(&text)?),
                        None => (key_id, AttrValue::Str(text.clone())),
                    };
                    match &mut owner {
                        Owner::Node(node) => {
                            node.attributes.insert(name, value);
                        }
                        Owner::Edge(edge) => {
                            edge.attributes.insert(name, value);
                        }
                        Owner::None => tracing::debug!("Ignoring graph-level data {}", name),
                    }
                }
                b"node" | b"edge" => match std::mem::replace(&mut owner, Owner::None) {
                    Owner::Node(node) => doc.nodes.push(node),
                    Owner::Edge(edge) => doc.edges.push(edge),
                    Owner::None => {}
                },
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!(
        "Parsed GraphML: {} keys, {} nodes, {} edges",
        doc.keys.len(),
        doc.nodes.len(),
        doc.edges.len()
    );
    doc.into_graph()
}

/// Read a GraphML file into a graph.
pub fn read_graphml(path: &Path) -> Result<Graph> {
    let content = std::fs::read_to_string(path)?;
    parse_graphml(&content)
}

/// Read a GraphML file, returning `None` if it cannot be read or parsed.
pub fn load_graphml(path: &Path) -> Option<Graph> {
    match read_graphml(path) {
        Ok(graph) => Some(graph),
        Err(e) => {
            tracing::warn!("Failed to load {}: {}", path.display(), e);
            None
        }
    }
}
