//! `.brain` graph files.
//!
//! ```text
//! @section nodes
//! c_hello | type:concept | label:hello | base_activation:0.0
//!
//! @section edges
//! c_hello -> r_greet | weight:0.9 | type:excitatory
//!
//! @section responses
//! r_greeting | trigger_concepts:c_hello,r_greet | intent:greeting | priority:5
//! ```
//!
//! Missing attributes take defaults, and unparsable numbers fall back to
//! the default with a warning. Edge lines without `->` are skipped.

use std::path::Path;

use tracing::{info, warn};

use super::{fields, list, scan, Line};
use crate::error::Result;
use crate::graph::{ConceptGraph, Edge, EdgeType, Node, ResponseRule};

const DEFAULT_EDGE_WEIGHT: f64 = 0.5;

/// Read and parse a `.brain` file.
///
/// # Errors
/// Returns `NceError::Io` if the file cannot be read and `NceError::Parse`
/// for a malformed section header.
pub fn load(path: &Path) -> Result<ConceptGraph> {
    let src = std::fs::read_to_string(path)?;
    let graph = parse_str(&src, &path.display().to_string())?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        responses = graph.response_count(),
        "Loaded brain graph"
    );
    Ok(graph)
}

/// Parse `.brain` source text. `file` is only used in diagnostics.
///
/// # Errors
/// Returns `NceError::Parse` for a malformed section header.
pub fn parse_str(src: &str, file: &str) -> Result<ConceptGraph> {
    let mut graph = ConceptGraph::new();
    let mut section = String::new();

    for (line_no, line) in scan(src, file)? {
        match line {
            Line::Section(name) => section = name,
            Line::Entry(entry) => match section.as_str() {
                "nodes" => parse_node(entry, line_no, &mut graph),
                "edges" => parse_edge(entry, line_no, &mut graph),
                "responses" => parse_response(entry, line_no, &mut graph),
                _ => {}
            },
        }
    }
    Ok(graph)
}

/// `node_id | type:T | label:L | base_activation:F`
fn parse_node(line: &str, line_no: usize, graph: &mut ConceptGraph) {
    let parts = fields(line);
    let id = parts[0];
    let mut kind = "concept";
    let mut label = id;
    let mut base = 0.0;

    for part in &parts[1..] {
        if let Some(v) = part.strip_prefix("type:") {
            kind = v.trim();
        } else if let Some(v) = part.strip_prefix("label:") {
            label = v.trim();
        } else if let Some(v) = part.strip_prefix("base_activation:") {
            base = number(v, 0.0, "base_activation", line_no);
        }
    }

    graph.add_node(Node::new(id, kind, label, base));
}

/// `source -> target | weight:F | type:T`
fn parse_edge(line: &str, line_no: usize, graph: &mut ConceptGraph) {
    let parts = fields(line);
    let Some((source, target)) = parts[0].split_once("->") else {
        return;
    };
    let mut weight = DEFAULT_EDGE_WEIGHT;
    let mut edge_type = EdgeType::Excitatory;

    for part in &parts[1..] {
        if let Some(v) = part.strip_prefix("weight:") {
            weight = number(v, DEFAULT_EDGE_WEIGHT, "weight", line_no);
        } else if let Some(v) = part.strip_prefix("type:") {
            let tag = v.trim();
            if tag != "excitatory" && tag != "inhibitory" {
                warn!(line = line_no, tag, "Unknown edge type, treating as inhibitory");
            }
            edge_type = EdgeType::from_tag(tag);
        }
    }

    graph.add_edge(Edge::new(source.trim(), target.trim(), weight, edge_type));
}

/// `response_id | trigger_concepts:c1,c2 | intent:I | priority:N`
fn parse_response(line: &str, line_no: usize, graph: &mut ConceptGraph) {
    let parts = fields(line);
    let id = parts[0];
    let mut triggers = Vec::new();
    let mut intent = "";
    let mut priority = 0;

    for part in &parts[1..] {
        if let Some(v) = part.strip_prefix("trigger_concepts:") {
            triggers = list(v);
        } else if let Some(v) = part.strip_prefix("intent:") {
            intent = v.trim();
        } else if let Some(v) = part.strip_prefix("priority:") {
            priority = v.trim().parse().unwrap_or_else(|_| {
                warn!(line = line_no, value = v.trim(), "Unparsable priority, using 0");
                0
            });
        }
    }

    graph.add_response(ResponseRule::new(id, triggers, intent, priority));
}

fn number(raw: &str, default: f64, attribute: &str, line_no: usize) -> f64 {
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(line = line_no, attribute, value = raw.trim(), "Unparsable number, using default");
        default
    })
}
