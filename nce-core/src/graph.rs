//! Concept Graph: nodes, weighted edges, adjacency and response rules.
//!
//! Nodes live in an index-addressed arena owned by [`ConceptGraph`]; every
//! other component refers to them by string id only. Edges may name nodes
//! that do not exist (yet): such dangling references are legal and every
//! lookup simply reports absence.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single node in the concept graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique key.
    pub id: String,
    /// Open tag: `concept`, `emotion`, `drive` or `response` by convention.
    pub kind: String,
    /// Display text used by the realiser.
    pub label: String,
    /// Resting activation restored at the start of every turn.
    pub base_activation: f64,
    /// Current activation. Kept in [0, 1] by the engine, not on write.
    pub activation: f64,
}

impl Node {
    /// Create a node resting at `base_activation`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        label: impl Into<String>,
        base_activation: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            label: label.into(),
            base_activation,
            activation: base_activation,
        }
    }

    /// A `concept` node whose label is its id.
    #[must_use]
    pub fn concept(id: impl Into<String>, base_activation: f64) -> Self {
        let id = id.into();
        Self::new(id.clone(), "concept", id, base_activation)
    }
}

/// Whether an edge pushes its target up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    /// Adds `activation × weight × decay^step` to the target.
    #[default]
    Excitatory,
    /// Subtracts `activation × |weight| × inhibition_scale`, independent of step.
    Inhibitory,
}

impl EdgeType {
    /// Map a textual tag onto an edge type.
    ///
    /// Only `excitatory` excites; any other tag inhibits.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        if tag == "excitatory" {
            Self::Excitatory
        } else {
            Self::Inhibitory
        }
    }

    /// The canonical textual tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excitatory => "excitatory",
            Self::Inhibitory => "inhibitory",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, weighted edge.
///
/// `weight` is a magnitude; the sign of its effect comes from `edge_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Unconstrained magnitude.
    pub weight: f64,
    /// Excitatory or inhibitory.
    pub edge_type: EdgeType,
}

impl Edge {
    /// Create an edge.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        weight: f64,
        edge_type: EdgeType,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
            edge_type,
        }
    }

    /// Shorthand for an excitatory edge.
    #[must_use]
    pub fn excitatory(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self::new(source, target, weight, EdgeType::Excitatory)
    }

    /// Shorthand for an inhibitory edge.
    #[must_use]
    pub fn inhibitory(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
        Self::new(source, target, weight, EdgeType::Inhibitory)
    }
}

/// Maps a set of trigger concepts to an intent for response selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRule {
    /// Rule identifier.
    pub id: String,
    /// Node ids whose activations are summed when scoring.
    pub trigger_concepts: Vec<String>,
    /// Opaque tag handed to the realiser.
    pub intent: String,
    /// Adds `priority × priority_weight` to the score.
    pub priority: i64,
}

impl ResponseRule {
    /// Create a response rule.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        trigger_concepts: Vec<String>,
        intent: impl Into<String>,
        priority: i64,
    ) -> Self {
        Self {
            id: id.into(),
            trigger_concepts,
            intent: intent.into(),
            priority,
        }
    }
}

/// The in-memory concept graph.
#[derive(Debug, Clone, Default)]
pub struct ConceptGraph {
    /// Node arena, in insertion order.
    nodes: Vec<Node>,
    /// id → arena slot.
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    /// source id → indices into `edges`. Every node has a bucket.
    adjacency: HashMap<String, Vec<usize>>,
    responses: Vec<ResponseRule>,
}

impl ConceptGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- queries -------------------------------------------------------------

    /// The node with `id`, if any.
    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&slot| &self.nodes[slot])
    }

    /// Mutable access to the node with `id`, if any.
    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.index.get(id).map(|&slot| &mut self.nodes[slot])
    }

    /// Current activation of `id`, if the node exists.
    #[must_use]
    pub fn activation_of(&self, id: &str) -> Option<f64> {
        self.get_node(id).map(|n| n.activation)
    }

    /// Target ids of every outgoing edge of `id` (empty when unknown).
    #[must_use]
    pub fn get_neighbors(&self, id: &str) -> Vec<&str> {
        self.edges_from(id).map(|e| e.target.as_str()).collect()
    }

    /// Every outgoing edge of `id` in insertion order (empty when unknown).
    #[must_use]
    pub fn get_edges_from(&self, id: &str) -> Vec<&Edge> {
        self.edges_from(id).collect()
    }

    fn edges_from<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.adjacency
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&i| &self.edges[i])
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// All edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Response rules in insertion order.
    #[must_use]
    pub fn responses(&self) -> &[ResponseRule] {
        &self.responses
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of response rules.
    #[must_use]
    pub fn response_count(&self) -> usize {
        self.responses.len()
    }

    // -- mutation ------------------------------------------------------------

    /// Insert `node`, replacing (in place) any node with the same id.
    pub fn add_node(&mut self, node: Node) {
        self.adjacency.entry(node.id.clone()).or_default();
        match self.index.get(&node.id) {
            Some(&slot) => self.nodes[slot] = node,
            None => {
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Append `edge` and index it under its source, creating the bucket if
    /// the source has not been seen.
    pub fn add_edge(&mut self, edge: Edge) {
        self.adjacency
            .entry(edge.source.clone())
            .or_default()
            .push(self.edges.len());
        self.edges.push(edge);
    }

    /// Append a response rule. Order matters for tie-breaking.
    pub fn add_response(&mut self, rule: ResponseRule) {
        self.responses.push(rule);
    }

    /// Restore every node's activation to its base value.
    pub fn reset_activations(&mut self) {
        for node in &mut self.nodes {
            node.activation = node.base_activation;
        }
    }

    /// Activations of every node, in arena order.
    pub(crate) fn activation_snapshot(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.activation).collect()
    }

    /// Arena slot of `id`.
    pub(crate) fn slot_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Node at an arena slot.
    pub(crate) fn node_at(&self, slot: usize) -> &Node {
        &self.nodes[slot]
    }

    /// Mutable node at an arena slot.
    pub(crate) fn node_at_mut(&mut self, slot: usize) -> &mut Node {
        &mut self.nodes[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConceptGraph {
        let mut g = ConceptGraph::new();
        g.add_node(Node::concept("hello", 0.0));
        g.add_node(Node::new("greeting", "response", "a greeting", 0.1));
        g.add_edge(Edge::excitatory("hello", "greeting", 0.9));
        g.add_edge(Edge::inhibitory("hello", "ghost", 0.3));
        g
    }

    #[test]
    fn lookups_on_unknown_ids_are_empty() {
        let g = sample();
        assert!(g.get_node("nope").is_none());
        assert!(g.get_neighbors("nope").is_empty());
        assert!(g.get_edges_from("nope").is_empty());
        assert!(g.get_edges_from("greeting").is_empty());
    }

    #[test]
    fn adjacency_tracks_insertion_order() {
        let g = sample();
        assert_eq!(g.get_neighbors("hello"), vec!["greeting", "ghost"]);
        assert_eq!(g.get_edges_from("hello")[1].edge_type, EdgeType::Inhibitory);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn edge_from_undefined_source_creates_bucket() {
        let mut g = ConceptGraph::new();
        g.add_edge(Edge::excitatory("later", "x", 0.5));
        assert_eq!(g.get_neighbors("later"), vec!["x"]);
        // Defining the node afterwards keeps the existing edges.
        g.add_node(Node::concept("later", 0.0));
        assert_eq!(g.get_edges_from("later").len(), 1);
    }

    #[test]
    fn re_adding_node_replaces_in_place() {
        let mut g = sample();
        g.add_node(Node::concept("hello", 0.4));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.nodes().next().map(|n| n.id.as_str()), Some("hello"));
        assert!((g.get_node("hello").unwrap().base_activation - 0.4).abs() < f64::EPSILON);
        assert_eq!(g.get_edges_from("hello").len(), 2);
    }

    #[test]
    fn reset_restores_base_activation() {
        let mut g = sample();
        g.get_node_mut("hello").unwrap().activation = 1.0;
        g.get_node_mut("greeting").unwrap().activation = 0.77;
        g.reset_activations();
        for node in g.nodes() {
            assert!((node.activation - node.base_activation).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn edge_tags_map_unknown_to_inhibitory() {
        assert_eq!(EdgeType::from_tag("excitatory"), EdgeType::Excitatory);
        assert_eq!(EdgeType::from_tag("inhibitory"), EdgeType::Inhibitory);
        assert_eq!(EdgeType::from_tag("Excitatory"), EdgeType::Inhibitory);
        assert_eq!(EdgeType::Inhibitory.to_string(), "inhibitory");
    }

    #[test]
    fn responses_keep_insertion_order() {
        let mut g = ConceptGraph::new();
        g.add_response(ResponseRule::new("r1", vec![], "a", 0));
        g.add_response(ResponseRule::new("r2", vec![], "b", 0));
        let ids: Vec<_> = g.responses().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }
}
