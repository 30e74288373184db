//! Thought Trace: the step-by-step activation history of one turn.
//!
//! Values are rounded to four decimal places at record time so that traces
//! compare byte-for-byte across runs and across implementations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A node that emitted signal during a spreading step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// 0-based spreading step.
    pub step: u32,
    /// Node id.
    pub id: String,
    /// Activation at the start of the step, rounded to 4 dp.
    pub activation: f64,
}

/// An edge traversed during a spreading step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// 0-based spreading step.
    pub step: u32,
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Stored edge weight, rounded to 4 dp.
    pub weight: f64,
}

/// Per-turn record of the spreading computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThoughtTrace {
    /// Emitting nodes, in step then graph order.
    pub node_activations: Vec<NodeRecord>,
    /// Traversed edges, in step then adjacency order.
    pub edge_traversals: Vec<EdgeRecord>,
    /// Ids still above threshold after spreading, sorted.
    pub final_concepts: Vec<String>,
    /// Intent of the selected response rule.
    pub response_intent: String,
}

impl ThoughtTrace {
    /// Create an empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a node activation at a given spreading step.
    pub fn record_node(&mut self, step: u32, id: &str, activation: f64) {
        self.node_activations.push(NodeRecord {
            step,
            id: id.to_string(),
            activation: round4(activation),
        });
    }

    /// Log an edge traversal at a given spreading step.
    pub fn record_edge(&mut self, step: u32, source: &str, target: &str, weight: f64) {
        self.edge_traversals.push(EdgeRecord {
            step,
            source: source.to_string(),
            target: target.to_string(),
            weight: round4(weight),
        });
    }
}

impl fmt::Display for ThoughtTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "─── Thought Trace ───")?;

        let mut by_step: BTreeMap<u32, Vec<&NodeRecord>> = BTreeMap::new();
        for record in &self.node_activations {
            by_step.entry(record.step).or_default().push(record);
        }
        for (step, records) in &by_step {
            writeln!(f, "  Step {step}:")?;
            for r in records {
                let bar = "█".repeat(bar_width(r.activation));
                writeln!(f, "    {:<20} act={:.4}  {bar}", r.id, r.activation)?;
            }
        }

        if !self.edge_traversals.is_empty() {
            writeln!(f, "  Edges traversed:")?;
            for e in &self.edge_traversals {
                writeln!(f, "    step {}: {} ──({:.2})──▶ {}", e.step, e.source, e.weight, e.target)?;
            }
        }

        let finals = if self.final_concepts.is_empty() {
            "(none)".to_string()
        } else {
            self.final_concepts.join(", ")
        };
        let intent = if self.response_intent.is_empty() {
            "(none)"
        } else {
            self.response_intent.as_str()
        };
        writeln!(f, "  Final concepts : {finals}")?;
        writeln!(f, "  Response intent: {intent}")?;
        write!(f, "─────────────────────")
    }
}

/// Round to four decimal places.
///
/// Goes through `{:.4}`, which rounds the exact binary value, so 0.00035
/// (stored just below the tie) becomes 0.0003.
#[must_use]
pub fn round4(value: f64) -> f64 {
    format!("{value:.4}").parse().unwrap_or(value)
}

/// Twenty cells per unit of activation. Negative values draw nothing.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar_width(activation: f64) -> usize {
    (activation * 20.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_rounded_to_four_places() {
        let mut trace = ThoughtTrace::new();
        trace.record_node(0, "hello", 0.123_456);
        trace.record_edge(1, "hello", "greeting", 0.987_654_3);
        assert!((trace.node_activations[0].activation - 0.1235).abs() < 1e-12);
        assert!((trace.edge_traversals[0].weight - 0.9877).abs() < 1e-12);
        assert_eq!(trace.edge_traversals[0].step, 1);
    }

    #[test]
    fn rounding_follows_the_exact_binary_value() {
        for (raw, rounded) in [(0.000_35, 0.0003), (0.000_45, 0.0004), (0.001_55, 0.0015)] {
            let mut trace = ThoughtTrace::new();
            trace.record_edge(0, "a", "b", raw);
            assert_eq!(trace.edge_traversals[0].weight, rounded, "{raw}");
        }
        assert_eq!(round4(0.123_456), 0.1235);
        assert_eq!(round4(-0.123_456), -0.1235);
        assert_eq!(round4(3.0), 3.0);
    }

    #[test]
    fn bars_scale_past_one() {
        assert_eq!(bar_width(1.0), 20);
        assert_eq!(bar_width(1.5), 30);
        assert_eq!(bar_width(0.26), 5);
        assert_eq!(bar_width(-0.3), 0);
    }

    #[test]
    fn display_groups_by_step() {
        let mut trace = ThoughtTrace::new();
        trace.record_node(0, "hello", 1.0);
        trace.record_node(1, "greeting", 0.72);
        trace.record_edge(0, "hello", "greeting", 0.9);
        trace.final_concepts = vec!["greeting".into(), "hello".into()];
        trace.response_intent = "greet".into();

        let text = trace.to_string();
        assert!(text.contains("Step 0:"));
        assert!(text.contains("Step 1:"));
        assert!(text.contains("act=0.7200"));
        assert!(text.contains("hello ──(0.90)──▶ greeting"));
        assert!(text.contains("Final concepts : greeting, hello"));
        assert!(text.contains("Response intent: greet"));
    }

    #[test]
    fn empty_trace_renders_placeholders() {
        let text = ThoughtTrace::new().to_string();
        assert!(text.contains("Final concepts : (none)"));
        assert!(text.contains("Response intent: (none)"));
        assert!(!text.contains("Edges traversed"));
    }
}
