//! Activation Engine: seeding, spreading activation and response scoring.
//!
//! One turn runs five stages against a [`ConceptGraph`]:
//!
//! 1. **Reset** every node to its base activation.
//! 2. **Seed** each recognised concept to 1.0.
//! 3. **Prime** concepts from recent turns: `+priming_boost`, capped at 1.0.
//! 4. **Spread** for `spread_steps` synchronous steps. Each step only nodes
//!    above the threshold emit, and every delta is computed from the state at
//!    the start of the step:
//!      excitatory: `a · w · decay^step · M`
//!      inhibitory: `-(a · |w| · inhibition_scale) · M`
//!    where `M` is the product of all modulators. Deltas into the same target
//!    are summed, then applied with a clamp to [0, 1].
//! 5. **Score** response rules: `Σ trigger activations + priority · weight`.
//!    The first rule with the strictly highest score wins; below the
//!    threshold the fallback rule is chosen.
//!
//! Nothing here fails. Unknown ids, dangling edges and triggers naming
//! undefined nodes contribute nothing.

use std::collections::{BTreeMap, BTreeSet};

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::config::EngineConfig;
use crate::graph::{ConceptGraph, EdgeType, ResponseRule};
use crate::memory::RecencyMemory;
use crate::metrics::{stages, StageProfiler, TurnCounters};
use crate::trace::ThoughtTrace;

/// Id of the synthetic rule chosen when nothing clears the threshold.
pub const FALLBACK_RULE_ID: &str = "r_fallback";

/// Intent of the fallback rule.
pub const FALLBACK_INTENT: &str = "unknown";

/// The rule substituted when no real rule scores at least the threshold.
#[must_use]
pub fn fallback_rule() -> ResponseRule {
    ResponseRule::new(FALLBACK_RULE_ID, Vec::new(), FALLBACK_INTENT, 0)
}

/// Everything one turn of the engine produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// 1-based turn number.
    pub turn: u64,
    /// Winning (or fallback) response rule.
    pub rule: ResponseRule,
    /// Step-by-step record of the computation.
    pub trace: ThoughtTrace,
    /// Work counters.
    pub counters: TurnCounters,
}

/// Spreading-activation engine.
///
/// Owns its modulator table and turn counter; the graph and memories are
/// borrowed per turn so several engines never share hidden state.
#[derive(Debug, Clone)]
pub struct ActivationEngine {
    config: EngineConfig,
    modulators: BTreeMap<String, f64>,
    turn: u64,
}

impl ActivationEngine {
    /// Create an engine. The modulator table starts from `config.modulators`.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let modulators = config.modulators.clone();
        Self {
            config,
            modulators,
            turn: 0,
        }
    }

    /// Engine parameters.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of turns run so far.
    #[must_use]
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Current value of a modulator.
    #[must_use]
    pub fn modulator(&self, name: &str) -> Option<f64> {
        self.modulators.get(name).copied()
    }

    /// Set (or add) a modulator.
    pub fn set_modulator(&mut self, name: impl Into<String>, value: f64) {
        self.modulators.insert(name.into(), value);
    }

    /// The full modulator table.
    #[must_use]
    pub fn modulators(&self) -> &BTreeMap<String, f64> {
        &self.modulators
    }

    /// Product of every modulator value; 1.0 for an empty table.
    #[must_use]
    pub fn modulator_product(&self) -> f64 {
        self.modulators.values().product()
    }

    // -- full turn -----------------------------------------------------------

    /// Run one complete turn for the recognised `concept_ids`.
    ///
    /// The caller records the turn into its memories afterwards.
    pub fn run_turn(
        &mut self,
        graph: &mut ConceptGraph,
        recency: &RecencyMemory,
        concept_ids: &[String],
    ) -> TurnOutcome {
        self.run_turn_profiled(graph, recency, concept_ids, &mut StageProfiler::new())
    }

    /// [`run_turn`](Self::run_turn), timing the spread and plan stages.
    pub fn run_turn_profiled(
        &mut self,
        graph: &mut ConceptGraph,
        recency: &RecencyMemory,
        concept_ids: &[String],
        profiler: &mut StageProfiler,
    ) -> TurnOutcome {
        self.turn += 1;
        let mut counters = TurnCounters::default();
        let mut trace = ThoughtTrace::new();

        graph.reset_activations();
        self.seed(graph, concept_ids, &mut counters);
        self.prime(graph, &recency.get_primed_concepts());

        profiler.time(stages::SPREAD, || {
            self.spread(graph, &mut trace, &mut counters);
        });
        let rule = profiler.time(stages::PLAN, || self.select_response(graph, &mut trace));

        trace.final_concepts = self.final_concepts(graph);

        debug!(
            turn = self.turn,
            seeded = counters.activated_nodes,
            edges = counters.traversed_edges,
            steps = counters.steps_executed,
            rule = %rule.id,
            intent = %rule.intent,
            "Turn complete"
        );

        TurnOutcome {
            turn: self.turn,
            rule,
            trace,
            counters,
        }
    }

    // -- stages --------------------------------------------------------------

    /// Force every resolvable id in `concept_ids` to activation 1.0.
    pub fn seed(
        &self,
        graph: &mut ConceptGraph,
        concept_ids: &[String],
        counters: &mut TurnCounters,
    ) {
        for id in concept_ids {
            if let Some(node) = graph.get_node_mut(id) {
                node.activation = 1.0;
                counters.activated_nodes += 1;
            }
        }
    }

    /// Boost primed concepts that are not already saturated.
    pub fn prime(&self, graph: &mut ConceptGraph, primed: &BTreeSet<String>) {
        for id in primed {
            if let Some(node) = graph.get_node_mut(id) {
                if node.activation < 1.0 {
                    node.activation = (node.activation + self.config.priming_boost).min(1.0);
                }
            }
        }
    }

    /// Run `spread_steps` synchronous spreading steps.
    pub fn spread(
        &self,
        graph: &mut ConceptGraph,
        trace: &mut ThoughtTrace,
        counters: &mut TurnCounters,
    ) {
        let threshold = self.config.activation_threshold;
        let modulation = self.modulator_product();

        for step in 0..self.config.spread_steps {
            let decay_factor = self.config.decay.powf(f64::from(step));
            let snapshot = graph.activation_snapshot();
            // target slot → summed delta
            let mut updates: BTreeMap<usize, f64> = BTreeMap::new();

            for (slot, &activation) in snapshot.iter().enumerate() {
                if activation <= threshold {
                    continue;
                }
                let node = graph.node_at(slot);
                trace.record_node(step, &node.id, activation);

                for edge in graph.get_edges_from(&node.id) {
                    let Some(target) = graph.slot_of(&edge.target) else {
                        continue;
                    };
                    counters.traversed_edges += 1;
                    trace.record_edge(step, &edge.source, &edge.target, edge.weight);

                    let delta = match edge.edge_type {
                        EdgeType::Excitatory => activation * edge.weight * decay_factor,
                        EdgeType::Inhibitory => {
                            -(activation * edge.weight.abs() * self.config.inhibition_scale)
                        }
                    };
                    *updates.entry(target).or_insert(0.0) += delta * modulation;
                }
            }

            tracing::trace!(step, updated = updates.len(), "Spreading step");
            for (slot, delta) in updates {
                let node = graph.node_at_mut(slot);
                node.activation = clamp_unit(node.activation + delta);
            }
            counters.steps_executed += 1;
        }
    }

    /// Score every rule and pick the winner, recording its intent.
    pub fn select_response(&self, graph: &ConceptGraph, trace: &mut ThoughtTrace) -> ResponseRule {
        let mut best: Option<&ResponseRule> = None;
        let mut best_score = -1.0;

        for rule in graph.responses() {
            let score = self.score_rule(graph, rule);
            if score > best_score {
                best_score = score;
                best = Some(rule);
            }
        }

        let chosen = match best {
            Some(rule) if best_score >= self.config.activation_threshold => rule.clone(),
            _ => fallback_rule(),
        };
        trace.response_intent.clone_from(&chosen.intent);
        chosen
    }

    /// `Σ activation(trigger) + priority · priority_weight`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn score_rule(&self, graph: &ConceptGraph, rule: &ResponseRule) -> f64 {
        let triggers: f64 = rule
            .trigger_concepts
            .iter()
            .map(|id| graph.activation_of(id).unwrap_or(0.0))
            .sum();
        triggers + rule.priority as f64 * self.config.priority_weight
    }

    /// Ids of every node above the threshold, sorted by id.
    #[must_use]
    pub fn final_concepts(&self, graph: &ConceptGraph) -> Vec<String> {
        let mut ids: Vec<String> = graph
            .nodes()
            .filter(|n| n.activation > self.config.activation_threshold)
            .map(|n| n.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Ids of every node above the threshold, strongest first.
    ///
    /// Equal activations order by descending id.
    #[must_use]
    pub fn ranked_concepts(&self, graph: &ConceptGraph) -> Vec<String> {
        let mut active: Vec<(OrderedFloat<f64>, &str)> = graph
            .nodes()
            .filter(|n| n.activation > self.config.activation_threshold)
            .map(|n| (OrderedFloat(n.activation), n.id.as_str()))
            .collect();
        active.sort_by(|a, b| b.cmp(a));
        active.into_iter().map(|(_, id)| id.to_string()).collect()
    }
}

/// Clamp to [0, 1]. A NaN sum lands on 1.0 rather than staying NaN.
#[allow(clippy::manual_clamp)]
fn clamp_unit(value: f64) -> f64 {
    value.min(1.0).max(0.0)
}

impl Default for ActivationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
