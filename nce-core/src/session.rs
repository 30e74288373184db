//! Conversation session: the complete per-turn pipeline.
//!
//! A [`Session`] owns everything one conversation needs: the concept graph,
//! vocabulary, both memory stores, the activation engine and a stage
//! profiler. Sessions share nothing, so independent conversations simply
//! use independent sessions.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::NceConfig;
use crate::engine::ActivationEngine;
use crate::error::Result;
use crate::format::nol::Vocabulary;
use crate::graph::ConceptGraph;
use crate::memory::{Episode, EpisodeMemory, RecencyMemory};
use crate::metrics::{stages, ProfileReport, StageProfiler};
use crate::realize::realize;
use crate::resolve::{map_to_concepts, tokenize};
use crate::trace::ThoughtTrace;

/// Everything a caller sees after one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnReport {
    /// 1-based turn number.
    pub turn: u64,
    /// Realised response text.
    pub response_text: String,
    /// Id of the selected response rule.
    pub rule_id: String,
    /// Intent of the selected response rule.
    pub intent: String,
    /// Concept ids recognised in the input, first-occurrence order.
    pub recognized: Vec<String>,
    /// Step-by-step record of the computation.
    pub thought_trace: ThoughtTrace,
    /// Stage timings and engine counters.
    pub profiling: ProfileReport,
}

impl TurnReport {
    /// Serialize the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `NceError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A single conversation.
#[derive(Debug)]
pub struct Session {
    graph: ConceptGraph,
    vocab: Vocabulary,
    recency: RecencyMemory,
    episodes: EpisodeMemory,
    engine: ActivationEngine,
    profiler: StageProfiler,
    recall_top_k: usize,
}

impl Session {
    /// Assemble a session from a fully loaded graph and vocabulary.
    #[must_use]
    pub fn new(graph: ConceptGraph, vocab: Vocabulary, config: &NceConfig) -> Self {
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            responses = graph.response_count(),
            recency_capacity = config.memory.recency_capacity,
            max_episodes = config.memory.max_episodes,
            "Session created"
        );
        Self {
            graph,
            vocab,
            recency: RecencyMemory::new(config.memory.recency_capacity),
            episodes: EpisodeMemory::new(config.memory.max_episodes),
            engine: ActivationEngine::new(config.engine.clone()),
            profiler: StageProfiler::new(),
            recall_top_k: config.memory.recall_top_k,
        }
    }

    /// Execute the complete pipeline for one user turn.
    pub fn run_turn(&mut self, input: &str) -> TurnReport {
        self.profiler.reset();

        let tokens = self.profiler.time(stages::TOKENIZE, || tokenize(input));
        let vocab = &self.vocab;
        let recognized = self
            .profiler
            .time(stages::ACTIVATE, || map_to_concepts(&tokens, vocab));

        let outcome = self.engine.run_turn_profiled(
            &mut self.graph,
            &self.recency,
            &recognized,
            &mut self.profiler,
        );

        let (engine, graph) = (&self.engine, &self.graph);
        let response_text = self.profiler.time(stages::REALIZE, || {
            let ranked = engine.ranked_concepts(graph);
            let labels: HashMap<&str, &str> =
                graph.nodes().map(|n| (n.id.as_str(), n.label.as_str())).collect();
            realize(&outcome.rule.intent, &ranked, vocab, &labels)
        });

        self.recency
            .add_turn(outcome.turn, input, &recognized, response_text.clone());
        self.episodes.store_episode(
            outcome.turn,
            recognized.iter().cloned().collect(),
            outcome.trace.final_concepts.iter().cloned().collect(),
            0.0,
        );

        TurnReport {
            turn: outcome.turn,
            response_text,
            rule_id: outcome.rule.id,
            intent: outcome.rule.intent,
            recognized,
            thought_trace: outcome.trace,
            profiling: self.profiler.report(outcome.counters),
        }
    }

    /// Past episodes most similar to `query`, at most `top_k`.
    #[must_use]
    pub fn recall_similar(&self, query: &BTreeSet<String>, top_k: usize) -> Vec<&Episode> {
        self.episodes.recall_similar(query, top_k)
    }

    /// [`recall_similar`](Self::recall_similar) with the configured `top_k`.
    #[must_use]
    pub fn recall(&self, query: &BTreeSet<String>) -> Vec<&Episode> {
        self.recall_similar(query, self.recall_top_k)
    }

    /// The concept graph, with activations as left by the last turn.
    #[must_use]
    pub fn graph(&self) -> &ConceptGraph {
        &self.graph
    }

    /// The vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Recent turns.
    #[must_use]
    pub fn recency(&self) -> &RecencyMemory {
        &self.recency
    }

    /// Stored episodes.
    #[must_use]
    pub fn episodes(&self) -> &EpisodeMemory {
        &self.episodes
    }

    /// The engine (modulators, turn counter).
    #[must_use]
    pub fn engine(&self) -> &ActivationEngine {
        &self.engine
    }

    /// Mutable engine access, e.g. to adjust modulators between turns.
    pub fn engine_mut(&mut self) -> &mut ActivationEngine {
        &mut self.engine
    }
}
