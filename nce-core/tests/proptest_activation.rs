//! Property-Based Tests for the activation engine and memory stores.
//!
//! Random graphs, seeds and modulators are thrown at the engine to check
//! the structural guarantees: bounded activations, reproducible traces and
//! capacity-bounded memories.

use std::collections::BTreeSet;

use proptest::prelude::*;

use nce_core::config::EngineConfig;
use nce_core::memory::episodic::jaccard;
use nce_core::{ActivationEngine, ConceptGraph, Edge, EdgeType, EpisodeMemory, Node, RecencyMemory};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn node_id(i: usize) -> String {
    format!("n{i}")
}

/// Edge endpoints may run past the node count so that some edges dangle.
fn arb_graph() -> impl Strategy<Value = ConceptGraph> {
    (2usize..10)
        .prop_flat_map(|n| {
            (
                proptest::collection::vec(0.0..=1.0f64, n),
                proptest::collection::vec(
                    (0..n + 2, 0..n + 2, -3.0..3.0f64, any::<bool>()),
                    0..30,
                ),
            )
        })
        .prop_map(|(bases, edges)| {
            let mut g = ConceptGraph::new();
            for (i, base) in bases.iter().enumerate() {
                g.add_node(Node::concept(node_id(i), *base));
            }
            for (s, t, w, excitatory) in edges {
                let kind = if excitatory { EdgeType::Excitatory } else { EdgeType::Inhibitory };
                g.add_edge(Edge::new(node_id(s), node_id(t), w, kind));
            }
            g
        })
}

fn arb_seeds() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec((0usize..12).prop_map(node_id), 0..4)
}

fn arb_concepts() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::collection::btree_set("[a-e]", 0..5)
}

// ---------------------------------------------------------------------------
// Property: activations stay in [0, 1] after any turn
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn activations_always_bounded(
        mut graph in arb_graph(),
        seeds in arb_seeds(),
        steps in 0u32..6,
        modulator in 0.0..4.0f64,
    ) {
        let mut engine = ActivationEngine::new(EngineConfig {
            spread_steps: steps,
            ..EngineConfig::default()
        });
        engine.set_modulator("urgency", modulator);

        engine.run_turn(&mut graph, &RecencyMemory::new(3), &seeds);
        for node in graph.nodes() {
            prop_assert!((0.0..=1.0).contains(&node.activation), "{} = {}", node.id, node.activation);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: reset restores every base activation
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn reset_restores_base(mut graph in arb_graph(), seeds in arb_seeds()) {
        let mut engine = ActivationEngine::default();
        engine.run_turn(&mut graph, &RecencyMemory::new(3), &seeds);
        graph.reset_activations();
        for node in graph.nodes() {
            prop_assert_eq!(node.activation, node.base_activation);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: identical inputs give identical traces and decisions
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn turns_are_deterministic(
        graph in arb_graph(),
        seeds in arb_seeds(),
        primed in arb_seeds(),
        curiosity in 0.0..3.0f64,
        urgency in 0.0..3.0f64,
    ) {
        let mut recency = RecencyMemory::new(3);
        recency.add_turn(1, "earlier", &primed, "reply");

        let run = |mut g: ConceptGraph| {
            let mut engine = ActivationEngine::default();
            engine.set_modulator("curiosity", curiosity);
            engine.set_modulator("urgency", urgency);
            engine.run_turn(&mut g, &recency, &seeds)
        };
        let out_a = run(graph.clone());
        let out_b = run(graph);

        prop_assert_eq!(out_a.rule.id, out_b.rule.id);
        prop_assert_eq!(
            serde_json::to_string(&out_a.trace).unwrap(),
            serde_json::to_string(&out_b.trace).unwrap()
        );
    }
}

// ---------------------------------------------------------------------------
// Property: traced edges always name defined targets
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn traced_edges_have_defined_endpoints(mut graph in arb_graph(), seeds in arb_seeds()) {
        let out = ActivationEngine::default().run_turn(&mut graph, &RecencyMemory::new(3), &seeds);
        for record in &out.trace.edge_traversals {
            prop_assert!(graph.get_node(&record.target).is_some());
        }
        prop_assert_eq!(out.trace.edge_traversals.len() as u64, out.counters.traversed_edges);
    }
}

// ---------------------------------------------------------------------------
// Property: memory stores never exceed capacity
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn recency_bounded(capacity in 1usize..8, turns in 0u64..40) {
        let mut recency = RecencyMemory::new(capacity);
        for turn in 1..=turns {
            recency.add_turn(turn, "input", &[format!("c{turn}")], "response");
            prop_assert!(recency.len() <= capacity);
        }
        if let Some(newest) = recency.get_recent(capacity).last() {
            prop_assert_eq!(newest.turn_number, turns);
        }
    }

    #[test]
    fn episodes_bounded(capacity in 1usize..8, contexts in proptest::collection::vec(arb_concepts(), 0..30)) {
        let mut episodes = EpisodeMemory::new(capacity);
        for (i, ctx) in contexts.into_iter().enumerate() {
            episodes.store_episode(i as u64 + 1, ctx, BTreeSet::new(), 0.0);
            prop_assert!(episodes.len() <= capacity);
        }
    }

    #[test]
    fn recall_respects_top_k(
        contexts in proptest::collection::vec(arb_concepts(), 0..20),
        query in arb_concepts(),
        top_k in 0usize..6,
    ) {
        let mut episodes = EpisodeMemory::new(50);
        for (i, ctx) in contexts.into_iter().enumerate() {
            episodes.store_episode(i as u64 + 1, ctx, BTreeSet::new(), 0.0);
        }
        let hits = episodes.recall_similar(&query, top_k);
        prop_assert!(hits.len() <= top_k);
        for pair in hits.windows(2) {
            prop_assert!(
                jaccard(&query, &pair[0].context_concepts) >= jaccard(&query, &pair[1].context_concepts)
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property: Jaccard similarity is symmetric and bounded
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn jaccard_bounded_and_symmetric(a in arb_concepts(), b in arb_concepts()) {
        let ab = jaccard(&a, &b);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert_eq!(ab, jaccard(&b, &a));
        prop_assert_eq!(jaccard(&a, &a), if a.is_empty() { 0.0 } else { 1.0 });
    }
}
