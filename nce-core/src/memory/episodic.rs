//! Episodic Memory: "What happened before"
//!
//! Every turn leaves an episode: the concepts it started from and the
//! concepts that survived spreading. Episodes are recalled by Jaccard
//! similarity over their starting concepts. Eviction is strict FIFO.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

/// A single episodic record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Turn that produced the episode.
    pub turn: u64,
    /// Concepts active when the turn was seeded.
    pub context_concepts: BTreeSet<String>,
    /// Concepts still above threshold after spreading.
    pub outcome_concepts: BTreeSet<String>,
    /// Reserved. Stored as given and never read back by the engine.
    pub reinforcement: f64,
}

/// Bounded store of concept episodes.
#[derive(Debug, Clone)]
pub struct EpisodeMemory {
    max_episodes: usize,
    episodes: VecDeque<Episode>,
}

impl EpisodeMemory {
    /// Create a store holding at most `max_episodes` episodes (at least one).
    #[must_use]
    pub fn new(max_episodes: usize) -> Self {
        Self {
            max_episodes: max_episodes.max(1),
            episodes: VecDeque::new(),
        }
    }

    /// Persist a new episode, evicting the oldest if at capacity.
    pub fn store_episode(
        &mut self,
        turn: u64,
        context_concepts: BTreeSet<String>,
        outcome_concepts: BTreeSet<String>,
        reinforcement: f64,
    ) {
        if self.episodes.len() >= self.max_episodes {
            self.episodes.pop_front();
        }
        self.episodes.push_back(Episode {
            turn,
            context_concepts,
            outcome_concepts,
            reinforcement,
        });
    }

    /// Up to `top_k` episodes most similar to `query`, best first.
    ///
    /// Ties keep storage order, so the older episode wins. An empty query
    /// or an empty store recalls nothing.
    #[must_use]
    pub fn recall_similar(&self, query: &BTreeSet<String>, top_k: usize) -> Vec<&Episode> {
        if query.is_empty() || self.episodes.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &Episode)> = self
            .episodes
            .iter()
            .map(|ep| (jaccard(query, &ep.context_concepts), ep))
            .collect();

        // `sort_by` is stable: equal scores stay in storage order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().take(top_k).map(|(_, ep)| ep).collect()
    }

    /// Stored episodes, oldest first.
    pub fn episodes(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter()
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_episodes
    }

    /// Number of stored episodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

impl Default for EpisodeMemory {
    fn default() -> Self {
        Self::new(100)
    }
}

/// |A ∩ B| / |A ∪ B|, or 0 when both sets are empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn exact_match_ranks_above_superset() {
        let mut mem = EpisodeMemory::new(10);
        mem.store_episode(1, set(&["a", "b", "c"]), set(&[]), 0.0);
        mem.store_episode(2, set(&["a", "b"]), set(&[]), 0.0);

        let hits = mem.recall_similar(&set(&["a", "b"]), 2);
        assert_eq!(hits[0].turn, 2);
        assert_eq!(hits[1].turn, 1);
        assert!((jaccard(&set(&["a", "b"]), &hits[1].context_concepts) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn ties_keep_storage_order() {
        let mut mem = EpisodeMemory::new(10);
        mem.store_episode(1, set(&["x"]), set(&[]), 0.0);
        mem.store_episode(2, set(&["y"]), set(&[]), 0.0);
        mem.store_episode(3, set(&["x"]), set(&[]), 0.0);

        let turns: Vec<_> = mem.recall_similar(&set(&["x"]), 3).iter().map(|e| e.turn).collect();
        assert_eq!(turns, vec![1, 3, 2]);
    }

    #[test]
    fn empty_query_or_store_recalls_nothing() {
        let mut mem = EpisodeMemory::new(4);
        assert!(mem.recall_similar(&set(&["a"]), 3).is_empty());
        mem.store_episode(1, set(&["a"]), set(&[]), 0.0);
        assert!(mem.recall_similar(&set(&[]), 3).is_empty());
    }

    #[test]
    fn oldest_episode_is_evicted_at_capacity() {
        let mut mem = EpisodeMemory::new(2);
        mem.store_episode(1, set(&["first"]), set(&[]), 0.0);
        mem.store_episode(2, set(&["second"]), set(&[]), 0.0);
        mem.store_episode(3, set(&["third"]), set(&[]), 0.0);

        assert_eq!(mem.len(), 2);
        let hits = mem.recall_similar(&set(&["first"]), 5);
        assert!(hits.iter().all(|ep| ep.turn != 1));
    }

    #[test]
    fn jaccard_of_two_empty_sets_is_zero() {
        assert!(jaccard(&set(&[]), &set(&[])).abs() < f64::EPSILON);
    }
}
