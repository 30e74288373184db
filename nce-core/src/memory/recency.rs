//! Recency Memory: the last few turns of the conversation.
//!
//! Concepts recognised in recent turns receive a small activation boost
//! (priming) when the next turn is seeded.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

/// A single conversational turn held in the recency buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecencyEntry {
    /// 1-based turn number.
    pub turn_number: u64,
    /// Raw user input.
    pub input_text: String,
    /// Concept ids recognised in the input.
    pub active_concepts: Vec<String>,
    /// What the engine answered.
    pub response_text: String,
}

/// Fixed-capacity ring buffer of recent turns.
#[derive(Debug, Clone)]
pub struct RecencyMemory {
    capacity: usize,
    buffer: VecDeque<RecencyEntry>,
}

impl RecencyMemory {
    /// Create a buffer holding at most `capacity` turns (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a completed turn, evicting the oldest once over capacity.
    pub fn add_turn(
        &mut self,
        turn_number: u64,
        input_text: impl Into<String>,
        active_concepts: &[String],
        response_text: impl Into<String>,
    ) {
        self.buffer.push_back(RecencyEntry {
            turn_number,
            input_text: input_text.into(),
            active_concepts: active_concepts.to_vec(),
            response_text: response_text.into(),
        });
        while self.buffer.len() > self.capacity {
            self.buffer.pop_front();
        }
    }

    /// Up to `n` most recent entries, oldest first.
    #[must_use]
    pub fn get_recent(&self, n: usize) -> Vec<&RecencyEntry> {
        let skip = self.buffer.len().saturating_sub(n);
        self.buffer.iter().skip(skip).collect()
    }

    /// Union of active concepts across every buffered turn.
    #[must_use]
    pub fn get_primed_concepts(&self) -> BTreeSet<String> {
        self.buffer
            .iter()
            .flat_map(|entry| entry.active_concepts.iter().cloned())
            .collect()
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffered turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no turn has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for RecencyMemory {
    fn default() -> Self {
        Self::new(5)
    }
}
