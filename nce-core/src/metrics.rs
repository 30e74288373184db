//! Turn Metrics & Instrumentation
//!
//! Two kinds of numbers describe a turn:
//! - [`TurnCounters`] are produced by the activation engine itself and are
//!   deterministic (nodes seeded, edges traversed, steps executed).
//! - [`StageProfiler`] measures wall-clock time per pipeline stage. It is
//!   owned by the session, reset at the start of every turn, and never
//!   influences the computation.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::trace::round4;

/// Deterministic work counters for one turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCounters {
    /// Recognised concepts that resolved to a node and were seeded.
    pub activated_nodes: u64,
    /// Edges whose target exists and that carried a delta.
    pub traversed_edges: u64,
    /// Spreading steps completed.
    pub steps_executed: u64,
}

/// Wall-clock timer for named pipeline stages.
#[derive(Debug, Default)]
pub struct StageProfiler {
    /// Completed stages, in first-finished order, with cumulative time.
    timings: Vec<(&'static str, Duration)>,
    /// Stages currently running.
    running: Vec<(&'static str, Instant)>,
}

impl StageProfiler {
    /// Create an empty profiler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the beginning of a named stage.
    pub fn start_stage(&mut self, name: &'static str) {
        self.running.retain(|(n, _)| *n != name);
        self.running.push((name, Instant::now()));
    }

    /// Mark the end of a named stage and accumulate its elapsed time.
    ///
    /// Ending a stage that was never started is a no-op.
    pub fn end_stage(&mut self, name: &'static str) {
        let Some(pos) = self.running.iter().position(|(n, _)| *n == name) else {
            return;
        };
        let (_, started) = self.running.remove(pos);
        let elapsed = started.elapsed();
        match self.timings.iter_mut().find(|(n, _)| *n == name) {
            Some((_, total)) => *total += elapsed,
            None => self.timings.push((name, elapsed)),
        }
    }

    /// Run `f` as the named stage.
    pub fn time<T>(&mut self, name: &'static str, f: impl FnOnce() -> T) -> T {
        self.start_stage(name);
        let out = f();
        self.end_stage(name);
        out
    }

    /// Summarise timings (ms, 4 dp) together with the engine counters.
    #[must_use]
    pub fn report(&self, counters: TurnCounters) -> ProfileReport {
        ProfileReport {
            timings_ms: self
                .timings
                .iter()
                .map(|(name, d)| ((*name).to_string(), round4(d.as_secs_f64() * 1000.0)))
                .collect(),
            counters,
        }
    }

    /// Clear all accumulated data.
    pub fn reset(&mut self) {
        self.timings.clear();
        self.running.clear();
    }
}

/// Timings and counters of one turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileReport {
    /// `(stage, milliseconds)` in the order stages first completed.
    pub timings_ms: Vec<(String, f64)>,
    /// Engine counters.
    pub counters: TurnCounters,
}

impl ProfileReport {
    /// Format as a human-readable block.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = vec!["── Profiling ──".to_string()];
        for (stage, ms) in &self.timings_ms {
            lines.push(format!("  {stage:<12} {ms:>8.4} ms"));
        }
        lines.push(format!("  {:.<12} {}", "nodes", self.counters.activated_nodes));
        lines.push(format!("  {:.<12} {}", "edges", self.counters.traversed_edges));
        lines.push(format!("  {:.<12} {}", "steps", self.counters.steps_executed));
        lines.push("───────────────".to_string());
        lines.join("\n")
    }
}

/// Stage names used with [`StageProfiler`].
pub mod stages {
    /// Input tokenisation.
    pub const TOKENIZE: &str = "tokenize";
    /// Token → concept resolution.
    pub const ACTIVATE: &str = "activate";
    /// Spreading activation.
    pub const SPREAD: &str = "spread";
    /// Response rule scoring.
    pub const PLAN: &str = "plan";
    /// Surface realisation.
    pub const REALIZE: &str = "realize";
}
