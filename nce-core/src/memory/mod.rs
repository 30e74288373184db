//! Conversational memory: the two stores that feed past turns back into
//! the engine.
//!
//! - **Recency** ("What was just said"): a ring buffer of the last few
//!   turns whose concepts prime the next one.
//! - **Episodic** ("What happened before"): a bounded FIFO of concept
//!   episodes answering Jaccard-similarity queries.

pub mod episodic;
pub mod recency;

pub use episodic::{Episode, EpisodeMemory};
pub use recency::{RecencyEntry, RecencyMemory};
