//! # NCE Core Library
//!
//! The Neuron Conversation Engine models "understanding" as activation
//! spreading across a weighted concept graph:
//!
//! - **Graph**: concept / emotion / drive / response nodes joined by
//!   excitatory and inhibitory edges ([`ConceptGraph`])
//! - **Engine**: seeding, priming, multi-step spreading and response-rule
//!   scoring ([`ActivationEngine`])
//! - **Recency**: the last few turns, whose concepts prime the next one
//! - **Episodes**: a bounded store of past turns recalled by Jaccard
//!   similarity
//! - **Session**: one conversation: text in, realised response and a
//!   [`ThoughtTrace`] out
//!
//! ## Determinism Contract
//!
//! Given the same graph, seeds, priming set and modulators, a turn produces
//! a byte-identical trace. Nodes are visited in insertion order and trace
//! values are rounded to four decimal places.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod graph;
pub mod memory;
pub mod metrics;
pub mod realize;
pub mod resolve;
pub mod session;
pub mod trace;

pub use config::NceConfig;
pub use engine::{ActivationEngine, TurnOutcome};
pub use error::NceError;
pub use graph::{ConceptGraph, Edge, EdgeType, Node, ResponseRule};
pub use memory::{Episode, EpisodeMemory, RecencyEntry, RecencyMemory};
pub use session::{Session, TurnReport};
pub use trace::ThoughtTrace;
