//! Configuration for the Neuron Conversation Engine.
//!
//! Maps directly to `nce.toml`. Every section and every field is optional;
//! missing values fall back to the engine's reference tuning.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{NceError, Result};

/// Top-level NCE configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NceConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Spreading-activation and scoring parameters.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Recency and episode memory limits.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl NceConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `NceError::Config` if the TOML is invalid or fails validation.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| NceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    /// Returns `NceError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.memory.recency_capacity == 0 {
            return Err(NceError::Config("memory.recency_capacity must be >= 1".into()));
        }
        if self.memory.max_episodes == 0 {
            return Err(NceError::Config("memory.max_episodes must be >= 1".into()));
        }
        if !self.engine.decay.is_finite() {
            return Err(NceError::Config("engine.decay must be a finite number".into()));
        }
        if let Some((name, _)) = self.engine.modulators.iter().find(|(_, v)| !v.is_finite()) {
            return Err(NceError::Config(format!(
                "engine.modulators.{name} must be a finite number"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Spreading-activation and response-scoring parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of synchronous spreading steps per turn.
    #[serde(default = "default_spread_steps")]
    pub spread_steps: u32,
    /// Per-step decay base; excitatory deltas at step `s` scale by `decay^s`.
    #[serde(default = "default_decay")]
    pub decay: f64,
    /// Nodes at or below this activation neither emit nor count as active.
    #[serde(default = "default_activation_threshold")]
    pub activation_threshold: f64,
    /// Boost added to concepts primed by recent turns.
    #[serde(default = "default_priming_boost")]
    pub priming_boost: f64,
    /// Scale applied to inhibitory deltas.
    #[serde(default = "default_inhibition_scale")]
    pub inhibition_scale: f64,
    /// Score bonus per point of rule priority.
    #[serde(default = "default_priority_weight")]
    pub priority_weight: f64,
    /// Named multipliers; their product scales every delta of a turn.
    #[serde(default = "default_modulators")]
    pub modulators: BTreeMap<String, f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            spread_steps: default_spread_steps(),
            decay: default_decay(),
            activation_threshold: default_activation_threshold(),
            priming_boost: default_priming_boost(),
            inhibition_scale: default_inhibition_scale(),
            priority_weight: default_priority_weight(),
            modulators: default_modulators(),
        }
    }
}

/// Memory capacity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// How many recent turns feed priming.
    #[serde(default = "default_recency_capacity")]
    pub recency_capacity: usize,
    /// Hard cap on stored episodes (oldest evicted first).
    #[serde(default = "default_max_episodes")]
    pub max_episodes: usize,
    /// Default number of episodes returned by similarity recall.
    #[serde(default = "default_recall_top_k")]
    pub recall_top_k: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            recency_capacity: default_recency_capacity(),
            max_episodes: default_max_episodes(),
            recall_top_k: default_recall_top_k(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_spread_steps() -> u32 { 3 }
fn default_decay() -> f64 { 0.8 }
fn default_activation_threshold() -> f64 { 0.05 }
fn default_priming_boost() -> f64 { 0.3 }
fn default_inhibition_scale() -> f64 { 0.5 }
fn default_priority_weight() -> f64 { 0.01 }
fn default_recency_capacity() -> usize { 5 }
fn default_max_episodes() -> usize { 100 }
fn default_recall_top_k() -> usize { 3 }

fn default_modulators() -> BTreeMap<String, f64> {
    BTreeMap::from([("curiosity".to_string(), 1.0), ("urgency".to_string(), 1.0)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = NceConfig::from_toml("").unwrap();
        assert_eq!(config.engine.spread_steps, 3);
        assert!((config.engine.decay - 0.8).abs() < f64::EPSILON);
        assert!((config.engine.activation_threshold - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.memory.recency_capacity, 5);
        assert_eq!(config.memory.max_episodes, 100);
        assert_eq!(config.engine.modulators.len(), 2);
        assert_eq!(config.engine.modulators.get("curiosity"), Some(&1.0));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = NceConfig::from_toml(
            r#"
            [engine]
            spread_steps = 5

            [engine.modulators]
            curiosity = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.spread_steps, 5);
        assert!((config.engine.decay - 0.8).abs() < f64::EPSILON);
        // An explicit modulator table replaces the default one wholesale.
        assert_eq!(config.engine.modulators.len(), 1);
        assert_eq!(config.engine.modulators.get("curiosity"), Some(&1.5));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = NceConfig::from_toml("[memory]\nrecency_capacity = 0\n").unwrap_err();
        assert!(matches!(err, NceError::Config(msg) if msg.contains("recency_capacity")));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = NceConfig::from_toml("[engine\nspread_steps = ").unwrap_err();
        assert!(matches!(err, NceError::Config(_)));
    }
}
