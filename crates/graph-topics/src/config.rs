//! Topic model configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the LDA topic model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicModelConfig {
    /// Number of latent topics
    #[serde(default = "default_num_topics")]
    pub num_topics: usize,

    /// Gibbs sampling sweeps over the corpus
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Random seed for reproducible training
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Symmetric document-topic prior
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Symmetric topic-term prior
    #[serde(default = "default_beta")]
    pub beta: f64,
}

fn default_num_topics() -> usize {
    5
}
fn default_iterations() -> usize {
    100
}
fn default_seed() -> u64 {
    8
}
fn default_alpha() -> f64 {
    0.1
}
fn default_beta() -> f64 {
    0.01
}

impl Default for TopicModelConfig {
    fn default() -> Self {
        Self {
            num_topics: default_num_topics(),
            iterations: default_iterations(),
            seed: default_seed(),
            alpha: default_alpha(),
            beta: default_beta(),
        }
    }
}

impl TopicModelConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_topics == 0 {
            return Err("num_topics must be > 0".to_string());
        }
        if self.iterations == 0 {
            return Err("iterations must be > 0".to_string());
        }
        if self.alpha <= 0.0 || self.beta <= 0.0 {
            return Err("alpha and beta must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TopicModelConfig::default();
        assert_eq!(config.num_topics, 5);
        assert_eq!(config.seed, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_topics() {
        let config = TopicModelConfig {
            num_topics: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
