//! Application settings.
//!
//! Layered config: defaults -> config file -> env vars. Component-level
//! tuning (chunking thresholds, phrase scoring) lives with the component
//! crates; this is the pipeline-level surface.

use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Character length at which a document enters the recursive path.
    /// Shorter documents are processed as a single chunk.
    #[serde(default = "default_recursion_char_threshold")]
    pub recursion_char_threshold: usize,

    /// Path to the HNSW vector index directory
    #[serde(default = "default_vector_index_path")]
    pub vector_index_path: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_recursion_char_threshold() -> usize {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_vector_index_path() -> String {
    ProjectDirs::from("", "", "textgraph")
        .map(|p| p.data_local_dir().join("vector-index"))
        .unwrap_or_else(|| PathBuf::from("./vector-index"))
        .to_string_lossy()
        .to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recursion_char_threshold: default_recursion_char_threshold(),
            vector_index_path: default_vector_index_path(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/textgraph/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (TEXTGRAPH_*)
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, GraphError> {
        let config_dir = ProjectDirs::from("", "", "textgraph")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default(
                "recursion_char_threshold",
                default_recursion_char_threshold() as i64,
            )
            .map_err(|e| GraphError::Config(e.to_string()))?
            .set_default("vector_index_path", default_vector_index_path())
            .map_err(|e| GraphError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| GraphError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let settings = builder
            .add_source(Environment::with_prefix("TEXTGRAPH").separator("__"))
            .build()
            .map_err(|e| GraphError::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| GraphError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.recursion_char_threshold, 2000);
        assert_eq!(settings.log_level, "info");
        assert!(!settings.vector_index_path.is_empty());
    }

    #[test]
    fn test_load_without_config_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.recursion_char_threshold, 2000);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(
            settings.recursion_char_threshold,
            parsed.recursion_char_threshold
        );
    }
}
