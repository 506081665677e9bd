//! HNSW store implementation using usearch.
//!
//! Parameters tuned for quality over speed:
//! - M = 16 (connections per layer)
//! - ef_construction = 200 (build-time quality)
//! - ef_search = 100 (search-time quality)
//!
//! Payloads live in a JSON sidecar next to the index file; both are
//! rewritten on `save`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use usearch::{Index, IndexOptions, MetricKind, ScalarKind};

use graph_embeddings::Embedding;

use crate::error::VectorError;
use crate::store::{NodePayload, ScoredMatch, SearchFilter, VectorStore};

/// HNSW store configuration
#[derive(Debug, Clone)]
pub struct HnswConfig {
    /// Embedding dimension (must match model)
    pub dimension: usize,
    /// Number of connections per layer (M parameter)
    pub connectivity: usize,
    /// Build-time search depth (ef_construction)
    pub expansion_add: usize,
    /// Query-time search depth (ef_search)
    pub expansion_search: usize,
    /// Index directory path
    pub index_path: PathBuf,
    /// Maximum capacity (for pre-allocation)
    pub capacity: usize,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            dimension: 384, // all-MiniLM-L6-v2
            connectivity: 16,
            expansion_add: 200,
            expansion_search: 100,
            index_path: PathBuf::from("./vector-index"),
            capacity: 1_000_000,
        }
    }
}

impl HnswConfig {
    pub fn new(dimension: usize, index_path: impl Into<PathBuf>) -> Self {
        Self {
            dimension,
            index_path: index_path.into(),
            ..Default::default()
        }
    }
}

/// Point registry persisted as the JSON sidecar.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PointRegistry {
    /// Point id -> usearch key
    keys: HashMap<String, u64>,
    /// usearch key -> payload
    payloads: HashMap<u64, NodePayload>,
    /// Next key to assign
    next_key: u64,
}

/// HNSW-backed vector store.
pub struct HnswStore {
    index: RwLock<Index>,
    registry: RwLock<PointRegistry>,
    config: HnswConfig,
}

impl HnswStore {
    /// Create a new store or open an existing one.
    pub fn open_or_create(config: HnswConfig) -> Result<Self, VectorError> {
        let index_file = config.index_path.join("hnsw.usearch");

        let options = IndexOptions {
            dimensions: config.dimension,
            metric: MetricKind::Cos,
            quantization: ScalarKind::F32,
            connectivity: config.connectivity,
            expansion_add: config.expansion_add,
            expansion_search: config.expansion_search,
            multi: false,
        };

        let index = if index_file.exists() {
            info!(path = ?index_file, "Opening existing vector index");
            let idx = Index::new(&options).map_err(|e| VectorError::Index(e.to_string()))?;
            idx.load(
                index_file
                    .to_str()
                    .ok_or_else(|| VectorError::Index("Invalid path encoding".to_string()))?,
            )
            .map_err(|e| VectorError::Index(format!("Failed to load: {}", e)))?;
            idx
        } else {
            info!(path = ?index_file, dim = config.dimension, "Creating new vector index");
            std::fs::create_dir_all(&config.index_path)?;
            let idx = Index::new(&options).map_err(|e| VectorError::Index(e.to_string()))?;
            idx.reserve(config.capacity)
                .map_err(|e| VectorError::Index(e.to_string()))?;
            idx
        };

        let registry_file = config.index_path.join("payloads.json");
        let registry = if registry_file.exists() {
            serde_json::from_str(&std::fs::read_to_string(&registry_file)?)?
        } else {
            PointRegistry::default()
        };

        Ok(Self {
            index: RwLock::new(index),
            registry: RwLock::new(registry),
            config,
        })
    }

    /// Persist the index and payload sidecar to disk.
    pub fn save(&self) -> Result<(), VectorError> {
        let index_file = self.config.index_path.join("hnsw.usearch");
        let index = self.index.read().map_err(|_| VectorError::Poisoned)?;
        index
            .save(
                index_file
                    .to_str()
                    .ok_or_else(|| VectorError::Index("Invalid path encoding".to_string()))?,
            )
            .map_err(|e| VectorError::Index(e.to_string()))?;

        let registry = self.registry.read().map_err(|_| VectorError::Poisoned)?;
        let registry_file = self.config.index_path.join("payloads.json");
        std::fs::write(&registry_file, serde_json::to_string(&*registry)?)?;
        debug!(points = registry.keys.len(), "Saved vector store");
        Ok(())
    }
}

impl VectorStore for HnswStore {
    #[allow(clippy::readonly_write_lock)] // usearch::Index uses interior mutability
    fn upsert(
        &self,
        id: &str,
        vector: &Embedding,
        payload: NodePayload,
    ) -> Result<(), VectorError> {
        if vector.dimension() != self.config.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.config.dimension,
                actual: vector.dimension(),
            });
        }

        let mut registry = self.registry.write().map_err(|_| VectorError::Poisoned)?;
        let index = self.index.write().map_err(|_| VectorError::Poisoned)?;

        let key = match registry.keys.get(id).copied() {
            Some(key) => {
                // Replace: usearch updates in place when the key exists.
                index
                    .remove(key)
                    .map_err(|e| VectorError::Index(e.to_string()))?;
                key
            }
            None => {
                let key = registry.next_key;
                registry.next_key += 1;
                registry.keys.insert(id.to_string(), key);
                key
            }
        };

        index
            .add(key, &vector.values)
            .map_err(|e| VectorError::Index(e.to_string()))?;
        registry.payloads.insert(key, payload);

        debug!(id, key, "Upserted vector");
        Ok(())
    }

    fn search(
        &self,
        vector: &Embedding,
        limit: usize,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<ScoredMatch>, VectorError> {
        if vector.dimension() != self.config.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.config.dimension,
                actual: vector.dimension(),
            });
        }

        let index = self.index.read().map_err(|_| VectorError::Poisoned)?;
        let registry = self.registry.read().map_err(|_| VectorError::Poisoned)?;

        // Over-fetch when filtering, since matches are dropped afterward.
        let fetch = if filter.is_some() { limit * 4 } else { limit };
        let results = index
            .search(&vector.values, fetch.max(limit))
            .map_err(|e| VectorError::Index(e.to_string()))?;

        let id_of: HashMap<u64, &String> =
            registry.keys.iter().map(|(id, &key)| (key, id)).collect();

        let mut matches = Vec::new();
        for (key, distance) in results.keys.iter().zip(results.distances.iter()) {
            let Some(payload) = registry.payloads.get(key) else {
                continue;
            };
            if let Some(f) = filter {
                if !f.matches(payload) {
                    continue;
                }
            }
            let Some(id) = id_of.get(key) else { continue };
            matches.push(ScoredMatch {
                id: (*id).clone(),
                // usearch returns cosine distance; flip to similarity.
                score: 1.0 - distance,
                payload: payload.clone(),
            });
            if matches.len() == limit {
                break;
            }
        }

        Ok(matches)
    }

    fn len(&self) -> usize {
        self.registry.read().map(|r| r.keys.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir, dim: usize) -> HnswStore {
        HnswStore::open_or_create(HnswConfig::new(dim, dir.path())).unwrap()
    }

    fn emb(values: &[f32]) -> Embedding {
        Embedding::new(values.to_vec())
    }

    #[test]
    fn test_upsert_and_search() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 4);

        store
            .upsert(
                "a",
                &emb(&[1.0, 0.0, 0.0, 0.0]),
                NodePayload::new("a", "first", "doc-1"),
            )
            .unwrap();
        store
            .upsert(
                "b",
                &emb(&[0.0, 1.0, 0.0, 0.0]),
                NodePayload::new("b", "second", "doc-1"),
            )
            .unwrap();

        let matches = store
            .search(&emb(&[1.0, 0.1, 0.0, 0.0]), 2, None)
            .unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "a");
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 4);
        let result = store.upsert(
            "a",
            &emb(&[1.0, 0.0]),
            NodePayload::new("a", "first", "doc-1"),
        );
        assert!(matches!(
            result,
            Err(VectorError::DimensionMismatch { expected: 4, actual: 2 })
        ));
    }

    #[test]
    fn test_upsert_same_id_replaces() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 4);
        store
            .upsert(
                "a",
                &emb(&[1.0, 0.0, 0.0, 0.0]),
                NodePayload::new("a", "old", "doc-1"),
            )
            .unwrap();
        store
            .upsert(
                "a",
                &emb(&[0.0, 1.0, 0.0, 0.0]),
                NodePayload::new("a", "new", "doc-1"),
            )
            .unwrap();
        assert_eq!(store.len(), 1);

        let matches = store.search(&emb(&[0.0, 1.0, 0.0, 0.0]), 1, None).unwrap();
        assert_eq!(matches[0].payload.description, "new");
    }

    #[test]
    fn test_filtered_search() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir, 4);
        store
            .upsert(
                "a",
                &emb(&[1.0, 0.0, 0.0, 0.0]),
                NodePayload::new("a", "x", "doc-1"),
            )
            .unwrap();
        store
            .upsert(
                "b",
                &emb(&[1.0, 0.0, 0.0, 0.0]),
                NodePayload::new("b", "y", "doc-2"),
            )
            .unwrap();

        let filter = SearchFilter::for_source("doc-2");
        let matches = store
            .search(&emb(&[1.0, 0.0, 0.0, 0.0]), 5, Some(&filter))
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "b");
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = store(&dir, 4);
            store
                .upsert(
                    "a",
                    &emb(&[1.0, 0.0, 0.0, 0.0]),
                    NodePayload::new("a", "persisted", "doc-1"),
                )
                .unwrap();
            store.save().unwrap();
        }

        let reopened = store(&dir, 4);
        assert_eq!(reopened.len(), 1);
        let matches = reopened
            .search(&emb(&[1.0, 0.0, 0.0, 0.0]), 1, None)
            .unwrap();
        assert_eq!(matches[0].payload.description, "persisted");
    }
}
