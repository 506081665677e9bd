//! In-memory vector store.
//!
//! Linear-scan search over a point map. Backs tests and small offline
//! runs; the HNSW store is the production implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use graph_embeddings::Embedding;

use crate::error::VectorError;
use crate::store::{NodePayload, ScoredMatch, SearchFilter, VectorStore};

/// Vector store holding every point in memory.
#[derive(Default)]
pub struct InMemoryStore {
    points: RwLock<HashMap<String, (Embedding, NodePayload)>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl VectorStore for InMemoryStore {
    fn upsert(
        &self,
        id: &str,
        vector: &Embedding,
        payload: NodePayload,
    ) -> Result<(), VectorError> {
        let mut points = self.points.write().map_err(|_| VectorError::Poisoned)?;
        points.insert(id.to_string(), (vector.clone(), payload));
        Ok(())
    }

    fn search(
        &self,
        vector: &Embedding,
        limit: usize,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<ScoredMatch>, VectorError> {
        let points = self.points.read().map_err(|_| VectorError::Poisoned)?;

        let mut matches: Vec<ScoredMatch> = points
            .iter()
            .filter(|(_, (_, payload))| filter.map(|f| f.matches(payload)).unwrap_or(true))
            .map(|(id, (emb, payload))| ScoredMatch {
                id: id.clone(),
                score: vector.cosine_similarity(emb),
                payload: payload.clone(),
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        matches.truncate(limit);
        Ok(matches)
    }

    fn len(&self) -> usize {
        self.points.read().map(|p| p.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emb(values: &[f32]) -> Embedding {
        Embedding::new(values.to_vec())
    }

    #[test]
    fn test_upsert_and_search() {
        let store = InMemoryStore::new();
        store
            .upsert(
                "a",
                &emb(&[1.0, 0.0]),
                NodePayload::new("a", "first", "doc-1"),
            )
            .unwrap();
        store
            .upsert(
                "b",
                &emb(&[0.0, 1.0]),
                NodePayload::new("b", "second", "doc-1"),
            )
            .unwrap();

        let matches = store.search(&emb(&[1.0, 0.1]), 2, None).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "a");
        assert!(matches[0].score > matches[1].score);
    }

    #[test]
    fn test_upsert_replaces() {
        let store = InMemoryStore::new();
        store
            .upsert("a", &emb(&[1.0, 0.0]), NodePayload::new("a", "old", "doc-1"))
            .unwrap();
        store
            .upsert("a", &emb(&[1.0, 0.0]), NodePayload::new("a", "new", "doc-1"))
            .unwrap();
        assert_eq!(store.len(), 1);

        let matches = store.search(&emb(&[1.0, 0.0]), 1, None).unwrap();
        assert_eq!(matches[0].payload.description, "new");
    }

    #[test]
    fn test_search_respects_filter() {
        let store = InMemoryStore::new();
        store
            .upsert("a", &emb(&[1.0, 0.0]), NodePayload::new("a", "x", "doc-1"))
            .unwrap();
        store
            .upsert("b", &emb(&[1.0, 0.0]), NodePayload::new("b", "y", "doc-2"))
            .unwrap();

        let filter = SearchFilter::for_source("doc-2");
        let matches = store.search(&emb(&[1.0, 0.0]), 10, Some(&filter)).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "b");
    }

    #[test]
    fn test_search_limit() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .upsert(
                    &format!("p{}", i),
                    &emb(&[1.0, i as f32]),
                    NodePayload::new("n", "d", "doc-1"),
                )
                .unwrap();
        }
        let matches = store.search(&emb(&[1.0, 0.0]), 3, None).unwrap();
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_empty_store() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        assert!(store.search(&emb(&[1.0]), 5, None).unwrap().is_empty());
    }
}
