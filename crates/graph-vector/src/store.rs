//! Vector store trait and payload types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use graph_embeddings::Embedding;

use crate::error::VectorError;

/// Descriptive payload persisted alongside a node vector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodePayload {
    /// Node name (may carry the abstract marker)
    pub name: String,
    /// Description text the vector was computed from
    pub description: String,
    /// Source document identifier
    pub source_id: String,
    /// When the point was written
    pub created_at: DateTime<Utc>,
}

impl NodePayload {
    /// Create a payload stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            source_id: source_id.into(),
            created_at: Utc::now(),
        }
    }
}

/// Search filter over payload fields.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Restrict matches to one source document
    pub source_id: Option<String>,
}

impl SearchFilter {
    /// Filter by source document.
    pub fn for_source(source_id: impl Into<String>) -> Self {
        Self {
            source_id: Some(source_id.into()),
        }
    }

    /// Whether a payload passes the filter.
    pub fn matches(&self, payload: &NodePayload) -> bool {
        match &self.source_id {
            Some(source_id) => payload.source_id == *source_id,
            None => true,
        }
    }
}

/// One ranked search result.
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    /// Point identifier
    pub id: String,
    /// Cosine similarity to the query (higher = closer)
    pub score: f32,
    /// Stored payload
    pub payload: NodePayload,
}

/// Trait for vector stores.
///
/// Implementations must be thread-safe; writes come only from the
/// single-threaded ingestion driver, but searches may run concurrently.
pub trait VectorStore: Send + Sync {
    /// Insert or replace a point.
    fn upsert(
        &self,
        id: &str,
        vector: &Embedding,
        payload: NodePayload,
    ) -> Result<(), VectorError>;

    /// Search for the nearest points, best first.
    fn search(
        &self,
        vector: &Embedding,
        limit: usize,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<ScoredMatch>, VectorError>;

    /// Number of stored points.
    fn len(&self) -> usize;

    /// Whether the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches_source() {
        let payload = NodePayload::new("inflation", "Prices rose.", "doc-1");
        assert!(SearchFilter::for_source("doc-1").matches(&payload));
        assert!(!SearchFilter::for_source("doc-2").matches(&payload));
        assert!(SearchFilter::default().matches(&payload));
    }

    #[test]
    fn test_payload_serialization_roundtrip() {
        let payload = NodePayload::new("inflation", "Prices rose.", "doc-1");
        let json = serde_json::to_string(&payload).unwrap();
        let parsed: NodePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(payload, parsed);
    }
}
