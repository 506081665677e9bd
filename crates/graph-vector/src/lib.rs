//! # graph-vector
//!
//! Vector persistence and semantic search for minted graph nodes.
//!
//! Every node created by the ingestion pipeline is upserted here with its
//! embedding and a descriptive payload; retrieval and question answering
//! search the same store later. The [`VectorStore`] trait is the seam; the
//! production implementation is an HNSW index (usearch) with a JSON
//! payload sidecar, and an in-memory store backs tests.

pub mod error;
pub mod hnsw;
pub mod memory;
pub mod store;

pub use error::VectorError;
pub use hnsw::{HnswConfig, HnswStore};
pub use memory::InMemoryStore;
pub use store::{NodePayload, ScoredMatch, SearchFilter, VectorStore};
