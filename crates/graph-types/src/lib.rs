//! # graph-types
//!
//! Shared data model for the textgraph ingestion pipeline.
//!
//! This crate defines the graph artifacts (nodes, edges) handed to the
//! external graph store, the sentence/chunk types threaded through the
//! recursive chunker, and the layered application settings.

pub mod config;
pub mod error;
pub mod node;
pub mod sentence;

pub use config::Settings;
pub use error::GraphError;
pub use node::{
    Edge, Node, NodeDescription, NodeKind, OriginalSentence, ABSTRACT_MARKER, RELATION_RELATED,
};
pub use sentence::{LeafChunk, Sentence};
