//! # graph-pipeline
//!
//! End-to-end document-to-graph orchestration: segmentation, the length
//! gate, recursive chunking, per-chunk TF-IDF, terminal phrase
//! extraction, and node persistence.

pub mod pipeline;

pub use pipeline::{GraphComponents, GraphPipeline, PipelineOptions};
