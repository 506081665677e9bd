//! # graph-ingest
//!
//! CLI for the textgraph ingestion pipeline.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{handle_chunk, handle_ingest, handle_search};
