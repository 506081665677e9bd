//! textgraph ingestion CLI
//!
//! Turns raw documents into a labeled knowledge graph and persists node
//! vectors for later retrieval.
//!
//! # Usage
//!
//! ```bash
//! graph-ingest ingest notes.txt --output graph.json
//! graph-ingest chunk notes.txt
//! graph-ingest search "interest rates" --limit 5
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/textgraph/config.toml)
//! 3. Environment variables (TEXTGRAPH_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use graph_ingest::{handle_chunk, handle_ingest, handle_search, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            ref path,
            ref source_id,
            ref output,
            offline,
        } => {
            handle_ingest(&cli, path, source_id.as_deref(), output.as_deref(), offline).await?;
        }
        Commands::Chunk { ref path } => {
            handle_chunk(&cli, path)?;
        }
        Commands::Search {
            ref query,
            limit,
            ref source_id,
            offline,
        } => {
            handle_search(&cli, query, limit, source_id.as_deref(), offline)?;
        }
    }

    Ok(())
}
