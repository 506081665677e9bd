//! CLI argument parsing.
//!
//! CLI flags override all other config sources.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// textgraph ingestion CLI
///
/// Turns raw documents into a labeled knowledge graph.
#[derive(Parser, Debug)]
#[command(name = "graph-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/textgraph/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a document (or every file in a directory) into the graph
    Ingest {
        /// File or directory to ingest
        path: PathBuf,

        /// Source identifier (defaults to the file stem)
        #[arg(short, long)]
        source_id: Option<String>,

        /// Write the node/edge JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the offline feature-hash embedder instead of the local
        /// sentence-transformer model
        #[arg(long)]
        offline: bool,
    },

    /// Print the recursive chunking of a document without building a graph
    Chunk {
        /// File to chunk
        path: PathBuf,
    },

    /// Search previously ingested nodes by semantic similarity
    Search {
        /// Query text
        query: String,

        /// Maximum results
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,

        /// Restrict matches to one source document
        #[arg(short, long)]
        source_id: Option<String>,

        /// Use the offline feature-hash embedder (must match ingestion)
        #[arg(long)]
        offline: bool,
    },
}
