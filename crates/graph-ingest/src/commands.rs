//! Command handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use walkdir::WalkDir;

use graph_embeddings::{EmbeddingModel, HashEmbedder, SentenceEmbedder};
use graph_pipeline::{GraphComponents, GraphPipeline, PipelineOptions};
use graph_segment::EnglishPhraseTokenizer;
use graph_types::Settings;
use graph_vector::{HnswConfig, HnswStore, SearchFilter, VectorStore};

use crate::cli::Cli;

/// Embedding dimension of the offline feature-hash embedder.
const OFFLINE_DIM: usize = 64;

/// Load settings and initialize tracing.
fn init(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    // Ignore the error if a subscriber is already set (tests).
    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(settings)
}

/// Build the embedding model.
fn build_embedder(offline: bool) -> Result<Arc<dyn EmbeddingModel>> {
    if offline {
        return Ok(Arc::new(HashEmbedder::new(OFFLINE_DIM)));
    }
    let embedder = SentenceEmbedder::load_default().context("loading embedding model")?;
    Ok(Arc::new(embedder))
}

/// Open the vector store matching the embedder's dimension.
fn build_store(settings: &Settings, model: &Arc<dyn EmbeddingModel>) -> Result<Arc<HnswStore>> {
    let config = HnswConfig::new(model.info().dimension, &settings.vector_index_path);
    let store = HnswStore::open_or_create(config).context("opening vector store")?;
    Ok(Arc::new(store))
}

fn build_pipeline(
    settings: &Settings,
    model: Arc<dyn EmbeddingModel>,
    store: Arc<HnswStore>,
) -> GraphPipeline<EnglishPhraseTokenizer> {
    let options = PipelineOptions {
        recursion_char_threshold: Some(settings.recursion_char_threshold),
        ..Default::default()
    };
    GraphPipeline::new(EnglishPhraseTokenizer::new(), model, store, options)
}

/// Collect the documents under a path: the file itself, or every regular
/// file in a directory tree.
fn collect_documents(path: &Path) -> Result<Vec<std::path::PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

/// Source id for a document: the file stem.
fn derive_source_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string())
}

/// Ingest one file or a directory of files.
pub async fn handle_ingest(
    cli: &Cli,
    path: &Path,
    source_id: Option<&str>,
    output: Option<&Path>,
    offline: bool,
) -> Result<()> {
    let settings = init(cli)?;
    let model = build_embedder(offline)?;
    let store = build_store(&settings, &model)?;
    let pipeline = build_pipeline(&settings, model, Arc::clone(&store));

    let documents = collect_documents(path)?;
    if documents.is_empty() {
        warn!(path = %path.display(), "nothing to ingest");
        return Ok(());
    }

    let mut combined = GraphComponents::default();
    for doc_path in &documents {
        let text = std::fs::read_to_string(doc_path)
            .with_context(|| format!("reading {}", doc_path.display()))?;
        let id = match source_id {
            Some(id) if documents.len() == 1 => id.to_string(),
            _ => derive_source_id(doc_path),
        };

        info!(source_id = %id, path = %doc_path.display(), "ingesting document");
        let components = pipeline.extract_graph_components(&text, &id).await;
        info!(
            source_id = %id,
            nodes = components.nodes.len(),
            edges = components.edges.len(),
            "document ingested"
        );
        combined.nodes.extend(components.nodes);
        combined.edges.extend(components.edges);
    }

    store.save().context("saving vector store")?;

    let json = serde_json::to_string_pretty(&combined)?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(output = %path.display(), "graph written");
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Print the recursive chunking of a document.
pub fn handle_chunk(cli: &Cli, path: &Path) -> Result<()> {
    let settings = init(cli)?;
    // Chunking never embeds or persists; the offline embedder and a
    // throwaway store keep startup cheap.
    let model: Arc<dyn EmbeddingModel> = Arc::new(HashEmbedder::new(OFFLINE_DIM));
    let store = Arc::new(graph_vector::InMemoryStore::new());
    let options = PipelineOptions {
        recursion_char_threshold: Some(settings.recursion_char_threshold),
        ..Default::default()
    };
    let pipeline = GraphPipeline::new(EnglishPhraseTokenizer::new(), model, store, options);

    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let chunks = pipeline.manual_chunking(&text);

    for (i, chunk) in chunks.iter().enumerate() {
        println!("--- chunk {} ---", i);
        println!("{}", chunk);
    }
    info!(chunks = chunks.len(), "chunking complete");
    Ok(())
}

/// Search ingested nodes by semantic similarity.
pub fn handle_search(
    cli: &Cli,
    query: &str,
    limit: usize,
    source_id: Option<&str>,
    offline: bool,
) -> Result<()> {
    let settings = init(cli)?;
    let model = build_embedder(offline)?;
    let store = build_store(&settings, &model)?;

    let vector = model.embed(query).context("embedding query")?;
    let filter = source_id.map(SearchFilter::for_source);
    let matches = store.search(&vector, limit, filter.as_ref())?;

    if matches.is_empty() {
        println!("no matches");
        return Ok(());
    }
    for m in matches {
        println!(
            "{:.4}  {}  [{}]  {}",
            m.score, m.payload.name, m.payload.source_id, m.payload.description
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_source_id() {
        assert_eq!(derive_source_id(Path::new("/tmp/notes.txt")), "notes");
        assert_eq!(derive_source_id(Path::new("report.md")), "report");
    }

    #[test]
    fn test_collect_documents_single_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "hello").unwrap();

        let docs = collect_documents(&file).unwrap();
        assert_eq!(docs, vec![file]);
    }

    #[test]
    fn test_collect_documents_directory_sorted() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let docs = collect_documents(dir.path()).unwrap();
        let names: Vec<String> = docs.iter().map(|p| derive_source_id(p)).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
