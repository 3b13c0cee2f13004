//! CLI for the corpus-rag pipeline
//!
//! Run with: cargo run --bin rag -- <command>

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corpus_rag::{AnswerRequest, RagConfig, RagEngine, SearchRequest, TrainRequest};

#[derive(Parser)]
#[command(name = "rag", version, about = "Retrieval-augmented Q&A over a local corpus")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest the corpus directory into a collection
    Train {
        /// Corpus directory to ingest
        #[arg(long)]
        corpus: Option<PathBuf>,
        /// Target collection
        #[arg(long)]
        collection: Option<String>,
        /// Embedding model
        #[arg(long)]
        embed_model: Option<String>,
        /// Chunk window size in characters
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Overlap between windows in characters
        #[arg(long)]
        overlap: Option<usize>,
        /// Keep the prior collection and upsert into it
        #[arg(long)]
        no_reset: bool,
    },
    /// Similarity search without answer generation
    Search {
        /// The query text
        query: String,
        #[arg(long)]
        collection: Option<String>,
        #[arg(long)]
        embed_model: Option<String>,
        /// Number of results
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Ask a question grounded in the indexed corpus
    Ask {
        /// The question
        query: String,
        #[arg(long)]
        collection: Option<String>,
        #[arg(long)]
        embed_model: Option<String>,
        #[arg(long)]
        chat_model: Option<String>,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Show the chunk count of a collection
    Status {
        #[arg(long)]
        collection: Option<String>,
    },
    /// Delete a collection
    Reset {
        #[arg(long)]
        collection: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corpus_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RagConfig::from_file(path)?,
        None => RagConfig::default(),
    };

    let engine = RagEngine::new(config)?;

    match cli.command {
        Command::Train {
            corpus,
            collection,
            embed_model,
            chunk_size,
            overlap,
            no_reset,
        } => {
            let report = engine
                .train(&TrainRequest {
                    corpus_dir: corpus,
                    collection,
                    embed_model,
                    chunk_size,
                    overlap,
                    reset: !no_reset,
                })
                .await?;
            print_json(&report)?;
        }
        Command::Search {
            query,
            collection,
            embed_model,
            top_k,
        } => {
            let report = engine
                .search(&SearchRequest {
                    query,
                    collection,
                    embed_model,
                    top_k,
                })
                .await?;
            print_json(&report)?;
        }
        Command::Ask {
            query,
            collection,
            embed_model,
            chat_model,
            top_k,
        } => {
            let report = engine
                .answer(&AnswerRequest {
                    query,
                    collection,
                    embed_model,
                    chat_model,
                    top_k,
                })
                .await?;
            print_json(&report)?;
        }
        Command::Status { collection } => {
            let report = engine.status(collection.as_deref())?;
            print_json(&report)?;
        }
        Command::Reset { collection } => {
            let report = engine.reset(collection.as_deref())?;
            print_json(&report)?;
        }
    }

    Ok(())
}
