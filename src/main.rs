// law_ingestor/src/main.rs
// Entry point for the law_ingestor CLI application.

use std::sync::Arc;

use clap::Parser;
use law_ingestor::cli::{Cli, EmbeddingProvider, PacingMode};
use law_ingestor::embeddings::{Embedder, HuggingFaceEmbedder, OpenAIEmbedder};
use law_ingestor::error::{IngestorError, Result};
use law_ingestor::ingestor::{IngestSummary, Ingestor};
use law_ingestor::pacing::{AdaptiveBackoff, FixedDelay, Pacer};
use law_ingestor::qdrant::QdrantIndex;
use law_ingestor::source::RecordSource;
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const REPORT_PATH: &str = "ingestion_report.json";

#[tokio::main]
async fn main() -> Result<(),> {
    // Initialize tracing
    let file_appender = tracing_appender::rolling::never(".", "ingestor.log",);
    let (non_blocking, _guard,) = tracing_appender::non_blocking(file_appender,);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),),)
        .with(fmt::layer().with_writer(std::io::stderr,),)
        .with(fmt::layer().with_writer(non_blocking,).with_ansi(false,),)
        .init();

    let cli = Cli::parse();

    let res = run(&cli,).await;
    match &res {
        Ok(summary,) if cli.report => save_report(summary,)?,
        Ok(_,) => {},
        Err(e,) => error!(error = %e, "Ingestion aborted before processing records"),
    }

    res.map(|_| (),)
}

async fn run(cli: &Cli,) -> Result<IngestSummary,> {
    cli.validate()?;

    let source = RecordSource::open(&cli.path,)?;
    let index = QdrantIndex::connect(&cli.qdrant_url, &cli.qdrant_api_key,).await?;

    let embedder: Arc<dyn Embedder,> = match cli.embedding_provider {
        EmbeddingProvider::Huggingface => Arc::new(HuggingFaceEmbedder::new(
            cli.embedding_api_key.clone(),
            cli.embedding_model.clone(),
            cli.embedding_url.clone(),
        ),),
        EmbeddingProvider::Openai => Arc::new(OpenAIEmbedder::new(
            cli.embedding_api_key.clone(),
            cli.embedding_model.clone(),
            cli.embedding_url.clone(),
            cli.embedding_dimensions,
        ),),
    };

    let pacer: Arc<dyn Pacer,> = match cli.pacing {
        PacingMode::Fixed => Arc::new(FixedDelay::new(cli.delay(),),),
        PacingMode::Adaptive => Arc::new(AdaptiveBackoff::new(cli.delay(), cli.max_delay(),),),
    };

    info!(
        collection = %cli.collection_name,
        provider = ?cli.embedding_provider,
        identity = ?cli.identity,
        "Starting ingestion"
    );

    let ingestor = Ingestor::new(cli.ingestor_config(), embedder, Arc::new(index,), pacer,);
    ingestor.execute(source.into_stream(),).await
}

fn save_report(summary: &IngestSummary,) -> Result<(),> {
    let json = serde_json::to_string_pretty(summary,).map_err(|e| {
        IngestorError::Other(format!("Failed to serialize ingestion report: {}", e),)
    },)?;
    std::fs::write(REPORT_PATH, json,).map_err(|e| {
        IngestorError::Other(format!("Failed to write {}: {}", REPORT_PATH, e),)
    },)?;
    info!("Ingestion report saved to {}", REPORT_PATH);
    Ok((),)
}
