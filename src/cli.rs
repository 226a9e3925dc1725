// law_ingestor/src/cli.rs
// Command Line Interface (CLI) specific logic for law_ingestor.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::{IngestorError, Result};
use crate::identity::IdentityStrategy;
use crate::index::DistanceMetric;
use crate::ingestor::IngestorConfig;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq,)]
pub enum EmbeddingProvider {
    /// Hugging Face inference API (feature-extraction pipeline)
    Huggingface,
    /// OpenAI-compatible /v1/embeddings endpoint
    Openai,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq,)]
pub enum PacingMode {
    /// Constant pause after every embedded record
    Fixed,
    /// Constant pause plus exponential backoff on rate-limit responses
    Adaptive,
}

/// Embed law-section records and load them into a Qdrant collection.
#[derive(Parser, Debug,)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a .csv/.jsonl file or a directory of them
    #[clap(env = "LAW_DATA_PATH")]
    pub path: PathBuf,

    /// Token for the embedding service
    #[clap(long, env = "EMBEDDING_API_KEY", hide_env_values = true)]
    pub embedding_api_key: String,

    /// Qdrant endpoint
    #[clap(long, env = "QDRANT_URL")]
    pub qdrant_url: String,

    /// Qdrant API key
    #[clap(long, env = "QDRANT_API_KEY", hide_env_values = true)]
    pub qdrant_api_key: String,

    /// Name of the collection to ingest into
    #[clap(long, env = "COLLECTION_NAME", default_value = crate::DEFAULT_COLLECTION_NAME)]
    pub collection_name: String,

    /// Dimensionality of the embedding vectors
    #[clap(long, default_value_t = crate::DEFAULT_VECTOR_SIZE)]
    pub vector_size: u64,

    /// Distance metric used when the collection is created
    #[clap(long, value_enum, default_value_t = DistanceMetric::Cosine)]
    pub distance: DistanceMetric,

    #[clap(long, value_enum, default_value_t = EmbeddingProvider::Huggingface)]
    pub embedding_provider: EmbeddingProvider,

    /// Embedding model identifier (provider default when omitted)
    #[clap(long, env = "EMBEDDING_MODEL")]
    pub embedding_model: Option<String,>,

    /// Override the embedding service base URL
    #[clap(long, env = "EMBEDDING_URL")]
    pub embedding_url: Option<String,>,

    /// Output size requested from the OpenAI provider (not sent when omitted)
    #[clap(long, env = "EMBEDDING_DIMENSIONS")]
    pub embedding_dimensions: Option<u64,>,

    /// How point ids are assigned
    #[clap(long, value_enum, default_value_t = IdentityStrategy::Random)]
    pub identity: IdentityStrategy,

    #[clap(long, value_enum, default_value_t = PacingMode::Fixed)]
    pub pacing: PacingMode,

    /// Pause between embedded records, in milliseconds
    #[clap(long, default_value_t = crate::DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Upper bound for the adaptive backoff, in milliseconds
    #[clap(long, default_value_t = 60_000)]
    pub max_delay_ms: u64,

    /// Write the run summary to ingestion_report.json at the end.
    #[clap(long)]
    pub report: bool,
}

impl Cli {
    /// Checks values clap cannot check on its own.
    pub fn validate(&self,) -> Result<(),> {
        for (name, value,) in [
            ("EMBEDDING_API_KEY", &self.embedding_api_key,),
            ("QDRANT_URL", &self.qdrant_url,),
            ("QDRANT_API_KEY", &self.qdrant_api_key,),
            ("COLLECTION_NAME", &self.collection_name,),
        ] {
            if value.trim().is_empty() {
                return Err(IngestorError::ConfigurationError(format!("{} is empty", name),),);
            }
        }

        url::Url::parse(&self.qdrant_url,).map_err(|e| {
            IngestorError::ConfigurationError(format!("QDRANT_URL is not a valid URL: {}", e),)
        },)?;

        if let Some(embedding_url,) = &self.embedding_url {
            url::Url::parse(embedding_url,).map_err(|e| {
                IngestorError::ConfigurationError(format!("EMBEDDING_URL is not a valid URL: {}", e),)
            },)?;
        }

        if self.vector_size == 0 {
            return Err(IngestorError::ConfigurationError(
                "vector size must be greater than zero".to_string(),
            ),);
        }
        Ok((),)
    }

    pub fn ingestor_config(&self,) -> IngestorConfig {
        IngestorConfig {
            collection_name: self.collection_name.clone(),
            vector_size:     self.vector_size,
            distance:        self.distance,
            identity:        self.identity,
        }
    }

    pub fn delay(&self,) -> Duration {
        Duration::from_millis(self.delay_ms,)
    }

    pub fn max_delay(&self,) -> Duration {
        Duration::from_millis(self.max_delay_ms,)
    }
}
