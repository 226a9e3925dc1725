// law_ingestor/src/error.rs
// Defines custom error types for the law_ingestor crate.

use thiserror::Error;

#[derive(Debug, Error,)]
pub enum IngestorError {
    #[error("Failed to connect to index service: {0}")]
    ConnectionError(String,),
    #[error("Failed to ingest record: {0}")]
    IngestionError(String,),
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String,),
    #[error("Index service error: {0}")]
    DatabaseError(String,),
    #[error("Embedding request failed: {0}")]
    EmbeddingError(String,),
    #[error("Embedding service rate limit hit: {0}")]
    RateLimited(String,),
    #[error("Embedding has {actual} dimensions, collection expects {expected}")]
    DimensionMismatch { expected: u64, actual: u64, },
    #[error("Existing collection does not match the requested configuration: {0}")]
    CollectionMismatch(String,),
    #[error("Record source error: {0}")]
    SourceError(String,),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error,),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error,),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error,),
    #[error("Other error: {0}")]
    Other(String,),
}

impl IngestorError {
    pub fn is_transient(&self,) -> bool {
        match self {
            IngestorError::ConnectionError(_,) => true,
            IngestorError::DatabaseError(msg,) | IngestorError::IngestionError(msg,) => {
                let m = msg.to_lowercase();
                m.contains("timeout",)
                    || m.contains("timed out",)
                    || m.contains("connection",)
                    || m.contains("unavailable",)
                    || m.contains("too many requests",)
                    || m.contains("connection reset",)
            },
            _ => false,
        }
    }

    /// True when the embedding service asked us to slow down.
    pub fn is_rate_limited(&self,) -> bool {
        matches!(self, IngestorError::RateLimited(_,))
    }
}

pub type Result<T,> = std::result::Result<T, IngestorError,>;
