// law_ingestor/src/lib.rs
// Public API of the law section ingestion pipeline.

pub mod cli;
pub mod compose;
pub mod embeddings;
pub mod error;
pub mod identity;
pub mod index;
pub mod ingestor;
pub mod pacing;
pub mod qdrant;
pub mod record;
pub mod retry;
pub mod source;

pub const DEFAULT_COLLECTION_NAME: &str = "law_sections";
pub const DEFAULT_VECTOR_SIZE: u64 = 768;
pub const DEFAULT_DELAY_MS: u64 = 1000;
