// law_ingestor/src/index.rs
// Vector index contracts and collection provisioning.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::error::{IngestorError, Result};
use crate::record::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum,)]
pub enum DistanceMetric {
    Cosine,
    Dot,
    Euclid,
    Manhattan,
}

/// Desired shape of the target collection.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct CollectionSpec {
    pub name:        String,
    pub vector_size: u64,
    pub distance:    DistanceMetric,
}

/// Unit committed to the index for one record.
#[derive(Debug, Clone, PartialEq,)]
pub struct IndexEntry {
    pub id:      Uuid,
    pub vector:  Vec<f32,>,
    pub payload: Payload,
}

/// Vector store operations the pipeline relies on.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn list_collections(&self,) -> Result<Vec<String,>,>;

    async fn create_collection(&self, spec: &CollectionSpec,) -> Result<(),>;

    /// Size and distance of an existing collection's single unnamed vector.
    ///
    /// `None` when the collection is configured some other way (named
    /// vectors, missing config).
    async fn vector_params(&self, collection: &str,) -> Result<Option<(u64, DistanceMetric,),>,>;

    async fn upsert(&self, collection: &str, entry: IndexEntry,) -> Result<(),>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum Provisioned {
    Created,
    Existing,
}

/// Creates the collection if it is missing, otherwise checks it matches `spec`.
pub async fn ensure_collection(
    index: &dyn VectorIndex,
    spec: &CollectionSpec,
) -> Result<Provisioned,> {
    let existing = index.list_collections().await?;

    if !existing.iter().any(|name| name == &spec.name,) {
        index.create_collection(spec,).await?;
        info!(
            collection = %spec.name,
            vector_size = spec.vector_size,
            distance = ?spec.distance,
            "Created collection"
        );
        return Ok(Provisioned::Created,);
    }

    match index.vector_params(&spec.name,).await? {
        Some((size, distance,),) if size == spec.vector_size && distance == spec.distance => {
            info!(collection = %spec.name, "Collection already exists");
            Ok(Provisioned::Existing,)
        },
        Some((size, distance,),) => Err(IngestorError::CollectionMismatch(format!(
            "{} has size {} / {:?}, expected size {} / {:?}",
            spec.name, size, distance, spec.vector_size, spec.distance
        ),),),
        None => Err(IngestorError::CollectionMismatch(format!(
            "{} does not use a single unnamed vector",
            spec.name
        ),),),
    }
}
