// law_ingestor/src/qdrant/mod.rs
// Qdrant implementation of the vector index contract.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::vectors_config::Config;
use qdrant_client::qdrant::{
    CreateCollection, Distance, PointId, PointStruct, UpsertPoints, Value, VectorParams,
    VectorsConfig, point_id::PointIdOptions,
};
use tracing::{debug, info};

use crate::error::{IngestorError, Result};
use crate::index::{CollectionSpec, DistanceMetric, IndexEntry, VectorIndex};
use crate::record::Payload;
use crate::retry::{execute_with_retry, wrap_error};

pub struct QdrantIndex {
    client: Qdrant,
}

impl QdrantIndex {
    /// Builds the client and checks the server answers.
    pub async fn connect(url: &str, api_key: &str,) -> Result<Self,> {
        let client = Qdrant::from_url(url,)
            .api_key(api_key.to_string(),)
            .build()
            .map_err(|e| {
                IngestorError::ConnectionError(format!("Failed to create Qdrant client: {}", e),)
            },)?;

        execute_with_retry(|| async {
            client.list_collections().await.map(|_| (),).map_err(|e| {
                wrap_error(IngestorError::ConnectionError(format!(
                    "Failed to connect to Qdrant: {}",
                    e
                ),),)
            },)
        },)
        .await?;

        info!(url, "Connected to Qdrant");
        Ok(QdrantIndex { client, },)
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn list_collections(&self,) -> Result<Vec<String,>,> {
        let response = execute_with_retry(|| async {
            self.client.list_collections().await.map_err(|e| {
                wrap_error(IngestorError::DatabaseError(format!(
                    "Failed to list Qdrant collections: {}",
                    e
                ),),)
            },)
        },)
        .await?;

        Ok(response.collections.into_iter().map(|c| c.name,).collect(),)
    }

    async fn create_collection(&self, spec: &CollectionSpec,) -> Result<(),> {
        let create_collection_req = CreateCollection {
            collection_name: spec.name.clone(),
            vectors_config: Some(VectorsConfig {
                config: Some(Config::Params(VectorParams {
                    size: spec.vector_size,
                    distance: to_qdrant_distance(spec.distance,) as i32,
                    ..Default::default()
                },),),
            },),
            ..Default::default()
        };

        execute_with_retry(|| async {
            self.client
                .create_collection(create_collection_req.clone(),)
                .await
                .map(|_| (),)
                .map_err(|e| {
                    wrap_error(IngestorError::DatabaseError(format!(
                        "Failed to create Qdrant collection: {}",
                        e
                    ),),)
                },)
        },)
        .await
    }

    async fn vector_params(&self, collection: &str,) -> Result<Option<(u64, DistanceMetric,),>,> {
        let collection_info = execute_with_retry(|| async {
            self.client
                .collection_info(collection,)
                .await
                .map_err(|e| {
                    wrap_error(IngestorError::DatabaseError(format!(
                        "Failed to get Qdrant collection info: {}",
                        e
                    ),),)
                },)
        },)
        .await?;

        let params = collection_info
            .result
            .and_then(|info| info.config,)
            .and_then(|config| config.params,)
            .and_then(|params| params.vectors_config,)
            .and_then(|vectors| vectors.config,);

        unnamed_vector_params(collection, params,)
    }

    async fn upsert(&self, collection: &str, entry: IndexEntry,) -> Result<(),> {
        let point_id = entry.id.to_string();
        let upsert_req = UpsertPoints {
            collection_name: collection.to_string(),
            wait: Some(true,),
            points: vec![PointStruct {
                id:      Some(PointId {
                    point_id_options: Some(PointIdOptions::Uuid(point_id.clone(),),),
                },),
                payload: to_qdrant_payload(entry.payload,),
                vectors: Some(entry.vector.into(),),
            }],
            ..Default::default()
        };

        execute_with_retry(|| async {
            self.client
                .upsert_points(upsert_req.clone(),)
                .await
                .map(|_| (),)
                .map_err(|e| {
                    wrap_error(IngestorError::IngestionError(format!(
                        "Failed to upsert point to Qdrant: {}",
                        e
                    ),),)
                },)
        },)
        .await?;

        debug!(point_id = %point_id, collection, "Upserted point");
        Ok((),)
    }
}

fn to_qdrant_distance(distance: DistanceMetric,) -> Distance {
    match distance {
        DistanceMetric::Cosine => Distance::Cosine,
        DistanceMetric::Dot => Distance::Dot,
        DistanceMetric::Euclid => Distance::Euclid,
        DistanceMetric::Manhattan => Distance::Manhattan,
    }
}

fn from_qdrant_distance(raw: i32,) -> Option<DistanceMetric,> {
    [
        DistanceMetric::Cosine,
        DistanceMetric::Dot,
        DistanceMetric::Euclid,
        DistanceMetric::Manhattan,
    ]
    .into_iter()
    .find(|d| to_qdrant_distance(*d,) as i32 == raw,)
}

/// Extracts size and distance of a single unnamed vector config.
fn unnamed_vector_params(
    collection: &str,
    config: Option<Config,>,
) -> Result<Option<(u64, DistanceMetric,),>,> {
    match config {
        Some(Config::Params(p,),) => match from_qdrant_distance(p.distance,) {
            Some(distance,) => Ok(Some((p.size, distance,),),),
            None => Err(IngestorError::CollectionMismatch(format!(
                "{} uses unrecognised distance value {}",
                collection, p.distance
            ),),),
        },
        _ => Ok(None,),
    }
}

fn to_qdrant_payload(payload: Payload,) -> HashMap<String, Value,> {
    payload
        .into_iter()
        .map(|(k, v,)| {
            (k, Value {
                kind: Some(Kind::StringValue(v,),),
            },)
        },)
        .collect()
}
