// law_ingestor/src/ingestor.rs
// Core ingestion loop: record -> composed text -> embedding -> index entry.

use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::compose::compose;
use crate::error::{IngestorError, Result};
use crate::embeddings::Embedder;
use crate::identity::IdentityStrategy;
use crate::index::{CollectionSpec, DistanceMetric, IndexEntry, Provisioned, VectorIndex, ensure_collection};
use crate::pacing::{PaceSignal, Pacer};
use crate::record::Record;

/// Configuration for an ingestion run.
#[derive(Debug, Clone,)]
pub struct IngestorConfig {
    pub collection_name: String,
    pub vector_size:     u64,
    pub distance:        DistanceMetric,
    pub identity:        IdentityStrategy,
}

impl Default for IngestorConfig {
    fn default() -> Self {
        Self {
            collection_name: crate::DEFAULT_COLLECTION_NAME.to_string(),
            vector_size:     crate::DEFAULT_VECTOR_SIZE,
            distance:        DistanceMetric::Cosine,
            identity:        IdentityStrategy::default(),
        }
    }
}

impl IngestorConfig {
    pub fn collection_spec(&self,) -> CollectionSpec {
        CollectionSpec {
            name:        self.collection_name.clone(),
            vector_size: self.vector_size,
            distance:    self.distance,
        }
    }
}

/// Where a record's processing stopped when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Source,
    Embedding,
    Writing,
}

#[derive(Debug, Clone, Serialize,)]
pub struct RecordFailure {
    /// 1-based position in the source stream.
    pub position: usize,
    pub label:    String,
    pub stage:    Stage,
    pub error:    String,
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Default, Serialize,)]
pub struct IngestSummary {
    pub seen:      usize,
    pub skipped:   usize,
    pub succeeded: usize,
    pub failed:    usize,
    pub failures:  Vec<RecordFailure,>,
}

/// Terminal state of one record.
#[derive(Debug,)]
enum Outcome {
    Skipped,
    Done,
    Failed(Stage, IngestorError,),
}

pub struct Ingestor {
    config:   IngestorConfig,
    embedder: Arc<dyn Embedder,>,
    index:    Arc<dyn VectorIndex,>,
    pacer:    Arc<dyn Pacer,>,
}

impl Ingestor {
    pub fn new(
        config: IngestorConfig,
        embedder: Arc<dyn Embedder,>,
        index: Arc<dyn VectorIndex,>,
        pacer: Arc<dyn Pacer,>,
    ) -> Self {
        Self {
            config,
            embedder,
            index,
            pacer,
        }
    }

    pub fn config(&self,) -> &IngestorConfig {
        &self.config
    }

    /// Makes sure the target collection exists before anything is written.
    pub async fn provision(&self,) -> Result<Provisioned,> {
        ensure_collection(self.index.as_ref(), &self.config.collection_spec(),).await
    }

    /// Provisions the collection, then ingests every record of `records`.
    pub async fn execute<S,>(&self, records: S,) -> Result<IngestSummary,>
    where
        S: Stream<Item = Result<Record,>,>,
    {
        self.provision().await?;
        Ok(self.run(records,).await,)
    }

    /// Processes `records` strictly in order, one at a time.
    ///
    /// Per-record failures are logged and counted; they never end the run.
    #[instrument(skip_all, fields(collection = %self.config.collection_name))]
    pub async fn run<S,>(&self, records: S,) -> IngestSummary
    where
        S: Stream<Item = Result<Record,>,>,
    {
        let mut records = std::pin::pin!(records);
        let mut summary = IngestSummary::default();

        while let Some(item,) = records.next().await {
            summary.seen += 1;
            let position = summary.seen;

            let record = match item {
                Ok(record,) => record,
                Err(e,) => {
                    error!(position, error = %e, "Failed to read record");
                    summary.failed += 1;
                    summary.failures.push(RecordFailure {
                        position,
                        label: format!("record #{}", position),
                        stage: Stage::Source,
                        error: e.to_string(),
                    },);
                    continue;
                },
            };

            let outcome = self.process(&record,).await;
            let label = record.label();

            match &outcome {
                Outcome::Skipped => {
                    debug!(position, label = %label, "Skipping record without law text");
                    summary.skipped += 1;
                },
                Outcome::Done => {
                    info!(position, label = %label, "Ingested record");
                    summary.succeeded += 1;
                },
                Outcome::Failed(stage, e,) => {
                    error!(position, label = %label, stage = ?stage, error = %e, "Failed to ingest record");
                    summary.failed += 1;
                    summary.failures.push(RecordFailure {
                        position,
                        label,
                        stage: *stage,
                        error: e.to_string(),
                    },);
                },
            }

            match outcome {
                Outcome::Skipped | Outcome::Failed(Stage::Source, _,) => {},
                Outcome::Failed(_, e,) if e.is_rate_limited() => {
                    self.pacer.after_record(PaceSignal::RateLimited,).await
                },
                Outcome::Done | Outcome::Failed(..,) => {
                    self.pacer.after_record(PaceSignal::Completed,).await
                },
            }
        }

        info!(
            seen = summary.seen,
            skipped = summary.skipped,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Ingestion complete"
        );
        summary
    }

    async fn process(&self, record: &Record,) -> Outcome {
        if record.primary_text().is_none() {
            return Outcome::Skipped;
        }

        let text = compose(record,);

        self.pacer.before_embedding().await;
        let vector = match self.embed(&text,).await {
            Ok(v,) => v,
            Err(e,) => return Outcome::Failed(Stage::Embedding, e,),
        };

        let entry = IndexEntry {
            id: self.config.identity.assign(record, &text,),
            vector,
            payload: record.payload(),
        };

        match self.index.upsert(&self.config.collection_name, entry,).await {
            Ok((),) => Outcome::Done,
            Err(e,) => Outcome::Failed(Stage::Writing, e,),
        }
    }

    /// Embeds one text and rejects vectors of the wrong shape.
    async fn embed(&self, text: &str,) -> Result<Vec<f32,>,> {
        let mut vectors = self
            .embedder
            .generate_embeddings(&[text.to_string(),],)
            .await?;

        if vectors.len() != 1 {
            return Err(IngestorError::EmbeddingError(format!(
                "expected 1 embedding, got {}",
                vectors.len()
            ),),);
        }
        let vector = vectors.remove(0,);

        let actual = vector.len() as u64;
        if actual != self.config.vector_size {
            return Err(IngestorError::DimensionMismatch {
                expected: self.config.vector_size,
                actual,
            },);
        }
        Ok(vector,)
    }
}
