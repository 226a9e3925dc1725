use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{IngestorError, Result};

pub const DEFAULT_HF_MODEL: &str = "sentence-transformers/all-mpnet-base-v2";
pub const DEFAULT_HF_BASE_URL: &str = "https://router.huggingface.co/hf-inference/models";
pub const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/embeddings";

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn generate_embeddings(&self, texts: &[String],) -> Result<Vec<Vec<f32,>,>,>;
}

/// Turns a non-success response into the matching error.
async fn status_error(service: &str, response: Response,) -> IngestorError {
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    let msg = format!("{} API error: {} - {}", service, status, error_text);
    if status == StatusCode::TOO_MANY_REQUESTS {
        IngestorError::RateLimited(msg,)
    } else {
        IngestorError::EmbeddingError(msg,)
    }
}

/// Hugging Face inference API, `feature-extraction` pipeline.
pub struct HuggingFaceEmbedder {
    client:   Client,
    api_key:  String,
    model:    String,
    base_url: String,
}

impl HuggingFaceEmbedder {
    pub fn new(api_key: String, model: Option<String,>, base_url: Option<String,>,) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_HF_MODEL.to_string(),),
            base_url: base_url.unwrap_or_else(|| DEFAULT_HF_BASE_URL.to_string(),),
        }
    }

    fn endpoint(&self,) -> String {
        format!(
            "{}/{}/pipeline/feature-extraction",
            self.base_url.trim_end_matches('/',),
            self.model
        )
    }
}

#[derive(Serialize,)]
struct HuggingFaceRequest<'a,> {
    inputs: &'a [String],
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn generate_embeddings(&self, texts: &[String],) -> Result<Vec<Vec<f32,>,>,> {
        if texts.is_empty() {
            return Ok(vec![],);
        }

        let response = self
            .client
            .post(self.endpoint(),)
            .bearer_auth(&self.api_key,)
            .json(&HuggingFaceRequest { inputs: texts, },)
            .send()
            .await
            .map_err(|e| IngestorError::EmbeddingError(format!("Hugging Face API error: {}", e),),)?;

        if !response.status().is_success() {
            return Err(status_error("Hugging Face", response,).await,);
        }

        response.json::<Vec<Vec<f32,>,>>().await.map_err(|e| {
            IngestorError::EmbeddingError(format!("Failed to parse Hugging Face response: {}", e),)
        },)
    }
}

pub struct OpenAIEmbedder {
    client:     Client,
    api_key:    String,
    model:      String,
    url:        String,
    dimensions: Option<u64,>,
}

impl OpenAIEmbedder {
    pub fn new(
        api_key: String,
        model: Option<String,>,
        url: Option<String,>,
        dimensions: Option<u64,>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string(),),
            url: url.unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string(),),
            dimensions,
        }
    }
}

#[derive(Serialize,)]
struct OpenAIRequest<'a,> {
    input:      &'a [String],
    model:      &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<u64,>,
}

#[derive(Deserialize,)]
struct OpenAIResponse {
    data: Vec<EmbeddingData,>,
}

#[derive(Deserialize,)]
struct EmbeddingData {
    embedding: Vec<f32,>,
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn generate_embeddings(&self, texts: &[String],) -> Result<Vec<Vec<f32,>,>,> {
        if texts.is_empty() {
            return Ok(vec![],);
        }

        let response = self
            .client
            .post(&self.url,)
            .bearer_auth(&self.api_key,)
            .json(&OpenAIRequest {
                input:      texts,
                model:      &self.model,
                dimensions: self.dimensions,
            },)
            .send()
            .await
            .map_err(|e| IngestorError::EmbeddingError(format!("OpenAI API error: {}", e),),)?;

        if !response.status().is_success() {
            return Err(status_error("OpenAI", response,).await,);
        }

        let result: OpenAIResponse = response.json().await.map_err(|e| {
            IngestorError::EmbeddingError(format!("Failed to parse OpenAI response: {}", e),)
        },)?;

        Ok(result.data.into_iter().map(|d| d.embedding,).collect(),)
    }
}
