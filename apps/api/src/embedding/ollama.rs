//! Embedding backend backed by a local Ollama instance.
//!
//! Calls `POST {url}/api/embed` with `{"model", "input"}`. Requires the model
//! to be pulled (e.g. `ollama pull all-minilm`). Retries 429, 5xx and network
//! errors with exponential backoff; that policy lives here, never in the engine.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::EmbeddingConfig;
use crate::embedding::{EmbeddingCapability, EmbeddingError, EmbeddingVector};

pub struct OllamaEmbedder {
    client: Client,
    url: String,
    model: String,
    dims: usize,
    max_retries: u32,
}

impl OllamaEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dims: config.dims,
            max_retries: config.max_retries,
        })
    }
}

#[async_trait]
impl EmbeddingCapability for OllamaEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let body = json!({
            "model": self.model,
            "input": [text],
        });

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, ... capped at 32s
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                warn!(
                    "Embedding attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(format!("{}/api/embed", self.url))
                .json(&body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!("Ollama returned {}: {}", status, message);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let json: Value = response.json().await?;
            let mut vectors = parse_embed_response(&json)?;
            debug!("Ollama embedding succeeded (model: {})", self.model);

            return vectors
                .pop()
                .map(EmbeddingVector::from)
                .ok_or_else(|| EmbeddingError::InvalidResponse("no embeddings returned".into()));
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::InvalidResponse("embedding failed after retries".into())
        }))
    }
}

/// Extracts `embeddings: [[f32]]` from an `/api/embed` response.
fn parse_embed_response(json: &Value) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let embeddings = json
        .get("embeddings")
        .and_then(Value::as_array)
        .ok_or_else(|| EmbeddingError::InvalidResponse("missing embeddings array".into()))?;

    embeddings
        .iter()
        .map(|embedding| -> Result<Vec<f32>, EmbeddingError> {
            embedding
                .as_array()
                .ok_or_else(|| EmbeddingError::InvalidResponse("embedding is not an array".into()))?
                .iter()
                .map(|v| {
                    v.as_f64().map(|f| f as f32).ok_or_else(|| {
                        EmbeddingError::InvalidResponse("embedding value is not a number".into())
                    })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_embed_response() {
        let json = json!({"model": "all-minilm", "embeddings": [[0.1, -0.2, 0.3]]});
        let vectors = parse_embed_response(&json).unwrap();
        assert_eq!(vectors.len(), 1);
        assert_eq!(vectors[0], vec![0.1f32, -0.2, 0.3]);
    }

    #[test]
    fn test_parse_embed_response_missing_field() {
        let err = parse_embed_response(&json!({"error": "model not found"})).unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_embed_response_rejects_non_numeric_values() {
        let err = parse_embed_response(&json!({"embeddings": [[0.1, "x"]]})).unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let embedder = OllamaEmbedder::new(&EmbeddingConfig {
            url: "http://ollama:11434/".to_string(),
            ..EmbeddingConfig::default()
        })
        .unwrap();
        assert_eq!(embedder.url, "http://ollama:11434");
        assert_eq!(embedder.model_name(), "all-minilm");
        assert_eq!(embedder.dims(), 384);
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_a_request() {
        let embedder = OllamaEmbedder::new(&EmbeddingConfig {
            url: "http://127.0.0.1:9".to_string(),
            max_retries: 0,
            ..EmbeddingConfig::default()
        })
        .unwrap();
        assert!(matches!(
            embedder.embed("   ").await,
            Err(EmbeddingError::EmptyInput)
        ));
    }
}
