//! Embedding capability: the injected dependency that turns text into vectors.
//!
//! Backends:
//! - [`hashing::HashingEmbedder`]: deterministic offline feature hashing (default).
//! - [`ollama::OllamaEmbedder`]: a local Ollama instance's `/api/embed` endpoint.
//!
//! [`bounded::BoundedEmbedder`] wraps either one so a multi-request service never
//! has more than a fixed number of embedding calls in flight.
//!
//! The capability is built once in `main` and shared behind an `Arc`; nothing
//! reaches it through global state.

pub mod bounded;
pub mod hashing;
pub mod ollama;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{EmbeddingConfig, EmbeddingProviderKind};
use crate::errors::ConfigError;

const PROBE_TEXT: &str = "software engineer with python and sql experience";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("input has no embeddable content")]
    EmptyInput,

    #[error("embedding limiter is closed")]
    LimiterClosed,
}

/// One document's dense representation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector(Vec<f32>);

impl EmbeddingVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn dims(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for EmbeddingVector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Maps text to a fixed-length vector. Must be deterministic for identical input.
///
/// Carried as `Arc<dyn EmbeddingCapability>` by the match engine.
#[async_trait]
pub trait EmbeddingCapability: Send + Sync {
    /// Model identifier, e.g. `"all-minilm"`.
    fn model_name(&self) -> &str;
    /// Dimensionality of every vector this capability returns.
    fn dims(&self) -> usize;
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;
}

/// Cosine similarity in `[-1.0, 1.0]`.
///
/// `None` for empty vectors, vectors of different lengths, or a zero-norm
/// vector, none of which have a direction to compare.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if !denom.is_finite() || denom < f64::EPSILON {
        return None;
    }

    Some((dot / denom).clamp(-1.0, 1.0))
}

/// Builds the configured backend wrapped in a concurrency limiter.
pub fn create_embedder(config: &EmbeddingConfig) -> anyhow::Result<Arc<dyn EmbeddingCapability>> {
    let inner: Arc<dyn EmbeddingCapability> = match config.provider {
        EmbeddingProviderKind::Hashing => Arc::new(hashing::HashingEmbedder::new(config.dims)?),
        EmbeddingProviderKind::Ollama => Arc::new(ollama::OllamaEmbedder::new(config)?),
    };

    info!(
        "Embedding backend: {} (model: {}, dims: {}, max in flight: {})",
        config.provider,
        inner.model_name(),
        inner.dims(),
        config.max_concurrent
    );

    Ok(Arc::new(bounded::BoundedEmbedder::new(
        inner,
        config.max_concurrent,
    )))
}

/// Embeds a probe sentence once at startup.
///
/// A vector of the wrong length is fatal. An unreachable backend is only
/// logged: each match degrades on its own until the backend comes back.
pub async fn verify_dimensions(embedder: &dyn EmbeddingCapability) -> Result<(), ConfigError> {
    match embedder.embed(PROBE_TEXT).await {
        Ok(vector) if vector.dims() != embedder.dims() => Err(ConfigError::DimensionMismatch {
            expected: embedder.dims(),
            actual: vector.dims(),
        }),
        Ok(_) => {
            info!("Embedding probe succeeded ({} dims)", embedder.dims());
            Ok(())
        }
        Err(e) => {
            warn!("Embedding probe failed, semantic scores will degrade: {e}");
            Ok(())
        }
    }
}
