//! Concurrency limiter around an embedding capability.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::embedding::{EmbeddingCapability, EmbeddingError, EmbeddingVector};

/// Holds a semaphore permit for the duration of every `embed` call.
pub struct BoundedEmbedder {
    inner: Arc<dyn EmbeddingCapability>,
    permits: Semaphore,
}

impl BoundedEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingCapability>, max_in_flight: usize) -> Self {
        Self {
            inner,
            permits: Semaphore::new(max_in_flight.max(1)),
        }
    }
}

#[async_trait]
impl EmbeddingCapability for BoundedEmbedder {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    fn dims(&self) -> usize {
        self.inner.dims()
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| EmbeddingError::LimiterClosed)?;
        self.inner.embed(text).await
    }
}
