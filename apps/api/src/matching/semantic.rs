//! Semantic similarity: cosine of the two document embeddings, rescaled to [0, 1].

use thiserror::Error;
use tracing::debug;

use crate::embedding::{cosine_similarity, EmbeddingCapability};
use crate::errors::ConfigError;
use crate::matching::normalizer::NormalizedText;

#[derive(Debug, Error)]
pub enum SemanticError {
    /// Recoverable. The engine scores 0.0 and flags the result.
    #[error("embedding unavailable: {reason}")]
    EmbeddingUnavailable { reason: String },

    /// Fatal. The capability broke its dimensionality contract.
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl SemanticError {
    fn unavailable(reason: impl Into<String>) -> Self {
        SemanticError::EmbeddingUnavailable {
            reason: reason.into(),
        }
    }
}

/// Embeds both documents concurrently and returns `(cos + 1) / 2`.
///
/// The capability owns any retry policy; a single failure here is final.
pub async fn score(
    resume: &NormalizedText,
    job: &NormalizedText,
    embed: &dyn EmbeddingCapability,
) -> Result<f64, SemanticError> {
    if resume.is_empty() {
        return Err(SemanticError::unavailable("resume has no content"));
    }
    if job.is_empty() {
        return Err(SemanticError::unavailable("job description has no content"));
    }

    let resume_text = resume.render();
    let job_text = job.render();
    let (resume_vec, job_vec) = tokio::join!(embed.embed(&resume_text), embed.embed(&job_text));

    let resume_vec = resume_vec.map_err(|e| SemanticError::unavailable(format!("resume: {e}")))?;
    let job_vec = job_vec.map_err(|e| SemanticError::unavailable(format!("job description: {e}")))?;

    let expected = embed.dims();
    for actual in [resume_vec.dims(), job_vec.dims()] {
        if actual != expected {
            return Err(ConfigError::DimensionMismatch { expected, actual }.into());
        }
    }

    let cosine = cosine_similarity(resume_vec.as_slice(), job_vec.as_slice())
        .ok_or_else(|| SemanticError::unavailable("embedding has zero magnitude"))?;
    debug!("cosine similarity {cosine:.4} ({})", embed.model_name());

    Ok(((cosine + 1.0) / 2.0).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::hashing::HashingEmbedder;
    use crate::embedding::testing::{FailingEmbedder, FixedEmbedder, WrongDimsEmbedder};
    use crate::matching::normalizer::normalize;

    #[tokio::test]
    async fn test_identical_text_scores_one() {
        let embedder = HashingEmbedder::new(256).unwrap();
        let text = normalize("Backend engineer: Rust, PostgreSQL, Kubernetes");
        let s = score(&text, &text, &embedder).await.unwrap();
        assert!((s - 1.0).abs() < 1e-6, "got {s}");
    }

    #[tokio::test]
    async fn test_stop_word_only_text_still_scores_one_against_itself() {
        let embedder = HashingEmbedder::new(384).unwrap();
        let text = normalize("I will be there for you");
        let s = score(&text, &text, &embedder).await.unwrap();
        assert!((s - 1.0).abs() < 1e-6, "got {s}");
    }

    #[tokio::test]
    async fn test_score_stays_in_unit_interval() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let pairs = [
            ("python sql aws", "java spring kafka"),
            ("data scientist pandas", "data scientist numpy pandas"),
            ("chef", "rust compiler engineer"),
        ];
        for (a, b) in pairs {
            let s = score(&normalize(a), &normalize(b), &embedder).await.unwrap();
            assert!((0.0..=1.0).contains(&s), "{a} / {b} -> {s}");
        }
    }

    #[tokio::test]
    async fn test_fixed_vectors_rescale_cosine() {
        let embedder = FixedEmbedder(vec![0.3, 0.4]);
        let s = score(&normalize("a b"), &normalize("c d"), &embedder)
            .await
            .unwrap();
        assert!((s - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_text_is_unavailable() {
        let embedder = FixedEmbedder(vec![1.0, 0.0]);
        let err = score(&normalize("   "), &normalize("rust"), &embedder)
            .await
            .unwrap_err();
        assert!(matches!(err, SemanticError::EmbeddingUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_backend_failure_is_unavailable() {
        let err = score(&normalize("rust"), &normalize("go"), &FailingEmbedder)
            .await
            .unwrap_err();
        assert!(matches!(err, SemanticError::EmbeddingUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_zero_vector_is_unavailable() {
        let embedder = FixedEmbedder(vec![0.0, 0.0, 0.0]);
        let err = score(&normalize("rust"), &normalize("go"), &embedder)
            .await
            .unwrap_err();
        assert!(matches!(err, SemanticError::EmbeddingUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_configuration_error() {
        let embedder = WrongDimsEmbedder { dims: 8, actual: 3 };
        let err = score(&normalize("rust"), &normalize("go"), &embedder)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SemanticError::Configuration(ConfigError::DimensionMismatch {
                expected: 8,
                actual: 3
            })
        ));
    }
}
