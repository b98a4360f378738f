//! Match Engine: runs one resume / job description pair through the pipeline:
//! normalize → extract → compare, semantic score, aggregate.
//!
//! Holds only read-only shared state, so one engine serves every request.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::embedding::EmbeddingCapability;
use crate::errors::ConfigError;
use crate::matching::aggregator::{aggregate, ScoreWeights};
use crate::matching::comparator::compare;
use crate::matching::extractor::extract;
use crate::matching::normalizer::normalize;
use crate::matching::semantic::{self, SemanticError};
use crate::matching::vocabulary::SkillVocabulary;
use crate::models::document::{Document, DocumentRole};
use crate::models::match_result::{Degradation, MatchResult};

#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("expected a {expected} document, got a {actual} document")]
    RoleMismatch {
        expected: DocumentRole,
        actual: DocumentRole,
    },
}

pub struct MatchEngine {
    vocabulary: Arc<SkillVocabulary>,
    embedder: Arc<dyn EmbeddingCapability>,
    weights: ScoreWeights,
    min_resume_chars: usize,
}

impl MatchEngine {
    pub fn new(
        vocabulary: Arc<SkillVocabulary>,
        embedder: Arc<dyn EmbeddingCapability>,
        weights: ScoreWeights,
    ) -> Result<Self, ConfigError> {
        if vocabulary.is_empty() {
            return Err(ConfigError::EmptyVocabulary);
        }
        let weights = ScoreWeights::new(weights.semantic_weight, weights.keyword_weight)?;

        Ok(Self {
            vocabulary,
            embedder,
            weights,
            min_resume_chars: 0,
        })
    }

    /// Flags resumes with fewer non-whitespace characters than `min` as sparse.
    pub fn with_min_resume_chars(mut self, min: usize) -> Self {
        self.min_resume_chars = min;
        self
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn embedder(&self) -> &dyn EmbeddingCapability {
        self.embedder.as_ref()
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Scores one pair.
    ///
    /// Empty documents and embedding outages still produce a result, flagged
    /// degraded. Only a broken configuration (wrong vector length) or swapped
    /// document roles are errors.
    pub async fn run(&self, resume: &Document, job: &Document) -> Result<MatchResult, MatchError> {
        expect_role(resume, DocumentRole::Resume)?;
        expect_role(job, DocumentRole::JobDescription)?;

        let resume_text = normalize(resume.text());
        let job_text = normalize(job.text());
        debug!(
            "normalized resume to {} tokens, job description to {} tokens",
            resume_text.len(),
            job_text.len()
        );

        let mut degradations = Vec::new();
        if resume_text.is_empty() {
            degradations.push(Degradation::EmptyResume);
        } else if content_chars(resume.text()) < self.min_resume_chars {
            degradations.push(Degradation::SparseResume);
        }
        if job_text.is_empty() {
            degradations.push(Degradation::EmptyJobDescription);
        }

        let resume_skills = extract(&resume_text, &self.vocabulary);
        let job_skills = extract(&job_text, &self.vocabulary);
        if !job_text.is_empty() && job_skills.is_empty() {
            degradations.push(Degradation::NoJobSkills);
        }
        let comparison = compare(&resume_skills, &job_skills);
        let keyword_score = comparison.keyword_score();

        let semantic_score =
            match semantic::score(&resume_text, &job_text, self.embedder.as_ref()).await {
                Ok(score) => score,
                Err(SemanticError::EmbeddingUnavailable { reason }) => {
                    warn!("Semantic score unavailable, using 0.0: {reason}");
                    degradations.push(Degradation::SemanticUnavailable);
                    0.0
                }
                Err(SemanticError::Configuration(e)) => return Err(e.into()),
            };

        let result = aggregate(
            semantic_score,
            keyword_score,
            comparison,
            degradations,
            &self.weights,
        );

        info!(
            "Match scored: final={:.3} semantic={:.3} keyword={:.3} matched={} missing={} extra={} status={:?}",
            result.final_score,
            result.semantic_score,
            result.keyword_score,
            result.matched_skills.len(),
            result.missing_skills.len(),
            result.extra_skills.len(),
            result.status
        );
        if result.is_degraded() {
            warn!("Match degraded: {:?}", result.degradations);
        }

        Ok(result)
    }
}

fn expect_role(document: &Document, expected: DocumentRole) -> Result<(), MatchError> {
    if document.role() != expected {
        return Err(MatchError::RoleMismatch {
            expected,
            actual: document.role(),
        });
    }
    Ok(())
}

fn content_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::hashing::HashingEmbedder;
    use crate::embedding::testing::{FailingEmbedder, FixedEmbedder, WrongDimsEmbedder};
    use crate::models::match_result::MatchStatus;
    use crate::models::skills::SkillSet;

    fn vocab(json: &str) -> Arc<SkillVocabulary> {
        Arc::new(SkillVocabulary::from_json_str(json).unwrap())
    }

    fn engine_with(embedder: Arc<dyn EmbeddingCapability>) -> MatchEngine {
        let vocabulary = vocab(r#"{"python": [], "sql": [], "aws": ["amazon web services"]}"#);
        MatchEngine::new(vocabulary, embedder, ScoreWeights::default()).unwrap()
    }

    fn hashing_engine() -> MatchEngine {
        engine_with(Arc::new(HashingEmbedder::new(384).unwrap()))
    }

    fn set(ids: &[&str]) -> SkillSet {
        ids.iter().copied().collect()
    }

    #[tokio::test]
    async fn test_partial_skill_coverage() {
        let result = hashing_engine()
            .run(
                &Document::resume("5 years Python and SQL"),
                &Document::job_description("Looking for Python, SQL, and AWS experience"),
            )
            .await
            .unwrap();

        assert_eq!(result.matched_skills, set(&["python", "sql"]));
        assert_eq!(result.missing_skills, set(&["aws"]));
        assert!(result.extra_skills.is_empty());
        assert!((result.keyword_score - 2.0 / 3.0).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&result.semantic_score));
        assert_eq!(result.status, MatchStatus::Complete);
    }

    #[tokio::test]
    async fn test_empty_job_description() {
        let result = hashing_engine()
            .run(
                &Document::resume("Python and SQL on AWS"),
                &Document::job_description("   "),
            )
            .await
            .unwrap();

        assert_eq!(result.keyword_score, 1.0);
        assert!(result.missing_skills.is_empty());
        assert!(result.matched_skills.is_empty());
        assert_eq!(result.extra_skills, set(&["aws", "python", "sql"]));
        assert_eq!(result.semantic_score, 0.0);
        assert!((result.final_score - 0.5).abs() < 1e-9);
        assert_eq!(
            result.degradations,
            vec![
                Degradation::EmptyJobDescription,
                Degradation::SemanticUnavailable
            ]
        );
    }

    #[tokio::test]
    async fn test_job_without_known_skills_is_flagged() {
        let engine = MatchEngine::new(
            Arc::new(SkillVocabulary::builtin().unwrap()),
            Arc::new(HashingEmbedder::new(384).unwrap()),
            ScoreWeights::default(),
        )
        .unwrap();

        let result = engine
            .run(
                &Document::resume("Experienced pastry chef baking French desserts"),
                &Document::job_description("Seeking a barista to brew coffee and greet customers"),
            )
            .await
            .unwrap();

        assert_eq!(result.keyword_score, 1.0);
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.status, MatchStatus::Degraded);
        assert_eq!(result.degradations, vec![Degradation::NoJobSkills]);
        assert!(result
            .rationale
            .iter()
            .any(|line| line == Degradation::NoJobSkills.describe()));
    }

    #[tokio::test]
    async fn test_final_score_follows_weights() {
        let vocabulary = vocab(r#"{"python": [], "sql": [], "aws": []}"#);
        let weights = ScoreWeights::new(0.2, 0.8).unwrap();
        let engine = MatchEngine::new(vocabulary, Arc::new(FixedEmbedder(vec![1.0, 1.0])), weights)
            .unwrap();

        let result = engine
            .run(
                &Document::resume("python"),
                &Document::job_description("python and aws"),
            )
            .await
            .unwrap();

        assert!((result.semantic_score - 1.0).abs() < 1e-9);
        assert!((result.final_score - (0.2 + 0.8 * 0.5)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_identical_documents_score_full_marks() {
        let text = "Python engineer who writes SQL every day on AWS";
        let result = hashing_engine()
            .run(&Document::resume(text), &Document::job_description(text))
            .await
            .unwrap();

        assert!((result.semantic_score - 1.0).abs() < 1e-6);
        assert_eq!(result.keyword_score, 1.0);
        assert!(result.final_score > 0.99);
    }

    #[tokio::test]
    async fn test_longer_alias_consumes_shorter() {
        let engine = MatchEngine::new(
            vocab(r#"{"java": [], "javascript": []}"#),
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            ScoreWeights::default(),
        )
        .unwrap();

        let result = engine
            .run(
                &Document::resume("expert in javascript"),
                &Document::job_description("java developer"),
            )
            .await
            .unwrap();

        assert_eq!(result.extra_skills, set(&["javascript"]));
        assert_eq!(result.missing_skills, set(&["java"]));
        assert!(result.matched_skills.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_outage_degrades_instead_of_failing() {
        let result = engine_with(Arc::new(FailingEmbedder))
            .run(
                &Document::resume("python and sql"),
                &Document::job_description("python"),
            )
            .await
            .unwrap();

        assert_eq!(result.semantic_score, 0.0);
        assert_eq!(result.keyword_score, 1.0);
        assert_eq!(result.degradations, vec![Degradation::SemanticUnavailable]);
        assert!(result.is_degraded());
    }

    #[tokio::test]
    async fn test_empty_resume_is_flagged() {
        let result = hashing_engine()
            .run(
                &Document::resume(""),
                &Document::job_description("python"),
            )
            .await
            .unwrap();

        assert_eq!(result.keyword_score, 0.0);
        assert_eq!(result.missing_skills, set(&["python"]));
        assert!(result.degradations.contains(&Degradation::EmptyResume));
        assert!(!result.degradations.contains(&Degradation::SparseResume));
    }

    #[tokio::test]
    async fn test_sparse_resume_threshold() {
        let engine = hashing_engine().with_min_resume_chars(100);
        let result = engine
            .run(
                &Document::resume("python"),
                &Document::job_description("python"),
            )
            .await
            .unwrap();
        assert_eq!(result.degradations, vec![Degradation::SparseResume]);

        let engine = hashing_engine().with_min_resume_chars(0);
        let result = engine
            .run(
                &Document::resume("python"),
                &Document::job_description("python"),
            )
            .await
            .unwrap();
        assert_eq!(result.status, MatchStatus::Complete);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_fatal() {
        let err = engine_with(Arc::new(WrongDimsEmbedder { dims: 384, actual: 3 }))
            .run(
                &Document::resume("python"),
                &Document::job_description("sql"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MatchError::Configuration(ConfigError::DimensionMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_swapped_roles_are_rejected() {
        let err = hashing_engine()
            .run(
                &Document::job_description("python"),
                &Document::job_description("python"),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MatchError::RoleMismatch {
                expected: DocumentRole::Resume,
                actual: DocumentRole::JobDescription
            }
        ));
    }

    #[test]
    fn test_rejects_inconsistent_weights() {
        let embedder: Arc<dyn EmbeddingCapability> = Arc::new(FixedEmbedder(vec![1.0]));
        let bad = ScoreWeights {
            semantic_weight: 0.9,
            keyword_weight: 0.9,
        };
        assert!(matches!(
            MatchEngine::new(vocab(r#"{"rust": []}"#), embedder, bad),
            Err(ConfigError::InvalidWeights(_))
        ));
    }
}
