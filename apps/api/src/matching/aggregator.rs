//! Score Aggregator: blends semantic and keyword scores into the final MatchResult.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::matching::comparator::SkillComparison;
use crate::matching::feedback::{build_rationale, build_recommendation, build_suggestions};
use crate::models::match_result::{Degradation, MatchResult, MatchStatus};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Blend weights. Always sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub semantic_weight: f64,
    pub keyword_weight: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            semantic_weight: 0.5,
            keyword_weight: 0.5,
        }
    }
}

impl ScoreWeights {
    pub fn new(semantic_weight: f64, keyword_weight: f64) -> Result<Self, ConfigError> {
        for (name, w) in [("semantic_weight", semantic_weight), ("keyword_weight", keyword_weight)] {
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(ConfigError::InvalidWeights(format!(
                    "{name} must be within [0, 1], got {w}"
                )));
            }
        }
        let sum = semantic_weight + keyword_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights(format!(
                "weights must sum to 1, got {sum}"
            )));
        }
        Ok(Self {
            semantic_weight,
            keyword_weight,
        })
    }

    /// Fills in a missing weight as the complement of the given one.
    pub fn resolve(semantic: Option<f64>, keyword: Option<f64>) -> Result<Self, ConfigError> {
        match (semantic, keyword) {
            (None, None) => Ok(Self::default()),
            (Some(s), None) => Self::new(s, 1.0 - s),
            (None, Some(k)) => Self::new(1.0 - k, k),
            (Some(s), Some(k)) => Self::new(s, k),
        }
    }

    pub fn blend(&self, semantic_score: f64, keyword_score: f64) -> f64 {
        (self.semantic_weight * semantic_score + self.keyword_weight * keyword_score)
            .clamp(0.0, 1.0)
    }
}

/// Packages upstream results into an immutable MatchResult. Never fails.
pub fn aggregate(
    semantic_score: f64,
    keyword_score: f64,
    comparison: SkillComparison,
    degradations: Vec<Degradation>,
    weights: &ScoreWeights,
) -> MatchResult {
    let semantic_score = semantic_score.clamp(0.0, 1.0);
    let keyword_score = keyword_score.clamp(0.0, 1.0);
    let final_score = weights.blend(semantic_score, keyword_score);

    let status = if degradations.is_empty() {
        MatchStatus::Complete
    } else {
        MatchStatus::Degraded
    };

    let rationale = build_rationale(
        semantic_score,
        keyword_score,
        final_score,
        weights,
        &comparison,
        &degradations,
    );
    let recommendation = build_recommendation(final_score, &comparison.missing);
    let suggestions = build_suggestions(&comparison);

    MatchResult {
        semantic_score,
        keyword_score,
        final_score,
        matched_skills: comparison.matched,
        missing_skills: comparison.missing,
        extra_skills: comparison.extra,
        status,
        degradations,
        rationale,
        recommendation,
        suggestions,
    }
}
