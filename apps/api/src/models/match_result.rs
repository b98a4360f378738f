use serde::{Deserialize, Serialize};

use crate::models::skills::SkillSet;

/// Whether every stage of the pipeline produced a real value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Complete,
    Degraded,
}

/// A recoverable condition the engine worked around while scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    EmptyResume,
    EmptyJobDescription,
    /// Job description has text but none of it matches the vocabulary, so
    /// keyword coverage is 1.0 without any evidence.
    NoJobSkills,
    /// Resume is shorter than the configured minimum; usually a failed PDF extraction.
    SparseResume,
    /// The embedding capability could not produce a vector; semantic score forced to 0.0.
    SemanticUnavailable,
}

impl Degradation {
    pub fn describe(&self) -> &'static str {
        match self {
            Degradation::EmptyResume => {
                "Resume text is empty; no resume skills could be extracted."
            }
            Degradation::EmptyJobDescription => {
                "Job description is empty; keyword coverage is trivially complete."
            }
            Degradation::NoJobSkills => {
                "No known skills were found in the job description; keyword coverage is not informative."
            }
            Degradation::SparseResume => {
                "Resume text is unusually short; it may not have been extracted correctly."
            }
            Degradation::SemanticUnavailable => {
                "Semantic similarity could not be computed; the semantic score was set to 0."
            }
        }
    }
}

/// The engine's output for one resume / job description pair.
///
/// `matched_skills`, `missing_skills` and `extra_skills` are pairwise disjoint.
/// All scores lie in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub semantic_score: f64,
    pub keyword_score: f64,
    pub final_score: f64,
    pub matched_skills: SkillSet,
    pub missing_skills: SkillSet,
    pub extra_skills: SkillSet,
    pub status: MatchStatus,
    pub degradations: Vec<Degradation>,
    pub rationale: Vec<String>,
    pub recommendation: String,
    pub suggestions: Vec<String>,
}

impl MatchResult {
    pub fn is_degraded(&self) -> bool {
        self.status == MatchStatus::Degraded
    }
}
