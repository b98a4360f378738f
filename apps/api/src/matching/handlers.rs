//! Axum route handlers for the Matching API.

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::extractor::extract;
use crate::matching::normalizer::normalize;
use crate::models::document::Document;
use crate::models::match_result::MatchResult;
use crate::models::skills::SkillSet;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub match_id: Uuid,
    pub scored_at: DateTime<Utc>,
    pub result: MatchResult,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub skills: SkillSet,
    pub token_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Scores a resume against a job description. Empty texts are accepted and
/// come back as a degraded result rather than an error.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let limit = state.config.max_document_bytes;
    check_size("resume_text", &request.resume_text, limit)?;
    check_size("job_description", &request.job_description, limit)?;

    let resume = Document::resume(request.resume_text);
    let job = Document::job_description(request.job_description);
    let result = state.engine.run(&resume, &job).await?;

    Ok(Json(MatchResponse {
        match_id: Uuid::new_v4(),
        scored_at: Utc::now(),
        result,
    }))
}

/// POST /api/v1/skills/extract
///
/// Runs only normalization and extraction. Handy for checking what the
/// vocabulary recognizes in a piece of text.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    check_size("text", &request.text, state.config.max_document_bytes)?;

    let normalized = normalize(&request.text);
    let skills = extract(&normalized, state.engine.vocabulary());

    Ok(Json(ExtractResponse {
        skills,
        token_count: normalized.len(),
    }))
}

/// GET /api/v1/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, Vec<String>>> {
    Json(state.engine.vocabulary().as_map().clone())
}

fn check_size(field: &str, text: &str, limit: usize) -> Result<(), AppError> {
    if text.len() > limit {
        return Err(AppError::Validation(format!(
            "{field} is {} bytes, the limit is {limit}",
            text.len()
        )));
    }
    Ok(())
}
