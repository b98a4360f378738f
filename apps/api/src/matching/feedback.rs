//! Human-readable explanation of a match: rationale lines, a fit tier and
//! resume-improvement suggestions.

use crate::matching::aggregator::ScoreWeights;
use crate::matching::comparator::SkillComparison;
use crate::models::match_result::Degradation;
use crate::models::skills::SkillSet;

const STRONG_FIT: f64 = 0.8;
const MODERATE_FIT: f64 = 0.6;
const MAX_LISTED_GAPS: usize = 3;

/// Score as a percentage rounded to one decimal.
pub fn to_percent(score: f64) -> f64 {
    (score * 1000.0).round() / 10.0
}

fn list_or(set: &SkillSet, fallback: &str) -> String {
    if set.is_empty() {
        fallback.to_string()
    } else {
        set.iter().collect::<Vec<_>>().join(", ")
    }
}

pub fn build_rationale(
    semantic_score: f64,
    keyword_score: f64,
    final_score: f64,
    weights: &ScoreWeights,
    comparison: &SkillComparison,
    degradations: &[Degradation],
) -> Vec<String> {
    let required = comparison.matched.len() + comparison.missing.len();

    let mut lines = vec![format!(
        "Final score {}% = {:.2} * semantic {}% + {:.2} * keyword {}%.",
        to_percent(final_score),
        weights.semantic_weight,
        to_percent(semantic_score),
        weights.keyword_weight,
        to_percent(keyword_score),
    )];

    if required == 0 {
        lines.push(
            "The job description lists no recognized skills; keyword coverage counts as complete."
                .to_string(),
        );
    } else {
        lines.push(format!(
            "Keyword coverage: {} of {} job skills found in the resume.",
            comparison.matched.len(),
            required
        ));
    }

    lines.push(format!(
        "Matched skills: {}.",
        list_or(&comparison.matched, "no direct skill overlap")
    ));
    lines.push(format!(
        "Missing skills: {}.",
        list_or(&comparison.missing, "none")
    ));
    lines.push(format!(
        "Additional skills: {}.",
        list_or(&comparison.extra, "none")
    ));

    lines.extend(degradations.iter().map(|d| d.describe().to_string()));
    lines
}

/// Fit tier sentence naming up to three missing skills.
pub fn build_recommendation(final_score: f64, missing: &SkillSet) -> String {
    let percent = to_percent(final_score);
    let top_gaps: Vec<&str> = missing.iter().take(MAX_LISTED_GAPS).collect();

    if final_score >= STRONG_FIT {
        format!("Strong fit ({percent}%). The resume covers the key requirements of the role.")
    } else if final_score >= MODERATE_FIT {
        if top_gaps.is_empty() {
            format!("Moderate fit ({percent}%). Describe existing experience in the role's terms.")
        } else {
            format!(
                "Moderate fit ({percent}%). Consider adding evidence for: {}.",
                top_gaps.join(", ")
            )
        }
    } else if top_gaps.is_empty() {
        format!("Low fit ({percent}%). The resume and the role describe different work.")
    } else {
        format!(
            "Low fit ({percent}%). Significant gaps: {}.",
            top_gaps.join(", ")
        )
    }
}

pub fn build_suggestions(comparison: &SkillComparison) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !comparison.missing.is_empty() {
        suggestions.push(format!(
            "Emphasize any experience with the required skills: {}.",
            list_or(&comparison.missing, "")
        ));
    }
    if !comparison.extra.is_empty() {
        suggestions.push(format!(
            "Highlight how additional strengths ({}) add value for this role.",
            list_or(&comparison.extra, "")
        ));
    }
    suggestions.push("Use the job description's terminology when describing your experience.".to_string());

    suggestions
}
