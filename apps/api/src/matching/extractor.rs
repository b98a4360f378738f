//! Skill Extractor: maps a normalized token stream onto canonical skill ids.
//!
//! Aliases are tried longest first. A matched span is consumed, so a shorter
//! alias can never match inside it ("react native" does not also yield
//! "react"). Only ids from the vocabulary are ever produced.

use crate::matching::normalizer::NormalizedText;
use crate::matching::vocabulary::SkillVocabulary;
use crate::models::skills::SkillSet;

pub fn extract(normalized: &NormalizedText, vocab: &SkillVocabulary) -> SkillSet {
    let tokens = normalized.tokens();
    let mut consumed = vec![false; tokens.len()];
    let mut skills = SkillSet::new();

    for pattern in vocab.patterns() {
        let width = pattern.tokens().len();
        if width == 0 || width > tokens.len() {
            continue;
        }

        let mut start = 0;
        while start + width <= tokens.len() {
            let span = start..start + width;
            if !consumed[span.clone()].contains(&true) && tokens[span.clone()] == *pattern.tokens()
            {
                consumed[span].fill(true);
                skills.insert(pattern.canonical());
                start += width;
            } else {
                start += 1;
            }
        }
    }

    skills
}
