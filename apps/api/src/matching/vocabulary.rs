//! Skill Vocabulary: canonical skill ids and the surface forms that map to them.
//!
//! Loaded once at startup and shared read-only. Every alias is normalized with
//! the same rules as documents, so `"Node.JS"` and `"node.js"` are one alias.
//! The canonical id is always accepted as an alias of itself.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use crate::errors::ConfigError;
use crate::matching::normalizer::normalize;

const BUILTIN_VOCABULARY: &str = include_str!("../../data/skills.json");

/// One alias in token form, pointing at its canonical id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPattern {
    tokens: Vec<String>,
    canonical: String,
}

impl AliasPattern {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    fn char_len(&self) -> usize {
        self.tokens.iter().map(|t| t.chars().count()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    /// canonical id → normalized alias phrases
    skills: BTreeMap<String, Vec<String>>,
    /// Longest alias first: more tokens, then more characters.
    patterns: Vec<AliasPattern>,
}

impl SkillVocabulary {
    /// Builds and validates a vocabulary. Fails if an alias is claimed by two
    /// canonical ids or normalizes to nothing.
    pub fn from_map(map: BTreeMap<String, Vec<String>>) -> Result<Self, ConfigError> {
        if map.is_empty() {
            return Err(ConfigError::EmptyVocabulary);
        }

        let mut owners: HashMap<String, String> = HashMap::new();
        let mut forms: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut patterns = Vec::new();

        for (raw_id, aliases) in &map {
            let canonical = raw_id.trim();
            if canonical.is_empty() {
                return Err(ConfigError::EmptyCanonical);
            }

            for alias in std::iter::once(canonical).chain(aliases.iter().map(String::as_str)) {
                let normalized = normalize(alias);
                if normalized.is_empty() {
                    return Err(ConfigError::EmptyAlias {
                        alias: alias.to_string(),
                        canonical: canonical.to_string(),
                    });
                }
                let phrase = normalized.render();

                match owners.get(&phrase) {
                    Some(owner) if owner != canonical => {
                        return Err(ConfigError::DuplicateAlias {
                            alias: phrase,
                            first: owner.clone(),
                            second: canonical.to_string(),
                        });
                    }
                    Some(_) => continue,
                    None => {
                        owners.insert(phrase.clone(), canonical.to_string());
                    }
                }

                forms
                    .entry(canonical.to_string())
                    .or_default()
                    .insert(phrase);
                patterns.push(AliasPattern {
                    tokens: normalized.tokens().to_vec(),
                    canonical: canonical.to_string(),
                });
            }
        }

        patterns.sort_by(|a, b| {
            b.tokens
                .len()
                .cmp(&a.tokens.len())
                .then_with(|| b.char_len().cmp(&a.char_len()))
                .then_with(|| a.canonical.cmp(&b.canonical))
                .then_with(|| a.tokens.cmp(&b.tokens))
        });

        let skills = forms
            .into_iter()
            .map(|(id, set)| (id, set.into_iter().collect()))
            .collect();

        Ok(Self { skills, patterns })
    }

    /// Parses a JSON object of the form `{"canonical_id": ["alias", ...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let map: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        Self::from_map(map)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// The vocabulary compiled into the binary (`data/skills.json`).
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json_str(BUILTIN_VOCABULARY)
    }

    /// Number of canonical skills.
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.patterns.len()
    }

    #[allow(dead_code)]
    pub fn contains(&self, canonical: &str) -> bool {
        self.skills.contains_key(canonical)
    }

    pub fn patterns(&self) -> &[AliasPattern] {
        &self.patterns
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.skills
    }
}
