use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};

use crate::matching::aggregator::ScoreWeights;

/// Which embedding backend the service injects into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProviderKind {
    /// Offline feature hashing. Deterministic, no model download.
    Hashing,
    /// Local Ollama instance (`POST /api/embed`).
    Ollama,
}

impl FromStr for EmbeddingProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashing" => Ok(EmbeddingProviderKind::Hashing),
            "ollama" => Ok(EmbeddingProviderKind::Ollama),
            other => Err(format!(
                "unknown embedding provider '{other}' (expected 'hashing' or 'ollama')"
            )),
        }
    }
}

impl fmt::Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingProviderKind::Hashing => f.write_str("hashing"),
            EmbeddingProviderKind::Ollama => f.write_str("ollama"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    pub url: String,
    pub model: String,
    pub dims: usize,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Upper bound on embedding calls in flight across all requests.
    pub max_concurrent: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::Hashing,
            url: "http://localhost:11434".to_string(),
            // MiniLM-L6 sentence embedder
            model: "all-minilm".to_string(),
            dims: 384,
            timeout_secs: 30,
            max_retries: 3,
            max_concurrent: 4,
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; `from_env` fails only on values that do not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON skill vocabulary. `None` uses the built-in one.
    pub skill_vocabulary_path: Option<PathBuf>,
    pub weights: ScoreWeights,
    pub embedding: EmbeddingConfig,
    /// Resumes shorter than this are flagged `sparse_resume`. 0 disables the check.
    pub min_resume_chars: usize,
    pub max_document_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            skill_vocabulary_path: None,
            weights: ScoreWeights::default(),
            embedding: EmbeddingConfig::default(),
            min_resume_chars: 100,
            max_document_bytes: 256 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let weights = ScoreWeights::resolve(
            optional_env("SEMANTIC_WEIGHT")?,
            optional_env("KEYWORD_WEIGHT")?,
        )
        .context("SEMANTIC_WEIGHT / KEYWORD_WEIGHT are inconsistent")?;

        let embedding = EmbeddingConfig {
            provider: env_or("EMBEDDING_PROVIDER", defaults.embedding.provider)?,
            url: env_or("EMBEDDING_URL", defaults.embedding.url)?,
            model: env_or("EMBEDDING_MODEL", defaults.embedding.model)?,
            dims: env_or("EMBEDDING_DIMS", defaults.embedding.dims)?,
            timeout_secs: env_or("EMBEDDING_TIMEOUT_SECS", defaults.embedding.timeout_secs)?,
            max_retries: env_or("EMBEDDING_MAX_RETRIES", defaults.embedding.max_retries)?,
            max_concurrent: env_or(
                "MAX_CONCURRENT_EMBEDDINGS",
                defaults.embedding.max_concurrent,
            )?,
        };
        if embedding.dims == 0 {
            bail!("EMBEDDING_DIMS must be greater than zero");
        }
        if embedding.max_concurrent == 0 {
            bail!("MAX_CONCURRENT_EMBEDDINGS must be greater than zero");
        }

        Ok(Config {
            port: env_or("PORT", defaults.port).context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", defaults.rust_log)?,
            skill_vocabulary_path: optional_env("SKILL_VOCABULARY_PATH")?,
            weights,
            embedding,
            min_resume_chars: env_or("MIN_RESUME_CHARS", defaults.min_resume_chars)?,
            max_document_bytes: env_or("MAX_DOCUMENT_BYTES", defaults.max_document_bytes)?,
        })
    }
}

/// Reads and parses `key`. Unset or blank values are `None`.
fn optional_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("Environment variable '{key}' is invalid: {e}")),
        _ => Ok(None),
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    Ok(optional_env(key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parses_case_insensitively() {
        assert_eq!(
            "Ollama".parse::<EmbeddingProviderKind>().unwrap(),
            EmbeddingProviderKind::Ollama
        );
        assert_eq!(
            " hashing ".parse::<EmbeddingProviderKind>().unwrap(),
            EmbeddingProviderKind::Hashing
        );
        assert!("openai".parse::<EmbeddingProviderKind>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Hashing);
        assert_eq!(config.embedding.dims, 384);
        assert_eq!(config.min_resume_chars, 100);
        assert!((config.weights.semantic_weight - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_optional_env_unset_and_blank_are_none() {
        std::env::remove_var("SCREENER_TEST_UNSET");
        assert_eq!(optional_env::<u16>("SCREENER_TEST_UNSET").unwrap(), None);

        std::env::set_var("SCREENER_TEST_BLANK", "   ");
        assert_eq!(optional_env::<u16>("SCREENER_TEST_BLANK").unwrap(), None);
    }

    #[test]
    fn test_optional_env_parse_failure_names_the_key() {
        std::env::set_var("SCREENER_TEST_BAD_PORT", "eighty");
        let err = optional_env::<u16>("SCREENER_TEST_BAD_PORT").unwrap_err();
        assert!(err.to_string().contains("SCREENER_TEST_BAD_PORT"));
    }

    #[test]
    fn test_env_or_prefers_set_value() {
        std::env::set_var("SCREENER_TEST_DIMS", "768");
        assert_eq!(env_or("SCREENER_TEST_DIMS", 384usize).unwrap(), 768);
    }
}
