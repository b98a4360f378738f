//! Feature-hashing embedder. Runs offline with no model download.
//!
//! Content unigrams (stop words removed) and bigrams without stop words are
//! hashed with 64-bit FNV-1a into `dims` buckets with a sign bit, then the
//! vector is L2-normalized. Text made only of stop words falls back to hashing
//! those words, so any text with at least one token has a vector. Identical
//! text produces the identical vector on every build and platform.

use std::collections::HashSet;
use std::sync::LazyLock;

use async_trait::async_trait;

use crate::embedding::{EmbeddingCapability, EmbeddingError, EmbeddingVector};
use crate::errors::ConfigError;
use crate::matching::normalizer::normalize;

pub const MODEL_NAME: &str = "feature-hashing";

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has",
        "have", "i", "if", "in", "into", "is", "it", "its", "looking", "no", "not", "of", "on",
        "or", "our", "such", "that", "the", "their", "then", "there", "these", "they", "this",
        "to", "was", "we", "will", "with", "you", "your",
    ]
    .into_iter()
    .collect()
});

pub struct HashingEmbedder {
    dims: usize,
}

impl HashingEmbedder {
    pub fn new(dims: usize) -> Result<Self, ConfigError> {
        if dims == 0 {
            return Err(ConfigError::Embedding(
                "hashing embedder needs at least one dimension".to_string(),
            ));
        }
        Ok(Self { dims })
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let normalized = normalize(text);
        let mut vector = vec![0.0f32; self.dims];
        let mut content_features = 0usize;

        for token in normalized.tokens() {
            if !STOP_WORDS.contains(token.as_str()) {
                self.accumulate(&mut vector, token, UNIGRAM_WEIGHT);
                content_features += 1;
            }
        }
        for bigram in normalized.ngrams(2) {
            if !bigram.split(' ').any(|t| STOP_WORDS.contains(t)) {
                self.accumulate(&mut vector, &bigram, BIGRAM_WEIGHT);
                content_features += 1;
            }
        }
        if content_features == 0 {
            for token in normalized.tokens() {
                self.accumulate(&mut vector, token, UNIGRAM_WEIGHT);
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }

    fn accumulate(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let hash = fnv1a(feature.as_bytes());

        let bucket = (hash % self.dims as u64) as usize;
        let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
        vector[bucket] += sign * weight;
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

#[async_trait]
impl EmbeddingCapability for HashingEmbedder {
    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dims(&self) -> usize {
        self.dims
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let vector = self.vectorize(text);
        if vector.iter().all(|v| *v == 0.0) {
            return Err(EmbeddingError::EmptyInput);
        }
        Ok(EmbeddingVector::new(vector))
    }
}
