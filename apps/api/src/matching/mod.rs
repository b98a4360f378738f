// Resume / job description matching engine.
// Implements: normalization, skill extraction, skill comparison, semantic scoring, aggregation.
// Embedding goes through the injected EmbeddingCapability only; no backend is called directly here.

pub mod aggregator;
pub mod comparator;
pub mod engine;
pub mod extractor;
pub mod feedback;
pub mod handlers;
pub mod normalizer;
pub mod semantic;
pub mod vocabulary;
