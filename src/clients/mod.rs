//! External collaborator contracts and their HTTP implementations
//!
//! The search core is read-only with respect to these services and holds
//! them behind narrow object-safe traits so tests can substitute doubles.

mod elastic;
mod embedding;
mod gemini;
mod qdrant;

pub use elastic::{ElasticHttpClient, LexicalIndexError};
pub use embedding::{EmbeddingError, HttpEmbeddingProvider};
pub use gemini::GeminiClient;
pub use qdrant::{QdrantHttpClient, VectorIndexError};

use crate::intent::IntentFilters;
use crate::model::RepoDoc;
use anyhow::Result;
use async_trait::async_trait;

/// Raw text generation, the transport under query understanding.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Embedding generation for the vector channel.
///
/// Implementations are expected to reject outputs that do not match their
/// configured dimension rather than exposing it to callers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// One nearest-neighbor hit: loosely-typed payload plus similarity score.
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    pub payload: serde_json::Value,
    pub score: f64,
}

/// Nearest-neighbor search over an external vector index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, VectorIndexError>;
}

/// Full-text and filtered boolean search over an external document index.
///
/// The index enforces intent filters natively at query time; scores come
/// back channel-local and unnormalized.
#[async_trait]
pub trait LexicalIndex: Send + Sync {
    async fn search(
        &self,
        collection: &str,
        filters: &IntentFilters,
        phrase: &str,
        limit: usize,
    ) -> Result<Vec<RepoDoc>, LexicalIndexError>;

    /// Exact-tag lookup, unranked.
    async fn search_by_tag(
        &self,
        collection: &str,
        tag: &str,
        limit: usize,
    ) -> Result<Vec<RepoDoc>, LexicalIndexError>;
}
