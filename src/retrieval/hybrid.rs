//! Hybrid search orchestrator

use crate::clients::{EmbeddingProvider, LexicalIndex, VectorIndex};
use crate::config::SearchConfig;
use crate::intent::{IntentError, IntentFilters, QueryUnderstanding, RetrievalIntent};
use crate::model::RepoDoc;
use crate::retrieval::{apply_filters, fuse, rank, trend_score, FusionError, FusionWeights, SearchOutcome};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

#[derive(Error, Debug)]
pub enum SearchError {
    /// The only user-visible rejection: a blank query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    InvalidWeights(#[from] FusionError),

    #[error("query understanding failed: {0}")]
    Understanding(#[from] IntentError),

    #[error("lexical index unavailable: {0}")]
    LexicalIndex(#[from] crate::clients::LexicalIndexError),
}

/// Orchestrates query understanding, channel retrieval and fusion.
///
/// Holds its collaborators behind trait objects passed at construction;
/// tests substitute doubles. The orchestrator performs no writes against
/// the indexes and keeps no state across requests.
pub struct HybridSearcher {
    understanding: Arc<dyn QueryUnderstanding>,
    embedding: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
    lexical_index: Arc<dyn LexicalIndex>,
    weights: FusionWeights,
    config: SearchConfig,
}

impl HybridSearcher {
    pub fn new(
        understanding: Arc<dyn QueryUnderstanding>,
        embedding: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
        lexical_index: Arc<dyn LexicalIndex>,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        let weights = FusionWeights::new(
            config.semantic_weight,
            config.lexical_weight,
            config.relevance_weight,
            config.trend_weight,
        )?;

        Ok(Self {
            understanding,
            embedding,
            vector_index,
            lexical_index,
            weights,
            config,
        })
    }

    /// Run a hybrid search and return at most `top` ranked documents.
    ///
    /// Channel-level failures degrade that channel to an empty set; the
    /// request only fails for a blank query. An empty result list is a
    /// valid success, including when both channels came back empty.
    pub async fn search(
        &self,
        raw_query: &str,
        top: usize,
        collection: &str,
    ) -> Result<SearchOutcome, SearchError> {
        if raw_query.trim().is_empty() {
            return Err(SearchError::InvalidQuery(
                "query text cannot be empty".to_string(),
            ));
        }
        let top = if top == 0 {
            self.config.default_limit
        } else {
            top
        };

        // Step 1: intent, degrading to a neutral one on any failure
        let intent = match self
            .call(self.understanding.understand(raw_query))
            .await
        {
            Ok(intent) => intent,
            Err(e) => {
                tracing::warn!("query understanding failed, using degraded intent: {}", e);
                RetrievalIntent::degraded(raw_query)
            }
        };

        // Step 2: phrase for the lexical channel
        let query_text = self.lexical_query_text(raw_query, &intent).await;
        tracing::debug!(
            query_text = %query_text,
            vector_required = intent.vector_search_required,
            "channels selected"
        );

        // Steps 3-4: the channels are independent, issue them together
        let vector_limit = top * self.config.vector_multiplier;
        let lexical_limit = top * self.config.lexical_multiplier;

        let (mut vector_results, lexical_results) = if intent.vector_search_required {
            tokio::join!(
                self.vector_channel(raw_query, &intent.filters, vector_limit, collection),
                self.lexical_channel(&query_text, &intent.filters, lexical_limit, collection)
            )
        } else {
            (
                Vec::new(),
                self.lexical_channel(&query_text, &intent.filters, lexical_limit, collection)
                    .await,
            )
        };

        // Step 5: fallback vector search, at most once per request
        if lexical_results.is_empty() && !intent.vector_search_required {
            tracing::warn!("lexical channel empty, falling back to vector search");
            vector_results = self
                .vector_channel(raw_query, &intent.filters, vector_limit, collection)
                .await;
        }

        // Step 6: nothing to fuse
        if vector_results.is_empty() {
            let mut results = lexical_results;
            results.truncate(top);
            tracing::info!(count = results.len(), "lexical-only results");
            return Ok(SearchOutcome { results, intent });
        }

        // Step 7: fuse and rank
        let today = chrono::Utc::now().date_naive();
        let fused = fuse(vector_results, lexical_results, &self.weights, today);
        let results = rank(fused, top);
        tracing::info!(count = results.len(), "hybrid results");
        Ok(SearchOutcome { results, intent })
    }

    /// Exact-tag lookup ranked by trend (popularity and recency).
    pub async fn tag_search(
        &self,
        tag: &str,
        top: usize,
        collection: &str,
    ) -> Result<Vec<RepoDoc>, SearchError> {
        if tag.trim().is_empty() {
            return Err(SearchError::InvalidQuery(
                "tag cannot be empty".to_string(),
            ));
        }
        let top = if top == 0 {
            self.config.default_limit
        } else {
            top
        };

        let mut docs = self
            .call(self.lexical_index.search_by_tag(
                collection,
                tag,
                top * self.config.lexical_multiplier,
            ))
            .await
            .map_err(|e| SearchError::LexicalIndex(crate::clients::LexicalIndexError::Request(e)))?;

        let today = chrono::Utc::now().date_naive();
        for doc in &mut docs {
            doc.score = trend_score(doc, today);
        }
        Ok(rank(docs, top))
    }

    /// Refinement chips for broad queries.
    pub async fn filter_suggestions(&self, raw_query: &str) -> Result<Vec<String>, SearchError> {
        let chips = self
            .call(self.understanding.filter_chips(raw_query))
            .await
            .map_err(|e| SearchError::Understanding(IntentError::Llm(e)))?;
        Ok(chips)
    }

    /// Lexical phrase: rewritten query if present, else the cleaned form
    /// from the preprocessing helper, else the local cleanup of the raw
    /// query (raw verbatim only when the cleanup strips everything).
    async fn lexical_query_text(&self, raw_query: &str, intent: &RetrievalIntent) -> String {
        if !intent.rewritten_query.is_empty() {
            return intent.rewritten_query.clone();
        }
        match self.call(self.understanding.preprocess(raw_query)).await {
            Ok(queries) if !queries.is_empty() => queries[0].clone(),
            Ok(_) => Self::local_cleanup(raw_query),
            Err(e) => {
                tracing::warn!("query preprocessing failed: {}", e);
                Self::local_cleanup(raw_query)
            }
        }
    }

    fn local_cleanup(raw_query: &str) -> String {
        let cleaned = crate::intent::normalize_query(raw_query);
        if cleaned.is_empty() {
            raw_query.to_string()
        } else {
            cleaned
        }
    }

    /// Semantic retrieval: embed, nearest-neighbor search, decode payloads,
    /// post-filter. Any failure degrades the channel to an empty set.
    async fn vector_channel(
        &self,
        raw_query: &str,
        filters: &IntentFilters,
        limit: usize,
        collection: &str,
    ) -> Vec<RepoDoc> {
        let vector = match self.call(self.embedding.embed(raw_query)).await {
            Ok(vector) => vector,
            Err(e) => {
                tracing::warn!("embedding failed, vector channel disabled: {}", e);
                return Vec::new();
            }
        };

        let points = match self
            .call(self.vector_index.search(collection, &vector, limit))
            .await
        {
            Ok(points) => points,
            Err(e) => {
                tracing::warn!("vector search failed, vector channel disabled: {}", e);
                return Vec::new();
            }
        };

        let decoded: Vec<RepoDoc> = points
            .into_iter()
            .filter_map(|point| RepoDoc::from_payload(point.payload, point.score))
            .collect();

        apply_filters(decoded, filters)
    }

    /// Lexical retrieval; a failure degrades the channel to an empty set.
    async fn lexical_channel(
        &self,
        phrase: &str,
        filters: &IntentFilters,
        limit: usize,
        collection: &str,
    ) -> Vec<RepoDoc> {
        match self
            .call(self.lexical_index.search(collection, filters, phrase, limit))
            .await
        {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!("lexical search failed, lexical channel disabled: {}", e);
                Vec::new()
            }
        }
    }

    /// Wrap an external call with the per-call timeout, flattening timeout
    /// and collaborator errors into one message.
    async fn call<T, E, F>(&self, fut: F) -> Result<T, String>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        match timeout(Duration::from_secs(self.config.timeout_secs), fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "timed out after {}s",
                self.config.timeout_secs
            )),
        }
    }
}
