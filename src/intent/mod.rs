//! Query understanding: structured retrieval intent from free text

mod adapter;
mod preprocess;

pub use adapter::LlmQueryUnderstanding;
pub use preprocess::normalize_query;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntentError {
    #[error("llm request failed: {0}")]
    Llm(String),

    #[error("response parsing failed: {0}")]
    Parse(String),
}

/// Structured interpretation of a free-text query.
///
/// Produced once per request and read-only afterward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalIntent {
    /// Phrase for lexical search. Empty means no precise phrase was found.
    #[serde(default)]
    pub rewritten_query: String,

    /// True for vague/exploratory queries where semantic recall is
    /// preferred over lexical precision.
    #[serde(default, rename = "query_vector_required")]
    pub vector_search_required: bool,

    #[serde(default)]
    pub filters: IntentFilters,
}

impl RetrievalIntent {
    /// Neutral intent used when query understanding fails: lexical-first,
    /// the raw query as phrase, no filters.
    pub fn degraded(raw_query: &str) -> Self {
        Self {
            rewritten_query: raw_query.to_string(),
            vector_search_required: false,
            filters: IntentFilters::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentFilters {
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub libraries: Vec<String>,

    #[serde(default)]
    pub topics: Vec<String>,

    #[serde(default)]
    pub stars_min: Option<u64>,

    #[serde(default)]
    pub created_after: Option<String>,

    #[serde(default)]
    pub created_before: Option<String>,
}

impl IntentFilters {
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
            && self.libraries.is_empty()
            && self.topics.is_empty()
            && self.stars_min.is_none()
            && self.created_after.is_none()
            && self.created_before.is_none()
    }

    /// Every tag-valued filter (language, libraries, topics) flattened.
    pub fn tag_filters(&self) -> Vec<String> {
        let mut tags = Vec::new();
        if let Some(language) = &self.language {
            tags.push(language.clone());
        }
        tags.extend(self.libraries.iter().cloned());
        tags.extend(self.topics.iter().cloned());
        tags
    }
}

/// Deduplicated union of tag-valued filters, for refinement chips in a UI.
pub fn suggested_topics(filters: &IntentFilters) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    filters
        .tag_filters()
        .into_iter()
        .filter(|t| seen.insert(t.to_ascii_lowercase()))
        .collect()
}

/// Query-understanding collaborator consumed by the orchestrator.
///
/// Implementations wrap an LLM; tests substitute doubles.
#[async_trait]
pub trait QueryUnderstanding: Send + Sync {
    /// Interpret a raw query into a retrieval intent.
    async fn understand(&self, raw_query: &str) -> Result<RetrievalIntent, IntentError>;

    /// Clean the query and propose alternates; the first element is the
    /// cleaned single-phrase form of the input.
    async fn preprocess(&self, raw_query: &str) -> Result<Vec<String>, IntentError>;

    /// Short refinement suggestions ("filter chips") for broad queries.
    async fn filter_chips(&self, raw_query: &str) -> Result<Vec<String>, IntentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_intent_is_neutral() {
        let intent = RetrievalIntent::degraded("rust web framework");
        assert_eq!(intent.rewritten_query, "rust web framework");
        assert!(!intent.vector_search_required);
        assert!(intent.filters.is_empty());
    }

    #[test]
    fn test_filters_is_empty() {
        let mut f = IntentFilters::default();
        assert!(f.is_empty());
        f.stars_min = Some(500);
        assert!(!f.is_empty());
    }

    #[test]
    fn test_suggested_topics_dedupes_case_insensitively() {
        let f = IntentFilters {
            language: Some("Python".to_string()),
            libraries: vec!["pytorch".to_string(), "python".to_string()],
            topics: vec!["nlp".to_string()],
            ..Default::default()
        };
        let topics = suggested_topics(&f);
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0], "Python");
    }

    #[test]
    fn test_intent_deserializes_wire_names() {
        let intent: RetrievalIntent = serde_json::from_str(
            r#"{
                "intent": "search_repository",
                "filters": {
                    "language": "rust",
                    "libraries": [],
                    "created_after": null,
                    "created_before": null,
                    "stars_min": 500,
                    "topics": ["cli"]
                },
                "query_vector_required": true,
                "rewritten_query": ""
            }"#,
        )
        .unwrap();
        assert!(intent.vector_search_required);
        assert_eq!(intent.filters.stars_min, Some(500));
        assert_eq!(intent.filters.language.as_deref(), Some("rust"));
    }
}
