//! LLM-backed query understanding adapter
//!
//! Wraps a raw text-generation client, sends fixed instruction templates
//! requesting strict JSON, and parses the responses defensively. A response
//! that cannot be parsed surfaces as [`IntentError`]; the orchestrator
//! degrades to a neutral intent instead of failing the request.

use crate::clients::LlmClient;
use crate::intent::{IntentError, IntentFilters, QueryUnderstanding, RetrievalIntent};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use std::sync::OnceLock;

const UNDERSTAND_PROMPT: &str = r#"You are a natural language understanding agent that interprets user queries about code repositories.

Given a user query, extract the following fields and return strict, valid JSON:

{
  "intent": "search_repository",
  "filters": {
    "language": "<language_or_null>",
    "libraries": ["<libraries_or_empty_array>"],
    "created_after": "<yyyy-mm-dd_or_null>",
    "created_before": "<yyyy-mm-dd_or_null>",
    "stars_min": <number_or_null>,
    "topics": ["<topics_or_empty_array>"]
  },
  "query_vector_required": <true_or_false>,
  "rewritten_query": "<text_to_use_for_tag_or_phrase_search>"
}

Guidelines:
- Always extract filters such as language, libraries, stars_min, created_after, created_before, topics.
- If the query mentions stars directly (e.g. "more than 20 stars"), extract the value into stars_min.
- If the query implies popularity (e.g. "popular", "top", "most starred"), use a default of stars_min = 500.
- The "rewritten_query" field is used to search title, short description and tags.
- Only include rewritten_query if it contains meaningful, precise domain-specific phrases; avoid vague or generic words.
- Do NOT include stars_min, created_after or created_before in rewritten_query.
- If the user query is vague, ambiguous, or exploratory, set query_vector_required = true and rewritten_query = "".
- If the query contains clear filters or domain-specific keywords, prefer query_vector_required = false with a meaningful rewritten_query.
- Output must be strict, valid JSON. No comments, no markdown, no explanation.

User query: "{query}"
"#;

const PREPROCESS_PROMPT: &str = r#"You are a query preprocessing agent.

Given a user search query, do the following:
1. Preprocess the original query: lowercase, remove punctuation and stopwords. Do not remove diacritics.
2. Generate 5 alternative search queries that are semantically similar to the cleaned query.
3. Return a JSON array with 6 total queries (the first is the cleaned original, the next 5 are similar queries).
4. All queries in the array must be preprocessed the same way.

Output must be a strict JSON array of 6 strings, nothing else.

User query: "{query}"
"#;

const FILTER_CHIPS_PROMPT: &str = r#"You are a filter suggestion assistant for a code repository search interface.

Given a vague or broad user query, return 5 short, distinct, clickable filter chips that help refine search results.

These filters should be:
- Based on common technologies, frameworks, use cases, or repository attributes.
- Useful for filtering results without modifying the original query.
- Each filter must be under 6 words.
- Do NOT repeat or rephrase the original query.

If the original query is already very specific, return an empty list.

Output a strict JSON object: {"related_queries": ["chip 1", "chip 2", ...]}

User query: "{query}"
"#;

/// Extract the JSON body of an LLM response.
///
/// Accepts either a fenced ```json block or a bare JSON object/array.
pub(crate) fn extract_json(raw: &str) -> Result<String, IntentError> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(\{.*\}|\[.*\])\s*```").expect("valid regex")
    });

    let trimmed = raw.trim();
    if let Some(captures) = fence.captures(trimmed) {
        return Ok(captures[1].to_string());
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed.to_string());
    }
    Err(IntentError::Parse(
        "no JSON object or array found in response".to_string(),
    ))
}

/// Query understanding backed by a text-generation client.
pub struct LlmQueryUnderstanding {
    llm: Arc<dyn LlmClient>,
}

impl LlmQueryUnderstanding {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    async fn generate(&self, template: &str, query: &str) -> Result<String, IntentError> {
        let prompt = template.replace("{query}", &crate::intent::normalize_query(query));
        self.llm
            .generate(&prompt)
            .await
            .map_err(|e| IntentError::Llm(e.to_string()))
    }
}

#[async_trait]
impl QueryUnderstanding for LlmQueryUnderstanding {
    async fn understand(&self, raw_query: &str) -> Result<RetrievalIntent, IntentError> {
        let response = self.generate(UNDERSTAND_PROMPT, raw_query).await?;
        let json = extract_json(&response)?;
        let intent: RetrievalIntent =
            serde_json::from_str(&json).map_err(|e| IntentError::Parse(e.to_string()))?;
        Ok(tidy_intent(intent))
    }

    async fn preprocess(&self, raw_query: &str) -> Result<Vec<String>, IntentError> {
        let response = self.generate(PREPROCESS_PROMPT, raw_query).await?;
        let json = extract_json(&response)?;
        let queries: Vec<String> =
            serde_json::from_str(&json).map_err(|e| IntentError::Parse(e.to_string()))?;
        if queries.len() != 6 {
            return Err(IntentError::Parse(format!(
                "expected 6 queries, got {}",
                queries.len()
            )));
        }
        Ok(queries)
    }

    async fn filter_chips(&self, raw_query: &str) -> Result<Vec<String>, IntentError> {
        #[derive(serde::Deserialize)]
        struct Chips {
            #[serde(default)]
            related_queries: Vec<String>,
        }

        let response = self.generate(FILTER_CHIPS_PROMPT, raw_query).await?;
        let json = extract_json(&response)?;
        let chips: Chips =
            serde_json::from_str(&json).map_err(|e| IntentError::Parse(e.to_string()))?;
        Ok(chips.related_queries)
    }
}

/// Normalize an intent fresh off the wire: models sometimes emit empty
/// strings where null was requested.
fn tidy_intent(mut intent: RetrievalIntent) -> RetrievalIntent {
    fn prune(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.trim().is_empty())
    }

    let filters = IntentFilters {
        language: prune(intent.filters.language),
        libraries: drop_blank(intent.filters.libraries),
        topics: drop_blank(intent.filters.topics),
        stars_min: intent.filters.stars_min,
        created_after: prune(intent.filters.created_after),
        created_before: prune(intent.filters.created_before),
    };
    intent.filters = filters;
    intent.rewritten_query = intent.rewritten_query.trim().to_string();
    intent
}

fn drop_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    struct CannedLlm {
        response: String,
    }

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.response.clone())
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    fn adapter(response: &str) -> LlmQueryUnderstanding {
        LlmQueryUnderstanding::new(Arc::new(CannedLlm {
            response: response.to_string(),
        }))
    }

    #[test]
    fn test_extract_json_from_fence() {
        let raw = "Here you go:\n```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json(raw).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_bare_object() {
        assert_eq!(extract_json("  {\"a\": 1} ").unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_bare_array() {
        assert_eq!(extract_json("[1, 2]").unwrap(), "[1, 2]");
    }

    #[test]
    fn test_extract_json_prose_fails() {
        assert!(extract_json("I could not parse that query.").is_err());
    }

    #[tokio::test]
    async fn test_understand_parses_intent() {
        let a = adapter(
            r#"```json
{
  "intent": "search_repository",
  "filters": {
    "language": "rust",
    "libraries": [""],
    "created_after": "",
    "created_before": null,
    "stars_min": 500,
    "topics": ["web"]
  },
  "query_vector_required": false,
  "rewritten_query": " actix web framework "
}
```"#,
        );
        let intent = a.understand("popular rust web framework").await.unwrap();
        assert_eq!(intent.rewritten_query, "actix web framework");
        assert!(!intent.vector_search_required);
        assert_eq!(intent.filters.stars_min, Some(500));
        // blank strings pruned
        assert!(intent.filters.libraries.is_empty());
        assert!(intent.filters.created_after.is_none());
    }

    #[tokio::test]
    async fn test_understand_malformed_json_is_parse_error() {
        let a = adapter("```json\n{\"filters\": \"oops\"}\n```");
        assert!(matches!(
            a.understand("anything").await,
            Err(IntentError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_understand_llm_failure_is_llm_error() {
        let a = LlmQueryUnderstanding::new(Arc::new(FailingLlm));
        assert!(matches!(
            a.understand("anything").await,
            Err(IntentError::Llm(_))
        ));
    }

    #[tokio::test]
    async fn test_preprocess_requires_six_queries() {
        let a = adapter(r#"["rust cli", "rust terminal", "rust tool"]"#);
        assert!(a.preprocess("Rust CLI!").await.is_err());

        let a = adapter(r#"["a", "b", "c", "d", "e", "f"]"#);
        let queries = a.preprocess("whatever").await.unwrap();
        assert_eq!(queries.len(), 6);
        assert_eq!(queries[0], "a");
    }

    #[tokio::test]
    async fn test_filter_chips() {
        let a = adapter(r#"{"related_queries": ["pytorch", "computer vision"]}"#);
        let chips = a.filter_chips("machine learning").await.unwrap();
        assert_eq!(chips, vec!["pytorch", "computer vision"]);
    }
}
