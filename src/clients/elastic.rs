//! Elasticsearch lexical index client
//!
//! Builds the boolean query bodies for filtered search. Tag filters
//! (language, libraries, topics) are OR'd into a single required block: when
//! any tag filters exist, at least one must match. Phrase clauses gate the
//! result only when they are the sole scoring clauses; next to a tag block
//! they just boost relevance.

use crate::clients::LexicalIndex;
use crate::intent::IntentFilters;
use crate::model::RepoDoc;
use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexicalIndexError {
    #[error("lexical search request failed: {0}")]
    Request(String),

    #[error("lexical index returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode lexical search response: {0}")]
    Decode(String),
}

/// Plain multi-match body used when the intent carries no filters.
fn multi_match_query(phrase: &str, size: usize) -> Value {
    json!({
        "query": {
            "multi_match": {
                "query": phrase,
                "fields": ["title^3", "short_des", "tags"]
            }
        },
        "size": size
    })
}

/// Boolean body combining phrase boosts, tag requirements and range filters.
fn filtered_query(filters: &IntentFilters, phrase: &str, size: usize) -> Value {
    let mut filter_clauses: Vec<Value> = Vec::new();

    if let Some(stars_min) = filters.stars_min {
        filter_clauses.push(json!({
            "range": { "meta_data.stars": { "gte": stars_min } }
        }));
    }

    if filters.created_after.is_some() || filters.created_before.is_some() {
        let mut range = serde_json::Map::new();
        if let Some(after) = &filters.created_after {
            range.insert("gte".to_string(), json!(after));
        }
        if let Some(before) = &filters.created_before {
            range.insert("lte".to_string(), json!(before));
        }
        filter_clauses.push(json!({ "range": { "date": Value::Object(range) } }));
    }

    let mut phrase_clauses: Vec<Value> = Vec::new();
    if !phrase.is_empty() {
        for (field, boost) in [
            ("title", 5),
            ("meta_data.owner", 5),
            ("short_des", 2),
            ("tags", 1),
        ] {
            phrase_clauses.push(json!({
                "match_phrase": { field: { "query": phrase, "boost": boost } }
            }));
        }
    }

    let tag_clauses: Vec<Value> = filters
        .tag_filters()
        .iter()
        .map(|tag| {
            json!({
                "bool": {
                    "should": [
                        { "term": { "tags.keyword": tag } },
                        { "match_phrase": { "title": tag } },
                        { "match_phrase": { "short_des": tag } }
                    ],
                    "minimum_should_match": 1
                }
            })
        })
        .collect();

    let mut bool_query = serde_json::Map::new();

    if !tag_clauses.is_empty() {
        // at least one of the provided tag filters must match
        bool_query.insert(
            "must".to_string(),
            json!([{
                "bool": { "should": tag_clauses, "minimum_should_match": 1 }
            }]),
        );
    }

    if !phrase_clauses.is_empty() {
        let gate = if bool_query.contains_key("must") { 0 } else { 1 };
        bool_query.insert("should".to_string(), json!(phrase_clauses));
        bool_query.insert("minimum_should_match".to_string(), json!(gate));
    }

    if !filter_clauses.is_empty() {
        bool_query.insert("filter".to_string(), json!(filter_clauses));
    }

    if bool_query.is_empty() {
        return json!({ "query": { "match_all": {} }, "size": size });
    }

    json!({ "query": { "bool": Value::Object(bool_query) }, "size": size })
}

fn tag_query(tag: &str, size: usize) -> Value {
    json!({
        "query": { "match": { "tags": tag } },
        "size": size
    })
}

pub struct ElasticHttpClient {
    http: reqwest::Client,
    url: String,
}

impl ElasticHttpClient {
    pub fn new(http: reqwest::Client, url: String) -> Self {
        Self { http, url }
    }

    fn search_url(&self, collection: &str) -> String {
        format!("{}/{}/_search", self.url.trim_end_matches('/'), collection)
    }

    async fn execute(&self, collection: &str, body: Value) -> Result<Vec<RepoDoc>, LexicalIndexError> {
        let response = self
            .http
            .post(self.search_url(collection))
            .json(&body)
            .send()
            .await
            .map_err(|e| LexicalIndexError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LexicalIndexError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LexicalIndexError::Decode(e.to_string()))?;

        Ok(decode_hits(&body))
    }
}

/// Decode `hits.hits` into documents, skipping records that do not fit the
/// schema.
fn decode_hits(response: &Value) -> Vec<RepoDoc> {
    let Some(hits) = response
        .pointer("/hits/hits")
        .and_then(|h| h.as_array())
    else {
        return Vec::new();
    };

    hits.iter()
        .filter_map(|hit| {
            let source = hit.get("_source")?.clone();
            let score = hit.get("_score").and_then(|s| s.as_f64()).unwrap_or(0.0);
            RepoDoc::from_payload(source, score)
        })
        .collect()
}

#[async_trait]
impl LexicalIndex for ElasticHttpClient {
    async fn search(
        &self,
        collection: &str,
        filters: &IntentFilters,
        phrase: &str,
        limit: usize,
    ) -> Result<Vec<RepoDoc>, LexicalIndexError> {
        let body = if filters.is_empty() {
            multi_match_query(phrase, limit)
        } else {
            filtered_query(filters, phrase, limit)
        };
        self.execute(collection, body).await
    }

    async fn search_by_tag(
        &self,
        collection: &str,
        tag: &str,
        limit: usize,
    ) -> Result<Vec<RepoDoc>, LexicalIndexError> {
        self.execute(collection, tag_query(tag, limit)).await
    }
}
