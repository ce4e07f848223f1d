//! Qdrant vector index client (REST)

use crate::clients::{ScoredPoint, VectorIndex};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorIndexError {
    #[error("vector search request failed: {0}")]
    Request(String),

    #[error("vector index returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode vector search response: {0}")]
    Decode(String),
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    #[serde(default)]
    payload: serde_json::Value,
    #[serde(default)]
    score: f64,
}

pub struct QdrantHttpClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl QdrantHttpClient {
    pub fn new(http: reqwest::Client, url: String, api_key: Option<String>) -> Self {
        Self { http, url, api_key }
    }

    fn search_url(&self, collection: &str) -> String {
        format!(
            "{}/collections/{}/points/search",
            self.url.trim_end_matches('/'),
            collection
        )
    }
}

#[async_trait]
impl VectorIndex for QdrantHttpClient {
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, VectorIndexError> {
        let mut request = self.http.post(self.search_url(collection)).json(&SearchRequest {
            vector,
            limit,
            with_payload: true,
        });
        if let Some(api_key) = &self.api_key {
            request = request.header("api-key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VectorIndexError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorIndexError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| VectorIndexError::Decode(e.to_string()))?;

        Ok(body
            .result
            .into_iter()
            .map(|hit| ScoredPoint {
                payload: hit.payload,
                score: hit.score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let c = QdrantHttpClient::new(
            reqwest::Client::new(),
            "http://localhost:6333/".to_string(),
            None,
        );
        assert_eq!(
            c.search_url("repos"),
            "http://localhost:6333/collections/repos/points/search"
        );
    }

    #[test]
    fn test_response_decoding() {
        let raw = r#"{
            "result": [
                {"payload": {"title": "x", "meta_data": {"id": 7}}, "score": 0.91},
                {"score": 0.5}
            ]
        }"#;
        let resp: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.result.len(), 2);
        assert_eq!(resp.result[0].score, 0.91);
        assert!(resp.result[1].payload.is_null());
    }
}
