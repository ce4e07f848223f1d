//! Repository document model shared by both retrieval channels

use serde::{Deserialize, Serialize};

/// One candidate repository surfaced by a retrieval channel.
///
/// Wire field names follow the indexed payloads (`short_des`, `meta_data`),
/// so a document deserializes directly from an Elasticsearch `_source` or a
/// Qdrant point payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepoDoc {
    #[serde(default)]
    pub title: String,

    /// Short free-text summary, may be empty.
    #[serde(default, rename = "short_des")]
    pub description: String,

    /// Topic/language labels. Treated as a set for filtering, but insertion
    /// order is preserved for display.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation date, `YYYY-MM-DD` (payloads may carry a trailing RFC3339
    /// time part; `created_date` strips it). Empty means unknown recency.
    #[serde(default)]
    pub date: String,

    #[serde(default, rename = "meta_data")]
    pub metadata: RepoMetadata,

    /// Working score for the current pipeline stage. Channel-local at
    /// creation, rewritten in place through normalization, weighting, trend
    /// adjustment and final ranking. It carries no meaning across stages.
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepoMetadata {
    #[serde(default)]
    pub stars: u64,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub url: String,

    /// Stable cross-channel identity of the repository.
    #[serde(default, rename = "id")]
    pub source_id: i64,
}

impl RepoDoc {
    /// Decode a loosely-typed vector-channel payload into a document.
    ///
    /// Returns `None` when the payload does not fit the schema; callers skip
    /// the record rather than failing the request.
    pub fn from_payload(payload: serde_json::Value, score: f64) -> Option<Self> {
        match serde_json::from_value::<RepoDoc>(payload) {
            Ok(mut doc) => {
                doc.score = score;
                Some(doc)
            }
            Err(e) => {
                tracing::debug!("skipping undecodable payload: {}", e);
                None
            }
        }
    }

    /// Calendar-date part of `date`, with any RFC3339 time suffix removed.
    pub fn created_date(&self) -> &str {
        match self.date.split_once('T') {
            Some((day, _)) => day,
            None => &self.date,
        }
    }
}
