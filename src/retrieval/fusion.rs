//! Score fusion across the semantic and lexical channels

use crate::model::RepoDoc;
use crate::retrieval::{identity_key, normalize_scores, trend_score};
use chrono::NaiveDate;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use thiserror::Error;

const SEMANTIC_WEIGHT: f64 = 0.7;
const LEXICAL_WEIGHT: f64 = 0.3;
const RELEVANCE_WEIGHT: f64 = 0.7;
const TREND_WEIGHT: f64 = 0.3;

#[derive(Error, Debug)]
pub enum FusionError {
    #[error("invalid weight configuration: weights must be positive")]
    InvalidWeights,
}

/// Channel and blend weights for fusion.
///
/// The engine applies these as given; it does not require them to sum to 1.
#[derive(Debug, Clone)]
pub struct FusionWeights {
    /// Weight on normalized vector-channel scores.
    pub semantic: f64,

    /// Weight on normalized lexical-channel scores.
    pub lexical: f64,

    /// Weight on the fused relevance score in the final blend.
    pub relevance: f64,

    /// Weight on the trend adjustment in the final blend.
    pub trend: f64,
}

impl FusionWeights {
    pub fn new(
        semantic: f64,
        lexical: f64,
        relevance: f64,
        trend: f64,
    ) -> Result<Self, FusionError> {
        if semantic <= 0.0 || lexical <= 0.0 || relevance <= 0.0 || trend < 0.0 {
            return Err(FusionError::InvalidWeights);
        }
        Ok(Self {
            semantic,
            lexical,
            relevance,
            trend,
        })
    }
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            semantic: SEMANTIC_WEIGHT,
            lexical: LEXICAL_WEIGHT,
            relevance: RELEVANCE_WEIGHT,
            trend: TREND_WEIGHT,
        }
    }
}

/// Merge the two channels' result sets into one unordered set.
///
/// Each channel is normalized independently, then documents merge by
/// identity key. A repository found by both channels accumulates the
/// weighted contribution of each; one found by a single channel keeps only
/// that channel's contribution and is never penalized for missing the
/// other. Finally the trend adjustment is blended in:
///
/// `score = relevance * fused + trend * trend_score(doc)`
pub fn fuse(
    vector_results: Vec<RepoDoc>,
    lexical_results: Vec<RepoDoc>,
    weights: &FusionWeights,
    today: NaiveDate,
) -> Vec<RepoDoc> {
    let vector_results = normalize_scores(vector_results);
    let lexical_results = normalize_scores(lexical_results);

    let mut merged: HashMap<String, RepoDoc> = HashMap::new();

    for mut doc in vector_results {
        doc.score *= weights.semantic;
        merged.insert(identity_key(&doc), doc);
    }

    for mut doc in lexical_results {
        match merged.entry(identity_key(&doc)) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().score += weights.lexical * doc.score;
            }
            Entry::Vacant(slot) => {
                doc.score *= weights.lexical;
                slot.insert(doc);
            }
        }
    }

    merged
        .into_values()
        .map(|mut doc| {
            let trend = trend_score(&doc, today);
            doc.score = weights.relevance * doc.score + weights.trend * trend;
            doc
        })
        .collect()
}
