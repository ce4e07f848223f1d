//! Retrieval orchestration and score fusion
//!
//! Control flow: query understanding, channel selection with fallback,
//! per-channel normalization, identity merge with channel weights, trend
//! blend, final ranking.

mod filter;
mod fusion;
mod hybrid;
mod identity;
mod normalize;
mod rank;
mod trend;

pub use filter::apply_filters;
pub use fusion::{fuse, FusionError, FusionWeights};
pub use hybrid::{HybridSearcher, SearchError};
pub use identity::identity_key;
pub use normalize::normalize_scores;
pub use rank::rank;
pub use trend::{normalize_recency, normalize_stars, trend_score};

use crate::intent::RetrievalIntent;
use crate::model::RepoDoc;
use serde::{Deserialize, Serialize};

/// Ranked results together with the intent that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub results: Vec<RepoDoc>,
    pub intent: RetrievalIntent,
}
