//! Per-channel min-max score normalization

use crate::model::RepoDoc;

/// Rescale a channel's raw scores into `[0, 1]`.
///
/// When every score is equal (including single-element sets) all scores
/// become `1.0`: a channel returning a tight cluster is uniformly confident
/// and must not be penalized by a degenerate rescale.
///
/// Normalization is per channel, per request. It never sees scores from the
/// other channel or from other requests.
pub fn normalize_scores(mut docs: Vec<RepoDoc>) -> Vec<RepoDoc> {
    if docs.is_empty() {
        return docs;
    }

    let mut min = docs[0].score;
    let mut max = docs[0].score;
    for doc in &docs {
        if doc.score < min {
            min = doc.score;
        }
        if doc.score > max {
            max = doc.score;
        }
    }

    if max == min {
        for doc in &mut docs {
            doc.score = 1.0;
        }
        return docs;
    }

    for doc in &mut docs {
        doc.score = (doc.score - min) / (max - min);
    }
    docs
}
