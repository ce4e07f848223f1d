//! Final ordering and truncation

use crate::model::RepoDoc;

/// Sort descending by score and keep the first `top` documents.
///
/// Ties have no documented secondary ordering.
pub fn rank(mut docs: Vec<RepoDoc>, top: usize) -> Vec<RepoDoc> {
    docs.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    docs.truncate(top);
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RepoDoc, RepoMetadata};

    fn doc(id: i64, score: f64) -> RepoDoc {
        RepoDoc {
            title: String::new(),
            description: String::new(),
            tags: vec![],
            date: String::new(),
            metadata: RepoMetadata {
                source_id: id,
                ..Default::default()
            },
            score,
        }
    }

    #[test]
    fn test_sorts_descending() {
        let ranked = rank(vec![doc(1, 0.1), doc(2, 0.9), doc(3, 0.5)], 10);
        let ids: Vec<i64> = ranked.iter().map(|d| d.metadata.source_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_truncates_to_top() {
        let ranked = rank(vec![doc(1, 0.1), doc(2, 0.9), doc(3, 0.5)], 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].metadata.source_id, 2);
    }

    #[test]
    fn test_returns_all_when_fewer_than_top() {
        let ranked = rank(vec![doc(1, 0.3), doc(2, 0.2), doc(3, 0.1)], 5);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(Vec::new(), 5).is_empty());
    }
}
