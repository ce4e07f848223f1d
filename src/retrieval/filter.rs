//! Post-filtering for the vector channel
//!
//! The lexical channel enforces intent filters natively in its query; vector
//! hits carry only payloads, so the same filters are applied here after
//! decoding. All clauses are conjunctive.

use crate::intent::IntentFilters;
use crate::model::RepoDoc;

/// Apply intent filters to vector-channel results.
///
/// Tag comparisons (language, topics, libraries) are case-insensitive; star
/// and date comparisons are exact. Date bounds use lexical comparison on
/// `YYYY-MM-DD` strings, which is ordering-safe for ISO dates; a missing
/// date fails any date bound.
pub fn apply_filters(results: Vec<RepoDoc>, filters: &IntentFilters) -> Vec<RepoDoc> {
    results
        .into_iter()
        .filter(|doc| matches_filters(doc, filters))
        .collect()
}

fn matches_filters(doc: &RepoDoc, filters: &IntentFilters) -> bool {
    if let Some(stars_min) = filters.stars_min {
        if doc.metadata.stars < stars_min {
            return false;
        }
    }

    let date = doc.created_date();

    if let Some(after) = filters.created_after.as_deref() {
        if date.is_empty() || date < after {
            return false;
        }
    }

    if let Some(before) = filters.created_before.as_deref() {
        if date.is_empty() || date > before {
            return false;
        }
    }

    if let Some(language) = filters.language.as_deref() {
        if !doc.tags.iter().any(|t| t.eq_ignore_ascii_case(language)) {
            return false;
        }
    }

    if !filters.topics.is_empty() && !has_overlap(&doc.tags, &filters.topics) {
        return false;
    }

    if !filters.libraries.is_empty() && !has_overlap(&doc.tags, &filters.libraries) {
        return false;
    }

    true
}

/// Case-insensitive set overlap between a document's tags and filter values.
fn has_overlap(tags: &[String], wanted: &[String]) -> bool {
    wanted
        .iter()
        .any(|w| tags.iter().any(|t| t.eq_ignore_ascii_case(w)))
}
