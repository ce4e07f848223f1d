//! Trend adjustment: popularity and recency as a secondary ranking signal

use crate::model::RepoDoc;
use chrono::NaiveDate;

/// Star count at which popularity saturates.
pub const STARS_CAP: f64 = 10_000.0;

/// Recency decays linearly to zero over this many days.
pub const RECENCY_WINDOW_DAYS: f64 = 180.0;

const STARS_WEIGHT: f64 = 0.5;
const RECENCY_WEIGHT: f64 = 0.5;

/// Popularity component: linear up to [`STARS_CAP`], capped at 1.0.
pub fn normalize_stars(stars: u64) -> f64 {
    (stars as f64 / STARS_CAP).min(1.0)
}

/// Recency component relative to `today`.
///
/// Unparseable dates score 0.0. Future dates clamp to "today". Anything
/// older than the decay window scores 0.0.
pub fn normalize_recency(date: &str, today: NaiveDate) -> f64 {
    let Ok(created) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return 0.0;
    };
    let days_ago = (today - created).num_days().max(0) as f64;
    if days_ago > RECENCY_WINDOW_DAYS {
        return 0.0;
    }
    1.0 - days_ago / RECENCY_WINDOW_DAYS
}

/// Blend of popularity and recency, in `[0, 1]` for all inputs.
pub fn trend_score(doc: &RepoDoc, today: NaiveDate) -> f64 {
    STARS_WEIGHT * normalize_stars(doc.metadata.stars)
        + RECENCY_WEIGHT * normalize_recency(doc.created_date(), today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RepoDoc, RepoMetadata};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn doc(stars: u64, date: &str) -> RepoDoc {
        RepoDoc {
            title: String::new(),
            description: String::new(),
            tags: vec![],
            date: date.to_string(),
            metadata: RepoMetadata {
                stars,
                ..Default::default()
            },
            score: 0.0,
        }
    }

    #[test]
    fn test_stars_linear_below_cap() {
        assert_eq!(normalize_stars(0), 0.0);
        assert_eq!(normalize_stars(5_000), 0.5);
    }

    #[test]
    fn test_stars_capped() {
        assert_eq!(normalize_stars(10_000), 1.0);
        assert_eq!(normalize_stars(250_000), 1.0);
    }

    #[test]
    fn test_recency_today_is_one() {
        assert_eq!(normalize_recency("2025-06-01", today()), 1.0);
    }

    #[test]
    fn test_recency_linear_decay() {
        // 90 days ago, halfway through the window
        let v = normalize_recency("2025-03-03", today());
        assert!((v - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_recency_outside_window_is_zero() {
        assert_eq!(normalize_recency("2024-01-01", today()), 0.0);
        // exactly 181 days ago
        assert_eq!(normalize_recency("2024-12-02", today()), 0.0);
    }

    #[test]
    fn test_recency_future_date_clamps_to_now() {
        assert_eq!(normalize_recency("2030-01-01", today()), 1.0);
    }

    #[test]
    fn test_recency_unparseable_is_zero() {
        assert_eq!(normalize_recency("", today()), 0.0);
        assert_eq!(normalize_recency("not-a-date", today()), 0.0);
        assert_eq!(normalize_recency("2025/06/01", today()), 0.0);
    }

    #[test]
    fn test_trend_bounds() {
        let cases = [
            doc(0, ""),
            doc(0, "garbage"),
            doc(10_000, "2025-06-01"),
            doc(u64::MAX, "2030-01-01"),
            doc(42, "1999-12-31"),
        ];
        for d in &cases {
            let t = trend_score(d, today());
            assert!((0.0..=1.0).contains(&t), "trend {} out of bounds", t);
        }
    }

    #[test]
    fn test_trend_strips_time_suffix() {
        let d = doc(0, "2025-06-01T09:57:27Z");
        assert_eq!(trend_score(&d, today()), 0.5);
    }
}
