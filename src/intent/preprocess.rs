//! Local query cleanup, used before prompting and as the last fallback
//! when the LLM preprocessing step is unavailable.

use regex::Regex;
use std::sync::OnceLock;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{P}\p{S}]").expect("valid regex"))
}

/// Lowercase, strip punctuation and collapse whitespace into a single
/// search phrase.
pub fn normalize_query(query: &str) -> String {
    let lowered = query.trim().to_lowercase();
    let stripped = punctuation_re().replace_all(&lowered, " ");
    whitespace_re().replace_all(stripped.trim(), " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_collapses_whitespace() {
        assert_eq!(normalize_query("  Rust   Web\tFramework "), "rust web framework");
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(
            normalize_query("what's trending? (rust, 2025!)"),
            "what s trending rust 2025"
        );
    }

    #[test]
    fn test_preserves_accented_characters() {
        assert_eq!(normalize_query("Búsqueda Semántica"), "búsqueda semántica");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_query("   "), "");
    }
}
