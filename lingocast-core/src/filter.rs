//! Word filters applied to utterances before translation.
//!
//! Streamers use these to mask or rewrite words the recognizer keeps getting
//! wrong, or that should never reach the overlay. Replacement is whole-word
//! and case-aware, so a filter `brb → be right back` also fixes `Brb`.

use serde::{Deserialize, Serialize};

/// One rewrite rule from the settings panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordFilter {
    pub id: String,
    /// Word or phrase to match, whole-word, case-insensitive.
    pub pattern: String,
    pub replacement: String,
    pub is_active: bool,
}

/// Run every active filter over `text`, in panel order.
pub fn apply_filters(text: &str, filters: &[WordFilter]) -> String {
    let mut out = text.to_string();
    for filter in filters.iter().filter(|f| f.is_active) {
        let pattern = filter.pattern.trim();
        if pattern.is_empty() {
            continue;
        }
        out = replace_word_case_aware(&out, pattern, filter.replacement.trim());
    }
    out
}

/// Replace whole-word occurrences of `needle`, matching case-insensitively
/// and carrying the source casing onto the replacement.
fn replace_word_case_aware(text: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() || text.is_empty() {
        return text.to_string();
    }
    let needle_lower = needle.to_lowercase();
    let needle_len = needle.chars().count();
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0usize;
    while i < chars.len() {
        let rem: String = chars[i..].iter().collect();
        if rem.to_lowercase().starts_with(&needle_lower) {
            let start_ok = i == 0 || !is_word_char(chars[i - 1]);
            let end_idx = i + needle_len;
            let end_ok = end_idx >= chars.len() || !is_word_char(chars[end_idx]);
            if start_ok && end_ok {
                let matched: String = chars[i..end_idx.min(chars.len())].iter().collect();
                out.push_str(&carry_case(&matched, replacement));
                i = end_idx;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

fn carry_case(source: &str, replacement: &str) -> String {
    if !source.is_empty() && source.chars().all(|c| !c.is_lowercase()) {
        return replacement.to_uppercase();
    }
    if source.chars().next().is_some_and(|c| c.is_uppercase()) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(pattern: &str, replacement: &str, is_active: bool) -> WordFilter {
        WordFilter {
            id: format!("f-{pattern}"),
            pattern: pattern.into(),
            replacement: replacement.into(),
            is_active,
        }
    }

    #[test]
    fn active_filter_replaces_whole_words() {
        let filters = [filter("brb", "be right back", true)];
        assert_eq!(
            apply_filters("ok brb chat", &filters),
            "ok be right back chat"
        );
    }

    #[test]
    fn inactive_filters_are_skipped() {
        let filters = [filter("brb", "be right back", false)];
        assert_eq!(apply_filters("ok brb chat", &filters), "ok brb chat");
    }

    #[test]
    fn partial_word_matches_are_left_alone() {
        let filters = [filter("cat", "dog", true)];
        assert_eq!(apply_filters("catalog cat", &filters), "catalog dog");
    }

    #[test]
    fn casing_is_carried_from_the_source() {
        let filters = [filter("brb", "be right back", true)];
        assert_eq!(apply_filters("Brb chat", &filters), "Be right back chat");
        assert_eq!(apply_filters("BRB", &filters), "BE RIGHT BACK");
    }

    #[test]
    fn filters_apply_in_panel_order() {
        let filters = [filter("uh", "", true), filter("like", "", true)];
        assert_eq!(apply_filters("uh so like yeah", &filters), " so  yeah");
    }

    #[test]
    fn empty_pattern_is_ignored() {
        let filters = [filter("  ", "x", true)];
        assert_eq!(apply_filters("hola", &filters), "hola");
    }
}
