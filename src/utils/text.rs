use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]").expect("static regex compile"));

/// Basic shape statistics of a text, reported alongside summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStats {
    pub char_count: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_word_length: f64,
}

#[must_use]
pub fn text_stats(text: &str) -> TextStats {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentence_count = SENTENCE_SPLIT_RE
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count();

    let avg_word_length = if words.is_empty() {
        0.0
    } else {
        let total: usize = words.iter().map(|w| w.chars().count()).sum();
        let avg = total as f64 / words.len() as f64;
        (avg * 100.0).round() / 100.0
    };

    TextStats {
        char_count: text.chars().count(),
        word_count: words.len(),
        sentence_count,
        avg_word_length,
    }
}

/// Truncates to at most `max_length` characters without cutting a word in
/// half, marking the cut with `...`.
#[must_use]
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let head: String = text.chars().take(max_length).collect();
    let kept = match head.rsplit_once(' ') {
        Some((before, _)) => before,
        None => head.as_str(),
    };
    format!("{kept}...")
}
