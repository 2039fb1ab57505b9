use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use citecheck_core::{CheckConfig, YearContext, YearExtraction};

/// A standalone four-digit token in 1900–2099.
static YEAR_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:19\d{2}|20\d{2})\b").unwrap());

/// Find every year token in `text` and capture up to `context_chars`
/// characters on each side.
///
/// Windows are clipped at the text boundaries. Contexts with the same year
/// and the same full window are reported once, at their first occurrence.
/// Text without any year yields an empty extraction.
pub fn extract_year_contexts(text: &str, context_chars: usize) -> YearExtraction {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut extraction = YearExtraction::default();

    // Running character offset, advanced match by match to stay linear.
    let mut char_pos = 0;
    let mut byte_cursor = 0;

    for m in YEAR_TOKEN_RE.find_iter(text) {
        extraction.total_occurrences += 1;
        char_pos += text[byte_cursor..m.start()].chars().count();
        byte_cursor = m.start();

        let before_start = step_back(text, m.start(), context_chars);
        let after_end = step_forward(text, m.end(), context_chars);

        let context = YearContext {
            year: m.as_str().to_string(),
            before: text[before_start..m.start()].to_string(),
            after: text[m.end()..after_end].to_string(),
            position: char_pos,
        };

        if seen.insert((context.year.clone(), context.window())) {
            extraction.contexts.push(context);
        }
    }

    tracing::debug!(
        occurrences = extraction.total_occurrences,
        unique = extraction.contexts.len(),
        "year contexts extracted"
    );
    extraction
}

/// Config-aware version of [`extract_year_contexts`].
pub fn extract_year_contexts_with_config(text: &str, config: &CheckConfig) -> YearExtraction {
    extract_year_contexts(text, config.context_chars())
}

/// Byte offset `n` characters before `from`, or 0.
fn step_back(text: &str, from: usize, n: usize) -> usize {
    text[..from]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map_or(from, |(i, _)| i)
}

/// Byte offset `n` characters after `from`, or the end of the text.
fn step_forward(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| from + i)
}
