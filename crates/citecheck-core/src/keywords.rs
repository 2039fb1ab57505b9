//! Keyword extraction shared by bibliography entries and manuscript snippets.
//!
//! A keyword is either a maximal run of CJK unified ideographs or a
//! word-boundary-delimited run of Latin letters, lowercased. Tokens shorter
//! than [`CheckConfig::min_keyword_chars`] characters are dropped, so single
//! ideographs never count.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{CheckConfig, Keywords};

static CJK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{4e00}-\u{9fff}]+").unwrap());

static LATIN_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]+\b").unwrap());

/// Everything that is neither a word character nor a CJK ideograph.
static NON_KEYWORD_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\u{4e00}-\u{9fff}]").unwrap());

/// Extract the keyword set of an arbitrary text span.
pub fn extract_keywords(text: &str, config: &CheckConfig) -> Keywords {
    CJK_RUN_RE
        .find_iter(text)
        .chain(LATIN_WORD_RE.find_iter(text))
        .map(|m| m.as_str())
        .filter(|token| token.chars().count() >= config.min_keyword_chars)
        .map(str::to_lowercase)
        .collect()
}

/// Extract the keyword set of a bibliography entry's pre-text.
///
/// When no regular keyword survives and the pre-text is non-empty, a single
/// fallback token is used instead: the first `fallback_chars` word/CJK
/// characters, lowercased. A pre-text made only of punctuation still yields
/// an empty set.
pub fn entry_keywords(pre_text: &str, config: &CheckConfig) -> Keywords {
    let keywords = extract_keywords(pre_text, config);
    if !keywords.is_empty() || pre_text.is_empty() {
        return keywords;
    }

    let fallback = fallback_token(pre_text, config.fallback_chars);
    if fallback.is_empty() {
        tracing::trace!(pre_text, "no fallback keyword");
        Keywords::new()
    } else {
        Keywords::from([fallback])
    }
}

fn fallback_token(pre_text: &str, max_chars: usize) -> String {
    let cleaned = NON_KEYWORD_CHAR_RE.replace_all(pre_text, "");
    let truncated: String = cleaned.chars().take(max_chars).collect();
    truncated.to_lowercase()
}
