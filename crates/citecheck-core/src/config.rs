use thiserror::Error;

/// Default number of characters captured on each side of a year token.
pub const DEFAULT_CONTEXT_CHARS: usize = 30;
/// Default minimum keyword length, in characters.
pub const DEFAULT_MIN_KEYWORD_CHARS: usize = 2;
/// Default length of the fallback keyword, in characters.
pub const DEFAULT_FALLBACK_CHARS: usize = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min_keyword_chars must be at least 1")]
    ZeroMinKeywordChars,
    #[error("fallback_chars must be at least 1")]
    ZeroFallbackChars,
}

/// Tunables for extraction and matching.
///
/// Use [`CheckConfigBuilder`] to override individual values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// Characters captured before and after each year token.
    pub(crate) context_chars: usize,
    /// Tokens shorter than this (in characters) are not keywords.
    pub(crate) min_keyword_chars: usize,
    /// Truncation length of the fallback keyword derived from an entry's pre-text.
    pub(crate) fallback_chars: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            context_chars: DEFAULT_CONTEXT_CHARS,
            min_keyword_chars: DEFAULT_MIN_KEYWORD_CHARS,
            fallback_chars: DEFAULT_FALLBACK_CHARS,
        }
    }
}

impl CheckConfig {
    pub fn context_chars(&self) -> usize {
        self.context_chars
    }

    pub fn min_keyword_chars(&self) -> usize {
        self.min_keyword_chars
    }

    pub fn fallback_chars(&self) -> usize {
        self.fallback_chars
    }
}

/// Builder for [`CheckConfig`]. Unset fields keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct CheckConfigBuilder {
    context_chars: Option<usize>,
    min_keyword_chars: Option<usize>,
    fallback_chars: Option<usize>,
}

impl CheckConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context_chars(mut self, chars: usize) -> Self {
        self.context_chars = Some(chars);
        self
    }

    pub fn min_keyword_chars(mut self, chars: usize) -> Self {
        self.min_keyword_chars = Some(chars);
        self
    }

    pub fn fallback_chars(mut self, chars: usize) -> Self {
        self.fallback_chars = Some(chars);
        self
    }

    /// Apply any values present in `other`, keeping ours where it has none.
    pub fn merge_missing(mut self, other: &CheckConfigBuilder) -> Self {
        self.context_chars = self.context_chars.or(other.context_chars);
        self.min_keyword_chars = self.min_keyword_chars.or(other.min_keyword_chars);
        self.fallback_chars = self.fallback_chars.or(other.fallback_chars);
        self
    }

    pub fn build(self) -> Result<CheckConfig, ConfigError> {
        let min_keyword_chars = self.min_keyword_chars.unwrap_or(DEFAULT_MIN_KEYWORD_CHARS);
        if min_keyword_chars == 0 {
            return Err(ConfigError::ZeroMinKeywordChars);
        }
        let fallback_chars = self.fallback_chars.unwrap_or(DEFAULT_FALLBACK_CHARS);
        if fallback_chars == 0 {
            return Err(ConfigError::ZeroFallbackChars);
        }
        Ok(CheckConfig {
            context_chars: self.context_chars.unwrap_or(DEFAULT_CONTEXT_CHARS),
            min_keyword_chars,
            fallback_chars,
        })
    }
}
