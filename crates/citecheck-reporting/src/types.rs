use std::fmt;
use std::str::FromStr;

use citecheck_core::SegmentStats;
use citecheck_core::config_file::ReportConfig;

/// File format for a match report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown format '{other}' (expected text, markdown or json)"
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Markdown => "markdown",
            Self::Json => "json",
        })
    }
}

/// Display limits for human-readable reports. JSON output is never truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Pre-text shown in entry headings, in characters.
    pub display_pre_chars: usize,
    /// Expected keywords listed for unmatched entries.
    pub max_expected_keywords: usize,
    /// Matched keywords listed for matched entries.
    pub max_matched_keywords: usize,
    /// Evidence snippets listed per matched entry.
    pub max_evidence: usize,
    /// Entry text shown, in characters.
    pub max_entry_chars: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            display_pre_chars: 60,
            max_expected_keywords: 8,
            max_matched_keywords: 10,
            max_evidence: 2,
            max_entry_chars: 120,
        }
    }
}

impl ReportOptions {
    /// Defaults overridden by whatever the `[report]` table sets.
    pub fn from_config(config: Option<&ReportConfig>) -> Self {
        let defaults = Self::default();
        let Some(c) = config else {
            return defaults;
        };
        Self {
            display_pre_chars: c.display_pre_chars.unwrap_or(defaults.display_pre_chars),
            max_expected_keywords: c
                .max_expected_keywords
                .unwrap_or(defaults.max_expected_keywords),
            max_matched_keywords: c
                .max_matched_keywords
                .unwrap_or(defaults.max_matched_keywords),
            max_evidence: c.max_evidence.unwrap_or(defaults.max_evidence),
            max_entry_chars: c.max_entry_chars.unwrap_or(defaults.max_entry_chars),
        }
    }
}

/// Header information for an extraction report.
#[derive(Debug, Clone)]
pub struct ExtractionMeta {
    pub source: String,
    pub context_chars: usize,
    /// Pre-formatted generation time.
    pub generated_at: String,
}

/// Header information for a match report.
#[derive(Debug, Clone)]
pub struct MatchMeta {
    pub bibliography: String,
    /// Where the snippets came from: an extraction report or a manuscript.
    pub snippet_source: String,
    pub snippet_count: usize,
    pub stats: SegmentStats,
}
