use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod config;
pub mod config_file;
pub mod keywords;
pub mod matching;

// Re-export for convenience
pub use config::{CheckConfig, CheckConfigBuilder, ConfigError};
pub use keywords::{entry_keywords, extract_keywords};
pub use matching::match_entries;

/// A keyword set. Ordered so reports and JSON output are stable across runs.
pub type Keywords = BTreeSet<String>;

/// One logical bibliography record, possibly spanning several source lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibEntry {
    /// The trimmed source line(s) forming the entry, joined with single spaces.
    pub original_text: String,
    /// Four-digit year taken from the first parenthesized year.
    pub year: String,
    /// Text before the year parenthesis, trailing punctuation removed.
    pub pre_text: String,
    pub keywords: Keywords,
}

impl BibEntry {
    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }
}

/// A line of year-context output that looks like it carries a citation marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snippet {
    pub text: String,
}

impl Snippet {
    /// Build a snippet from a raw line. Returns `None` unless the trimmed line
    /// contains both a `[` and a `]`.
    pub fn from_line(line: &str) -> Option<Self> {
        let text = line.trim();
        if text.contains('[') && text.contains(']') {
            Some(Self {
                text: text.to_string(),
            })
        } else {
            None
        }
    }

    pub fn keywords(&self, config: &CheckConfig) -> Keywords {
        extract_keywords(&self.text, config)
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A detected year token in the manuscript together with its surrounding text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearContext {
    pub year: String,
    pub before: String,
    pub after: String,
    /// Character (not byte) offset of the year token in the manuscript.
    pub position: usize,
}

impl YearContext {
    /// The full window: `before + year + after`.
    pub fn window(&self) -> String {
        format!("{}{}{}", self.before, self.year, self.after)
    }

    /// The line format used by extraction reports: `...before[year] after...`.
    ///
    /// Snippets are read back from this format, so the year is always
    /// bracketed.
    pub fn marked_line(&self) -> String {
        format!("...{}[{}] {}...", self.before, self.year, self.after)
    }
}

/// Output of the year-context extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearExtraction {
    /// Deduplicated contexts in order of first occurrence.
    pub contexts: Vec<YearContext>,
    /// Number of year tokens found before deduplication.
    pub total_occurrences: usize,
}

/// Statistics about raw entries seen during bibliography segmentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentStats {
    pub raw_entries: usize,
    /// Raw entries discarded because no year parenthesis was found on re-parse.
    pub malformed: usize,
    /// Retained entries whose keyword set is empty (they can never match).
    pub empty_keywords: usize,
}

/// Result of segmenting a bibliography.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bibliography {
    pub entries: Vec<BibEntry>,
    pub stats: SegmentStats,
}

/// A bibliography entry with the manuscript snippets that cite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub entry: BibEntry,
    /// Evidence snippets in scan order.
    pub evidence: Vec<Snippet>,
    /// Union of the keyword intersections across all evidence snippets.
    pub matched_keywords: Keywords,
}

/// Partition of the bibliography into matched and unmatched entries.
/// Both lists keep bibliography order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckResults {
    pub matches: Vec<MatchResult>,
    pub not_found: Vec<BibEntry>,
}

impl CheckResults {
    pub fn total(&self) -> usize {
        self.matches.len() + self.not_found.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_requires_both_brackets() {
        assert!(Snippet::from_line("  1. ...see [2020] here...").is_some());
        assert!(Snippet::from_line("no brackets 2020").is_none());
        assert!(Snippet::from_line("only [ open 2020").is_none());
        assert!(Snippet::from_line("only ] close 2020").is_none());
    }

    #[test]
    fn snippet_text_is_trimmed() {
        let s = Snippet::from_line("   ...a[2020] b...  \n").unwrap();
        assert_eq!(s.text, "...a[2020] b...");
    }

    #[test]
    fn marked_line_brackets_year() {
        let ctx = YearContext {
            year: "2024".into(),
            before: "王新衡（".into(),
            after: "）指出".into(),
            position: 4,
        };
        assert_eq!(ctx.window(), "王新衡（2024）指出");
        assert_eq!(ctx.marked_line(), "...王新衡（[2024] ）指出...");
    }
}
