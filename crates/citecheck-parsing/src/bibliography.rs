//! Bibliography segmentation.
//!
//! Entries are anchored on a parenthesized four-digit year such as
//! `Smith, J. (2019).` or `王新衡（2024）。`. Lines without such a year are
//! continuation lines of the entry above them.

use once_cell::sync::Lazy;
use regex::Regex;

use citecheck_core::{BibEntry, Bibliography, CheckConfig, entry_keywords};

/// The bracket pairs accepted around a bibliography year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketStyle {
    /// ASCII `(` `)`.
    HalfWidth,
    /// CJK full-width `（` `）`.
    FullWidth,
}

impl BracketStyle {
    pub const ALL: [BracketStyle; 2] = [BracketStyle::HalfWidth, BracketStyle::FullWidth];

    pub fn open(self) -> char {
        match self {
            Self::HalfWidth => '(',
            Self::FullWidth => '（',
        }
    }

    pub fn close(self) -> char {
        match self {
            Self::HalfWidth => ')',
            Self::FullWidth => '）',
        }
    }

    fn from_open(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.open() == c)
    }
}

/// Any opening bracket, four digits, any closing bracket. Mixed pairs such as
/// `（2019)` are accepted since bibliographies typed with an IME often mix them.
static YEAR_PAREN_RE: Lazy<Regex> = Lazy::new(|| {
    let opens: String = BracketStyle::ALL
        .iter()
        .map(|s| regex::escape(&s.open().to_string()))
        .collect();
    let closes: String = BracketStyle::ALL
        .iter()
        .map(|s| regex::escape(&s.close().to_string()))
        .collect();
    Regex::new(&format!(r"[{opens}](\d{{4}})[{closes}]")).unwrap()
});

/// One trailing punctuation mark (half- or full-width) and any whitespace after it.
static TRAILING_PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.,;，。；、]\s*$").unwrap());

/// A located year parenthesis, normalized across bracket styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearParen<'a> {
    pub year: &'a str,
    /// Byte offset of the opening bracket.
    pub start: usize,
    /// Byte offset just past the closing bracket.
    pub end: usize,
    /// Style of the opening bracket.
    pub style: BracketStyle,
}

/// Find the first parenthesized four-digit year in `text`.
pub fn find_year_paren(text: &str) -> Option<YearParen<'_>> {
    let caps = YEAR_PAREN_RE.captures(text)?;
    let whole = caps.get(0)?;
    let year = caps.get(1)?;
    let style = text[whole.start()..]
        .chars()
        .next()
        .and_then(BracketStyle::from_open)?;
    Some(YearParen {
        year: year.as_str(),
        start: whole.start(),
        end: whole.end(),
        style,
    })
}

enum SegmentState {
    NoEntry,
    InEntry(String),
}

/// Split bibliography text into raw entry strings.
///
/// A non-blank line with a parenthesized year starts a new entry (closing
/// the previous one). A non-blank line without a year is appended to the
/// current entry with a single space, or ignored if no entry has started
/// yet (section headings). Blank lines are ignored.
pub fn segment_raw_entries(text: &str) -> Vec<String> {
    let mut raw = Vec::new();
    let mut state = SegmentState::NoEntry;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let starts_entry = YEAR_PAREN_RE.is_match(line);

        state = match (state, starts_entry) {
            (SegmentState::NoEntry, true) => SegmentState::InEntry(line.to_string()),
            (SegmentState::NoEntry, false) => {
                tracing::trace!(line, "ignoring line outside any entry");
                SegmentState::NoEntry
            }
            (SegmentState::InEntry(current), true) => {
                raw.push(current);
                SegmentState::InEntry(line.to_string())
            }
            (SegmentState::InEntry(mut current), false) => {
                current.push(' ');
                current.push_str(line);
                SegmentState::InEntry(current)
            }
        };
    }

    if let SegmentState::InEntry(current) = state {
        raw.push(current);
    }
    raw
}

/// Turn one raw entry into a [`BibEntry`]. Returns `None` when the entry has
/// no locatable year parenthesis.
pub fn parse_entry(raw: &str, config: &CheckConfig) -> Option<BibEntry> {
    let paren = find_year_paren(raw)?;
    let pre_text = TRAILING_PUNCT_RE
        .replace(raw[..paren.start].trim(), "")
        .into_owned();
    let keywords = entry_keywords(&pre_text, config);

    Some(BibEntry {
        original_text: raw.to_string(),
        year: paren.year.to_string(),
        pre_text,
        keywords,
    })
}

/// Segment a bibliography and build its entries.
///
/// Malformed raw entries are dropped and counted; entries without keywords
/// are kept (they will be reported as not found).
pub fn segment_bibliography(text: &str, config: &CheckConfig) -> Bibliography {
    let raw_entries = segment_raw_entries(text);
    let mut bibliography = Bibliography::default();
    bibliography.stats.raw_entries = raw_entries.len();

    for raw in &raw_entries {
        match parse_entry(raw, config) {
            Some(entry) => {
                if !entry.has_keywords() {
                    tracing::debug!(entry = %entry.original_text, "entry has no keywords");
                    bibliography.stats.empty_keywords += 1;
                }
                bibliography.entries.push(entry);
            }
            None => {
                tracing::debug!(entry = %raw, "discarding entry without a year parenthesis");
                bibliography.stats.malformed += 1;
            }
        }
    }

    tracing::debug!(
        raw = bibliography.stats.raw_entries,
        kept = bibliography.entries.len(),
        "bibliography segmented"
    );
    bibliography
}
