use std::path::Path;

use serde::Serialize;

use citecheck_core::{BibEntry, CheckResults, Keywords, MatchResult, SegmentStats};

use crate::ReportError;
use crate::extraction::RULE_WIDTH;
use crate::types::{ExportFormat, MatchMeta, ReportOptions};

/// Truncate to at most `max_chars` characters. Returns the text and whether
/// anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((i, _)) => (&text[..i], true),
        None => (text, false),
    }
}

/// Truncated text with `...` appended when it was cut.
pub fn ellipsize(text: &str, max_chars: usize) -> String {
    match truncate_chars(text, max_chars) {
        (head, true) => format!("{head}..."),
        (head, false) => head.to_string(),
    }
}

/// The first `n` keywords, comma-separated.
pub fn keyword_list(keywords: &Keywords, n: usize) -> String {
    keywords
        .iter()
        .take(n)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line description of what segmentation dropped, if anything.
pub fn segment_notes(stats: &SegmentStats) -> Option<String> {
    let mut parts = Vec::new();
    if stats.malformed > 0 {
        parts.push(format!("{} malformed entries discarded", stats.malformed));
    }
    if stats.empty_keywords > 0 {
        parts.push(format!(
            "{} entries without keywords (cannot match)",
            stats.empty_keywords
        ));
    }
    if parts.is_empty() {
        None
    } else {
        Some(format!("({})", parts.join(", ")))
    }
}

/// Render a match report in the given format.
pub fn render_match_report(
    results: &CheckResults,
    meta: &MatchMeta,
    format: ExportFormat,
    opts: &ReportOptions,
) -> Result<String, ReportError> {
    Ok(match format {
        ExportFormat::Text => export_text(results, meta, opts),
        ExportFormat::Markdown => export_markdown(results, meta, opts),
        ExportFormat::Json => export_json(results, meta)?,
    })
}

/// Write already-rendered report content to `path`.
pub fn write_report(path: &Path, content: &str) -> Result<(), ReportError> {
    std::fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Render and write a match report in one step.
pub fn export_match_report(
    results: &CheckResults,
    meta: &MatchMeta,
    format: ExportFormat,
    opts: &ReportOptions,
    path: &Path,
) -> Result<(), ReportError> {
    let content = render_match_report(results, meta, format, opts)?;
    write_report(path, &content)
}

fn export_text(results: &CheckResults, meta: &MatchMeta, opts: &ReportOptions) -> String {
    let rule = "=".repeat(RULE_WIDTH);

    let mut out = String::from("Checking bibliography entries against in-text citations\n");
    out.push_str(
        "Rule: an entry is cited when its year and a keyword from the text before the year share a snippet\n",
    );
    out.push_str("Year brackets: half-width () and full-width （）\n\n");
    out.push_str(&format!("Bibliography: {}\n", meta.bibliography));
    out.push_str(&format!(
        "Snippets:     {} ({} lines)\n\n",
        meta.snippet_source, meta.snippet_count
    ));
    out.push_str(&format!(
        "Parsed {} bibliography entries\n",
        results.total()
    ));
    if let Some(notes) = segment_notes(&meta.stats) {
        out.push_str(&notes);
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&rule);
    out.push_str("\nMatch report\n");
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("✔ Matched: {}\n", results.matches.len()));
    out.push_str(&format!("✖ Not found: {}\n\n", results.not_found.len()));

    if !results.matches.is_empty() {
        out.push_str("[Matched entries]\n");
        for (i, m) in results.matches.iter().enumerate() {
            out.push_str(&text_matched_block(i + 1, m, opts));
        }
    }

    if !results.not_found.is_empty() {
        out.push_str("[Entries not found in the text; check whether they are cited]\n");
        for (i, entry) in results.not_found.iter().enumerate() {
            out.push_str(&text_not_found_block(i + 1, entry, opts));
        }
    }

    out.push_str("Done.\n");
    out
}

fn text_matched_block(n: usize, m: &MatchResult, opts: &ReportOptions) -> String {
    let entry = &m.entry;
    let mut out = format!(
        "{:3}. [{}] {}\n",
        n,
        entry.year,
        ellipsize(&entry.pre_text, opts.display_pre_chars)
    );
    out.push_str(&format!(
        "     Matched keywords: {}\n",
        keyword_list(&m.matched_keywords, opts.max_matched_keywords)
    ));
    out.push_str(&format!(
        "     Entry: {}\n",
        ellipsize(&entry.original_text, opts.max_entry_chars)
    ));
    out.push_str(&format!(
        "     Evidence (first {}):\n",
        opts.max_evidence
    ));
    for snippet in m.evidence.iter().take(opts.max_evidence) {
        out.push_str(&format!("        → {}\n", snippet.text));
    }
    out.push('\n');
    out
}

fn text_not_found_block(n: usize, entry: &BibEntry, opts: &ReportOptions) -> String {
    let mut out = format!(
        "{:3}. [{}] {}\n",
        n,
        entry.year,
        ellipsize(&entry.pre_text, opts.display_pre_chars)
    );
    if entry.has_keywords() {
        out.push_str(&format!(
            "     Expected keywords (first {}): {}\n",
            opts.max_expected_keywords,
            keyword_list(&entry.keywords, opts.max_expected_keywords)
        ));
    }
    out.push_str(&format!(
        "     Full entry: {}\n\n",
        ellipsize(&entry.original_text, opts.max_entry_chars)
    ));
    out
}

fn export_markdown(results: &CheckResults, meta: &MatchMeta, opts: &ReportOptions) -> String {
    let mut out = String::from("# Citation Check Results\n\n");
    out.push_str(&format!("- **Bibliography:** `{}`\n", meta.bibliography));
    out.push_str(&format!(
        "- **Snippets:** `{}` ({} lines)\n",
        meta.snippet_source, meta.snippet_count
    ));
    out.push_str(&format!(
        "- **Entries:** {} | **Matched:** {} | **Not found:** {}\n",
        results.total(),
        results.matches.len(),
        results.not_found.len()
    ));
    if let Some(notes) = segment_notes(&meta.stats) {
        out.push_str(&format!("- {}\n", notes));
    }
    out.push('\n');

    if !results.matches.is_empty() {
        out.push_str("## Matched\n\n");
        for (i, m) in results.matches.iter().enumerate() {
            out.push_str(&format!(
                "{}. **[{}]** {}\n",
                i + 1,
                m.entry.year,
                md_escape(&ellipsize(&m.entry.pre_text, opts.display_pre_chars))
            ));
            out.push_str(&format!(
                "   - Keywords: {}\n",
                md_escape(&keyword_list(&m.matched_keywords, opts.max_matched_keywords))
            ));
            for snippet in m.evidence.iter().take(opts.max_evidence) {
                out.push_str(&format!("   - > {}\n", md_escape(&snippet.text)));
            }
        }
        out.push('\n');
    }

    if !results.not_found.is_empty() {
        out.push_str("## Not Found\n\n");
        for (i, entry) in results.not_found.iter().enumerate() {
            out.push_str(&format!(
                "{}. **[{}]** {}\n",
                i + 1,
                entry.year,
                md_escape(&ellipsize(&entry.original_text, opts.max_entry_chars))
            ));
            if entry.has_keywords() {
                out.push_str(&format!(
                    "   - Expected keywords: {}\n",
                    md_escape(&keyword_list(&entry.keywords, opts.max_expected_keywords))
                ));
            } else {
                out.push_str("   - No usable keywords; check manually\n");
            }
        }
    }
    out
}

/// Escape the characters Markdown would otherwise interpret inline.
fn md_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '[' | ']' | '`' | '\\' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    bibliography: &'a str,
    snippet_source: &'a str,
    snippet_count: usize,
    segmentation: &'a SegmentStats,
    matched: usize,
    not_found_count: usize,
    matches: &'a [MatchResult],
    not_found: &'a [BibEntry],
}

fn export_json(results: &CheckResults, meta: &MatchMeta) -> Result<String, ReportError> {
    let report = JsonReport {
        bibliography: &meta.bibliography,
        snippet_source: &meta.snippet_source,
        snippet_count: meta.snippet_count,
        segmentation: &meta.stats,
        matched: results.matches.len(),
        not_found_count: results.not_found.len(),
        matches: &results.matches,
        not_found: &results.not_found,
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}
