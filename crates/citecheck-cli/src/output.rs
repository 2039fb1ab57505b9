use std::io::Write;
use std::path::Path;

use citecheck_core::{BibEntry, CheckResults, MatchResult, YearExtraction};
use citecheck_reporting::{MatchMeta, ReportOptions, ellipsize, keyword_list, segment_notes};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the console summary after writing an extraction report.
pub fn print_extraction_summary(
    w: &mut dyn Write,
    extraction: &YearExtraction,
    report_path: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "Extraction complete".bold().green())?;
    } else {
        writeln!(w, "Extraction complete")?;
    }
    writeln!(
        w,
        "Found {} year occurrences ({} shown after removing duplicates)",
        extraction.total_occurrences,
        extraction.contexts.len()
    )?;
    if color.enabled() {
        writeln!(w, "Report saved to: {}", report_path.display().cyan())?;
    } else {
        writeln!(w, "Report saved to: {}", report_path.display())?;
    }
    Ok(())
}

/// Print the match report to the console.
pub fn print_match_report(
    w: &mut dyn Write,
    results: &CheckResults,
    meta: &MatchMeta,
    opts: &ReportOptions,
    color: ColorMode,
) -> std::io::Result<()> {
    print_preamble(w, results, meta, color)?;

    let sep = "=".repeat(80);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", "Match report".bold())?;
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{} {}", "✔ Matched:".green(), results.matches.len())?;
        writeln!(w, "{} {}", "✖ Not found:".red(), results.not_found.len())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "Match report")?;
        writeln!(w, "{}", sep)?;
        writeln!(w, "✔ Matched: {}", results.matches.len())?;
        writeln!(w, "✖ Not found: {}", results.not_found.len())?;
    }
    writeln!(w)?;

    if !results.matches.is_empty() {
        if color.enabled() {
            writeln!(w, "{}", "[Matched entries]".bold().green())?;
        } else {
            writeln!(w, "[Matched entries]")?;
        }
        for (i, m) in results.matches.iter().enumerate() {
            print_matched_block(w, i + 1, m, opts, color)?;
        }
    }

    if !results.not_found.is_empty() {
        let heading = "[Entries not found in the text; check whether they are cited]";
        if color.enabled() {
            writeln!(w, "{}", heading.bold().red())?;
        } else {
            writeln!(w, "{}", heading)?;
        }
        for (i, entry) in results.not_found.iter().enumerate() {
            print_not_found_block(w, i + 1, entry, opts, color)?;
        }
    }

    writeln!(w, "Done.")?;
    Ok(())
}

fn print_preamble(
    w: &mut dyn Write,
    results: &CheckResults,
    meta: &MatchMeta,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Checking bibliography entries against in-text citations")?;
    let rule = "Rule: an entry is cited when its year and a keyword from the text before the year share a snippet";
    if color.enabled() {
        writeln!(w, "{}", rule.dimmed())?;
    } else {
        writeln!(w, "{}", rule)?;
    }
    writeln!(w, "Year brackets: half-width () and full-width （）")?;
    writeln!(w)?;
    writeln!(w, "Bibliography: {}", meta.bibliography)?;
    writeln!(
        w,
        "Snippets:     {} ({} lines)",
        meta.snippet_source, meta.snippet_count
    )?;
    writeln!(w)?;
    writeln!(w, "Parsed {} bibliography entries", results.total())?;
    if let Some(notes) = segment_notes(&meta.stats) {
        if color.enabled() {
            writeln!(w, "{}", notes.yellow())?;
        } else {
            writeln!(w, "{}", notes)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

fn print_entry_heading(
    w: &mut dyn Write,
    n: usize,
    entry: &BibEntry,
    opts: &ReportOptions,
    color: ColorMode,
) -> std::io::Result<()> {
    let pre = ellipsize(&entry.pre_text, opts.display_pre_chars);
    if color.enabled() {
        writeln!(
            w,
            "{:3}. {} {}",
            n,
            format!("[{}]", entry.year).yellow(),
            pre.bold()
        )
    } else {
        writeln!(w, "{:3}. [{}] {}", n, entry.year, pre)
    }
}

fn print_matched_block(
    w: &mut dyn Write,
    n: usize,
    m: &MatchResult,
    opts: &ReportOptions,
    color: ColorMode,
) -> std::io::Result<()> {
    print_entry_heading(w, n, &m.entry, opts, color)?;
    let keywords = keyword_list(&m.matched_keywords, opts.max_matched_keywords);
    let entry_text = ellipsize(&m.entry.original_text, opts.max_entry_chars);

    if color.enabled() {
        writeln!(w, "     Matched keywords: {}", keywords.cyan())?;
        writeln!(w, "     Entry: {}", entry_text.dimmed())?;
    } else {
        writeln!(w, "     Matched keywords: {}", keywords)?;
        writeln!(w, "     Entry: {}", entry_text)?;
    }
    writeln!(w, "     Evidence (first {}):", opts.max_evidence)?;
    for snippet in m.evidence.iter().take(opts.max_evidence) {
        if color.enabled() {
            writeln!(w, "        → {}", snippet.text.green())?;
        } else {
            writeln!(w, "        → {}", snippet.text)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

fn print_not_found_block(
    w: &mut dyn Write,
    n: usize,
    entry: &BibEntry,
    opts: &ReportOptions,
    color: ColorMode,
) -> std::io::Result<()> {
    print_entry_heading(w, n, entry, opts, color)?;
    if entry.has_keywords() {
        let keywords = keyword_list(&entry.keywords, opts.max_expected_keywords);
        if color.enabled() {
            writeln!(
                w,
                "     Expected keywords (first {}): {}",
                opts.max_expected_keywords,
                keywords.cyan()
            )?;
        } else {
            writeln!(
                w,
                "     Expected keywords (first {}): {}",
                opts.max_expected_keywords, keywords
            )?;
        }
    }
    let entry_text = ellipsize(&entry.original_text, opts.max_entry_chars);
    if color.enabled() {
        writeln!(w, "     Full entry: {}", entry_text.dimmed())?;
    } else {
        writeln!(w, "     Full entry: {}", entry_text)?;
    }
    writeln!(w)?;
    Ok(())
}
