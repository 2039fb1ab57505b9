use citecheck_core::YearExtraction;

use crate::types::ExtractionMeta;

pub(crate) const RULE_WIDTH: usize = 80;

/// Render the year-context report.
///
/// Each context becomes one numbered marked line, `  n. ...before[year] after...`,
/// which is what the match step later reads back as snippets. Nothing else in
/// the report contains square brackets.
pub fn render_extraction_report(extraction: &YearExtraction, meta: &ExtractionMeta) -> String {
    let rule = "=".repeat(RULE_WIDTH);

    let mut out = format!(
        "Year contexts ({} characters before and after)\n",
        meta.context_chars
    );
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("Source: {}\n", meta.source));
    out.push_str(&format!(
        "Found {} year occurrences\n",
        extraction.total_occurrences
    ));
    out.push_str(&format!("Generated: {}\n", meta.generated_at));
    out.push_str(&rule);
    out.push_str("\n\n");

    for (i, ctx) in extraction.contexts.iter().enumerate() {
        out.push_str(&format!("{:3}. {}\n", i + 1, ctx.marked_line()));
    }

    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str("Notes:\n");
    out.push_str("  - The bracketed token is the detected year (1900-2099)\n");
    out.push_str(&format!(
        "  - Up to {} characters are shown on each side, fewer at the start or end of the file\n",
        meta.context_chars
    ));
    out.push_str("  - Identical contexts are listed once\n");
    out.push_str("  - Years inside parentheses are most likely in-text citations\n");
    out
}
