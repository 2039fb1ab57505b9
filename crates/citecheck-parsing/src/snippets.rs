use citecheck_core::{Snippet, YearContext};

/// Collect snippets from the lines of an extraction report (or any text).
/// Only lines containing both `[` and `]` are kept, trimmed.
pub fn snippets_from_text(text: &str) -> Vec<Snippet> {
    text.lines().filter_map(Snippet::from_line).collect()
}

/// Derive snippets directly from extracted contexts, without a report file.
///
/// Each context is rendered as its marked line and split on line breaks the
/// same way a report file would be read back, so a window spanning several
/// manuscript lines contributes only the line holding the bracketed year
/// (plus any other line that happens to contain brackets).
pub fn snippets_from_contexts(contexts: &[YearContext]) -> Vec<Snippet> {
    contexts
        .iter()
        .flat_map(|ctx| snippets_from_text(&ctx.marked_line()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lines_filtered() {
        let report = "Year contexts (30 characters each side)\n\
                      ====\n  \
                      1. ...as noted by Lee (2010[2010] ) and...\n\
                      plain line 2010\n  \
                      2. ...王新衡（[2024] ）指出...\n";
        let snippets = snippets_from_text(report);
        assert_eq!(snippets.len(), 2);
        assert!(snippets[0].text.starts_with("1. ...as noted"));
        assert!(snippets[1].text.contains("王新衡"));
    }

    #[test]
    fn test_context_spanning_lines() {
        let ctx = YearContext {
            year: "2019".into(),
            before: "end of paragraph.\nSmith (".into(),
            after: ") argued\nnext".into(),
            position: 0,
        };
        let snippets = snippets_from_contexts(&[ctx]);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "Smith ([2019] ) argued");
    }
}
