use crate::{BibEntry, CheckConfig, CheckResults, Keywords, MatchResult, Snippet};

/// Match every bibliography entry against the candidate snippets.
///
/// A snippet is evidence for an entry when it contains the entry's year as a
/// literal substring and shares at least one keyword with it. The year alone
/// is never enough, and an entry with no keywords can never match.
pub fn match_entries(
    entries: &[BibEntry],
    snippets: &[Snippet],
    config: &CheckConfig,
) -> CheckResults {
    // Snippet keywords are computed at most once, and only for snippets that
    // pass some entry's year filter.
    let mut snippet_keywords: Vec<Option<Keywords>> = vec![None; snippets.len()];
    let mut results = CheckResults::default();

    for entry in entries {
        let mut evidence = Vec::new();
        let mut matched_keywords = Keywords::new();

        for (i, snippet) in snippets.iter().enumerate() {
            if !snippet.text.contains(entry.year.as_str()) {
                continue;
            }
            let keywords = snippet_keywords[i].get_or_insert_with(|| snippet.keywords(config));

            let shared: Vec<&String> = entry.keywords.intersection(keywords).collect();
            if shared.is_empty() {
                continue;
            }
            tracing::trace!(year = %entry.year, snippet = %snippet.text, ?shared, "evidence");
            matched_keywords.extend(shared.into_iter().cloned());
            evidence.push(snippet.clone());
        }

        if evidence.is_empty() {
            results.not_found.push(entry.clone());
        } else {
            results.matches.push(MatchResult {
                entry: entry.clone(),
                evidence,
                matched_keywords,
            });
        }
    }

    tracing::debug!(
        matched = results.matches.len(),
        not_found = results.not_found.len(),
        snippets = snippets.len(),
        "matching complete"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry_keywords;

    fn entry(year: &str, pre_text: &str) -> BibEntry {
        let config = CheckConfig::default();
        BibEntry {
            original_text: format!("{pre_text}({year}). Title."),
            year: year.to_string(),
            pre_text: pre_text.to_string(),
            keywords: entry_keywords(pre_text, &config),
        }
    }

    fn snippets(lines: &[&str]) -> Vec<Snippet> {
        lines.iter().filter_map(|l| Snippet::from_line(l)).collect()
    }

    #[test]
    fn test_year_and_keyword_match() {
        let entries = vec![entry("2024", "王新衡")];
        let snips = snippets(&[
            "  1. ...王新衡（[2024] ）所述，理論...",
            "  2. ...other [2024] text...",
        ]);
        let results = match_entries(&entries, &snips, &CheckConfig::default());
        assert_eq!(results.matches.len(), 1);
        assert!(results.not_found.is_empty());
        let m = &results.matches[0];
        assert_eq!(m.evidence.len(), 1);
        assert!(m.evidence[0].text.contains("王新衡"));
        assert_eq!(m.matched_keywords, Keywords::from(["王新衡".to_string()]));
    }

    #[test]
    fn test_cjk_runs_in_snippet_intersect() {
        let config = CheckConfig::default();
        let snippet = Snippet::from_line("如前述理論所示 [2024] 具有重要意義").unwrap();
        assert_eq!(
            snippet.keywords(&config),
            Keywords::from(["如前述理論所示".to_string(), "具有重要意義".to_string()])
        );

        let cited = entry("2024", "如前述理論所示");
        let results = match_entries(&[cited], &[snippet], &config);
        assert_eq!(results.matches.len(), 1);
    }

    #[test]
    fn test_year_alone_is_not_enough() {
        let entries = vec![entry("2024", "Smith")];
        let snips = snippets(&["...Jones [2024] argued..."]);
        let results = match_entries(&entries, &snips, &CheckConfig::default());
        assert!(results.matches.is_empty());
        assert_eq!(results.not_found.len(), 1);
    }

    #[test]
    fn test_keyword_without_year_is_not_enough() {
        let entries = vec![entry("2019", "Smith")];
        let snips = snippets(&["...Smith [2020] argued..."]);
        let results = match_entries(&entries, &snips, &CheckConfig::default());
        assert_eq!(results.not_found.len(), 1);
    }

    #[test]
    fn test_empty_keyword_entry_never_matches() {
        let entries = vec![entry("2020", "")];
        assert!(entries[0].keywords.is_empty());
        let snips = snippets(&["...anything [2020] at all...", "[2020]"]);
        let results = match_entries(&entries, &snips, &CheckConfig::default());
        assert!(results.matches.is_empty());
        assert_eq!(results.not_found, entries);
    }

    #[test]
    fn test_evidence_order_and_keyword_union() {
        let entries = vec![entry("2018", "Smith, Jones")];
        let snips = snippets(&[
            "...Jones [2018] showed...",
            "...unrelated [2018] work...",
            "...Smith and Jones [2018] also...",
        ]);
        let results = match_entries(&entries, &snips, &CheckConfig::default());
        let m = &results.matches[0];
        assert_eq!(m.evidence.len(), 2);
        assert!(m.evidence[0].text.starts_with("...Jones"));
        assert!(m.evidence[1].text.starts_with("...Smith"));
        assert_eq!(
            m.matched_keywords,
            Keywords::from(["jones".to_string(), "smith".to_string()])
        );
    }

    #[test]
    fn test_bibliography_order_preserved() {
        let entries = vec![
            entry("2001", "Alpha"),
            entry("2002", "Beta"),
            entry("2003", "Gamma"),
            entry("2004", "Delta"),
        ];
        let snips = snippets(&["...Delta [2004]...", "...Beta [2002]..."]);
        let results = match_entries(&entries, &snips, &CheckConfig::default());
        let matched: Vec<_> = results.matches.iter().map(|m| m.entry.year.as_str()).collect();
        let missing: Vec<_> = results.not_found.iter().map(|e| e.year.as_str()).collect();
        assert_eq!(matched, ["2002", "2004"]);
        assert_eq!(missing, ["2001", "2003"]);
    }

    #[test]
    fn test_matching_is_deterministic() {
        let entries = vec![entry("2010", "Lee"), entry("2011", "Kim")];
        let snips = snippets(&["...Lee [2010]...", "...Park [2011]..."]);
        let config = CheckConfig::default();
        let first = match_entries(&entries, &snips, &config);
        let second = match_entries(&entries, &snips, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_adding_snippets_is_monotonic() {
        let entries = vec![entry("2010", "Lee"), entry("2011", "Kim"), entry("2012", "Ng")];
        let config = CheckConfig::default();
        let base = snippets(&["...Lee [2010]..."]);
        let mut more = base.clone();
        more.extend(snippets(&["...Kim [2011]...", "...noise [2012]..."]));

        let before = match_entries(&entries, &base, &config);
        let after = match_entries(&entries, &more, &config);
        for m in &before.matches {
            assert!(after.matches.iter().any(|a| a.entry == m.entry));
        }
        assert!(after.matches.len() >= before.matches.len());
        assert_eq!(after.total(), entries.len());
    }
}
