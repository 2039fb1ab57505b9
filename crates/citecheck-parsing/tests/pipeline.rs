//! End-to-end tests over files on disk: extract year contexts from a
//! manuscript, segment a bibliography, and match the two.

use std::io::Write;

use citecheck_core::{CheckConfig, match_entries};
use citecheck_parsing::{
    ParsingError, extract_years_from_file, load_snippets, segment_bibliography_file,
    snippets_from_contexts,
};

const MANUSCRIPT: &str = "\
近年來，王新衡（2024）指出教師專業發展的重要性。
Smith and Doe (2019) reported similar findings in a large sample.
另有研究（陳大文，2020）探討國小教師的工作壓力。
The 2021 census is mentioned but nobody from 2021 is cited.
";

const BIBLIOGRAPHY: &str = "\
參考文獻

王新衡（2024）。測試研究。教育學刊，12，1-20。
陳大文（2020）。國小教師工作壓力之研究
（未出版之碩士論文）。國立臺灣師範大學。
林小美（2018）。未被引用的研究。
Smith, J., & Doe, A. (2019). Findings. Journal of Tests, 3, 1-9.
(2021). Census report.
";

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn in_memory_pipeline_partitions_entries() {
    let config = CheckConfig::default();
    let manuscript = write_temp(MANUSCRIPT);
    let bibliography = write_temp(BIBLIOGRAPHY);

    let extraction = extract_years_from_file(manuscript.path(), &config).unwrap();
    assert_eq!(extraction.total_occurrences, 5);

    let snippets = snippets_from_contexts(&extraction.contexts);
    let bib = segment_bibliography_file(bibliography.path(), &config).unwrap();
    assert_eq!(bib.entries.len(), 5);
    assert_eq!(bib.stats.empty_keywords, 1);

    let results = match_entries(&bib.entries, &snippets, &config);
    let matched: Vec<_> = results.matches.iter().map(|m| m.entry.year.as_str()).collect();
    let missing: Vec<_> = results.not_found.iter().map(|e| e.year.as_str()).collect();

    assert_eq!(matched, ["2024", "2020", "2019"]);
    // 2018 is never cited; the 2021 entry has no keywords.
    assert_eq!(missing, ["2018", "2021"]);

    let smith = &results.matches[2];
    assert!(smith.matched_keywords.contains("smith"));
    assert!(smith.matched_keywords.contains("doe"));
}

#[test]
fn report_file_snippets_match_like_in_memory_ones() {
    let config = CheckConfig::default();
    let manuscript = write_temp(MANUSCRIPT);
    let extraction = extract_years_from_file(manuscript.path(), &config).unwrap();

    let mut report = String::from("Year contexts\n====\n\n");
    for (i, ctx) in extraction.contexts.iter().enumerate() {
        report.push_str(&format!("{:3}. {}\n", i + 1, ctx.marked_line()));
    }
    let report_file = write_temp(&report);
    let from_file = load_snippets(report_file.path()).unwrap();

    let bib = segment_bibliography_file(write_temp(BIBLIOGRAPHY).path(), &config).unwrap();
    let a = match_entries(&bib.entries, &from_file, &config);
    let b = match_entries(
        &bib.entries,
        &snippets_from_contexts(&extraction.contexts),
        &config,
    );

    let years = |r: &citecheck_core::CheckResults| -> Vec<String> {
        r.matches.iter().map(|m| m.entry.year.clone()).collect()
    };
    assert_eq!(years(&a), years(&b));
}

#[test]
fn missing_source_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    let err = segment_bibliography_file(&missing, &CheckConfig::default()).unwrap_err();
    assert!(matches!(err, ParsingError::SourceNotFound { .. }));
    assert!(err.to_string().contains("nope.txt"));
}

#[test]
fn byte_order_mark_is_ignored() {
    let config = CheckConfig::default();
    let bibliography = write_temp("\u{feff}王新衡（2024）。測試研究。\n");
    let bib = segment_bibliography_file(bibliography.path(), &config).unwrap();
    assert_eq!(bib.entries[0].pre_text, "王新衡");
}

#[test]
fn non_utf8_input_is_an_io_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0xff, 0xfe, 0x00, 0xd8]).unwrap();
    let err = load_snippets(file.path()).unwrap_err();
    assert!(matches!(err, ParsingError::Io { .. }));
}
