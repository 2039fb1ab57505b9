use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod bibliography;
pub mod snippets;
pub mod year_context;

pub use bibliography::{BracketStyle, YearParen, find_year_paren, parse_entry, segment_bibliography};
pub use snippets::{snippets_from_contexts, snippets_from_text};
pub use year_context::{extract_year_contexts, extract_year_contexts_with_config};
// Re-export domain types from core (canonical definitions live there)
pub use citecheck_core::{Bibliography, CheckConfig, SegmentStats, Snippet, YearExtraction};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read a UTF-8 input file. A leading byte-order mark is dropped.
pub fn read_source(path: &Path) -> Result<String, ParsingError> {
    if !path.exists() {
        return Err(ParsingError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ParsingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    })
}

/// Extract year contexts from a manuscript file.
pub fn extract_years_from_file(
    path: &Path,
    config: &CheckConfig,
) -> Result<YearExtraction, ParsingError> {
    let text = read_source(path)?;
    Ok(extract_year_contexts_with_config(&text, config))
}

/// Segment a bibliography file.
pub fn segment_bibliography_file(
    path: &Path,
    config: &CheckConfig,
) -> Result<Bibliography, ParsingError> {
    let text = read_source(path)?;
    Ok(segment_bibliography(&text, config))
}

/// Load candidate snippets from an extraction report file.
pub fn load_snippets(path: &Path) -> Result<Vec<Snippet>, ParsingError> {
    let text = read_source(path)?;
    Ok(snippets_from_text(&text))
}
