use std::path::PathBuf;

use thiserror::Error;

pub mod export;
pub mod extraction;
pub mod types;

pub use export::{
    ellipsize, export_match_report, keyword_list, render_match_report, segment_notes,
    truncate_chars, write_report,
};
pub use extraction::render_extraction_report;
pub use types::{ExportFormat, ExtractionMeta, MatchMeta, ReportOptions};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
