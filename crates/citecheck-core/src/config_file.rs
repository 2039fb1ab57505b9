use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CheckConfigBuilder;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub matching: Option<MatchingConfig>,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub context_chars: Option<usize>,
    pub min_keyword_chars: Option<usize>,
    pub fallback_chars: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub display_pre_chars: Option<usize>,
    pub max_expected_keywords: Option<usize>,
    pub max_matched_keywords: Option<usize>,
    pub max_evidence: Option<usize>,
    pub max_entry_chars: Option<usize>,
}

impl ConfigFile {
    /// The `[matching]` table as a builder, for layering under CLI/env values.
    pub fn check_config_builder(&self) -> CheckConfigBuilder {
        let mut builder = CheckConfigBuilder::new();
        if let Some(m) = &self.matching {
            if let Some(v) = m.context_chars {
                builder = builder.context_chars(v);
            }
            if let Some(v) = m.min_keyword_chars {
                builder = builder.min_keyword_chars(v);
            }
            if let Some(v) = m.fallback_chars {
                builder = builder.fallback_chars(v);
            }
        }
        builder
    }
}

/// Platform config directory path: `<config_dir>/citecheck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("citecheck").join("config.toml"))
}

/// Load config by cascading CWD `.citecheck.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".citecheck.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let bm = base.matching.unwrap_or_default();
    let om = overlay.matching.unwrap_or_default();
    let br = base.report.unwrap_or_default();
    let or = overlay.report.unwrap_or_default();

    ConfigFile {
        matching: Some(MatchingConfig {
            context_chars: om.context_chars.or(bm.context_chars),
            min_keyword_chars: om.min_keyword_chars.or(bm.min_keyword_chars),
            fallback_chars: om.fallback_chars.or(bm.fallback_chars),
        }),
        report: Some(ReportConfig {
            display_pre_chars: or.display_pre_chars.or(br.display_pre_chars),
            max_expected_keywords: or.max_expected_keywords.or(br.max_expected_keywords),
            max_matched_keywords: or.max_matched_keywords.or(br.max_matched_keywords),
            max_evidence: or.max_evidence.or(br.max_evidence),
            max_entry_chars: or.max_entry_chars.or(br.max_entry_chars),
        }),
    }
}
