use std::path::{Path, PathBuf};

use citecheck_core::config_file::{self, ConfigFile};
use citecheck_core::{CheckConfig, CheckConfigBuilder, match_entries};
use citecheck_reporting::{
    ExportFormat, ExtractionMeta, MatchMeta, ReportOptions, render_extraction_report,
    render_match_report, write_report,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::prelude::*;

mod output;

use output::ColorMode;

/// Citation checker - find bibliography entries that are never cited in a manuscript
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract every year in a manuscript with its surrounding context
    Extract {
        /// Path to the manuscript (UTF-8 text)
        manuscript: PathBuf,

        /// Characters of context kept on each side of a year
        #[arg(long)]
        context: Option<usize>,

        /// Path to the extraction report (default: years_<manuscript name>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Match a bibliography against an extraction report
    Match {
        /// Path to the bibliography (UTF-8 text)
        bibliography: PathBuf,

        /// Path to an extraction report written by `extract`
        extraction_file: PathBuf,

        #[command(flatten)]
        matching: MatchingArgs,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Extract and match in one step, without an intermediate file
    Check {
        /// Path to the bibliography (UTF-8 text)
        bibliography: PathBuf,

        /// Path to the manuscript (UTF-8 text)
        manuscript: PathBuf,

        /// Characters of context kept on each side of a year
        #[arg(long)]
        context: Option<usize>,

        #[command(flatten)]
        matching: MatchingArgs,

        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Args, Debug)]
struct MatchingArgs {
    /// Minimum keyword length in characters
    #[arg(long)]
    min_keyword_chars: Option<usize>,

    /// Length of the fallback keyword for entries with no regular keywords
    #[arg(long)]
    fallback_chars: Option<usize>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Also write the match report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File format for --output (text, markdown, json)
    #[arg(long, default_value_t = ExportFormat::Text)]
    format: ExportFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();
    let file_config = config_file::load_config();

    match cli.command {
        Command::Extract {
            manuscript,
            context,
            output,
            no_color,
        } => {
            let config = resolve_config(context, None, None, &file_config)?;
            extract(&manuscript, output, &config, color_mode(no_color))
        }
        Command::Match {
            bibliography,
            extraction_file,
            matching,
            report,
        } => {
            let config = resolve_config(
                None,
                matching.min_keyword_chars,
                matching.fallback_chars,
                &file_config,
            )?;
            let opts = ReportOptions::from_config(file_config.report.as_ref());
            match_report(&bibliography, &extraction_file, &config, &opts, report)
        }
        Command::Check {
            bibliography,
            manuscript,
            context,
            matching,
            report,
        } => {
            let config = resolve_config(
                context,
                matching.min_keyword_chars,
                matching.fallback_chars,
                &file_config,
            )?;
            let opts = ReportOptions::from_config(file_config.report.as_ref());
            check(&bibliography, &manuscript, &config, &opts, report)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "citecheck=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn color_mode(no_color: bool) -> ColorMode {
    use std::io::IsTerminal;
    ColorMode(!no_color && std::io::stdout().is_terminal())
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Resolve configuration: CLI flags > env vars > config file > defaults
fn resolve_config(
    context: Option<usize>,
    min_keyword_chars: Option<usize>,
    fallback_chars: Option<usize>,
    file_config: &ConfigFile,
) -> anyhow::Result<CheckConfig> {
    let mut builder = CheckConfigBuilder::new();
    if let Some(v) = context.or_else(|| env_usize("CITECHECK_CONTEXT_CHARS")) {
        builder = builder.context_chars(v);
    }
    if let Some(v) = min_keyword_chars.or_else(|| env_usize("CITECHECK_MIN_KEYWORD_CHARS")) {
        builder = builder.min_keyword_chars(v);
    }
    if let Some(v) = fallback_chars.or_else(|| env_usize("CITECHECK_FALLBACK_CHARS")) {
        builder = builder.fallback_chars(v);
    }
    let config = builder
        .merge_missing(&file_config.check_config_builder())
        .build()?;
    tracing::debug!(
        context_chars = config.context_chars(),
        min_keyword_chars = config.min_keyword_chars(),
        fallback_chars = config.fallback_chars(),
        "resolved configuration"
    );
    Ok(config)
}

/// `years_<file name>` in the current directory.
fn default_extraction_path(manuscript: &Path) -> PathBuf {
    let name = manuscript
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "manuscript.txt".to_string());
    PathBuf::from(format!("years_{name}"))
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn extract(
    manuscript: &Path,
    output: Option<PathBuf>,
    config: &CheckConfig,
    color: ColorMode,
) -> anyhow::Result<()> {
    let extraction = citecheck_parsing::extract_years_from_file(manuscript, config)?;
    let output_path = output.unwrap_or_else(|| default_extraction_path(manuscript));

    let meta = ExtractionMeta {
        source: manuscript.display().to_string(),
        context_chars: config.context_chars(),
        generated_at: timestamp(),
    };
    let report = render_extraction_report(&extraction, &meta);
    write_report(&output_path, &report)?;

    let mut stdout = std::io::stdout().lock();
    output::print_extraction_summary(&mut stdout, &extraction, &output_path, color)?;
    Ok(())
}

fn match_report(
    bibliography: &Path,
    extraction_file: &Path,
    config: &CheckConfig,
    opts: &ReportOptions,
    report: ReportArgs,
) -> anyhow::Result<()> {
    // Both inputs are loaded before anything is printed or written.
    let bib = citecheck_parsing::segment_bibliography_file(bibliography, config)?;
    let snippets = citecheck_parsing::load_snippets(extraction_file)?;

    let results = match_entries(&bib.entries, &snippets, config);
    let meta = MatchMeta {
        bibliography: bibliography.display().to_string(),
        snippet_source: extraction_file.display().to_string(),
        snippet_count: snippets.len(),
        stats: bib.stats,
    };
    emit_match_report(&results, &meta, opts, report)
}

fn check(
    bibliography: &Path,
    manuscript: &Path,
    config: &CheckConfig,
    opts: &ReportOptions,
    report: ReportArgs,
) -> anyhow::Result<()> {
    let bib = citecheck_parsing::segment_bibliography_file(bibliography, config)?;
    let extraction = citecheck_parsing::extract_years_from_file(manuscript, config)?;
    let snippets = citecheck_parsing::snippets_from_contexts(&extraction.contexts);

    let results = match_entries(&bib.entries, &snippets, config);
    let meta = MatchMeta {
        bibliography: bibliography.display().to_string(),
        snippet_source: manuscript.display().to_string(),
        snippet_count: snippets.len(),
        stats: bib.stats,
    };
    emit_match_report(&results, &meta, opts, report)
}

/// Print the report to stdout and, with `--output`, write it to the file too.
fn emit_match_report(
    results: &citecheck_core::CheckResults,
    meta: &MatchMeta,
    opts: &ReportOptions,
    report: ReportArgs,
) -> anyhow::Result<()> {
    let color = color_mode(report.no_color);

    // Render before printing so a serialization failure leaves no partial output.
    let rendered = report
        .output
        .as_ref()
        .map(|path| {
            render_match_report(results, meta, report.format, opts).map(|c| (path, c))
        })
        .transpose()?;

    let mut stdout = std::io::stdout().lock();
    output::print_match_report(&mut stdout, results, meta, opts, color)?;

    if let Some((path, content)) = rendered {
        write_report(path, &content)?;
        tracing::info!(path = %path.display(), format = %report.format, "match report written");
        if color.enabled() {
            use owo_colors::OwoColorize;
            eprintln!("Report saved to: {}", path.display().cyan());
        } else {
            eprintln!("Report saved to: {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_uses_file_name() {
        assert_eq!(
            default_extraction_path(Path::new("drafts/paper.txt")),
            PathBuf::from("years_paper.txt")
        );
        assert_eq!(
            default_extraction_path(Path::new("論文.txt")),
            PathBuf::from("years_論文.txt")
        );
    }

    #[test]
    fn cli_flags_override_config_file() {
        let file = ConfigFile {
            matching: Some(config_file::MatchingConfig {
                context_chars: Some(45),
                min_keyword_chars: Some(3),
                fallback_chars: None,
            }),
            report: None,
        };
        let config = resolve_config(Some(12), None, Some(6), &file).unwrap();
        assert_eq!(config.context_chars(), 12);
        assert_eq!(config.fallback_chars(), 6);
        // CITECHECK_MIN_KEYWORD_CHARS is not set by the test runner.
        if std::env::var("CITECHECK_MIN_KEYWORD_CHARS").is_err() {
            assert_eq!(config.min_keyword_chars(), 3);
        }
    }

    #[test]
    fn zero_keyword_length_is_rejected() {
        assert!(resolve_config(None, Some(0), None, &ConfigFile::default()).is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "citecheck",
            "match",
            "bib.txt",
            "years_paper.txt",
            "-o",
            "out.md",
            "--format",
            "md",
        ])
        .unwrap();
        match cli.command {
            Command::Match { report, .. } => {
                assert_eq!(report.format, ExportFormat::Markdown);
                assert_eq!(report.output, Some(PathBuf::from("out.md")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn format_defaults_to_text() {
        let cli = Cli::try_parse_from(["citecheck", "check", "bib.txt", "paper.txt"]).unwrap();
        match cli.command {
            Command::Check { report, .. } => assert_eq!(report.format, ExportFormat::Text),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
