//! CLI binary for edgequake-doctags.
//!
//! A thin shim over the library crate that maps CLI flags to library calls
//! and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edgequake_doctags::crosscheck::DEFAULT_THRESHOLD;
use edgequake_doctags::{
    cross_check, locate_file, render_file, render_to_file, LocateConfig, MatchStrategy,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render DocTags to Markdown (stdout)
  doctags render paper.doctags

  # Render to a file
  doctags render paper.doctags -o README.md

  # Locate fragments in a document export
  doctags locate paper.json -f "6 Results" -f "6.1 Machine Translation"

  # Fragments from a file, one per line
  doctags locate paper.json --fragments-file chunks.txt --strategy flattened

  # Audit rendered Markdown against its DocTags source
  doctags cross-check README.md paper.doctags --threshold 0.8

ENVIRONMENT VARIABLES:
  RUST_LOG                Override the log filter (e.g. edgequake_doctags=debug)
"#;

/// Render DocTags to Markdown and locate text fragments in extracted documents.
#[derive(Parser, Debug)]
#[command(
    name = "doctags",
    version,
    about = "Render DocTags to Markdown and locate text fragments in extracted documents",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a DocTags file to Markdown.
    Render {
        /// DocTags input file.
        input: PathBuf,

        /// Write Markdown to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find fragments in a document export and print their provenance as JSON.
    Locate {
        /// Document export (JSON) produced by the extractor.
        document: PathBuf,

        /// Fragment to locate (repeatable).
        #[arg(short, long = "fragment")]
        fragments: Vec<String>,

        /// File with one fragment per line.
        #[arg(long)]
        fragments_file: Option<PathBuf>,

        /// Matching strategy: auto, flattened, containment.
        #[arg(long, default_value = "auto")]
        strategy: String,

        /// Element label that opens a section.
        #[arg(long, default_value = "section_header")]
        section_label: String,
    },

    /// Pair rendered Markdown lines with their closest DocTags lines.
    CrossCheck {
        /// Rendered Markdown file.
        markdown: PathBuf,

        /// DocTags source file.
        doctags: PathBuf,

        /// Minimum similarity ratio (0–1].
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Output JSON instead of a readable report.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = default_filter(cli.verbose, cli.quiet);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Render { input, output } => run_render(input, output, cli.quiet).await,
        Command::Locate {
            document,
            fragments,
            fragments_file,
            strategy,
            section_label,
        } => {
            let fragments = collect_fragments(fragments, fragments_file.as_ref()).await?;
            let config = LocateConfig::builder()
                .strategy(strategy.parse::<MatchStrategy>()?)
                .section_label(section_label)
                .build()
                .context("Invalid configuration")?;
            run_locate(document, &fragments, &config, cli.quiet).await
        }
        Command::CrossCheck {
            markdown,
            doctags,
            threshold,
            json,
        } => run_cross_check(markdown, doctags, threshold, json).await,
    }
}

/// Log level used when `RUST_LOG` is unset.
fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    }
}

async fn run_render(input: PathBuf, output: Option<PathBuf>, quiet: bool) -> Result<()> {
    match output {
        Some(output_path) => {
            let written = render_to_file(&input, &output_path)
                .await
                .context("Rendering failed")?;
            if !quiet {
                eprintln!(
                    "{}  {} bytes  →  {}",
                    green("✔"),
                    written,
                    bold(&output_path.display().to_string()),
                );
            }
        }
        None => {
            let markdown = render_file(&input).await.context("Rendering failed")?;
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(markdown.as_bytes())
                .context("Failed to write to stdout")?;
            if !markdown.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }
    }
    Ok(())
}

async fn run_locate(
    document: PathBuf,
    fragments: &[String],
    config: &LocateConfig,
    quiet: bool,
) -> Result<()> {
    if fragments.is_empty() {
        anyhow::bail!("No fragments given; use --fragment or --fragments-file");
    }

    let output = locate_file(&document, fragments, config)
        .await
        .with_context(|| format!("Failed to locate fragments in {}", document.display()))?;

    let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
    println!("{json}");

    if !quiet {
        let stats = &output.stats;
        eprintln!(
            "{}  {}/{} fragments located  {}",
            if stats.unmatched == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.matched,
            stats.fragments,
            dim(&format!("{} elements, {}ms", stats.elements, stats.duration_ms)),
        );
    }
    Ok(())
}

async fn run_cross_check(
    markdown: PathBuf,
    doctags: PathBuf,
    threshold: f64,
    json: bool,
) -> Result<()> {
    let md = tokio::fs::read_to_string(&markdown)
        .await
        .with_context(|| format!("Failed to read {:?}", markdown))?;
    let tags = tokio::fs::read_to_string(&doctags)
        .await
        .with_context(|| format!("Failed to read {:?}", doctags))?;

    let matches = cross_check(&md, &tags, threshold).context("Cross-check failed")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&matches).context("Failed to serialise matches")?
        );
        return Ok(());
    }

    for m in &matches {
        println!(
            "\n{} Markdown line {} → DocTags line {} {}",
            cyan("◆"),
            m.markdown_line,
            m.doctags_line,
            dim(&format!("(score: {})", m.score)),
        );
        println!("  Markdown: {}", preview(&m.markdown));
        println!("  DocTags:  {}", preview(&m.doctags));
    }
    Ok(())
}

/// Merge `--fragment` values with the lines of `--fragments-file`.
async fn collect_fragments(mut fragments: Vec<String>, file: Option<&PathBuf>) -> Result<Vec<String>> {
    if let Some(path) = file {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read fragments from {:?}", path))?;
        fragments.extend(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from),
        );
    }
    Ok(fragments)
}

fn preview(line: &str) -> String {
    if line.chars().count() > 100 {
        format!("{}...", line.chars().take(100).collect::<String>())
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_check_threshold_defaults_to_library_constant() {
        let cli = Cli::try_parse_from(["doctags", "cross-check", "a.md", "a.doctags"]).unwrap();
        match cli.command {
            Command::CrossCheck { threshold, json, .. } => {
                assert_eq!(threshold, DEFAULT_THRESHOLD);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn log_filter_follows_flags() {
        assert_eq!(default_filter(false, false), "info");
        assert_eq!(default_filter(true, false), "debug");
        assert_eq!(default_filter(false, true), "error");
    }

    #[test]
    fn locate_collects_repeated_fragments() {
        let cli = Cli::try_parse_from([
            "doctags", "-q", "locate", "doc.json", "-f", "one", "--fragment", "two",
        ])
        .unwrap();
        assert!(cli.quiet && !cli.verbose);
        match cli.command {
            Command::Locate { fragments, strategy, section_label, .. } => {
                assert_eq!(fragments, vec!["one".to_string(), "two".to_string()]);
                assert_eq!(strategy, "auto");
                assert_eq!(section_label, "section_header");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
