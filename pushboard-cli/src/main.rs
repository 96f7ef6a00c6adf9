//! pushboard CLI - renders a GitHub push-activity dataset into a sortable HTML table

#![deny(warnings)]

// Global invariants enforced:
// - The dataset is fetched once; failures are not retried
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use pushboard_core::config::{self, PushboardConfig, ResolvedConfig};
use pushboard_core::{
    load_document, render_failure_page, render_page, Dataset, DatasetError, FetchError, PageOptions,
};
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "pushboard";

#[derive(Parser)]
#[command(name = "pushboard")]
#[command(about = "Render GitHub push-activity statistics as an HTML table with daily timelines")]
#[command(version = env!("PUSHBOARD_VERSION"))]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Dataset selection shared by `render` and `validate`
#[derive(clap::Args)]
struct DataArgs {
    /// Dataset document: file path or http(s) URL (overrides config file)
    #[arg(long)]
    data: Option<String>,

    /// Calendar year of the timelines (overrides config file)
    #[arg(long)]
    year: Option<i32>,

    /// Path to config file (default: auto-discover)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a dataset and write the HTML page
    Render {
        #[command(flatten)]
        data: DataArgs,

        /// Output file path (default: pushboard.html)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Page title
        #[arg(long)]
        title: Option<String>,

        /// Rows per table page
        #[arg(long)]
        page_length: Option<usize>,
    },
    /// Check a dataset for missing or misaligned timelines without rendering
    Validate {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Validate or show the configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without loading any data
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Render {
            data,
            output,
            title,
            page_length,
        } => {
            let overrides = PushboardConfig {
                year: data.year,
                data: data.data,
                output,
                title,
                page_length,
            };
            let resolved = resolve_config(data.config.as_deref(), overrides)?;
            run_render(&resolved)
        }
        Commands::Validate { data } => {
            let overrides = PushboardConfig {
                year: data.year,
                data: data.data,
                ..Default::default()
            };
            let resolved = resolve_config(data.config.as_deref(), overrides)?;
            run_validate(&resolved)
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                match config::load_and_resolve(&project_root, path.as_deref()) {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                        Ok(())
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;
                print_config(&resolved);
                Ok(())
            }
        },
    }
}

fn resolve_config(
    config_path: Option<&Path>,
    overrides: PushboardConfig,
) -> anyhow::Result<ResolvedConfig> {
    let project_root = std::env::current_dir()?;
    let resolved = config::load_and_resolve_with(&project_root, config_path, overrides)
        .context("failed to load configuration")?;

    if let Some(config_path) = &resolved.config_path {
        eprintln!("Using config: {}", config_path.display());
    }
    Ok(resolved)
}

fn run_render(resolved: &ResolvedConfig) -> anyhow::Result<()> {
    let options = resolved.page_options();

    let document = match load_document(&resolved.data) {
        Ok(document) => document,
        Err(e) => {
            log::error!(target: LOG_TARGET, "failed loading data: {}", e);
            write_failure_page(&resolved.output, &e, &options)?;
            eprintln!("Failure page written to: {}", resolved.output.display());
            return Err(anyhow::Error::new(e).context("failed loading data"));
        }
    };

    let dataset = Dataset::build(document, resolved.year)
        .context("dataset integrity violation, no report written")?;

    write_html_report(&resolved.output, &render_page(&dataset, &options))?;
    eprintln!(
        "Report written to: {} ({} repositories)",
        resolved.output.display(),
        dataset.rows().len()
    );
    Ok(())
}

fn run_validate(resolved: &ResolvedConfig) -> anyhow::Result<()> {
    let document = load_document(&resolved.data).context("failed loading data")?;
    let faults = Dataset::check_integrity(&document, resolved.year)?;

    if faults.is_empty() {
        println!(
            "{}: {} repositories, all timelines aligned with {}",
            resolved.data,
            document.rows.len(),
            resolved.year
        );
        return Ok(());
    }

    for fault in &faults {
        log::warn!(target: LOG_TARGET, "{}", fault);
        println!("  {}", fault);
    }
    print_fault_summary(&faults, document.rows.len());
    std::process::exit(1);
}

fn print_fault_summary(faults: &[DatasetError], total_rows: usize) {
    let count = |pred: fn(&DatasetError) -> bool| faults.iter().filter(|f| pred(f)).count();
    let missing = count(|f| matches!(f, DatasetError::MissingTimeline { .. }));
    let misaligned = count(|f| matches!(f, DatasetError::TimelineLength { .. }));
    let malformed = count(|f| matches!(f, DatasetError::MalformedRepoId { .. }));

    println!();
    println!("{} of {} repositories failed:", faults.len(), total_rows);
    println!(
        "  {} missing timeline(s), {} misaligned, {} malformed identifier(s)",
        missing, misaligned, malformed
    );
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("Dataset:");
    println!("  data: {}", resolved.data);
    println!("  year: {}", resolved.year);
    println!();
    println!("Page:");
    println!("  output: {}", resolved.output.display());
    println!("  title: {}", resolved.title);
    println!("  page_length: {}", resolved.page_length);
}

/// Write the failure page; if that fails too, the fetch error stays in the chain.
fn write_failure_page(
    path: &Path,
    error: &FetchError,
    options: &PageOptions,
) -> anyhow::Result<()> {
    let reason = error.to_string();
    write_html_report(path, &render_failure_page(&reason, options))
        .with_context(|| format!("failed loading data: {}", reason))
}

/// Write HTML report to file with atomic write pattern
fn write_html_report(path: &Path, html: &str) -> anyhow::Result<()> {
    use std::fs;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // Atomic write (temp + rename pattern)
    let temp_path = path.with_extension("html.tmp");
    fs::write(&temp_path, html)
        .with_context(|| format!("Failed to write temporary file: {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn not_found() -> FetchError {
        FetchError::Status {
            url: "https://example.org/automated-2018.json".to_string(),
            status: 404,
        }
    }

    #[test]
    fn test_failure_page_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("site/pushboard.html");

        write_failure_page(&output, &not_found(), &PageOptions::default()).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains(
            "failed loading data: https://example.org/automated-2018.json answered with HTTP 404"
        ));
        assert!(!dir.path().join("site/pushboard.html.tmp").exists());
    }

    #[test]
    fn test_failed_write_keeps_fetch_reason() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        fs::write(&blocker, "not a directory").unwrap();
        let output = blocker.join("pushboard.html");

        let err =
            write_failure_page(&output, &not_found(), &PageOptions::default()).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("failed loading data"), "{chain}");
        assert!(chain.contains("answered with HTTP 404"), "{chain}");
        assert!(chain.contains("Failed to create directory"), "{chain}");
    }
}
