//! Configuration file support for pushboard
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.pushboardrc.json` in project root
//! 3. `pushboard.config.json` in project root
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::page::PageOptions;
use crate::source::DataSource;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_YEAR: i32 = 2018;
const DEFAULT_PAGE_LENGTH: usize = 25;
const DEFAULT_OUTPUT: &str = "pushboard.html";

const MIN_YEAR: i32 = 1970;
const MAX_YEAR: i32 = 9999;
const MAX_PAGE_LENGTH: usize = 1000;

/// pushboard configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushboardConfig {
    /// Calendar year the timelines cover (default: 2018)
    #[serde(default)]
    pub year: Option<i32>,

    /// Dataset document: a file path or an http(s) URL
    /// (default: `data/automated-{year}.json`)
    #[serde(default)]
    pub data: Option<String>,

    /// Where to write the HTML page (default: `pushboard.html`)
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Page title (default: `Automated commits {year}`)
    #[serde(default)]
    pub title: Option<String>,

    /// Rows per table page (default: 25)
    #[serde(default)]
    pub page_length: Option<usize>,
}

/// Resolved configuration with every default applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub year: i32,
    pub data: DataSource,
    pub output: PathBuf,
    pub title: String,
    pub page_length: usize,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl PushboardConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(year) = self.year {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                anyhow::bail!(
                    "year must be between {} and {} (got {})",
                    MIN_YEAR,
                    MAX_YEAR,
                    year
                );
            }
        }

        if let Some(page_length) = self.page_length {
            if page_length == 0 || page_length > MAX_PAGE_LENGTH {
                anyhow::bail!(
                    "page_length must be between 1 and {} (got {})",
                    MAX_PAGE_LENGTH,
                    page_length
                );
            }
        }

        if let Some(data) = &self.data {
            if data.trim().is_empty() {
                anyhow::bail!("data must not be empty");
            }
        }

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                anyhow::bail!("title must not be empty");
            }
        }

        Ok(())
    }

    /// Overlay `overrides`: every field set there replaces this one.
    pub fn merge(self, overrides: PushboardConfig) -> PushboardConfig {
        PushboardConfig {
            year: overrides.year.or(self.year),
            data: overrides.data.or(self.data),
            output: overrides.output.or(self.output),
            title: overrides.title.or(self.title),
            page_length: overrides.page_length.or(self.page_length),
        }
    }

    /// Resolve config into its final form
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let year = self.year.unwrap_or(DEFAULT_YEAR);
        let data = match &self.data {
            Some(location) => DataSource::parse(location),
            None => DataSource::parse(&format!("data/automated-{}.json", year)),
        };

        Ok(ResolvedConfig {
            year,
            data,
            output: self
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            title: self
                .title
                .clone()
                .unwrap_or_else(|| format!("Automated commits {}", year)),
            page_length: self.page_length.unwrap_or(DEFAULT_PAGE_LENGTH),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            title: self.title.clone(),
            page_length: self.page_length,
        }
    }
}

/// Discover and load a config file from the project root
///
/// Search order:
/// 1. `.pushboardrc.json`
/// 2. `pushboard.config.json`
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(PushboardConfig, PathBuf)>> {
    let rc_path = project_root.join(".pushboardrc.json");
    if rc_path.exists() {
        let config = load_config_file(&rc_path)?;
        return Ok(Some((config, rc_path)));
    }

    let config_path = project_root.join("pushboard.config.json");
    if config_path.exists() {
        let config = load_config_file(&config_path)?;
        return Ok(Some((config, config_path)));
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<PushboardConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: PushboardConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a project
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config from the project root.
/// Returns default config if nothing is found.
/// A relative `data` file path is resolved against the project root.
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    load_and_resolve_with(project_root, config_path, PushboardConfig::default())
}

/// Like [`load_and_resolve`], with `overrides` (typically CLI flags) taking
/// precedence over the file. Overrides are validated like file values.
pub fn load_and_resolve_with(
    project_root: &Path,
    config_path: Option<&Path>,
    overrides: PushboardConfig,
) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (PushboardConfig::default(), None),
        }
    };

    let mut resolved = config.merge(overrides).resolve()?;
    resolved.data = resolved.data.relative_to(project_root);
    resolved.config_path = source_path;
    Ok(resolved)
}
