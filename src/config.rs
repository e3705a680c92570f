//! Project configuration.
//!
//! An optional `poem-site.toml` in the project root overrides the default
//! layout. Every key is optional:
//!
//! ```toml
//! poems_dir = "resources/poems"    # markdown sources, converted in place
//! slides_dir = "resources/slides"  # slide decks (*.js next to an index.html)
//! index_file = "index.html"        # aggregate index, relative to the root
//! prefix_width = 3                 # digits in the NNN ordering prefix
//! # index_title = "Poems"          # <title> of the index page (none by default)
//!
//! [processing]
//! max_processes = 4                # parallel conversions (omit for CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! The pipeline never reads [`SiteConfig`] directly. It takes a [`Layout`]:
//! absolute paths resolved against a project root, which lets tests point the
//! whole pipeline at a temporary directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::naming::DEFAULT_PREFIX_WIDTH;

pub const CONFIG_FILE: &str = "poem-site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Contents of `poem-site.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Poems root, relative to the project root.
    pub poems_dir: String,
    /// Slides root, relative to the project root.
    pub slides_dir: String,
    /// Aggregate index path, relative to the project root.
    pub index_file: String,
    /// Width of the numeric ordering prefix stripped from poem titles.
    pub prefix_width: usize,
    /// Optional `<title>` for the index page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_title: Option<String>,
    /// Parallel conversion settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            poems_dir: "resources/poems".to_string(),
            slides_dir: "resources/slides".to_string(),
            index_file: "index.html".to_string(),
            prefix_width: DEFAULT_PREFIX_WIDTH,
            index_title: None,
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("poems_dir", &self.poems_dir),
            ("slides_dir", &self.slides_dir),
            ("index_file", &self.index_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.prefix_width == 0 {
            return Err(ConfigError::Validation(
                "prefix_width must be at least 1".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel conversion workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Load `poem-site.toml` from the project root.
///
/// Returns defaults when the file does not exist.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Absolute paths and settings for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub project_root: PathBuf,
    pub poems_root: PathBuf,
    pub slides_root: PathBuf,
    pub index_path: PathBuf,
    pub prefix_width: usize,
    pub index_title: Option<String>,
}

impl Layout {
    /// Resolve `config` against `project_root`, making every path absolute.
    pub fn resolve(project_root: &Path, config: &SiteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let project_root = std::path::absolute(project_root)?;
        Ok(Self {
            poems_root: project_root.join(&config.poems_dir),
            slides_root: project_root.join(&config.slides_dir),
            index_path: project_root.join(&config.index_file),
            prefix_width: config.prefix_width,
            index_title: config.index_title.clone(),
            project_root,
        })
    }

    /// Load `poem-site.toml` from `project_root` and resolve it.
    pub fn load(project_root: &Path) -> Result<(Self, SiteConfig), ConfigError> {
        let config = load_config(project_root)?;
        let layout = Self::resolve(project_root, &config)?;
        Ok((layout, config))
    }
}

/// Returns a fully-commented stock `poem-site.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# poem-site configuration
# =======================
# Place this file at the project root as poem-site.toml.
# Every key is optional; the values below are the defaults.

# Directory tree of poem markdown files, relative to the project root.
# Every NNN-title.md becomes a sibling NNN-title.html.
poems_dir = "resources/poems"

# Directory tree of slide decks. Each deck is a .js file sitting next to an
# index.html that defines an anchor named after the script.
slides_dir = "resources/slides"

# Where the aggregate index is written, relative to the project root.
index_file = "index.html"

# Number of leading digits in the ordering prefix of poem filenames.
# "001 The Road.md" is listed as "The Road". Filenames without a full
# prefix keep their whole name as the title.
prefix_width = 3

# Title of the index page. No <title> element is emitted when unset.
# index_title = "Poems"

[processing]
# Maximum parallel conversions. Omit for one per CPU core.
# Values above the core count are clamped.
# max_processes = 4
"##
}
