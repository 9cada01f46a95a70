//! Application configuration for sitefeed.
//!
//! User config lives at `~/.sitefeed/sitefeed.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SitefeedError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sitefeed.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sitefeed";

// ---------------------------------------------------------------------------
// Config structs (matching sitefeed.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tabular API source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Enrichment image pool settings.
    #[serde(default)]
    pub images: ImagesConfig,

    /// Artifact output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the tabular API (table name is appended per request).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the env var holding the API token (never store the token itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Table holding event rows.
    #[serde(default = "default_events_table")]
    pub events_table: String,

    /// Table holding course rows.
    #[serde(default = "default_courses_table")]
    pub courses_table: String,

    /// Rows requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            events_table: default_events_table(),
            courses_table: default_courses_table(),
            page_size: default_page_size(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.example-tables.com/v0/base".into()
}
fn default_api_key_env() -> String {
    "SITEFEED_API_KEY".into()
}
fn default_events_table() -> String {
    "Events".into()
}
fn default_courses_table() -> String {
    "Courses".into()
}
fn default_page_size() -> u32 {
    100
}

/// `[images]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Directory scanned for enrichment images.
    #[serde(default = "default_images_dir")]
    pub dir: String,

    /// Only files whose name starts with this prefix join the pool.
    #[serde(default = "default_images_prefix")]
    pub prefix: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            dir: default_images_dir(),
            prefix: default_images_prefix(),
        }
    }
}

fn default_images_dir() -> String {
    "static/images/events".into()
}
fn default_images_prefix() -> String {
    "event-".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the JSON artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "public/content".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sitefeed/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SitefeedError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.sitefeed/sitefeed.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SitefeedError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SitefeedError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SitefeedError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SitefeedError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SitefeedError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the API token env var is set and non-empty.
pub fn validate_api_key(config: &AppConfig) -> Result<()> {
    let var_name = &config.source.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(()),
        _ => Err(SitefeedError::config(format!(
            "API token not found. Set the {var_name} environment variable."
        ))),
    }
}
