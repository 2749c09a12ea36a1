//! Settings that shape a conversion, loaded from a `settings.toml` file.
//!
//! The page geometry is fixed (see [`pagesize`](crate::pagesize)); only where the
//! document goes, what it is called, its metadata and how long to wait for each image
//! are configurable.
//!
//! # Examples
//!
//! ```no_run
//! use images_to_pdf::config::{self, Config};
//!
//! let mut config = config::load().unwrap_or_default();
//! config.title = Some("Receipts".to_string());
//! config::save(&config).expect("can save config");
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "images-to-pdf";

pub const DEFAULT_OUTPUT_NAME: &str = "converted.pdf";
pub const DEFAULT_DECODE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory finished documents are written to
    pub output_dir: PathBuf,
    /// File name of every finished document
    pub output_name: String,
    /// How long a single image may take to decode before the conversion gives up
    pub decode_timeout_ms: u64,
    /// Document title, written into the PDF metadata
    pub title: Option<String>,
    /// Document author, written into the PDF metadata
    pub author: Option<String>,
    /// Document subject, written into the PDF metadata
    pub subject: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            decode_timeout_ms: DEFAULT_DECODE_TIMEOUT_MS,
            title: None,
            author: None,
            subject: None,
        }
    }
}

impl Config {
    pub fn decode_timeout(&self) -> Duration {
        Duration::from_millis(self.decode_timeout_ms)
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the user's settings, falling back to defaults if there are none
pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
