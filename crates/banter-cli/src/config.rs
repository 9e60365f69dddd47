//! Configuration file support

use banter_api::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for banter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the completions API (without the `/completions` suffix)
    pub base_url: Option<String>,
    /// Whether to use TUI mode by default
    pub tui: Option<bool>,
    /// Color theme ("dark" or "light")
    pub theme: Option<String>,
    /// Replacement for the greeting shown in a fresh conversation
    pub greeting: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("banter")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for BANTER_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("BANTER_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Where `--verbose` logs go while the TUI owns the screen
    pub fn log_path() -> PathBuf {
        Self::config_dir().join("banter.log")
    }

    /// Load config from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Write the commented example config if no file exists yet
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, example_config())?;
        Ok(path)
    }
}

/// Pick the base URL: CLI flag, then environment, then config file, then default
pub fn resolve_base_url(
    flag: Option<&str>,
    env: Option<&str>,
    config: Option<&str>,
) -> String {
    [flag, env, config]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string()
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# banter configuration file
# Place at ~/.config/banter/config.toml (Linux/Mac) or %APPDATA%\banter\config.toml (Windows)

# Base URL of the completions API; requests go to <base_url>/completions
# Overridden by --base-url and the BANTER_API_BASE_URL environment variable
base_url = "http://127.0.0.1:5009/api"

# Whether to use TUI mode by default (true by default)
# Set to false for simple stdin/stdout mode
tui = true

# Color theme (dark, light)
theme = "dark"

# Greeting shown at the top of a new conversation (optional)
# greeting = "Ask me something about Azure OpenAI."
"#
}
