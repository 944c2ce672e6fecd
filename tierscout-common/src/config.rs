//! Configuration loading and data folder resolution
//!
//! The data folder (home of `tierscout.db`) resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. `TIERSCOUT_DATA` environment variable
//! 3. `data_folder` key in the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! Session settings (event code, scout name, webhook URL, auto-export flag)
//! live in the database `settings` table and are read once into a
//! [`SessionConfig`] at startup. The core never reads ambient configuration
//! mid-operation; every value flows through this struct.

use crate::db;
use crate::{Error, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::PathBuf;

/// Environment variable overriding the data folder location.
pub const DATA_ENV_VAR: &str = "TIERSCOUT_DATA";

/// Environment variable carrying The Blue Alliance API key.
pub const TBA_KEY_ENV_VAR: &str = "TBA_API_KEY";

/// Optional TOML config file (`~/.config/tierscout/config.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Overrides the platform-default data folder.
    pub data_folder: Option<String>,
    /// TBA API key; the environment variable takes priority.
    pub tba_api_key: Option<String>,
}

impl TomlConfig {
    /// Load the config file if one exists. A missing or unparsable file is
    /// not fatal: startup proceeds on defaults with a warning.
    pub fn load() -> Self {
        let Some(path) = config_file_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<TomlConfig>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring malformed config file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Could not read config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tierscout").join("config.toml"))
}

/// Resolve the data folder following the priority order documented above.
pub fn resolve_data_folder(cli_arg: Option<&str>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var(DATA_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.data_folder {
        return PathBuf::from(path);
    }

    default_data_folder()
}

/// OS-dependent default data folder.
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tierscout"))
        .unwrap_or_else(|| PathBuf::from("./tierscout_data"))
}

/// Path of the SQLite database inside the data folder.
pub fn database_path(data_folder: &std::path::Path) -> PathBuf {
    data_folder.join("tierscout.db")
}

/// Snapshot of all session-relevant settings, read once at startup.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Competition event code, e.g. "2026tuis". Partitions all state.
    pub event_key: String,
    /// Scout attributed as author of new notes.
    pub scout_name: String,
    /// Spreadsheet webhook destination; empty means unconfigured.
    pub spreadsheet_url: String,
    /// Arm the debounced auto-export after each board/notes mutation.
    pub auto_export: bool,
    /// Display preference carried for the presentation layer.
    pub use_team_colors: bool,
    /// TBA API key for roster/match fetches.
    pub tba_api_key: String,
}

impl SessionConfig {
    /// Load current settings from the database, resolving the TBA key from
    /// the environment first, then the TOML config file.
    pub async fn load(pool: &SqlitePool, toml_config: &TomlConfig) -> Result<Self> {
        let tba_api_key = std::env::var(TBA_KEY_ENV_VAR)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| toml_config.tba_api_key.clone())
            .unwrap_or_default();

        Ok(Self {
            event_key: db::settings::get(pool, "event_key").await?,
            scout_name: db::settings::get(pool, "scout_name").await?,
            spreadsheet_url: db::settings::get(pool, "spreadsheet_url").await?,
            auto_export: db::settings::get_bool(pool, "auto_export").await?,
            use_team_colors: db::settings::get_bool(pool, "use_team_colors").await?,
            tba_api_key,
        })
    }

    /// Fail unless a TBA API key is configured.
    pub fn require_tba_key(&self) -> Result<&str> {
        if self.tba_api_key.is_empty() {
            return Err(Error::Config(format!(
                "No TBA API key configured (set {} or tba_api_key in the config file)",
                TBA_KEY_ENV_VAR
            )));
        }
        Ok(&self.tba_api_key)
    }
}
