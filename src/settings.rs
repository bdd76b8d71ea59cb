//! Code for loading program settings.
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// The name of this program's folder within the user's config folder
const CONFIG_DIR_NAME: &str = "energy_mix";

/// Default log level for program
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().context("Could not locate the user config folder")?;
    path.push(CONFIG_DIR_NAME);
    path.push(SETTINGS_FILE_NAME);

    Ok(path)
}

/// Program settings from config file
#[derive(Debug, Deserialize, PartialEq)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether to overwrite output files by default
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            overwrite: false,
        }
    }
}

impl Settings {
    /// Read the settings file from the user's config folder.
    ///
    /// If the file is not present, default values for settings will be used.
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path()?)
    }

    /// Read settings from the specified path, falling back to defaults if it doesn't exist
    pub fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        read_toml(file_path)
    }
}
