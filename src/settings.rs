use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::theme::{ThemeConfig, ThemeMode};

pub const APP_FOLDER_NAME: &str = "GradebookDesk";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 420.0,
            height: 380.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UiSettings {
    #[serde(default)]
    pub start_theme: ThemeMode,
    #[serde(default = "default_true")]
    pub details_enabled: bool,
    #[serde(default)]
    pub day_theme: Option<ThemeConfig>,
    #[serde(default)]
    pub night_theme: Option<ThemeConfig>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            start_theme: ThemeMode::Day,
            details_enabled: true,
            day_theme: None,
            night_theme: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            ui: UiSettings::default(),
            log_level: default_log_level(),
        }
    }
}

pub fn default_base_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));

    if let Some(dir) = exe_dir {
        return dir.join("data");
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_FOLDER_NAME)
}

pub fn settings_path(base: &Path) -> PathBuf {
    base.join("config").join("settings.json")
}

/// Reads launch settings. A missing file means defaults; nothing is written.
pub fn load_settings(base: &Path) -> Result<Settings, SettingsError> {
    let path = settings_path(base);
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(&path).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    parse_settings(&contents).map_err(|source| SettingsError::Parse { path, source })
}

pub fn parse_settings(contents: &str) -> Result<Settings, serde_json::Error> {
    serde_json::from_str(contents)
}
