use ron::{self, extensions::Extensions};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::PathBuf};
use thiserror::Error;

use crate::algorithms::{MazeParams, DEFAULT_THRESHOLD};

const DEFAULT_SETTINGS: &str = include_str!("./default_settings.ron");

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot access settings file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("cannot write settings: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub default_width: Option<i32>,
    #[serde(default)]
    pub default_height: Option<i32>,
    #[serde(default)]
    pub default_threshold: Option<i32>,
    #[serde(default)]
    pub max_cells: Option<usize>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub pretty: Option<bool>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_path() -> PathBuf {
        dirs::preference_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("divmaze")
            .join("config.ron")
    }

    pub fn set_default_width(mut self, value: i32) -> Self {
        self.default_width = Some(value);
        self
    }

    pub fn get_default_width(&self) -> i32 {
        self.default_width.unwrap_or(16)
    }

    pub fn set_default_height(mut self, value: i32) -> Self {
        self.default_height = Some(value);
        self
    }

    pub fn get_default_height(&self) -> i32 {
        self.default_height.unwrap_or(16)
    }

    pub fn set_default_threshold(mut self, value: i32) -> Self {
        self.default_threshold = Some(value);
        self
    }

    pub fn get_default_threshold(&self) -> i32 {
        self.default_threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn set_max_cells(mut self, value: usize) -> Self {
        self.max_cells = Some(value);
        self
    }

    pub fn get_max_cells(&self) -> usize {
        self.max_cells.unwrap_or(1_000_000)
    }

    pub fn set_log_level(mut self, value: log::LevelFilter) -> Self {
        self.log_level = Some(value.to_string().to_lowercase());
        self
    }

    /// Unknown level names fall back to `warn`.
    pub fn get_log_level(&self) -> log::LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(log::LevelFilter::Warn)
    }

    pub fn set_pretty(mut self, value: bool) -> Self {
        self.pretty = Some(value);
        self
    }

    pub fn get_pretty(&self) -> bool {
        self.pretty.unwrap_or_default()
    }

    /// Parameters for a maze, with missing values taken from these settings.
    pub fn maze_params(
        &self,
        width: Option<i32>,
        height: Option<i32>,
        threshold: Option<i32>,
    ) -> MazeParams {
        MazeParams::new(
            width.unwrap_or_else(|| self.get_default_width()),
            height.unwrap_or_else(|| self.get_default_height()),
            threshold.unwrap_or_else(|| self.get_default_threshold()),
        )
        .max_cells(self.get_max_cells())
    }

    pub fn from_ron(text: &str) -> Result<Self, SettingsError> {
        let options = ron::Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
        Ok(options.from_str(text)?)
    }

    /// Reads settings from `path`, a missing file gives the defaults.
    pub fn load(path: PathBuf) -> Result<Self, SettingsError> {
        match fs::read_to_string(&path) {
            Ok(text) => Self::from_ron(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Self::from_ron(DEFAULT_SETTINGS)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, path: PathBuf) -> Result<(), SettingsError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        Ok(())
    }

    pub fn reset_config(path: PathBuf) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_SETTINGS)?;
        Ok(())
    }
}
