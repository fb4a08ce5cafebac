//! Build configuration
//!
//! A YAML document (JSON when the file ends in `.json`) naming the input
//! files and the rooms of the pack. Relative paths are taken against the
//! directory the tool is run from.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use wiring_plans::Room;
use wiring_plans::constants::DEFAULT_PDF_FILENAME_PATTERN;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error parsing configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("No rooms configured in {path}")]
    NoRooms { path: PathBuf },
    #[error("{what} not found: {path}")]
    MissingPath { what: &'static str, path: PathBuf },
    #[error("Invalid PDF filename pattern '{pattern}': {message}")]
    BadPattern { pattern: String, message: String },
    #[error("No PDF files found for tab '{tab}' using pattern: {pattern}")]
    NoPlanPdf { tab: String, pattern: String },
    #[error("Multiple PDF files found for tab '{tab}': {}", list_paths(.matches))]
    AmbiguousPlanPdf { tab: String, matches: Vec<PathBuf> },
}

fn list_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    /// Fixed working directory. Created when missing and never removed.
    #[serde(default)]
    pub working_directory: Option<PathBuf>,
    #[serde(default = "default_cleanup")]
    pub cleanup_temp_files: bool,
}

fn default_cleanup() -> bool {
    true
}

fn default_pattern() -> String {
    DEFAULT_PDF_FILENAME_PATTERN.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            working_directory: None,
            cleanup_temp_files: default_cleanup(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub crops_file: PathBuf,
    pub tabs_file: PathBuf,
    pub csv_data_directory: PathBuf,
    pub plan_pdfs_directory: PathBuf,
    pub rooms: Vec<Room>,
    #[serde(default = "default_pattern")]
    pub pdf_filename_pattern: String,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_owned(),
                source,
            })?;
        Self::parse(&text, path)
    }

    /// Parse configuration text. `path` picks the format and names the
    /// source in errors.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str::<Config>(text).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str::<Config>(text).map_err(|e| e.to_string())
        };
        let config = parsed.map_err(|message| ConfigError::Parse {
            path: path.to_owned(),
            message,
        })?;

        if config.rooms.is_empty() {
            return Err(ConfigError::NoRooms {
                path: path.to_owned(),
            });
        }

        config.resolved().map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })
    }

    fn resolved(mut self) -> std::io::Result<Self> {
        self.crops_file = std::path::absolute(&self.crops_file)?;
        self.tabs_file = std::path::absolute(&self.tabs_file)?;
        self.csv_data_directory = std::path::absolute(&self.csv_data_directory)?;
        self.plan_pdfs_directory = std::path::absolute(&self.plan_pdfs_directory)?;
        if let Some(dir) = self.output.working_directory.take() {
            self.output.working_directory = Some(std::path::absolute(dir)?);
        }
        Ok(self)
    }

    pub fn input_paths(&self) -> [(&'static str, &Path); 4] {
        [
            ("Crops file", &self.crops_file),
            ("Tabs file", &self.tabs_file),
            ("CSV data directory", &self.csv_data_directory),
            ("Plan PDFs directory", &self.plan_pdfs_directory),
        ]
    }

    /// Fail on the first configured input that does not exist
    pub fn check_paths(&self) -> Result<(), ConfigError> {
        for (what, path) in self.input_paths() {
            if !path.exists() {
                return Err(ConfigError::MissingPath {
                    what,
                    path: path.to_owned(),
                });
            }
        }
        Ok(())
    }
}
