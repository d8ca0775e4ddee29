//! Configuration file discovery
//!
//! Finds the reporter configuration in standard locations.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ReporterConfig;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./collection-report.yaml",
    "./collection-report.yml",
    "./collection-report.json",
    "./.collection-report.yaml",
    "~/.config/collection-report/config.yaml",
    "~/.collection-report.yaml",
];

/// A discovered configuration file
#[derive(Clone, Debug)]
pub struct ConfigFile {
    pub path: Option<PathBuf>,
    pub config: ReporterConfig,
}

impl ConfigFile {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        Self::find_in(CONFIG_LOCATIONS)
    }

    fn find_in(locations: &[&str]) -> Option<PathBuf> {
        locations
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load from an explicit path, or the first standard location found.
    ///
    /// Falls back to defaults when no file exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(expand_path(&path.to_string_lossy())),
            None => Self::find(),
        };

        match path {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                let config = ReporterConfig::load(&path)?;
                Ok(Self {
                    path: Some(path),
                    config,
                })
            }
            None => Ok(Self {
                path: None,
                config: ReporterConfig::default(),
            }),
        }
    }

    /// Example configuration written by `config init`
    pub fn example() -> ReporterConfig {
        ReporterConfig {
            template: Some("./templates/report.html".to_string()),
            export: Some("./reports/".to_string()),
            format: "html".to_string(),
            title: Some("API Test Run".to_string()),
            log_level: "info".to_string(),
        }
    }
}

/// Expand ~ to home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
