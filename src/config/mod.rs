//! Configuration module
//!
//! Handles loading and managing reporter configuration. Values are layered:
//! configuration file, then `COLLECTION_REPORT_*` environment variables, then
//! command-line flags.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::{expand_path, ConfigFile};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::report::RenderFormat;
use crate::reporter::ReporterOptions;
use crate::utils::LogLevel;

/// Reporter configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Custom template source path
    pub template: Option<String>,

    /// Custom output path
    pub export: Option<String>,

    /// Output format (html, json)
    pub format: String,

    /// Page title, defaults to the collection name
    pub title: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            template: None,
            export: None,
            format: "html".to_string(),
            title: None,
            log_level: "info".to_string(),
        }
    }
}

impl ReporterConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let format = self.render_format()?;

        if LogLevel::parse(&self.log_level).is_none() {
            anyhow::bail!("Invalid log level: {}", self.log_level);
        }

        if format == RenderFormat::Json && self.template.is_some() {
            anyhow::bail!("A custom template can only be used with html output");
        }

        Ok(())
    }

    /// Apply environment overrides (environment takes precedence)
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(template) = &env.template {
            self.template = Some(template.clone());
        }
        if let Some(export) = &env.export {
            self.export = Some(export.clone());
        }
        if let Some(format) = &env.format {
            self.format = format.clone();
        }
        if let Some(title) = &env.title {
            self.title = Some(title.clone());
        }
        if let Some(level) = &env.log_level {
            self.log_level = level.clone();
        }
    }

    pub fn render_format(&self) -> Result<RenderFormat> {
        RenderFormat::parse(&self.format)
            .ok_or_else(|| anyhow::anyhow!("Unsupported report format: {}", self.format))
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or_default()
    }

    /// Convert to reporter options
    pub fn reporter_options(&self) -> Result<ReporterOptions> {
        self.validate()?;
        Ok(ReporterOptions {
            template: self.template.clone(),
            export: self.export.clone(),
            format: self.render_format()?,
            title: self.title.clone(),
        })
    }
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
