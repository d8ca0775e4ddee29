//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "COLLECTION_REPORT";

/// Overrides read from `COLLECTION_REPORT_*` variables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// Template from COLLECTION_REPORT_TEMPLATE
    pub template: Option<String>,
    /// Export path from COLLECTION_REPORT_EXPORT
    pub export: Option<String>,
    /// Output format from COLLECTION_REPORT_FORMAT
    pub format: Option<String>,
    /// Title from COLLECTION_REPORT_TITLE
    pub title: Option<String>,
    /// Log level from COLLECTION_REPORT_LOG_LEVEL
    pub log_level: Option<String>,
    /// Config file from COLLECTION_REPORT_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load through an arbitrary lookup, keyed by full variable name
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(format!("{ENV_PREFIX}_{name}").as_str()).filter(|value| !value.is_empty())
        };

        Self {
            template: get("TEMPLATE"),
            export: get("EXPORT"),
            format: get("FORMAT"),
            title: get("TITLE"),
            log_level: get("LOG_LEVEL"),
            config_file: get("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.template.is_some()
            || self.export.is_some()
            || self.format.is_some()
            || self.title.is_some()
            || self.log_level.is_some()
            || self.config_file.is_some()
    }
}

/// Print all COLLECTION_REPORT environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_TEMPLATE    Path to a custom HTML template");
    println!("  {ENV_PREFIX}_EXPORT      Report output path");
    println!("  {ENV_PREFIX}_FORMAT      Output format (html, json)");
    println!("  {ENV_PREFIX}_TITLE       Report page title");
    println!("  {ENV_PREFIX}_LOG_LEVEL   Log level (trace, debug, info, warn, error)");
    println!("  {ENV_PREFIX}_CONFIG      Path to configuration file");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_EXPORT=./reports/nightly.html");
    println!("  collection-report render run.json");
}
