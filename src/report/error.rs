//! Report pipeline errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while rendering or exporting a report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report {path}: {source}")]
    ExportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}
