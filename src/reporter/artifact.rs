//! Report artifact registration and export

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::report::ReportError;

/// Directory used when no export path is configured
pub const DEFAULT_REPORT_DIR: &str = "reports";

/// Rendered report ready to be written by the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportArtifact {
    /// Reporter name
    pub name: String,

    /// File name used when no path is given
    pub default_filename: String,

    /// Target path, passed through from configuration untouched
    pub path: Option<String>,

    /// Rendered content
    pub content: String,
}

impl ReportArtifact {
    /// Where the artifact will be written.
    ///
    /// An explicit path wins; a path ending in `/` is treated as a directory.
    /// Otherwise a timestamped file under [`DEFAULT_REPORT_DIR`] is used.
    pub fn resolve_path(&self, collection: &str, now: DateTime<Local>) -> PathBuf {
        match self.path.as_deref() {
            Some(path) if path.ends_with('/') || path.ends_with('\\') => {
                Path::new(path).join(&self.default_filename)
            }
            Some(path) => PathBuf::from(path),
            None => {
                let extension = Path::new(&self.default_filename)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("html");
                PathBuf::from(DEFAULT_REPORT_DIR).join(format!(
                    "{}-{}.{}",
                    slugify(collection),
                    now.format("%Y-%m-%d-%H-%M-%S"),
                    extension
                ))
            }
        }
    }

    /// Write content to `path`, creating parent directories
    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        let export_error = |source| ReportError::ExportWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(export_error)?;
        }
        std::fs::write(path, &self.content).map_err(export_error)?;

        info!("{} written to {}", self.name, path.display());
        Ok(())
    }
}

/// Lowercase, dash-separated file name fragment
fn slugify(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();

    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        "run".to_string()
    } else {
        slug
    }
}
