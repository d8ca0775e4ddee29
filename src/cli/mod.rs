//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Aggregated HTML reports for collection-based API test runs
#[derive(Parser, Debug)]
#[command(name = "collection-report")]
#[command(version)]
#[command(about = "Build aggregated reports from API test run documents")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a report from a run document
    Render(RenderArgs),

    /// Print a per-request summary of a run document
    Summary(SummaryArgs),

    /// Print the JSON schema of run documents
    Schema,

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Run document (JSON)
    pub input: PathBuf,

    /// Custom template file
    #[arg(short, long)]
    pub template: Option<String>,

    /// Output path
    #[arg(short, long)]
    pub export: Option<String>,

    /// Output format (html, json)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Page title
    #[arg(long)]
    pub title: Option<String>,

    /// Print content to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

/// Arguments for summary command
#[derive(Parser, Debug)]
pub struct SummaryArgs {
    /// Run document (JSON)
    pub input: PathBuf,

    /// Output format (table, json, json-pretty, csv)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(default_value = "collection-report.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// List supported environment variables
    Env,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args() {
        let args = Args::parse_from([
            "collection-report",
            "render",
            "run.json",
            "--export",
            "out/report.html",
            "--format",
            "html",
        ]);
        match args.command {
            Command::Render(render) => {
                assert_eq!(render.input, PathBuf::from("run.json"));
                assert_eq!(render.export.as_deref(), Some("out/report.html"));
                assert!(render.template.is_none());
                assert!(!render.stdout);
            }
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_summary_args_default_format() {
        let args = Args::parse_from(["collection-report", "summary", "run.json", "-v"]);
        assert!(args.verbose);
        match args.command {
            Command::Summary(summary) => assert_eq!(summary.format, "table"),
            _ => panic!("Expected Summary command"),
        }
    }

    #[test]
    fn test_config_init_args() {
        let args = Args::parse_from(["collection-report", "config", "init", "--force"]);
        match args.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { path, force },
            }) => {
                assert_eq!(path, PathBuf::from("collection-report.yaml"));
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }
}
