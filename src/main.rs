//! collection-report - aggregated reports for API test runs
//!
//! Reads a run document exported by a collection-based API test runner and
//! renders one report with a node per request, aggregated over iterations.
//!
//! ## Usage
//!
//! ```bash
//! # Render an HTML report next to the run
//! collection-report render run.json --export reports/run.html
//!
//! # Use a custom template
//! collection-report render run.json --template templates/report.html
//!
//! # Print per-request aggregates
//! collection-report summary run.json --format csv
//!
//! # Write an example configuration
//! collection-report config init
//! ```

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{info, warn};

use collection_report::cli::{self, Args, ConfigAction};
use collection_report::config::{print_env_help, ConfigFile, EnvConfig, ReporterConfig};
use collection_report::output::{OutputFormat, SummaryFormatter};
use collection_report::reporter::{Reporter, ReporterOptions, RunDocument};
use collection_report::utils::{init_logger, LogLevel, Stopwatch};

fn main() -> Result<()> {
    let args = Args::parse();

    let env = EnvConfig::load();
    let explicit = args
        .config
        .clone()
        .or_else(|| env.config_file.as_ref().map(Into::into));
    let file = ConfigFile::load(explicit.as_deref())?;

    let mut config = file.config.clone();
    config.apply_env(&env);

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        config.log_level()
    };
    init_logger(level);

    match args.command {
        cli::Command::Render(render_args) => render(render_args, config)?,
        cli::Command::Summary(summary_args) => summary(summary_args)?,
        cli::Command::Schema => println!("{}", RunDocument::schema()?),
        cli::Command::Config(config_args) => manage_config(config_args.action, &file, &config)?,
    }

    Ok(())
}

fn render(args: cli::RenderArgs, mut config: ReporterConfig) -> Result<()> {
    if let Some(template) = args.template {
        config.template = Some(template);
    }
    if let Some(export) = args.export {
        config.export = Some(export);
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(title) = args.title {
        config.title = Some(title);
    }

    let options = config.reporter_options()?;
    let mut stopwatch = Stopwatch::new();

    let document = RunDocument::load(&args.input)?;
    let collection = document.collection.name.clone();
    stopwatch.lap("load");

    let artifact = Reporter::from_document(document, options)
        .before_done()
        .context("Failed to build report")?;
    stopwatch.lap("render");

    if args.stdout {
        println!("{}", artifact.content);
    } else {
        let path = artifact.resolve_path(&collection, Local::now());
        artifact.write(&path)?;
        println!("Report written to {}", path.display());
    }
    stopwatch.lap("export");
    stopwatch.log();

    Ok(())
}

fn summary(args: cli::SummaryArgs) -> Result<()> {
    let format = OutputFormat::parse(&args.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", args.format))?;

    let document = RunDocument::load(&args.input)?;
    let model = Reporter::from_document(document, ReporterOptions::default()).model();

    let mut formatter = SummaryFormatter::new(format);
    if args.no_color {
        formatter = formatter.no_color();
    }
    println!("{}", formatter.format(&model)?);

    let failed = model.totals().failed;
    if failed > 0 {
        warn!("{} assertion(s) failed", failed);
    }

    Ok(())
}

fn manage_config(action: ConfigAction, file: &ConfigFile, effective: &ReporterConfig) -> Result<()> {
    match action {
        ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            ConfigFile::example().save(&path)?;
            info!("Wrote example configuration to {}", path.display());
            println!("Configuration written to {}", path.display());
        }
        ConfigAction::Show => {
            match file.path.as_deref() {
                Some(path) => println!("# Loaded from {}", path.display()),
                None => println!("# No configuration file found, using defaults"),
            }
            println!(
                "{}",
                serde_yaml::to_string(effective).context("Failed to serialize config")?
            );
        }
        ConfigAction::Env => print_env_help(),
    }

    Ok(())
}
