//! Run reporter
//!
//! Subscribes to the runner's channels, owns the run-scoped state and
//! produces the report artifact once the run is done.

mod artifact;
mod document;

pub use artifact::{ReportArtifact, DEFAULT_REPORT_DIR};
pub use document::{RunDocument, RunEvent};

use chrono::Local;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::collector;
use crate::models::{AssertionEvent, ConsoleEvent, ReportModel, RunState};
use crate::report::{build_model, HtmlRenderer, JsonRenderer, RenderFormat, Renderer, ReportError};

/// Reporter options. Paths are opaque strings passed through untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReporterOptions {
    /// Custom template source
    pub template: Option<String>,

    /// Custom output path
    pub export: Option<String>,

    pub format: RenderFormat,

    /// Page title, defaults to the collection name
    pub title: Option<String>,
}

impl Default for ReporterOptions {
    fn default() -> Self {
        Self {
            template: None,
            export: None,
            format: RenderFormat::Html,
            title: None,
        }
    }
}

/// Reporter for one run
pub struct Reporter {
    state: RunState,
    options: ReporterOptions,
}

impl Reporter {
    /// Create a reporter at run start
    pub fn new(state: RunState, options: ReporterOptions) -> Self {
        Self { state, options }
    }

    /// Create a reporter from a run document, replaying its recorded events
    pub fn from_document(document: RunDocument, options: ReporterOptions) -> Self {
        let (state, events) = document.into_parts();
        let mut reporter = Self::new(state, options);

        for event in events {
            match event {
                RunEvent::Assertion { error, outcome } => {
                    reporter.on_assertion(error.as_deref(), outcome)
                }
                RunEvent::Console { error, outcome } => reporter.on_console(error.as_deref(), outcome),
            }
        }

        reporter
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// `assertion` channel handler
    pub fn on_assertion(&mut self, error: Option<&str>, outcome: AssertionEvent) {
        collector::on_assertion(&mut self.state, error, outcome);
    }

    /// `console` channel handler
    pub fn on_console(&mut self, error: Option<&str>, outcome: ConsoleEvent) {
        collector::on_console(&mut self.state, error, outcome);
    }

    /// Aggregate the run into a report model without rendering it
    pub fn model(&self) -> ReportModel {
        let groups = aggregate(&self.state.executions);
        build_model(&self.state, groups, Local::now())
    }

    /// `beforeDone` handler: aggregate, render and register the artifact.
    ///
    /// Consumes the reporter; no run state survives the report.
    pub fn before_done(self) -> Result<ReportArtifact, ReportError> {
        debug!(
            "Building report for {} ({} executions)",
            self.state.collection.name,
            self.state.executions.len()
        );

        let model = self.model();
        let renderer = self.renderer()?;
        let content = renderer.render(&model)?;

        info!(
            "Rendered {} report: {} groups, {} requests",
            renderer.extension(),
            model.aggregations.len(),
            model.nodes().count()
        );

        let name = match self.options.format {
            RenderFormat::Html => "html-reporter",
            RenderFormat::Json => "json-reporter",
        };

        Ok(ReportArtifact {
            name: name.to_string(),
            default_filename: format!("collection-report.{}", renderer.extension()),
            path: self.options.export,
            content,
        })
    }

    fn renderer(&self) -> Result<Box<dyn Renderer>, ReportError> {
        let title = self
            .options
            .title
            .clone()
            .unwrap_or_else(|| self.state.collection.name.clone());

        match (self.options.format, self.options.template.as_deref()) {
            (RenderFormat::Html, Some(path)) => {
                Ok(Box::new(HtmlRenderer::from_template_file(title, path)?))
            }
            (RenderFormat::Html, None) => Ok(Box::new(HtmlRenderer::new(title))),
            (RenderFormat::Json, Some(_)) => Err(ReportError::UnsupportedFormat(
                "templates only apply to html output".to_string(),
            )),
            (RenderFormat::Json, None) => Ok(Box::new(JsonRenderer)),
        }
    }
}
