//! Terminal formatters for report models
//!
//! Provides table, JSON and CSV views of the per-request aggregates.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{ReportModel, ReportNode};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

/// One flattened line per report node
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestRow {
    pub group: String,
    pub request: String,
    pub method: String,
    pub url: String,
    pub code: Option<u16>,
    pub mean_time: String,
    pub mean_size: String,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl RequestRow {
    fn from_node(group: &str, node: &ReportNode) -> Self {
        let snapshot = &node.snapshot;
        Self {
            group: group.to_string(),
            request: snapshot.item.name.clone(),
            method: snapshot.request.method.clone(),
            url: snapshot.request.url.clone(),
            code: snapshot.response.as_ref().map(|r| r.code),
            mean_time: node.mean.time.clone(),
            mean_size: node.mean.size.clone(),
            passed: node.cumulative_tests.passed,
            failed: node.cumulative_tests.failed,
            skipped: node.cumulative_tests.skipped,
        }
    }
}

/// Flatten every group of the model into rows, in emission order
pub fn request_rows(model: &ReportModel) -> Vec<RequestRow> {
    model
        .aggregations
        .iter()
        .flat_map(|group| {
            group
                .executions
                .iter()
                .map(move |node| RequestRow::from_node(&group.parent.full_name, node))
        })
        .collect()
}

/// Summary formatter
pub struct SummaryFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl SummaryFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format the per-request summary of a model
    pub fn format(&self, model: &ReportModel) -> Result<String> {
        let rows = request_rows(model);
        match self.format {
            OutputFormat::Table => Ok(self.format_table(model, &rows)),
            OutputFormat::Json => serde_json::to_string(&rows).context("Failed to serialize rows"),
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(&rows).context("Failed to serialize rows")
            }
            OutputFormat::Csv => format_csv(&rows),
        }
    }

    fn format_table(&self, model: &ReportModel, rows: &[RequestRow]) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{:=^78}\n",
            format!(" {} ", model.summary.collection.name)
        ));
        output.push_str(&format!(
            "{:<28} {:<6} {:>5} {:>10} {:>10} {:>4} {:>4} {:>4}\n",
            "Request", "Method", "Code", "Mean", "Size", "Pass", "Fail", "Skip"
        ));
        output.push_str(&format!("{:-<78}\n", ""));

        let mut current_group: Option<&str> = None;
        for row in rows {
            if current_group != Some(row.group.as_str()) {
                output.push_str(&format!("[{}]\n", row.group));
                current_group = Some(row.group.as_str());
            }

            let fail = if self.colorize && row.failed > 0 {
                format!("\x1b[31m{:>4}\x1b[0m", row.failed)
            } else {
                format!("{:>4}", row.failed)
            };

            output.push_str(&format!(
                "{:<28} {:<6} {:>5} {:>10} {:>10} {:>4} {} {:>4}\n",
                truncate(&row.request, 28),
                row.method,
                row.code.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                row.mean_time,
                row.mean_size,
                row.passed,
                fail,
                row.skipped
            ));
        }

        let totals = model.totals();
        output.push_str(&format!("{:-<78}\n", ""));
        output.push_str(&format!(
            "Requests: {} | {} | Duration: {} | Received: {}\n",
            rows.len(),
            totals,
            model.summary.duration,
            model.summary.response_total
        ));
        output.push_str(&format!("{:=<78}\n", ""));

        output
    }
}

fn format_csv(rows: &[RequestRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).context("Failed to write CSV row")?;
    }
    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::models::fixtures::{record, timed_record};
    use crate::models::{AssertionOutcome, CollectionMeta, RunState};
    use crate::report::build_model;
    use chrono::Local;

    fn model() -> ReportModel {
        let state = RunState::new(CollectionMeta::new("Users API")).with_executions(vec![
            timed_record("r1", 0, "p1", 100.0, vec![AssertionOutcome::passed("ok")]),
            record("r2", 0, "p2"),
            timed_record("r1", 1, "p1", 300.0, vec![AssertionOutcome::failed("ok", "x")]),
        ]);
        build_model(&state, aggregate(&state.executions), Local::now())
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("table"), Some(OutputFormat::Table));
        assert_eq!(OutputFormat::parse("JSON-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::parse("xml"), None);
    }

    #[test]
    fn test_request_rows() {
        let rows = request_rows(&model());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].group, "Suite p1");
        assert_eq!(rows[0].mean_time, "200ms");
        assert_eq!(rows[0].passed, 1);
        assert_eq!(rows[0].failed, 1);
        assert_eq!(rows[1].code, None);
    }

    #[test]
    fn test_table_output() {
        let table = SummaryFormatter::new(OutputFormat::Table)
            .no_color()
            .format(&model())
            .unwrap();
        assert!(table.contains("Users API"));
        assert!(table.contains("[Suite p2]"));
        assert!(table.contains("Requests: 2 | Pass: 1 | Fail: 1 | Skip: 0"));
    }

    #[test]
    fn test_csv_output() {
        let csv = SummaryFormatter::new(OutputFormat::Csv).format(&model()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("group,request,method,url,code,mean_time,mean_size,passed,failed,skipped")
        );
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }
}
