//! Renderers turning a report model into output content

use std::fmt::Write;
use std::path::Path;

use super::error::ReportError;
use crate::models::{Group, ReportModel, ReportNode};

/// Produces the final artifact content from a report model
pub trait Renderer {
    fn render(&self, model: &ReportModel) -> Result<String, ReportError>;

    /// File extension of the rendered content
    fn extension(&self) -> &'static str;
}

/// Report output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderFormat {
    Html,
    Json,
}

impl RenderFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Some(RenderFormat::Html),
            "json" => Some(RenderFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            RenderFormat::Html => "html",
            RenderFormat::Json => "json",
        }
    }
}

/// Pretty-printed JSON of the whole model
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, model: &ReportModel) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(model)?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{title}}</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 40px; background: #f5f5f5; }
        .container { max-width: 1200px; margin: 0 auto; background: white; padding: 40px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        h1 { color: #333; border-bottom: 2px solid #007bff; padding-bottom: 10px; }
        h2 { color: #555; margin-top: 30px; }
        table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        th, td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background: #007bff; color: white; }
        .pass { color: #28a745; font-weight: bold; }
        .fail { color: #dc3545; font-weight: bold; }
        .skip { color: #ffc107; font-weight: bold; }
        pre { background: #f8f9fa; padding: 12px; overflow-x: auto; }
    </style>
</head>
<body>
    <div class="container">
        <h1>{{title}}</h1>
        <p>Generated {{timestamp}} by collection-report {{version}}</p>
{{summary}}
{{requests}}
    </div>
</body>
</html>
"#;

/// HTML page renderer.
///
/// Templates are plain text with `{{name}}` placeholders: `title`,
/// `timestamp`, `version`, `summary`, `requests` and `report_json`.
#[derive(Clone, Debug)]
pub struct HtmlRenderer {
    title: String,
    template: String,
}

impl HtmlRenderer {
    /// Renderer using the built-in page
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Renderer using a custom template file
    pub fn from_template_file(title: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        let template = std::fs::read_to_string(path).map_err(|source| ReportError::TemplateRead {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            title: title.into(),
            template,
        })
    }

    fn render_summary(&self, model: &ReportModel) -> Result<String, ReportError> {
        let mut out = String::new();
        let stats = &model.summary.stats;
        let totals = model.totals();

        writeln!(out, "        <h2>Summary</h2>")?;
        writeln!(out, "        <table>")?;
        writeln!(out, "            <tr><th>Metric</th><th>Total</th><th>Failed</th></tr>")?;
        for (label, stat) in [
            ("Iterations", &stats.iterations),
            ("Requests", &stats.requests),
            ("Test Scripts", &stats.test_scripts),
            ("Prerequest Scripts", &stats.prerequest_scripts),
            ("Assertions", &stats.assertions),
        ] {
            writeln!(
                out,
                "            <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                label, stat.total, stat.failed
            )?;
        }
        writeln!(out, "        </table>")?;

        writeln!(out, "        <table>")?;
        writeln!(out, "            <tr><th>Property</th><th>Value</th></tr>")?;
        writeln!(
            out,
            "            <tr><td>Collection</td><td>{}</td></tr>",
            escape_html(&model.summary.collection.name)
        )?;
        writeln!(out, "            <tr><td>Total run duration</td><td>{}</td></tr>", model.summary.duration)?;
        writeln!(out, "            <tr><td>Total data received</td><td>{}</td></tr>", model.summary.response_total)?;
        writeln!(out, "            <tr><td>Average response time</td><td>{}</td></tr>", model.summary.response_average)?;
        writeln!(
            out,
            "            <tr><td>Assertions</td><td><span class=\"pass\">{}</span> / <span class=\"fail\">{}</span> / <span class=\"skip\">{}</span></td></tr>",
            totals.passed, totals.failed, totals.skipped
        )?;
        writeln!(out, "        </table>")?;

        if !model.summary.failures.is_empty() {
            writeln!(out, "        <h2>Failures</h2>")?;
            writeln!(out, "        <table>")?;
            writeln!(out, "            <tr><th>Source</th><th>Error</th><th>Message</th></tr>")?;
            for failure in &model.summary.failures {
                let source = failure.source.as_ref().map(|s| s.name.as_str()).unwrap_or("");
                writeln!(
                    out,
                    "            <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape_html(source),
                    escape_html(&failure.error.name),
                    escape_html(&failure.error.message)
                )?;
            }
            writeln!(out, "        </table>")?;
        }

        if let Some(skipped) = &model.summary.skipped_tests {
            writeln!(out, "        <h2>Skipped Tests</h2>")?;
            writeln!(out, "        <ul>")?;
            for test in skipped {
                writeln!(
                    out,
                    "            <li>{} &mdash; {}</li>",
                    escape_html(&test.item.name),
                    escape_html(&test.assertion)
                )?;
            }
            writeln!(out, "        </ul>")?;
        }

        if let Some(logs) = &model.summary.console_logs {
            writeln!(out, "        <h2>Console Output</h2>")?;
            writeln!(out, "        <pre>")?;
            for log in logs {
                let messages: Vec<String> = log
                    .messages
                    .iter()
                    .map(|m| match m {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                writeln!(
                    out,
                    "[{}] {} {}",
                    escape_html(&log.level),
                    log.cursor,
                    escape_html(&messages.join(" "))
                )?;
            }
            writeln!(out, "        </pre>")?;
        }

        Ok(out)
    }

    fn render_requests(&self, groups: &[Group]) -> Result<String, ReportError> {
        let mut out = String::new();

        writeln!(out, "        <h2>Requests</h2>")?;
        for group in groups {
            writeln!(
                out,
                "        <h3>{} <small>(iteration {})</small></h3>",
                escape_html(&group.parent.full_name),
                group.parent.iteration + 1
            )?;
            if let Some(description) = &group.parent.description {
                writeln!(out, "        <p>{}</p>", escape_html(description))?;
            }
            for node in &group.executions {
                self.render_node(&mut out, node)?;
            }
        }

        Ok(out)
    }

    fn render_node(&self, out: &mut String, node: &ReportNode) -> Result<(), ReportError> {
        let snapshot = &node.snapshot;
        writeln!(
            out,
            "        <h4>{} <code>{} {}</code></h4>",
            escape_html(&snapshot.item.name),
            escape_html(&snapshot.request.method),
            escape_html(&snapshot.request.url)
        )?;

        match (&snapshot.response, &snapshot.request_error) {
            (Some(response), _) => writeln!(
                out,
                "        <p>{} {} &middot; mean time {} &middot; mean size {}</p>",
                response.code,
                escape_html(&response.status),
                node.mean.time,
                node.mean.size
            )?,
            (None, Some(error)) => writeln!(
                out,
                "        <p class=\"fail\">Request failed: {}</p>",
                escape_html(&error.message)
            )?,
            (None, None) => writeln!(out, "        <p>No response</p>")?,
        }

        if !node.assertions.is_empty() {
            writeln!(out, "        <table>")?;
            writeln!(out, "            <tr><th>Assertion</th><th>Pass</th><th>Fail</th><th>Skip</th></tr>")?;
            for tally in &node.assertions {
                writeln!(
                    out,
                    "            <tr><td>{}</td><td class=\"pass\">{}</td><td class=\"fail\">{}</td><td class=\"skip\">{}</td></tr>",
                    escape_html(&tally.name),
                    tally.passed,
                    tally.failed,
                    tally.skipped
                )?;
            }
            writeln!(out, "        </table>")?;
        }

        if let Some(body) = snapshot.response.as_ref().and_then(|r| r.body.as_deref()) {
            writeln!(out, "        <pre>{}</pre>", escape_html(body))?;
        }

        Ok(())
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, model: &ReportModel) -> Result<String, ReportError> {
        let report_json = escape_script_json(&serde_json::to_string(model)?);
        let values = [
            ("title", escape_html(&self.title)),
            ("timestamp", escape_html(&model.timestamp)),
            ("version", escape_html(&model.version)),
            ("summary", self.render_summary(model)?),
            ("requests", self.render_requests(&model.aggregations)?),
            ("report_json", report_json),
        ];

        Ok(substitute(&self.template, &values))
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}

/// Replace `{{name}}` placeholders in a single left-to-right scan.
///
/// Unknown placeholders are kept verbatim and substituted values are never
/// rescanned.
fn substitute(template: &str, values: &[(&str, String)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match values.iter().find(|(name, _)| *name == key) {
                    Some((_, value)) => output.push_str(value),
                    None => output.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    output.push_str(rest);
    output
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Make serialized JSON safe to embed in a `<script>` block.
///
/// Markup characters only occur inside JSON strings, so their `\uXXXX`
/// forms keep the document valid JSON.
fn escape_script_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::models::fixtures::timed_record;
    use crate::models::{AssertionOutcome, CollectionMeta, ResponseInfo, RunState};
    use crate::report::build_model;
    use chrono::Local;

    fn model() -> ReportModel {
        let state = RunState::new(CollectionMeta::new("Users <API>")).with_executions(vec![
            timed_record("r1", 0, "p1", 100.0, vec![AssertionOutcome::passed("status is 200")]),
        ]);
        build_model(&state, aggregate(&state.executions), Local::now())
    }

    #[test]
    fn test_render_format_parse() {
        assert_eq!(RenderFormat::parse("HTML"), Some(RenderFormat::Html));
        assert_eq!(RenderFormat::parse("json"), Some(RenderFormat::Json));
        assert_eq!(RenderFormat::parse("pdf"), None);
        assert_eq!(RenderFormat::Json.extension(), "json");
    }

    #[test]
    fn test_substitute() {
        let values = [("name", "world".to_string()), ("loop", "{{name}}".to_string())];
        assert_eq!(substitute("hello {{ name }}!", &values), "hello world!");
        assert_eq!(substitute("{{unknown}} {{name}}", &values), "{{unknown}} world");
        assert_eq!(substitute("{{loop}}", &values), "{{name}}");
        assert_eq!(substitute("open {{name", &values), "open {{name");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_html_render_contains_requests() {
        let html = HtmlRenderer::new("Run Report").render(&model()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Run Report</title>"));
        assert!(html.contains("Request r1"));
        assert!(html.contains("status is 200"));
        assert!(html.contains("Users &lt;API&gt;"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_custom_template_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.tpl");
        std::fs::write(&path, "<h1>{{title}}</h1><script>var data = {{report_json}};</script>").unwrap();

        let renderer = HtmlRenderer::from_template_file("Custom", &path).unwrap();
        let html = renderer.render(&model()).unwrap();
        assert!(html.starts_with("<h1>Custom</h1>"));
        assert!(html.contains("\"aggregations\""));
    }

    #[test]
    fn test_report_json_cannot_close_script_block() {
        let body = "</script><script>alert(1)</script>";
        let mut record = timed_record("r1", 0, "p1", 100.0, vec![]);
        record.response = Some(ResponseInfo::new(200, "OK").with_stream(body.as_bytes().to_vec()));
        let state = RunState::new(CollectionMeta::new("Users")).with_executions(vec![record]);
        let model = build_model(&state, aggregate(&state.executions), Local::now());

        let renderer = HtmlRenderer {
            title: "Users".to_string(),
            template: "<script>window.report = {{report_json}};</script>".to_string(),
        };
        let html = renderer.render(&model).unwrap();

        assert!(!html.contains("<script>alert(1)"));
        assert_eq!(html.matches("</script>").count(), 1);

        let json = html
            .trim_start_matches("<script>window.report = ")
            .trim_end_matches(";</script>");
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["aggregations"][0]["executions"][0]["response"]["body"], body);
    }

    #[test]
    fn test_escape_script_json() {
        assert_eq!(
            escape_script_json(r#"{"a":"<b>&</b>"}"#),
            r#"{"a":"\u003cb\u003e\u0026\u003c/b\u003e"}"#
        );
    }

    #[test]
    fn test_missing_template_file() {
        let err = HtmlRenderer::from_template_file("x", "/nonexistent/report.tpl").unwrap_err();
        assert!(matches!(err, ReportError::TemplateRead { .. }));
    }

    #[test]
    fn test_json_render() {
        let json = JsonRenderer.render(&model()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["aggregations"][0]["executions"][0]["cumulativeTests"]["passed"], 1);
    }
}
