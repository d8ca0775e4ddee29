//! Report model handed to the renderer

use serde::{Deserialize, Serialize};
use std::fmt;

use super::execution::{Cursor, ExecutionRecord, Header, ItemInfo, RequestError, RequestInfo, ResponseInfo, Verdict};
use super::run::{CollectionMeta, ConsoleLog, Failure, RunStats, SkippedTest, VariableScope};

/// Passed/failed/skipped counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl Counts {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Passed => self.passed += 1,
            Verdict::Failed => self.failed += 1,
            Verdict::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.passed + self.failed + self.skipped
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pass: {} | Fail: {} | Skip: {}",
            self.passed, self.failed, self.skipped
        )
    }
}

/// Tally for one assertion name across every iteration of a request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionTally {
    pub name: String,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl AssertionTally {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: 0,
            failed: 0,
            skipped: 0,
        }
    }

    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Passed => self.passed += 1,
            Verdict::Failed => self.failed += 1,
            Verdict::Skipped => self.skipped += 1,
        }
    }
}

/// Response with its body decoded to text
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    pub code: u16,
    pub status: String,
    pub headers: Vec<Header>,
    #[serde(rename = "responseTime", skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    #[serde(rename = "responseSize", skip_serializing_if = "Option::is_none")]
    pub response_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl From<&ResponseInfo> for ResponseSnapshot {
    fn from(response: &ResponseInfo) -> Self {
        Self {
            code: response.code,
            status: response.status.clone(),
            headers: response.headers.clone(),
            response_time: response.response_time,
            response_size: response.response_size,
            body: response
                .stream
                .as_deref()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// Canonical view of a request, captured on its first execution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSnapshot {
    pub cursor: Cursor,
    pub item: ItemInfo,
    pub request: RequestInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSnapshot>,
    #[serde(rename = "requestError", skip_serializing_if = "Option::is_none")]
    pub request_error: Option<RequestError>,
}

impl From<&ExecutionRecord> for ExecutionSnapshot {
    fn from(record: &ExecutionRecord) -> Self {
        Self {
            cursor: record.cursor.clone(),
            item: record.item.clone(),
            request: record.request.clone(),
            response: record.response.as_ref().map(ResponseSnapshot::from),
            request_error: record.request_error.clone(),
        }
    }
}

/// Formatted mean response time and size
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mean {
    pub time: String,
    pub size: String,
}

/// One finalized request entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportNode {
    #[serde(flatten)]
    pub snapshot: ExecutionSnapshot,
    pub assertions: Vec<AssertionTally>,
    pub mean: Mean,
    pub cumulative_tests: Counts,
}

impl ReportNode {
    pub fn reference(&self) -> &str {
        &self.snapshot.cursor.reference
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupParent {
    pub id: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub iteration: u32,
}

/// Run-order-adjacent executions sharing a parent suite
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub parent: GroupParent,
    pub executions: Vec<ReportNode>,
}

/// Summary block of the report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub stats: RunStats,
    pub collection: CollectionMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub globals: Option<VariableScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<VariableScope>,
    pub failures: Vec<Failure>,
    pub response_total: String,
    pub response_average: String,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_tests: Option<Vec<SkippedTest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console_logs: Option<Vec<ConsoleLog>>,
}

/// The complete report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    pub timestamp: String,
    pub version: String,
    pub aggregations: Vec<Group>,
    pub summary: ReportSummary,
}

impl ReportModel {
    /// All report nodes in emission order
    pub fn nodes(&self) -> impl Iterator<Item = &ReportNode> {
        self.aggregations.iter().flat_map(|g| g.executions.iter())
    }

    /// Net assertion counts over every node
    pub fn totals(&self) -> Counts {
        self.nodes().fold(Counts::default(), |mut acc, node| {
            acc.passed += node.cumulative_tests.passed;
            acc.failed += node.cumulative_tests.failed;
            acc.skipped += node.cumulative_tests.skipped;
            acc
        })
    }
}
