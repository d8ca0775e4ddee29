//! Run-scoped state
//!
//! Everything the runner reports about one run, plus the side-channel lists
//! filled in by the event collectors.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::execution::{AssertionError, Cursor, ExecutionRecord, ItemRef};

/// Collection metadata
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CollectionMeta {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CollectionMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            description: None,
        }
    }
}

/// A single variable of a globals or environment scope
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Variable {
    pub key: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
}

/// Globals or environment variable scope
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VariableScope {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: Vec<Variable>,
}

/// Total/pending/failed counter for one run statistic
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatCount {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub failed: u64,
}

impl StatCount {
    pub fn new(total: u64, failed: u64) -> Self {
        Self {
            total,
            pending: 0,
            failed,
        }
    }
}

/// Run-level statistics as tracked by the runner
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RunStats {
    pub iterations: StatCount,
    pub items: StatCount,
    pub scripts: StatCount,
    pub prerequests: StatCount,
    pub requests: StatCount,
    pub tests: StatCount,
    pub assertions: StatCount,
    pub test_scripts: StatCount,
    pub prerequest_scripts: StatCount,
}

/// Run timings, epoch milliseconds
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Timings {
    pub response_average: f64,
    pub response_min: f64,
    pub response_max: f64,
    pub started: i64,
    pub completed: i64,
}

impl Timings {
    /// Wall-clock duration of the run in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.completed.saturating_sub(self.started).max(0) as f64
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Transfers {
    /// Bytes received over the whole run
    pub response_total: u64,
}

/// A run-level failure reported by the runner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Failure {
    pub error: AssertionError,
    #[serde(default)]
    pub at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ItemRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ItemRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

/// A skipped assertion collected from the `assertion` channel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkippedTest {
    pub cursor: Cursor,
    pub assertion: String,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<AssertionError>,
    pub item: ItemRef,
}

/// A console message collected from the `console` channel
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsoleLog {
    pub cursor: Cursor,
    pub level: String,
    pub messages: Vec<serde_json::Value>,
}

/// State container for one run.
///
/// Created at run start, handed to every collector and to the finalize
/// step, and dropped once the report has been produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunState {
    pub collection: CollectionMeta,
    pub globals: Option<VariableScope>,
    pub environment: Option<VariableScope>,
    pub executions: Vec<ExecutionRecord>,
    pub stats: RunStats,
    pub timings: Timings,
    pub transfers: Transfers,
    pub failures: Vec<Failure>,
    pub skipped_tests: Option<Vec<SkippedTest>>,
    pub console_logs: Option<Vec<ConsoleLog>>,
}

impl RunState {
    pub fn new(collection: CollectionMeta) -> Self {
        Self {
            collection,
            ..Default::default()
        }
    }

    pub fn with_executions(mut self, executions: Vec<ExecutionRecord>) -> Self {
        self.executions = executions;
        self
    }
}
