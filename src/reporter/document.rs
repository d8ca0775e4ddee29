//! Serialized run documents
//!
//! A run document is the runner's view of a finished run: its executions,
//! statistics and the side-channel events in the order they were emitted.

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{
    AssertionEvent, CollectionMeta, ConsoleEvent, ExecutionRecord, Failure, RunState, RunStats,
    Timings, Transfers, VariableScope,
};

/// A recorded channel event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RunEvent {
    Assertion {
        #[serde(default)]
        error: Option<String>,
        outcome: AssertionEvent,
    },
    Console {
        #[serde(default)]
        error: Option<String>,
        outcome: ConsoleEvent,
    },
}

/// A finished run as exported by the runner
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunDocument {
    pub collection: CollectionMeta,
    #[serde(default)]
    pub globals: Option<VariableScope>,
    #[serde(default)]
    pub environment: Option<VariableScope>,
    #[serde(default)]
    pub executions: Vec<ExecutionRecord>,
    #[serde(default)]
    pub stats: RunStats,
    #[serde(default)]
    pub timings: Timings,
    #[serde(default)]
    pub transfers: Transfers,
    #[serde(default)]
    pub failures: Vec<Failure>,
    #[serde(default)]
    pub events: Vec<RunEvent>,
}

impl RunDocument {
    /// Load a run document from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read run document: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse run document: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Split into the initial run state and the events to replay
    pub fn into_parts(self) -> (RunState, Vec<RunEvent>) {
        let state = RunState {
            collection: self.collection,
            globals: self.globals,
            environment: self.environment,
            executions: self.executions,
            stats: self.stats,
            timings: self.timings,
            transfers: self.transfers,
            failures: self.failures,
            skipped_tests: None,
            console_logs: None,
        };
        (state, self.events)
    }

    /// JSON schema of the document, for runner integrations
    pub fn schema() -> Result<String> {
        let schema = schemars::schema_for!(RunDocument);
        serde_json::to_string_pretty(&schema).context("Failed to serialize schema")
    }
}
