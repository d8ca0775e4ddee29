//! Data models for run reporting
//!
//! This module contains the execution records observed from the runner,
//! the run-scoped state container and the finished report model.

mod execution;
mod report;
mod run;

#[cfg(test)]
pub(crate) mod fixtures;

pub use execution::{
    AssertionError, AssertionEvent, AssertionOutcome, ConsoleEvent, Cursor, ExecutionRecord,
    Header, ItemInfo, ItemRef, ParentInfo, RequestError, RequestInfo, ResponseInfo, Verdict,
};
pub use report::{
    AssertionTally, Counts, ExecutionSnapshot, Group, GroupParent, Mean, ReportModel, ReportNode,
    ReportSummary, ResponseSnapshot,
};
pub use run::{
    CollectionMeta, ConsoleLog, Failure, RunState, RunStats, SkippedTest, StatCount, Timings,
    Transfers, Variable, VariableScope,
};
