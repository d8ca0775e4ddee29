//! Report model finalization

use chrono::{DateTime, Local};

use super::format::{format_duration, format_size};
use crate::models::{Group, ReportModel, ReportSummary, RunState};

/// Tool version stamped on every report
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Assemble the final report from the run state and the grouped nodes.
///
/// Side-channel lists stay absent when the collectors never filled them.
pub fn build_model(state: &RunState, groups: Vec<Group>, generated_at: DateTime<Local>) -> ReportModel {
    ReportModel {
        timestamp: generated_at.to_rfc3339(),
        version: VERSION.to_string(),
        aggregations: groups,
        summary: ReportSummary {
            stats: state.stats.clone(),
            collection: state.collection.clone(),
            globals: state.globals.clone(),
            environment: state.environment.clone(),
            failures: state.failures.clone(),
            response_total: format_size(state.transfers.response_total as f64),
            response_average: format_duration(state.timings.response_average),
            duration: format_duration(state.timings.duration_ms()),
            skipped_tests: state.skipped_tests.clone().filter(|v| !v.is_empty()),
            console_logs: state.console_logs.clone().filter(|v| !v.is_empty()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::collector::on_console;
    use crate::models::fixtures::record;
    use crate::models::{CollectionMeta, ConsoleEvent, Cursor, Timings, Transfers};
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn state() -> RunState {
        let mut state = RunState::new(CollectionMeta::new("Users API"))
            .with_executions(vec![record("r1", 0, "p1"), record("r2", 0, "p1")]);
        state.timings = Timings {
            response_average: 42.0,
            started: 1_000,
            completed: 2_500,
            ..Default::default()
        };
        state.transfers = Transfers { response_total: 300 };
        state
    }

    #[test]
    fn test_summary_fields_formatted() {
        let state = state();
        let model = build_model(&state, aggregate(&state.executions), fixed_time());

        assert_eq!(model.version, VERSION);
        assert_eq!(model.summary.collection.name, "Users API");
        assert_eq!(model.summary.response_total, "300 B");
        assert_eq!(model.summary.response_average, "42ms");
        assert_eq!(model.summary.duration, "1s 500ms");
        assert_eq!(model.aggregations.len(), 1);
    }

    #[test]
    fn test_optional_fields_absent_when_unpopulated() {
        let state = state();
        let model = build_model(&state, Vec::new(), fixed_time());
        assert!(model.summary.skipped_tests.is_none());
        assert!(model.summary.console_logs.is_none());

        let json = serde_json::to_value(&model).unwrap();
        let summary = json.get("summary").unwrap();
        assert!(summary.get("skippedTests").is_none());
        assert!(summary.get("consoleLogs").is_none());
        assert!(summary.get("globals").is_none());
        assert!(summary.get("responseTotal").is_some());
    }

    #[test]
    fn test_console_logs_present_when_collected() {
        let mut state = state();
        on_console(
            &mut state,
            None,
            ConsoleEvent {
                cursor: Cursor::new("r1", 0),
                level: "log".to_string(),
                messages: vec![serde_json::json!("hi")],
            },
        );
        let model = build_model(&state, Vec::new(), fixed_time());
        assert_eq!(model.summary.console_logs.map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_build_is_deterministic() {
        let state = state();
        let a = build_model(&state, aggregate(&state.executions), fixed_time());
        let b = build_model(&state, aggregate(&state.executions), fixed_time());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
