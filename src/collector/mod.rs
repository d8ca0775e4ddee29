//! Side-channel event collectors
//!
//! Handlers for the runner's `assertion` and `console` channels. They only
//! append to the run's skipped-test and console-log lists and never touch
//! the per-request aggregates.

use tracing::debug;

use crate::models::{AssertionEvent, ConsoleEvent, ConsoleLog, RunState, SkippedTest};

/// Handle an `assertion` event.
///
/// Events carrying a channel error are dropped. Only skipped assertions are
/// recorded here; pass/fail counting happens in the reducer.
pub fn on_assertion(state: &mut RunState, error: Option<&str>, event: AssertionEvent) {
    if let Some(err) = error {
        debug!("Dropping assertion event for {}: {}", event.cursor, err);
        return;
    }

    if event.skipped != Some(true) {
        return;
    }

    state.skipped_tests.get_or_insert_with(Vec::new).push(SkippedTest {
        cursor: event.cursor,
        assertion: event.assertion,
        skipped: true,
        error: event.error,
        item: event.item,
    });
}

/// Handle a `console` event. Events carrying a channel error are dropped.
pub fn on_console(state: &mut RunState, error: Option<&str>, event: ConsoleEvent) {
    if let Some(err) = error {
        debug!("Dropping console event for {}: {}", event.cursor, err);
        return;
    }

    state.console_logs.get_or_insert_with(Vec::new).push(ConsoleLog {
        cursor: event.cursor,
        level: event.level,
        messages: event.messages,
    });
}
