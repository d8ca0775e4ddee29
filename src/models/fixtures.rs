//! Record builders shared by unit tests

use super::{AssertionOutcome, Cursor, ExecutionRecord, ItemInfo, ParentInfo, RequestInfo, ResponseInfo};

/// Execution of request `reference` in `iteration`, owned by suite `parent`
pub fn record(reference: &str, iteration: u32, parent: &str) -> ExecutionRecord {
    ExecutionRecord::new(
        Cursor::new(reference, iteration),
        ItemInfo::new(
            format!("item-{reference}"),
            format!("Request {reference}"),
            ParentInfo::new(parent, format!("Suite {parent}")),
        ),
    )
    .with_request(RequestInfo {
        method: "GET".to_string(),
        url: format!("https://api.example.com/{reference}"),
        headers: Vec::new(),
        body: None,
    })
}

/// Same as [`record`] with a timed response and the given assertions
pub fn timed_record(
    reference: &str,
    iteration: u32,
    parent: &str,
    time_ms: f64,
    assertions: Vec<AssertionOutcome>,
) -> ExecutionRecord {
    let mut record = record(reference, iteration, parent)
        .with_response(ResponseInfo::new(200, "OK").with_time(time_ms).with_size(100));
    record.assertions = assertions;
    record
}
