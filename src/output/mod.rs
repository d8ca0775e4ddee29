//! Output formatting module
//!
//! Terminal views of a report model for the `summary` command.

mod formatter;

pub use formatter::{request_rows, OutputFormat, RequestRow, SummaryFormatter};
