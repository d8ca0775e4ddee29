//! Aggregated reports for collection-based API test runs
//!
//! The runner emits one execution record per request per iteration, plus
//! `assertion` and `console` events while the run is in progress. This crate
//! folds those records into one report node per request, with per-assertion
//! tallies, mean response time/size and cumulative pass/fail/skip counts,
//! grouped by the suite that owns each request.
//!
//! ```no_run
//! use collection_report::reporter::{Reporter, ReporterOptions, RunDocument};
//!
//! # fn main() -> anyhow::Result<()> {
//! let document = RunDocument::load("run.json")?;
//! let artifact = Reporter::from_document(document, ReporterOptions::default()).before_done()?;
//! println!("{}", artifact.content);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod cli;
pub mod collector;
pub mod config;
pub mod models;
pub mod output;
pub mod report;
pub mod reporter;
pub mod utils;
