//! Aggregation engine
//!
//! Turns the run's execution records into deduplicated, parent-grouped
//! report nodes in two forward passes: [`reduce`] then [`assemble`].

mod assembler;
mod reducer;
mod stats;

pub use assembler::assemble;
pub use reducer::{reduce, Reduction};
pub use stats::{RefMeans, SampleMean};

use crate::models::{ExecutionRecord, Group};
use crate::utils::Timer;

/// Run both passes over `records`
pub fn aggregate(records: &[ExecutionRecord]) -> Vec<Group> {
    let timer = Timer::start("aggregate");
    let reduction = reduce(records);
    let groups = assemble(&reduction, records);
    timer.stop();
    groups
}
