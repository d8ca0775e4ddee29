//! Report assembler
//!
//! Second pass over the execution records: merges each request's snapshot
//! with its aggregates and groups the resulting nodes by parent suite.

use std::collections::HashSet;

use super::reducer::Reduction;
use crate::models::{ExecutionRecord, Group, GroupParent, Mean, ReportNode};
use crate::report::{format_duration, format_size};

/// Merge the snapshot of `reference` with its aggregates
fn merge_node(reduction: &Reduction, reference: &str, record: &ExecutionRecord) -> ReportNode {
    let means = reduction.means(reference);
    let snapshot = reduction
        .items
        .get(reference)
        .cloned()
        .unwrap_or_else(|| record.into());

    ReportNode {
        snapshot,
        assertions: reduction.assertions(reference),
        mean: Mean {
            time: format_duration(means.time.mean()),
            size: format_size(means.size.mean()),
        },
        cumulative_tests: reduction.counts(reference),
    }
}

/// Build the ordered group list.
///
/// Each ref yields exactly one node, emitted at its first occurrence. A node
/// joins the last group only when that group has the same parent id, so two
/// runs of the same suite separated by another suite form separate groups.
pub fn assemble(reduction: &Reduction, records: &[ExecutionRecord]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut emitted: HashSet<&str> = HashSet::new();

    for record in records {
        let reference = record.cursor.reference.as_str();
        if !emitted.insert(reference) {
            continue;
        }

        let node = merge_node(reduction, reference, record);
        let parent = &record.item.parent;

        match groups.last_mut() {
            Some(last) if last.parent.id == parent.id => last.executions.push(node),
            _ => groups.push(Group {
                parent: GroupParent {
                    id: parent.id.clone(),
                    full_name: parent.full_name.clone(),
                    description: parent.description.clone(),
                    iteration: record.cursor.iteration,
                },
                executions: vec![node],
            }),
        }
    }

    groups
}
