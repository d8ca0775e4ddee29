//! Execution reducer
//!
//! One pass over the run's execution records, folding every iteration of a
//! request into per-ref aggregates.

use indexmap::IndexMap;
use tracing::debug;

use super::stats::RefMeans;
use crate::models::{AssertionTally, Counts, ExecutionRecord, ExecutionSnapshot};

/// Per-ref aggregates produced by [`reduce`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reduction {
    /// ref -> assertion name -> tally, names in first-seen order
    pub result: IndexMap<String, IndexMap<String, AssertionTally>>,

    /// ref -> net counts over every assertion of every iteration
    pub net_counts: IndexMap<String, Counts>,

    /// ref -> time/size accumulators
    pub means: IndexMap<String, RefMeans>,

    /// ref -> snapshot of its first execution
    pub items: IndexMap<String, ExecutionSnapshot>,
}

impl Reduction {
    /// Number of distinct refs seen
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Assertion tallies of a ref in first-seen order
    pub fn assertions(&self, reference: &str) -> Vec<AssertionTally> {
        self.result
            .get(reference)
            .map(|tallies| tallies.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn counts(&self, reference: &str) -> Counts {
        self.net_counts.get(reference).copied().unwrap_or_default()
    }

    pub fn means(&self, reference: &str) -> RefMeans {
        self.means.get(reference).copied().unwrap_or_default()
    }
}

/// Fold execution records into per-ref aggregates.
///
/// Records without a response still contribute a zero time/size sample.
pub fn reduce(records: &[ExecutionRecord]) -> Reduction {
    let mut reduction = Reduction::default();

    for record in records {
        let reference = record.cursor.reference.as_str();

        if !reduction.items.contains_key(reference) {
            reduction.result.insert(reference.to_string(), IndexMap::new());
            reduction.net_counts.insert(reference.to_string(), Counts::default());
            reduction.means.insert(reference.to_string(), RefMeans::default());
            reduction
                .items
                .insert(reference.to_string(), ExecutionSnapshot::from(record));
        }

        let means = reduction.means.entry(reference.to_string()).or_default();
        means.time.add(record.time_sample());
        means.size.add(record.size_sample());

        let tallies = reduction.result.entry(reference.to_string()).or_default();
        let net = reduction.net_counts.entry(reference.to_string()).or_default();

        for outcome in &record.assertions {
            let tally = tallies
                .entry(outcome.assertion.clone())
                .or_insert_with(|| AssertionTally::new(&outcome.assertion));

            if let Some(verdict) = outcome.verdict() {
                tally.record(verdict);
                net.record(verdict);
            }
        }
    }

    debug!(
        "Reduced {} executions into {} requests",
        records.len(),
        reduction.len()
    );

    reduction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{record, timed_record};
    use crate::models::{AssertionError, AssertionOutcome, ResponseInfo};

    #[test]
    fn test_two_iterations_accumulate() {
        let records = vec![
            timed_record(
                "r1",
                0,
                "p1",
                100.0,
                vec![
                    AssertionOutcome::passed("status is 200"),
                    AssertionOutcome::passed("has body"),
                ],
            ),
            timed_record(
                "r1",
                1,
                "p1",
                200.0,
                vec![
                    AssertionOutcome::passed("status is 200"),
                    AssertionOutcome::failed("has body", "expected body"),
                ],
            ),
        ];

        let reduction = reduce(&records);
        assert_eq!(reduction.len(), 1);
        assert_eq!(
            reduction.counts("r1"),
            Counts {
                passed: 3,
                failed: 1,
                skipped: 0
            }
        );
        assert_eq!(reduction.means("r1").time.mean(), 150.0);

        let tallies = reduction.assertions("r1");
        assert_eq!(tallies.len(), 2);
        assert_eq!(tallies[0].name, "status is 200");
        assert_eq!(tallies[0].passed, 2);
        assert_eq!(tallies[1].name, "has body");
        assert_eq!(tallies[1].passed, 1);
        assert_eq!(tallies[1].failed, 1);
    }

    #[test]
    fn test_skipped_with_error_counts_as_skipped() {
        let mut rec = timed_record("r1", 0, "p1", 10.0, Vec::new());
        rec.assertions.push(AssertionOutcome {
            assertion: "pending check".to_string(),
            error: Some(AssertionError::new("not run")),
            skipped: Some(true),
        });

        let reduction = reduce(&[rec]);
        let counts = reduction.counts("r1");
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.failed, 0);

        let tallies = reduction.assertions("r1");
        assert_eq!(tallies[0].skipped, 1);
        assert_eq!(tallies[0].failed, 0);
    }

    // Known gap: an outcome without error and without a skipped flag is
    // listed by name but counted nowhere.
    #[test]
    fn test_unflagged_outcome_counted_nowhere() {
        let mut rec = timed_record("r1", 0, "p1", 10.0, vec![AssertionOutcome::passed("a")]);
        rec.assertions.push(AssertionOutcome {
            assertion: "b".to_string(),
            error: None,
            skipped: None,
        });

        let reduction = reduce(&[rec]);
        assert_eq!(reduction.counts("r1").total(), 1);

        let tallies = reduction.assertions("r1");
        assert_eq!(tallies.len(), 2);
        assert_eq!(tallies[1].name, "b");
        assert_eq!(tallies[1].passed + tallies[1].failed + tallies[1].skipped, 0);
    }

    #[test]
    fn test_snapshot_taken_from_first_occurrence() {
        let first = record("r1", 0, "p1")
            .with_response(ResponseInfo::new(200, "OK").with_stream(b"first".to_vec()));
        let second = record("r1", 1, "p1")
            .with_response(ResponseInfo::new(500, "Error").with_stream(b"second".to_vec()));

        let reduction = reduce(&[first, second]);
        let snapshot = &reduction.items["r1"];
        assert_eq!(snapshot.cursor.iteration, 0);

        let response = snapshot.response.as_ref().unwrap();
        assert_eq!(response.code, 200);
        assert_eq!(response.body.as_deref(), Some("first"));
    }

    #[test]
    fn test_failed_request_dilutes_mean() {
        let ok = timed_record("r1", 0, "p1", 300.0, Vec::new());
        let failed = record("r1", 1, "p1");

        let reduction = reduce(&[ok, failed]);
        let means = reduction.means("r1");
        assert_eq!(means.time.count, 2);
        assert_eq!(means.time.mean(), 150.0);
        assert_eq!(means.size.mean(), 50.0);
    }

    #[test]
    fn test_record_without_assertions_only_feeds_means() {
        let reduction = reduce(&[timed_record("r1", 0, "p1", 20.0, Vec::new())]);
        assert_eq!(reduction.counts("r1"), Counts::default());
        assert!(reduction.assertions("r1").is_empty());
        assert_eq!(reduction.means("r1").time.count, 1);
    }

    #[test]
    fn test_mean_is_order_independent() {
        let a = timed_record("r1", 0, "p1", 10.0, Vec::new());
        let b = timed_record("r1", 1, "p1", 40.0, Vec::new());
        let c = record("r1", 2, "p1");

        let forward = reduce(&[a.clone(), b.clone(), c.clone()]);
        let backward = reduce(&[c, b, a]);
        assert_eq!(
            forward.means("r1").time.mean(),
            backward.means("r1").time.mean()
        );
    }

    #[test]
    fn test_refs_in_first_seen_order() {
        let records = vec![
            record("b", 0, "p1"),
            record("a", 0, "p1"),
            record("b", 1, "p1"),
        ];
        let reduction = reduce(&records);
        let refs: Vec<&str> = reduction.items.keys().map(String::as_str).collect();
        assert_eq!(refs, vec!["b", "a"]);
    }
}
