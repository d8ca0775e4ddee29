//! Running-mean accumulators

use serde::{Deserialize, Serialize};

/// Sum and sample count of a running mean
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleMean {
    pub sum: f64,
    pub count: u64,
}

impl SampleMean {
    /// Add one sample
    pub fn add(&mut self, sample: f64) {
        self.sum += sample;
        self.count += 1;
    }

    /// Arithmetic mean, 0 when no sample was recorded
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Time and size accumulators for one request
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RefMeans {
    pub time: SampleMean,
    pub size: SampleMean,
}
