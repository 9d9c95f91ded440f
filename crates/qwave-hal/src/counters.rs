//! Run bookkeeping shared by every backend.

use serde::{Deserialize, Serialize};

/// How much work a backend has done since construction or the last reset.
///
/// A single circuit run counts as one circuit and one job. A circuit set
/// counts every circuit, and one job per batch when the backend batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    /// Circuits executed or simulated.
    pub number_of_circuits_run: usize,
    /// Jobs submitted.
    pub number_of_jobs_run: usize,
}

impl RunCounters {
    /// Fresh counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `circuits` circuits run in `jobs` jobs.
    pub fn record(&mut self, circuits: usize, jobs: usize) {
        self.number_of_circuits_run += circuits;
        self.number_of_jobs_run += jobs;
    }

    /// Zero both counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_reset() {
        let mut counters = RunCounters::new();
        counters.record(1, 1);
        counters.record(25, 3);
        assert_eq!(counters.number_of_circuits_run, 26);
        assert_eq!(counters.number_of_jobs_run, 4);

        counters.reset();
        assert_eq!(counters, RunCounters::default());
    }
}
