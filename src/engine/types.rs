//! Engine types
//!
//! Run outcomes and the per-run report.

use std::time::Duration;

/// Result of a completed sync run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// Rows written to the warehouse
    pub rows_written: usize,
    /// Wall-clock time for the whole run
    pub elapsed: Duration,
}

impl SyncReport {
    /// Elapsed time in seconds
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Overall outcome of a sync run
///
/// An empty fetch is a real outcome, not an error: the run stops before the
/// tunnel is ever opened and reports `NoData`.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Fetch, transform, and load all completed
    Completed(SyncReport),
    /// The source returned no records; nothing was loaded
    NoData {
        /// Wall-clock time for the whole run
        elapsed: Duration,
    },
}

impl SyncOutcome {
    /// Rows written to the warehouse (0 for a no-data run)
    pub fn rows_written(&self) -> usize {
        match self {
            Self::Completed(report) => report.rows_written,
            Self::NoData { .. } => 0,
        }
    }

    /// Wall-clock time for the run
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Completed(report) => report.elapsed,
            Self::NoData { elapsed } => *elapsed,
        }
    }

    /// Check if this is a no-data outcome
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}
