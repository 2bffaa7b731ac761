//! Warehouse snapshot loading
//!
//! All database access goes through an in-memory DuckDB connection that
//! ATTACHes the remote MySQL warehouse via the tunnel's forwarded local
//! port. Loading a snapshot is delete-then-insert inside one transaction,
//! which is what makes a same-day re-run idempotent.

mod engine;

pub use engine::WarehouseWriter;

use crate::error::Result;
use crate::records::ProductRow;
use chrono::NaiveDate;

/// Sink for dated snapshots
///
/// The trait seam keeps the orchestrator testable against an in-memory
/// warehouse; production uses [`WarehouseWriter`].
pub trait SnapshotSink {
    /// Replace the snapshot for `snapshot_date` with `rows`
    ///
    /// Returns the number of rows written. On error the snapshot must be
    /// treated as not durably written.
    fn load(&mut self, rows: &[ProductRow], snapshot_date: NaiveDate) -> Result<usize>;
}
