//! Sync orchestration
//!
//! # Overview
//!
//! [`SyncEngine::run`] sequences the whole sync: fetch every page, stop
//! early with [`SyncOutcome::NoData`] when the source is empty, normalize,
//! then open the tunnel and replace today's snapshot. Elapsed wall-clock
//! time is measured across every outcome, including failures.
//!
//! The snapshot date is computed exactly once per run and threaded through
//! the transformer and the loader, so a run that crosses midnight cannot
//! stamp the two phases with different dates.

mod types;

pub use types::{SyncOutcome, SyncReport};

use crate::config::SyncSettings;
use crate::database::{SnapshotSink, WarehouseWriter};
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::Paginator;
use crate::records::ProductRow;
use crate::transform;
use crate::tunnel::SshTunnel;
use chrono::NaiveDate;
use std::time::Instant;
use tracing::{error, info};

/// Orchestrates one sync run
pub struct SyncEngine {
    settings: SyncSettings,
}

impl SyncEngine {
    /// Create an engine for the given settings
    pub fn new(settings: SyncSettings) -> Self {
        Self { settings }
    }

    /// Run the full sync against the configured warehouse
    pub async fn run(&self) -> Result<SyncOutcome> {
        let started = Instant::now();
        let snapshot_date = chrono::Local::now().date_naive();

        let result = self.run_inner(started, snapshot_date).await;
        match &result {
            Ok(outcome) => info!(
                rows = outcome.rows_written(),
                elapsed_secs = outcome.elapsed().as_secs_f64(),
                "sync finished"
            ),
            Err(e) => error!(
                error = %e,
                elapsed_secs = started.elapsed().as_secs_f64(),
                "sync failed"
            ),
        }
        result
    }

    async fn run_inner(&self, started: Instant, snapshot_date: NaiveDate) -> Result<SyncOutcome> {
        let rows = match self.fetch_rows(snapshot_date).await? {
            Some(rows) => rows,
            None => {
                return Ok(SyncOutcome::NoData {
                    elapsed: started.elapsed(),
                })
            }
        };

        // The tunnel outlives the writer; the writer is dropped (closing the
        // attached connection) before the tunnel's Drop tears the forward
        // down.
        let tunnel = SshTunnel::open(
            &self.settings.tunnel,
            &self.settings.warehouse.host,
            self.settings.warehouse.port,
        )?;
        let rows_written = {
            let mut writer = WarehouseWriter::connect(&self.settings.warehouse, tunnel.local_port())?;
            writer.check_connection()?;
            writer.load(&rows, snapshot_date)?
        };
        drop(tunnel);

        Ok(SyncOutcome::Completed(SyncReport {
            rows_written,
            elapsed: started.elapsed(),
        }))
    }

    /// Run the sync against a caller-provided sink
    ///
    /// Identical sequencing to [`run`](Self::run) minus tunnel and warehouse
    /// setup; this is the entry point tests drive with an in-memory sink.
    pub async fn run_with_sink(
        &self,
        sink: &mut dyn SnapshotSink,
        snapshot_date: NaiveDate,
    ) -> Result<SyncOutcome> {
        let started = Instant::now();

        let rows = match self.fetch_rows(snapshot_date).await? {
            Some(rows) => rows,
            None => {
                return Ok(SyncOutcome::NoData {
                    elapsed: started.elapsed(),
                })
            }
        };

        let rows_written = sink.load(&rows, snapshot_date)?;
        Ok(SyncOutcome::Completed(SyncReport {
            rows_written,
            elapsed: started.elapsed(),
        }))
    }

    /// Fetch and normalize; `None` when the source returned nothing
    async fn fetch_rows(&self, snapshot_date: NaiveDate) -> Result<Option<Vec<ProductRow>>> {
        let client = HttpClient::with_config(
            HttpClientConfig::builder()
                .timeout(self.settings.fetch.request_timeout)
                .header(
                    "X-Shopify-Access-Token",
                    self.settings.shop.access_token.as_str(),
                )
                .header("Content-Type", "application/json")
                .build(),
        );

        let paginator = Paginator::new(&client, &self.settings);
        let products = paginator.fetch_all().await?;
        if products.is_empty() {
            info!("no products returned, nothing to load");
            return Ok(None);
        }

        Ok(Some(transform::normalize(&products, snapshot_date)))
    }
}
