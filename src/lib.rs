// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # shopsnap
//!
//! One-shot, idempotent sync of a Shopify-style product catalog into a
//! relational warehouse reached through an SSH tunnel.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────┐     ┌─────────────┐     ┌──────────────────────────┐
//! │ Paginator │ ──▶ │  Transform  │ ──▶ │     WarehouseWriter      │
//! ├───────────┤     ├─────────────┤     ├──────────────────────────┤
//! │ Link next │     │ inventory Σ │     │ SSH tunnel → local port  │
//! │ 429 retry │     │ first price │     │ delete snapshot date     │
//! │ pacing    │     │ tags, image │     │ batched bulk insert      │
//! │ early stop│     │ stamp date  │     │ single commit            │
//! └───────────┘     └─────────────┘     └──────────────────────────┘
//! ```
//!
//! The full page set is materialized before any write: the three stages are
//! connected by plain in-memory sequences, so each is testable on its own.
//! Re-running a sync for the same calendar day replaces that day's snapshot
//! instead of accumulating (delete-then-insert under one transaction).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shopsnap::{SyncEngine, SyncSettings};
//!
//! #[tokio::main]
//! async fn main() -> shopsnap::Result<()> {
//!     let settings = SyncSettings::from_env()?;
//!     let outcome = SyncEngine::new(settings).run().await?;
//!     println!("wrote {} rows", outcome.rows_written());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Runtime configuration from the environment
pub mod config;

/// Source and warehouse record types
pub mod records;

/// HTTP session for the source API
pub mod http;

/// Paginated catalog fetching
pub mod pagination;

/// Record normalization
pub mod transform;

/// Scoped SSH tunnel
pub mod tunnel;

/// Warehouse snapshot loading
pub mod database;

/// Sync orchestration
pub mod engine;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::SyncSettings;
pub use database::{SnapshotSink, WarehouseWriter};
pub use engine::{SyncEngine, SyncOutcome, SyncReport};
pub use error::{Error, Result};
pub use records::{ProductRow, RawProduct};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
