//! Embedded log store for probe and notification history
//!
//! This module persists two kinds of telemetry rows - request logs (one per
//! probe execution) and notification logs (one per delivery attempt) - each
//! gated by a `reported` flag that the remote reporter flips after a
//! confirmed upload.
//!
//! ## Design
//!
//! - **Trait-based**: `LogStore` trait allows swapping implementations
//! - **Async**: All operations are async for compatibility with Tokio
//! - **Append-mostly**: Rows are inserted once and only ever updated by the
//!   one-way `reported` transition; the explicit `flush` is the only
//!   deletion path
//!
//! ## Usage
//!
//! ```no_run
//! use synthmon::store::{LogStore, sqlite::SqliteStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SqliteStore::open("./history.db").await?;
//!     let batch = store.list_unreported().await?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod schema;
pub mod sqlite;

pub use backend::LogStore;
pub use error::{StoreError, StoreResult};
pub use schema::{LogKind, NotificationLogEntry, RequestLogEntry, UnreportedBatch};
