//! Log store trait definition
//!
//! This module defines the core `LogStore` trait that all store
//! implementations must implement.

use async_trait::async_trait;

use crate::{NotificationResult, ProbeResult};

use super::error::StoreResult;
use super::schema::{LogKind, RequestLogEntry, UnreportedBatch};

/// Trait for the persistent log store
///
/// The store assigns ids and timestamps itself; callers hand it completed
/// probe/notification outcomes and get the assigned row id back.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync` as they are shared between the
/// log writer and the remote reporter across async tasks.
///
/// ## Error Handling
///
/// Methods return `StoreResult<T>` which wraps `StoreError`. A closed
/// store fails every operation with `StoreError::Closed`.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Append one row for a completed probe execution.
    ///
    /// Returns the store-assigned id. The insert is a single statement, so
    /// a failure leaves no partial row behind.
    async fn insert_request_log(&self, result: &ProbeResult) -> StoreResult<i64>;

    /// Append one row for a notification-delivery attempt.
    ///
    /// Same contract as [`insert_request_log`](Self::insert_request_log),
    /// with an independent id numbering space.
    async fn insert_notification_log(&self, result: &NotificationResult) -> StoreResult<i64>;

    /// Full scan of the request log in insertion order, for audit use.
    ///
    /// Reported rows stay visible here until an explicit [`flush`](Self::flush).
    async fn list_all_request_logs(&self) -> StoreResult<Vec<RequestLogEntry>>;

    /// Snapshot of all rows with `reported = false` across both tables.
    ///
    /// Rows inserted after the snapshot is taken are not included; they are
    /// picked up by the next call.
    async fn list_unreported(&self) -> StoreResult<UnreportedBatch>;

    /// Set `reported = true` for exactly the given rows of one table.
    ///
    /// Runs in a single transaction and fails (rolling back) if any id
    /// does not exist. Callers must treat a failure here as non-fatal: the
    /// upload that preceded it cannot be rolled back.
    async fn mark_reported(&self, kind: LogKind, ids: &[i64]) -> StoreResult<()>;

    /// Destroy and recreate both tables, restarting the id sequences.
    ///
    /// This is the only deletion path; there is no automatic retention.
    /// The drop and recreate commit as one transaction.
    async fn flush(&self) -> StoreResult<()>;

    /// Release the underlying file handle.
    ///
    /// All other operations fail with `StoreError::Closed` afterwards.
    async fn close(&self) -> StoreResult<()>;
}
