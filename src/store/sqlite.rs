//! SQLite log store implementation
//!
//! This module provides a SQLite-based implementation of the `LogStore`
//! trait.
//!
//! ## Features
//!
//! - **Embedded**: No separate database server required
//! - **WAL mode**: Readers stay concurrent while the single writer commits,
//!   so a listing never observes a torn row
//! - **Idempotent schema**: Opening an existing store never destroys data
//!
//! ## Durability
//!
//! The `reported` flag is an ordinary column, so it survives process
//! restarts: rows uploaded but not yet marked (crash window) are uploaded
//! again on the next cycle. That gives at-least-once delivery to the
//! collector, never data loss.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info, instrument};

use crate::{DeliveryStatus, NotificationResult, ProbeResult};

use super::backend::LogStore;
use super::error::{StoreError, StoreResult};
use super::schema::{
    CREATE_TABLES_SQL, DROP_TABLES_SQL, LogKind, NotificationLogEntry, RequestLogEntry,
    UnreportedBatch,
};

/// SQLite log store
///
/// Owns the database file exclusively for the lifetime of the agent
/// process; concurrent processes opening the same path are not supported.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    db_path: String,

    /// Last assigned `created_at`, used to keep timestamps monotonic
    /// non-decreasing even if the wall clock steps backwards
    clock: Mutex<i64>,
}

impl SqliteStore {
    /// Open a store at `path`, creating the file and both tables if absent.
    ///
    /// Schema creation is `CREATE TABLE IF NOT EXISTS` - opening an
    /// existing store is never destructive.
    #[instrument(skip_all)]
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db_path = path.as_ref().to_string_lossy().to_string();

        info!("opening log store at: {}", db_path);

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::OpenFailed(e.to_string()))?;

        for statement in CREATE_TABLES_SQL {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        }

        debug!("log store schema ready");

        Ok(Self {
            pool,
            db_path,
            clock: Mutex::new(0),
        })
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Next `created_at` in Unix milliseconds, clamped to be non-decreasing
    /// across inserts in this process.
    fn next_timestamp(&self) -> i64 {
        let mut last = self.clock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Utc::now().timestamp_millis();
        let ts = now.max(*last);
        *last = ts;
        ts
    }

    fn millis_to_timestamp(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
    }

    fn write_err(e: sqlx::Error) -> StoreError {
        match e {
            sqlx::Error::PoolClosed => StoreError::Closed,
            e => StoreError::WriteFailed(e.to_string()),
        }
    }

    fn read_err(e: sqlx::Error) -> StoreError {
        match e {
            sqlx::Error::PoolClosed => StoreError::Closed,
            e => StoreError::ReadFailed(e.to_string()),
        }
    }

    fn map_request_row(row: &sqlx::sqlite::SqliteRow) -> RequestLogEntry {
        RequestLogEntry {
            id: row.get("id"),
            created_at: Self::millis_to_timestamp(row.get("created_at")),
            probe_id: row.get("probe_id"),
            probe_name: row.get("probe_name"),
            probe_url: row.get("probe_url"),
            status_code: row.get::<i64, _>("status_code") as u16,
            response_time_ms: row.get::<Option<i64>, _>("response_time_ms").map(|v| v as u64),
            error_message: row.get("error_message"),
            reported: row.get::<i64, _>("reported") != 0,
        }
    }

    fn map_notification_row(row: &sqlx::sqlite::SqliteRow) -> NotificationLogEntry {
        let status: String = row.get("status");

        NotificationLogEntry {
            id: row.get("id"),
            created_at: Self::millis_to_timestamp(row.get("created_at")),
            probe_id: row.get("probe_id"),
            alert_id: row.get("alert_id"),
            channel_id: row.get("channel_id"),
            channel_type: row.get("channel_type"),
            status: DeliveryStatus::from_column(&status),
            message: row.get("message"),
            reported: row.get::<i64, _>("reported") != 0,
        }
    }
}

#[async_trait]
impl LogStore for SqliteStore {
    #[instrument(skip(self, result), fields(probe_id = %result.probe_id))]
    async fn insert_request_log(&self, result: &ProbeResult) -> StoreResult<i64> {
        let created_at = self.next_timestamp();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO request_logs (
                created_at, probe_id, probe_name, probe_url,
                status_code, response_time_ms, error_message, reported
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, 0)
            RETURNING id
            "#,
        )
        .bind(created_at)
        .bind(&result.probe_id)
        .bind(&result.probe_name)
        .bind(&result.probe_url)
        .bind(result.status_code as i64)
        .bind(result.response_time_ms.map(|v| v as i64))
        .bind(&result.error_message)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::write_err)?;

        debug!("request log inserted with id {}", id);
        Ok(id)
    }

    #[instrument(skip(self, result), fields(probe_id = %result.probe_id))]
    async fn insert_notification_log(&self, result: &NotificationResult) -> StoreResult<i64> {
        let created_at = self.next_timestamp();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO notification_logs (
                created_at, probe_id, alert_id, channel_id,
                channel_type, status, message, reported
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, 0)
            RETURNING id
            "#,
        )
        .bind(created_at)
        .bind(&result.probe_id)
        .bind(&result.alert_id)
        .bind(&result.channel_id)
        .bind(&result.channel_type)
        .bind(result.status.to_string())
        .bind(&result.message)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::write_err)?;

        debug!("notification log inserted with id {}", id);
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn list_all_request_logs(&self) -> StoreResult<Vec<RequestLogEntry>> {
        let rows = sqlx::query("SELECT * FROM request_logs ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(Self::read_err)?;

        Ok(rows.iter().map(Self::map_request_row).collect())
    }

    #[instrument(skip(self))]
    async fn list_unreported(&self) -> StoreResult<UnreportedBatch> {
        let request_rows = sqlx::query("SELECT * FROM request_logs WHERE reported = 0 ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(Self::read_err)?;

        let notification_rows =
            sqlx::query("SELECT * FROM notification_logs WHERE reported = 0 ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(Self::read_err)?;

        let batch = UnreportedBatch {
            requests: request_rows.iter().map(Self::map_request_row).collect(),
            notifications: notification_rows
                .iter()
                .map(Self::map_notification_row)
                .collect(),
        };

        debug!(
            "unreported snapshot: {} requests, {} notifications",
            batch.requests.len(),
            batch.notifications.len()
        );
        Ok(batch)
    }

    #[instrument(skip(self, ids), fields(kind = %kind, count = ids.len()))]
    async fn mark_reported(&self, kind: LogKind, ids: &[i64]) -> StoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "UPDATE {} SET reported = 1 WHERE id IN ({})",
            kind.table(),
            placeholders
        );

        let mut tx = self.pool.begin().await.map_err(Self::write_err)?;

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let result = query.execute(&mut *tx).await.map_err(Self::write_err)?;

        let affected = result.rows_affected() as usize;
        if affected != ids.len() {
            // Dropping the transaction rolls the update back
            return Err(StoreError::WriteFailed(format!(
                "marked {} of {} {} rows, id set contains unknown ids",
                affected,
                ids.len(),
                kind
            )));
        }

        tx.commit().await.map_err(Self::write_err)?;

        debug!("marked {} {} rows reported", affected, kind);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn flush(&self) -> StoreResult<()> {
        info!("flushing log store (dropping and recreating both tables)");

        let mut tx = self.pool.begin().await.map_err(Self::write_err)?;

        for statement in DROP_TABLES_SQL {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(Self::write_err)?;
        }

        for statement in CREATE_TABLES_SQL {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(Self::write_err)?;
        }

        tx.commit().await.map_err(Self::write_err)?;

        info!("log store flushed, id sequences restart at 1");
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        info!("closing log store");
        self.pool.close().await;
        Ok(())
    }
}
