//! Remote reporting to the central collector
//!
//! The reporter uploads unreported log rows to the collector ("Symon") and
//! marks them reported once the upload is acknowledged.
//!
//! ## Flow
//!
//! ```text
//! interval tick -> list_unreported -> gzip JSON POST /report -> 2xx? -> mark_reported
//!                       |                                        |
//!                   empty: NoOp                       no: warn, retry next cycle
//! ```
//!
//! One cycle is one bounded attempt: there is no retry or backoff inside a
//! cycle, only the next scheduled invocation. Rows are re-included in every
//! cycle until a confirmed upload marks them, which gives at-least-once
//! delivery across crashes and collector outages.

pub mod actor;
pub mod payload;
pub mod remote;

pub use actor::ReporterHandle;
pub use remote::{HandshakeError, ReportOutcome, SymonReporter};
