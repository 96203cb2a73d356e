//! Scheduled reporting loop
//!
//! The reporter core is a single-shot `report_once`; this actor is the
//! scheduling hook that re-invokes it on a fixed interval. It follows the
//! same pattern as the other long-running tasks in this codebase: an actor
//! owning its state, an mpsc command channel, and a cheap clonable handle.
//!
//! A failed cycle is not retried inside the loop - the rows simply stay
//! unreported and ride along with the next tick.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::interval;
use tracing::{debug, instrument, warn};

use super::remote::{ReportOutcome, SymonReporter};

/// Commands that can be sent to the reporter actor
#[derive(Debug)]
pub enum ReporterCommand {
    /// Trigger an immediate report cycle (bypassing the interval timer)
    ///
    /// Used for testing and manual flush-to-collector operations.
    ReportNow {
        /// Channel to send the outcome back
        respond_to: oneshot::Sender<ReportOutcome>,
    },

    /// Gracefully shut down the reporter
    ///
    /// The actor finishes any in-flight cycle and then exits.
    Shutdown,
}

/// Actor that drives `report_once` on a fixed period
pub struct ReporterActor {
    reporter: SymonReporter,
    command_rx: mpsc::Receiver<ReporterCommand>,
    interval_duration: Duration,
}

impl ReporterActor {
    fn new(
        reporter: SymonReporter,
        command_rx: mpsc::Receiver<ReporterCommand>,
        interval_duration: Duration,
    ) -> Self {
        Self {
            reporter,
            command_rx,
            interval_duration,
        }
    }

    /// Run the actor's main loop
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!(
            "starting reporter actor (interval: {:?})",
            self.interval_duration
        );

        let mut ticker = interval(self.interval_duration);

        loop {
            tokio::select! {
                // Timer tick - run one report cycle
                _ = ticker.tick() => {
                    let outcome = self.reporter.report_once().await;
                    debug!("scheduled report cycle finished: {:?}", outcome);
                }

                // Handle commands
                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        ReporterCommand::ReportNow { respond_to } => {
                            debug!("received ReportNow command");
                            let outcome = self.reporter.report_once().await;
                            let _ = respond_to.send(outcome);
                        }

                        ReporterCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                // Command channel closed - exit
                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("reporter actor stopped");
    }
}

/// Handle for controlling a ReporterActor
#[derive(Clone)]
pub struct ReporterHandle {
    sender: mpsc::Sender<ReporterCommand>,
}

impl ReporterHandle {
    /// Spawn a new reporter actor reporting every `interval_duration`.
    ///
    /// The first cycle runs immediately, so a backlog accumulated while the
    /// agent was down is uploaded without waiting a full interval.
    pub fn spawn(reporter: SymonReporter, interval_duration: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = ReporterActor::new(reporter, cmd_rx, interval_duration);

        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Trigger an immediate report cycle and wait for its outcome
    pub async fn report_now(&self) -> anyhow::Result<ReportOutcome> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ReporterCommand::ReportNow { respond_to: tx })
            .await?;

        Ok(rx.await?)
    }

    /// Shut down the reporter actor
    pub async fn shutdown(&self) {
        let _ = self.sender.send(ReporterCommand::Shutdown).await;
    }
}
