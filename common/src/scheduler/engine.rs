// Dispatch scheduler engine
//
// Replaces the host-runtime timer: computes the next firing from the
// configured schedule, sleeps until it, and invokes the dispatcher once per
// firing. Firings are sequential; there is no queueing, deduplication, or
// rate limiting between them.

use crate::dispatch::WorkflowDispatcher;
use crate::errors::DispatchError;
use crate::models::DispatchOutcome;
use crate::schedule::Schedule;
use crate::telemetry;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// DispatchScheduler drives the single scheduled dispatch task
pub struct DispatchScheduler {
    schedule: Schedule,
    dispatcher: Arc<dyn WorkflowDispatcher>,
    credential: String,
    shutdown_tx: tokio::sync::broadcast::Sender<()>,
}

impl DispatchScheduler {
    /// Create a scheduler that triggers `dispatcher` per the schedule
    pub fn new(
        schedule: Schedule,
        dispatcher: Arc<dyn WorkflowDispatcher>,
        credential: impl Into<String>,
    ) -> Self {
        let (shutdown_tx, _shutdown_rx) = tokio::sync::broadcast::channel(1);

        Self {
            schedule,
            dispatcher,
            credential: credential.into(),
            shutdown_tx,
        }
    }

    /// Get a shutdown signal receiver
    pub fn shutdown_receiver(&self) -> tokio::sync::broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Run the schedule loop until a shutdown signal arrives
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!(schedule = ?self.schedule, "Starting dispatch scheduler");

        let mut shutdown_rx = self.shutdown_receiver();
        let mut last_execution: Option<DateTime<Utc>> = None;

        loop {
            let next = self.schedule.next_execution_time(last_execution)?;
            let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            debug!(
                next_execution = %next,
                wait_seconds = wait.as_secs(),
                "Waiting for next firing"
            );

            tokio::select! {
                _ = sleep(wait) => {
                    last_execution = Some(Utc::now());
                    // A failed dispatch is logged and counted inside
                    // run_once; subsequent firings continue on schedule.
                    let _ = self.run_once().await;
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received, stopping scheduler");
                    break;
                }
            }
        }

        info!("Dispatch scheduler stopped");
        Ok(())
    }

    /// Stop the scheduler gracefully
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        info!("Stopping dispatch scheduler");

        let _ = self.shutdown_tx.send(());

        // Give an in-flight dispatch time to complete
        sleep(Duration::from_secs(2)).await;
    }

    /// Perform the dispatch for one timer firing
    ///
    /// Exactly one dispatch call is made per invocation; the result is
    /// returned to the caller after logging and metrics are recorded.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<DispatchOutcome, DispatchError> {
        let dispatch_id = Uuid::new_v4();
        let started = std::time::Instant::now();
        info!(dispatch_id = %dispatch_id, "Timer fired, dispatching workflow trigger");

        let result = self.dispatcher.dispatch(&self.credential).await;
        telemetry::record_dispatch_duration(&dispatch_id, started.elapsed().as_secs_f64());

        match &result {
            Ok(outcome) => {
                telemetry::record_dispatch_success(&dispatch_id);
                info!(
                    dispatch_id = %dispatch_id,
                    status = outcome.status,
                    "Dispatch completed"
                );
            }
            Err(e) => {
                telemetry::record_dispatch_failure(&dispatch_id, &e.reason());
                error!(dispatch_id = %dispatch_id, error = %e, "Dispatch failed");
            }
        }

        result
    }
}
