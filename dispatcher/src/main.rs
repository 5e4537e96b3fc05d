// Dispatcher binary entry point
//
// Composition root: loads settings, wires telemetry, and runs the schedule
// loop that triggers the fixed GitHub workflow.

use anyhow::Result;
use common::config::Settings;
use common::dispatch::GithubDispatcher;
use common::scheduler::DispatchScheduler;
use common::telemetry;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load and validate configuration before anything else; the token is the
    // only value the environment must supply
    let settings =
        Settings::load().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    telemetry::init_logging(
        &settings.observability.log_level,
        settings.observability.tracing_endpoint.as_deref(),
    )?;

    info!("Starting GitHub workflow dispatcher");
    info!(
        schedule = ?settings.schedule,
        timeout_seconds = settings.github.timeout_seconds,
        "Configuration loaded"
    );

    telemetry::init_metrics(settings.observability.metrics_port)?;

    let dispatcher = Arc::new(GithubDispatcher::new(settings.github.timeout_seconds).map_err(
        |e| {
            error!(error = %e, "Failed to initialize dispatch client");
            anyhow::anyhow!("Dispatch client initialization error: {}", e)
        },
    )?);
    info!(target = ?dispatcher.target(), "Dispatch client initialized");

    let scheduler = Arc::new(DispatchScheduler::new(
        settings.schedule.clone(),
        dispatcher,
        settings.github.token.clone(),
    ));

    // Graceful shutdown on SIGINT
    let scheduler_for_shutdown = scheduler.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        info!("Received Ctrl+C signal, initiating graceful shutdown");
        scheduler_for_shutdown.stop().await;
    });

    let run_result = scheduler.start().await;
    telemetry::shutdown_tracer();

    if let Err(e) = run_result {
        error!(error = %e, "Scheduler error");
        return Err(anyhow::anyhow!("Scheduler error: {}", e));
    }

    info!("Dispatcher stopped");
    Ok(())
}
