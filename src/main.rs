//! `solve-scheduler` binary: loads configuration, starts the scheduler and
//! serves the HTTP API until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use solve_scheduler::builders::SchedulerBuilder;
use solve_scheduler::config::ServiceConfig;
use solve_scheduler::core::{AppResult, InMemoryAuditSink};
use solve_scheduler::infra::HttpSolver;
use solve_scheduler::runtime::{router, serve, ApiKeys, SolveService};
use solve_scheduler::util::init_tracing;
use tokio::net::TcpListener;

const AUDIT_CAPACITY: usize = 10_000;

#[tokio::main]
async fn main() -> AppResult<()> {
    init_tracing();

    let config = ServiceConfig::from_env().map_err(anyhow::Error::msg)?;
    let solver = HttpSolver::new(config.solver_endpoint.clone(), config.solver_timeout())
        .context("building solver client")?;

    let scheduler = SchedulerBuilder::new(config.scheduler.clone(), Arc::new(solver))
        .audit(Arc::new(InMemoryAuditSink::new(AUDIT_CAPACITY)))
        .build()?;
    let scheduler = Arc::new(scheduler);

    let service = SolveService::new(
        Arc::clone(&scheduler),
        config.default_url.clone(),
        config.default_sitekey.clone(),
        config.scheduler.include_timings,
    );
    let app = router(service, ApiKeys::new(config.api_keys.iter().cloned()));

    let listener = TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("binding {}", config.listen_addr()))?;
    tracing::info!(
        solver = %config.solver_endpoint,
        keys = config.api_keys.len(),
        "solve-scheduler starting"
    );

    serve(listener, app, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    })
    .await
    .context("serving http")?;

    scheduler.shutdown();
    tracing::info!("solve-scheduler stopped");
    Ok(())
}
