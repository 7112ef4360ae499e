// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{routing::{get, post, put}, Router};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::robot_store::RobotStore;
use crate::application::simulation_engine::SimulationEngine;
use crate::application::simulation_scheduler::SimulationScheduler;
use crate::domain::now_ms;
use crate::domain::snapshot::RobotSnapshot;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_poller::HttpPoller;
use crate::infrastructure::websocket_transport::WebSocketTransport;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    acknowledge_alert, get_state, health_check, mock_stream, replace_system, reset_simulation,
    start_simulation, stop_simulation, stream_events, update_mission_status,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Aggregated robot state (application layer)
    let store = RobotStore::new(RobotSnapshot::initial(now_ms()));

    let engine = SimulationEngine::new(config.simulation.seed);
    let scheduler = SimulationScheduler::new(engine, store.clone(), config.simulation.tick_interval());
    if config.simulation.enabled {
        scheduler.start();
    }

    // Live robot feed (infrastructure layer)
    let shutdown = CancellationToken::new();
    let transport = if config.transport.enabled {
        let poller = Arc::new(HttpPoller::new(config.transport.poll_url.clone())?);
        let transport = WebSocketTransport::new(&config.transport, store.clone(), poller);
        let token = shutdown.child_token();
        Some(tokio::spawn(async move { transport.run(token).await }))
    } else {
        None
    };

    // Create application state
    let state = Arc::new(AppState {
        store,
        scheduler: scheduler.clone(),
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/state", get(get_state))
        .route("/stream", get(stream_events))
        .route("/api/mock-stream", get(mock_stream))
        .route("/alerts/:id/ack", post(acknowledge_alert))
        .route("/missions/:id/status", post(update_mission_status))
        .route("/system", put(replace_system))
        .route("/simulation/start", post(start_simulation))
        .route("/simulation/stop", post(stop_simulation))
        .route("/simulation/reset", post(reset_simulation))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server.bind_addr;
    tracing::info!(%addr, "Starting fieldbot-telemetry service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.stop();
    shutdown.cancel();
    if let Some(handle) = transport {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Transport task ended abnormally");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown requested");
}
