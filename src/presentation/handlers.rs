// HTTP request handlers
use crate::domain::envelope::EventEnvelope;
use crate::domain::mission::{MissionState, MissionStatus};
use crate::domain::snapshot::RobotSnapshot;
use crate::domain::system::SystemInfo;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::envelope_mapper::snapshot_to_envelopes;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct MissionStatusRequest {
    pub status: MissionStatus,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStatus {
    pub running: bool,
    pub ticks: u64,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full current snapshot
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<RobotSnapshot> {
    Json(state.store.snapshot())
}

/// Live feed of every applied event (newline-delimited JSON)
pub async fn stream_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    stream_from_receiver(state.store.subscribe())
}

/// Poll fallback feed: the current snapshot as envelopes
pub async fn mock_stream(State(state): State<Arc<AppState>>) -> Json<Vec<EventEnvelope>> {
    let envelopes = state.store.with_snapshot(snapshot_to_envelopes);
    Json(envelopes)
}

pub async fn acknowledge_alert(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> StatusCode {
    if state.store.acknowledge_alert(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Operator authority over mission status (activate, cancel, fail)
pub async fn update_mission_status(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<MissionStatusRequest>,
) -> Result<Json<MissionState>, StatusCode> {
    tracing::info!(mission_id = %id, status = ?request.status, "Mission status change requested");
    state
        .store
        .set_mission_status(&id, request.status)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn replace_system(
    State(state): State<Arc<AppState>>,
    Json(system): Json<SystemInfo>,
) -> StatusCode {
    state.store.replace_system_info(system);
    StatusCode::NO_CONTENT
}

pub async fn start_simulation(State(state): State<Arc<AppState>>) -> Json<SimulationStatus> {
    state.scheduler.start();
    Json(simulation_status(&state))
}

pub async fn stop_simulation(State(state): State<Arc<AppState>>) -> Json<SimulationStatus> {
    state.scheduler.stop();
    Json(simulation_status(&state))
}

pub async fn reset_simulation(State(state): State<Arc<AppState>>) -> Json<SimulationStatus> {
    state.scheduler.reset();
    Json(simulation_status(&state))
}

fn simulation_status(state: &AppState) -> SimulationStatus {
    SimulationStatus {
        running: state.scheduler.is_running(),
        ticks: state.scheduler.tick_count(),
    }
}
