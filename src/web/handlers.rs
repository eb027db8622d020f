//! HTTP request handlers.

use super::AppState;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde_json::json;

pub async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": "pulsewatch",
        "services": state.supervisor.service_count(),
        "status": "running",
    }))
}

pub async fn handle_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "timestamp": Utc::now(),
        "services": state.registry.get_all(),
    }))
}

pub async fn handle_service_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if state.supervisor.service(&id).is_none() {
        return (StatusCode::NOT_FOUND, format!("unknown service id: {}", id)).into_response();
    }

    match state.registry.get(&id) {
        Some(observation) => Json(observation).into_response(),
        // Configured but no completed cycle yet (startup window).
        None => (
            StatusCode::NOT_FOUND,
            format!("service {} not checked yet", id),
        )
            .into_response(),
    }
}

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().timestamp_millis(),
        "services_monitored": state.supervisor.service_count(),
    }))
}

pub async fn handle_force_check(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.supervisor.force_check(&id).await {
        Ok(result) => {
            let name = state
                .supervisor
                .service(&id)
                .map(|service| service.name.clone())
                .unwrap_or_default();
            Json(json!({ "service": name, "result": result })).into_response()
        }
        Err(e) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    }
}

pub async fn handle_test_alert(State(state): State<AppState>) -> impl IntoResponse {
    let success = state.supervisor.send_test_alert().await;
    Json(json!({
        "message": "test alert sent",
        "success": success,
    }))
}
