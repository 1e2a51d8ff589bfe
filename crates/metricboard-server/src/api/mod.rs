//! JSON API consumed by the workshop and admin front-ends.
//!
//! - `POST /api/register`       : create a participant
//! - `POST /api/results`        : append one sample
//! - `GET  /api/stats/users`    : participants in registration order
//! - `GET  /api/stats/averages` : per-metric averages across participants
//! - `GET  /`                   : liveness banner

pub mod error;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use metricboard_core::error::MetricboardError;
use metricboard_core::{Averages, Unit, User};

use crate::app_state::AppState;

pub use error::ApiError;

pub const BANNER: &str = "metricboard backend running";

#[derive(Debug, Serialize, Deserialize)]
pub struct Banner {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultPayload {
    pub user_id: String,
    pub metric_key: String,
    pub value: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

fn reject(state: &AppState, e: MetricboardError) -> ApiError {
    let code = e.client_code().as_str();
    state.metrics().rejections.inc(&[("code", code)]);
    tracing::warn!(code, error = %e, "request rejected");
    ApiError::from(e)
}

/// Body that failed to parse or did not match the expected shape.
fn malformed(state: &AppState, rejection: JsonRejection) -> ApiError {
    reject(
        state,
        MetricboardError::InvalidInput(format!("malformed body: {}", rejection.body_text())),
    )
}

pub async fn root() -> Json<Banner> {
    Json(Banner {
        message: BANNER.to_string(),
    })
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let Json(req) = body.map_err(|r| malformed(&state, r))?;
    let user = state
        .store()
        .register(&req.name)
        .map_err(|e| reject(&state, e))?;

    state.metrics().registrations.inc(&[]);
    tracing::info!(user_id = %user.user_id, name = %user.name, "participant registered");

    Ok(Json(RegisterResponse {
        user_id: user.user_id.to_string(),
        name: user.name,
    }))
}

pub async fn submit_result(
    State(state): State<AppState>,
    body: Result<Json<ResultPayload>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(req) = body.map_err(|r| malformed(&state, r))?;
    state
        .store()
        .record_sample(&req.user_id, &req.metric_key, req.value)
        .map_err(|e| reject(&state, e))?;

    let unit: Unit = state.units().resolve(&req.metric_key);
    state
        .metrics()
        .samples_recorded
        .inc(&[("unit", unit.as_str())]);
    tracing::debug!(
        user_id = %req.user_id,
        metric_key = %req.metric_key,
        value = req.value,
        "sample recorded"
    );

    Ok(Json(StatusResponse {
        status: "ok".to_string(),
    }))
}

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.store().list_users())
}

pub async fn averages(State(state): State<AppState>) -> Json<Averages> {
    Json(state.averages())
}
