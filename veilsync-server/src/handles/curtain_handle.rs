use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use veilsync_api::{DeviceStateResponse, HistoryEventResponse, HistoryQuery, Page};

use crate::errors::{ApiError, CurtainError};
use crate::services::QueryService;

#[derive(Clone)]
pub struct CurtainState {
    pub query_service: Arc<QueryService>,
}

pub fn curtain_router(curtain_state: CurtainState) -> Router {
    Router::new()
        .route("/api/curtains", get(get_curtain_states))
        .route("/api/curtains/latest", get(get_most_recent_curtain_state))
        .route("/api/curtains/history", get(get_curtain_history))
        .route("/api/curtains/:device_id", get(get_curtain_state))
        .with_state(curtain_state)
}

#[utoipa::path(
    get,
    path = "/api/curtains",
    tag = "curtain",
    responses(
        (status = 200, description = "Latest state of every known device", body = Vec<DeviceStateResponse>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_curtain_states(
    State(state): State<CurtainState>,
) -> Result<Json<Vec<DeviceStateResponse>>, ApiError> {
    let states = state.query_service.list_states().await?;

    Ok(Json(states.into_iter().map(DeviceStateResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/curtains/latest",
    tag = "curtain",
    responses(
        (status = 200, description = "State of the device that reported last", body = DeviceStateResponse),
        (status = 404, description = "No device has reported yet"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_most_recent_curtain_state(
    State(state): State<CurtainState>,
) -> Result<Json<DeviceStateResponse>, ApiError> {
    let latest = state.query_service.get_most_recent_state().await?;

    Ok(Json(latest.into()))
}

#[utoipa::path(
    get,
    path = "/api/curtains/{device_id}",
    tag = "curtain",
    params(
        ("device_id" = String, Path, description = "Device identifier")
    ),
    responses(
        (status = 200, description = "Latest known state", body = DeviceStateResponse),
        (status = 404, description = "Device not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_curtain_state(
    State(state): State<CurtainState>,
    Path(device_id): Path<String>,
) -> Result<Json<DeviceStateResponse>, ApiError> {
    let latest = state.query_service.get_latest_state(&device_id).await?;

    Ok(Json(latest.into()))
}

#[utoipa::path(
    get,
    path = "/api/curtains/history",
    tag = "curtain",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History page, newest first", body = Page<HistoryEventResponse>),
        (status = 400, description = "Missing deviceId or invalid pagination"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_curtain_history(
    State(state): State<CurtainState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Page<HistoryEventResponse>>, ApiError> {
    let Query(query) = query.map_err(|_| CurtainError::InvalidPagination)?;

    let page = query.page.unwrap_or(1);
    let limit = query
        .limit
        .unwrap_or_else(|| state.query_service.default_limit() as i64);

    let history = state
        .query_service
        .get_history(query.device_id.as_deref(), page, limit)
        .await?
        .try_map(HistoryEventResponse::try_from)
        .map_err(|e| anyhow!("Corrupt history record: {}", e))?;

    Ok(Json(history))
}
