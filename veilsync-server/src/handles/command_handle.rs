use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use veilsync_api::{CommandResponse, Directive};

use crate::errors::{ApiError, CommandError};
use crate::services::{CommandService, CommandTarget};

#[derive(Clone)]
pub struct CommandState {
    pub command_service: Arc<CommandService>,
}

pub fn command_router(command_state: CommandState) -> Router {
    Router::new()
        .route("/api/curtains/commands/:directive", post(send_shared_command))
        .route(
            "/api/curtains/:device_id/commands/:directive",
            post(send_device_command),
        )
        .with_state(command_state)
}

#[utoipa::path(
    post,
    path = "/api/curtains/commands/{directive}",
    tag = "command",
    params(
        ("directive" = String, Path, description = "open, close, set-manual or set-automatic")
    ),
    responses(
        (status = 200, description = "Directive accepted by the broker", body = CommandResponse),
        (status = 400, description = "Unknown directive"),
        (status = 502, description = "Broker rejected the directive"),
        (status = 504, description = "Broker did not accept the directive in time")
    )
)]
pub async fn send_shared_command(
    State(state): State<CommandState>,
    Path(directive): Path<String>,
) -> Result<Json<CommandResponse>, ApiError> {
    publish(&state, CommandTarget::Shared, &directive).await
}

#[utoipa::path(
    post,
    path = "/api/curtains/{device_id}/commands/{directive}",
    tag = "command",
    params(
        ("device_id" = String, Path, description = "Device identifier"),
        ("directive" = String, Path, description = "open, close, set-manual or set-automatic")
    ),
    responses(
        (status = 200, description = "Directive accepted by the broker", body = CommandResponse),
        (status = 400, description = "Unknown directive or invalid device identifier"),
        (status = 502, description = "Broker rejected the directive"),
        (status = 504, description = "Broker did not accept the directive in time")
    )
)]
pub async fn send_device_command(
    State(state): State<CommandState>,
    Path((device_id, directive)): Path<(String, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    publish(&state, CommandTarget::Device(device_id), &directive).await
}

async fn publish(
    state: &CommandState,
    target: CommandTarget,
    directive: &str,
) -> Result<Json<CommandResponse>, ApiError> {
    let directive: Directive = directive
        .parse()
        .map_err(|_| CommandError::InvalidDirective(directive.to_string()))?;

    let topic = state.command_service.publish(&target, directive).await?;

    Ok(Json(CommandResponse {
        success: true,
        directive,
        message: format!("Directive `{}` sent as `{}`", directive, directive.token()),
        topic,
    }))
}
