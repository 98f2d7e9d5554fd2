use axum::Json;
use utoipa::OpenApi;
use veilsync_api::{
    CauseMethod, CommandResponse, DeviceStateResponse, Directive, HistoryEventResponse, ModeLabel,
    StateLabel,
};

use crate::handles::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        get_curtain_states,
        get_most_recent_curtain_state,
        get_curtain_state,
        get_curtain_history,
        send_shared_command,
        send_device_command,
    ),
    components(schemas(
        CauseMethod,
        CommandResponse,
        DeviceStateResponse,
        Directive,
        HistoryEventResponse,
        ModeLabel,
        StateLabel,
    )),
    tags(
        (name = "curtain", description = "Curtain state and transition history"),
        (name = "command", description = "Directives sent to curtain actuators")
    )
)]
pub struct ApiDoc;

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
