use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::{SchemaManager, Settings, Storage};
use crate::docs::openapi;
use crate::handles::*;
use crate::repositories::{DeviceStateRepository, HistoryEventRepository};
use crate::services::{CommandService, Gateway, IngestDispatcher, IngestService, QueryService};

pub fn create_router(query_service: Arc<QueryService>, command_service: Arc<CommandService>) -> Router {
    Router::new()
        .merge(curtain_router(CurtainState { query_service }))
        .merge(command_router(CommandState { command_service }))
        .route("/api/openapi.json", get(openapi))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Wires storage, the broker connection and the ingestion workers, and
/// returns the HTTP surface. Ingestion keeps running in background tasks.
pub async fn create_app(settings: &Arc<Settings>) -> anyhow::Result<Router> {
    let storage = Arc::new(Storage::new(settings.database.clone(), SchemaManager::default()).await?);

    let device_state_repository = Arc::new(DeviceStateRepository::new(storage.clone()));
    let history_event_repository = Arc::new(HistoryEventRepository::new(storage.clone()));

    let ingest_service = Arc::new(IngestService::new(
        device_state_repository.clone(),
        history_event_repository.clone(),
        settings.ingest.store_timeout(),
    ));
    let dispatcher = Arc::new(IngestDispatcher::spawn(
        ingest_service,
        settings.ingest.shards,
        settings.ingest.queue_capacity,
    ));
    tracing::info!("ingestion running on {} shards", dispatcher.shard_count());

    let (gateway, event_loop) = Gateway::new(&settings.gateway)?;
    let command_service = Arc::new(CommandService::new(
        Arc::new(gateway.client().clone()),
        settings.gateway.topic.clone(),
        settings.command.publish_timeout(),
    ));
    gateway.start(event_loop, dispatcher);

    let query_service = Arc::new(QueryService::new(
        device_state_repository,
        history_event_repository,
        settings.history.clone(),
    ));

    Ok(create_router(query_service, command_service))
}
