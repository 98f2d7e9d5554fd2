use super::TelemetryError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Storage failure: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Storage operation `{0}` timed out")]
    Timeout(&'static str),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("Ingest shard {0} is saturated")]
    QueueFull(usize),

    #[error("Ingest shard {0} is gone")]
    ShardClosed(usize),
}
