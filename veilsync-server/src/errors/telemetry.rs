#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Malformed telemetry payload: {0}")]
    MalformedPayload(String),

    #[error("Telemetry payload has no deviceId")]
    MissingDeviceId,
}
