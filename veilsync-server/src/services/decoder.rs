use serde_json::Value;
use veilsync_api::TelemetryPayload;

use crate::errors::TelemetryError;

/// Validates a raw telemetry message before anything touches the store.
///
/// `deviceId` is checked first so an unidentifiable message is reported as
/// such even when other fields are broken too.
pub fn decode_telemetry(payload: &[u8]) -> Result<TelemetryPayload, TelemetryError> {
    let value: Value = serde_json::from_slice(payload)
        .map_err(|e| TelemetryError::MalformedPayload(e.to_string()))?;

    let Some(object) = value.as_object() else {
        return Err(TelemetryError::MalformedPayload(
            "expected a JSON object".to_string(),
        ));
    };

    match object.get("deviceId") {
        None | Some(Value::Null) => return Err(TelemetryError::MissingDeviceId),
        Some(Value::String(id)) if id.trim().is_empty() => {
            return Err(TelemetryError::MissingDeviceId);
        }
        _ => {}
    }

    serde_path_to_error::deserialize(value).map_err(|e| {
        TelemetryError::MalformedPayload(format!("{} at `{}`", e.inner(), e.path()))
    })
}
