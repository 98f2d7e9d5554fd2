use serde::{Deserialize, Serialize};

/// State report pushed by a curtain actuator on the telemetry topic.
///
/// Field names follow the firmware's wire format.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPayload {
    /// Stable device identifier
    #[serde(rename = "deviceId")]
    pub device_id: String,
    /// Automatic (light driven) mode enabled
    #[serde(rename = "modoAutomatico")]
    pub automatic_mode: bool,
    /// Curtain currently open
    #[serde(rename = "cortinaAbierta")]
    pub curtain_open: bool,
    /// Light dependent resistor reading
    #[serde(rename = "ldrValue")]
    pub light_value: f64,
    /// Sound sensor reading, `1` while a sound trigger is active
    #[serde(rename = "soundValue")]
    pub sound_value: f64,
}
