use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use veilsync_api::{DeviceStateResponse, TelemetryPayload};

use super::Table;

/// Latest known state of one curtain, keyed by its device identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeviceState {
    pub device_id: String,
    pub automatic_mode: bool,
    pub curtain_open: bool,
    pub light_value: f64,
    pub sound_value: f64,
    pub updated_at: OffsetDateTime,
}

impl DeviceState {
    pub fn from_telemetry(telemetry: &TelemetryPayload, updated_at: OffsetDateTime) -> Self {
        Self {
            device_id: telemetry.device_id.clone(),
            automatic_mode: telemetry.automatic_mode,
            curtain_open: telemetry.curtain_open,
            light_value: telemetry.light_value,
            sound_value: telemetry.sound_value,
            updated_at,
        }
    }
}

impl From<DeviceState> for DeviceStateResponse {
    fn from(state: DeviceState) -> Self {
        Self {
            device_id: state.device_id,
            automatic_mode: state.automatic_mode,
            curtain_open: state.curtain_open,
            light_value: state.light_value,
            sound_value: state.sound_value,
            updated_at: state.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct DeviceStateTable;

impl Table for DeviceStateTable {
    fn name(&self) -> &'static str {
        "device_states"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS device_states (
                device_id TEXT PRIMARY KEY NOT NULL,
                automatic_mode BOOLEAN NOT NULL DEFAULT FALSE,
                curtain_open BOOLEAN NOT NULL DEFAULT FALSE,
                light_value REAL NOT NULL DEFAULT 0,
                sound_value REAL NOT NULL DEFAULT 0,
                updated_at TIMESTAMP NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_device_states_updated_at
                ON device_states (updated_at DESC);
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS device_states;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec![]
    }
}
