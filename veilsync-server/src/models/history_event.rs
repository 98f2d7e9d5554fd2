use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use veilsync_api::{CauseMethod, HistoryEventResponse, ModeLabel, StateLabel};

use super::Table;

/// One row of the append-only transition log.
///
/// Labels are stored as text so the log stays readable without this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoryEvent {
    pub id: i64,
    pub device_id: String,
    pub mode: String,
    pub state: String,
    pub method: String,
    pub time: OffsetDateTime,
}

impl HistoryEvent {
    pub fn new(
        device_id: &str,
        mode: ModeLabel,
        state: StateLabel,
        method: CauseMethod,
        time: OffsetDateTime,
    ) -> Self {
        Self {
            id: 0,
            device_id: device_id.to_string(),
            mode: mode.as_str().to_string(),
            state: state.as_str().to_string(),
            method: method.as_str().to_string(),
            time,
        }
    }
}

impl TryFrom<HistoryEvent> for HistoryEventResponse {
    type Error = veilsync_api::UnknownLabel;

    fn try_from(event: HistoryEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            id: event.id,
            device_id: event.device_id,
            mode: event.mode.parse()?,
            state: event.state.parse()?,
            method: CauseMethod::from(event.method),
            time: event.time,
        })
    }
}

#[derive(Clone)]
pub struct HistoryEventTable;

impl Table for HistoryEventTable {
    fn name(&self) -> &'static str {
        "history_events"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS history_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                device_id TEXT NOT NULL,
                mode TEXT NOT NULL,
                state TEXT NOT NULL,
                method TEXT NOT NULL,
                time TIMESTAMP NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_history_events_device_time
                ON history_events (device_id, time DESC);
            CREATE INDEX IF NOT EXISTS idx_history_events_time
                ON history_events (time DESC);
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS history_events;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec![]
    }
}
