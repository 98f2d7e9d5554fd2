use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tracing::{debug, error, info, warn};
use veilsync_api::{ModeLabel, StateLabel, TelemetryPayload};

use crate::errors::IngestError;
use crate::models::{DeviceState, HistoryEvent};
use crate::repositories::{DeviceStateRepository, HistoryEventRepository};
use crate::services::{Classification, classify};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    /// Nothing changed, no event was written
    Skipped,
    /// Event appended with the given identifier
    Appended(i64),
    /// Append failed after the state was already committed
    Failed,
}

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub device_id: String,
    pub classification: Classification,
    pub history: HistoryStatus,
}

/// Read, classify, write and record for a single telemetry message.
///
/// Callers must not run two messages for the same device identifier
/// concurrently, see [`crate::services::IngestDispatcher`].
pub struct IngestService {
    device_state_repository: Arc<DeviceStateRepository>,
    history_event_repository: Arc<HistoryEventRepository>,
    store_timeout: Duration,
}

impl IngestService {
    pub fn new(
        device_state_repository: Arc<DeviceStateRepository>,
        history_event_repository: Arc<HistoryEventRepository>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            device_state_repository,
            history_event_repository,
            store_timeout,
        }
    }

    pub async fn process(&self, telemetry: TelemetryPayload) -> Result<IngestReport, IngestError> {
        let previous = self
            .bounded(
                "read_state",
                self.device_state_repository
                    .find_by_device_id(&telemetry.device_id),
            )
            .await?;

        let classification = classify(previous.as_ref(), &telemetry);
        let now = OffsetDateTime::now_utc();

        let state = DeviceState::from_telemetry(&telemetry, now);
        // a timed out upsert may still commit, the next report then reads it as
        // previous and this transition never reaches the history log
        self.bounded("upsert_state", self.device_state_repository.upsert(&state))
            .await
            .inspect_err(|e| {
                if classification.is_change() {
                    warn!(
                        device_id = %telemetry.device_id,
                        method = %classification.method,
                        "transition not recorded: {}", e
                    );
                }
            })?;

        debug!(
            device_id = %telemetry.device_id,
            open = telemetry.curtain_open,
            automatic = telemetry.automatic_mode,
            "curtain state updated"
        );

        if !classification.is_change() {
            return Ok(IngestReport {
                device_id: telemetry.device_id,
                classification,
                history: HistoryStatus::Skipped,
            });
        }

        let event = HistoryEvent::new(
            &telemetry.device_id,
            ModeLabel::from(telemetry.automatic_mode),
            StateLabel::from(telemetry.curtain_open),
            classification.method,
            now,
        );

        // the state upsert above stays committed whatever happens here
        let history = match self
            .bounded("append_history", self.history_event_repository.create(&event))
            .await
        {
            Ok(id) => {
                info!(
                    device_id = %telemetry.device_id,
                    method = %classification.method,
                    "history event {} recorded", id
                );
                HistoryStatus::Appended(id)
            }
            Err(e) => {
                error!(device_id = %telemetry.device_id, "Failed to append history event: {}", e);
                HistoryStatus::Failed
            }
        };

        Ok(IngestReport {
            device_id: telemetry.device_id,
            classification,
            history,
        })
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        future: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> Result<T, IngestError> {
        tokio::time::timeout(self.store_timeout, future)
            .await
            .map_err(|_| IngestError::Timeout(operation))?
            .map_err(IngestError::from)
    }
}

#[cfg(test)]
mod tests {
    use veilsync_api::CauseMethod;

    use crate::tests::*;

    use super::*;

    fn service(storage: Arc<crate::configs::Storage>) -> IngestService {
        IngestService::new(
            Arc::new(DeviceStateRepository::new(storage.clone())),
            Arc::new(HistoryEventRepository::new(storage)),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_first_report_creates_state_and_event() {
        let storage = setup_test_db().await;
        let service = service(storage.clone());

        let report = service
            .process(telemetry("esp32-a", false, false, 0.0))
            .await
            .unwrap();

        let HistoryStatus::Appended(id) = report.history else {
            panic!("expected an appended event, got {:?}", report.history);
        };

        let event = HistoryEventRepository::new(storage.clone())
            .find_by_id(id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.mode, "Manual");
        assert_eq!(event.state, "Closed");
        assert_eq!(event.method, "button");

        let state = DeviceStateRepository::new(storage.clone())
            .find_by_device_id("esp32-a")
            .await
            .unwrap()
            .unwrap();
        assert!(!state.curtain_open);
        assert_eq!(state.updated_at, event.time);
    }

    #[tokio::test]
    async fn test_repeated_report_updates_state_only() {
        let storage = setup_test_db().await;
        let service = service(storage.clone());

        service.process(telemetry("esp32-a", true, true, 0.0)).await.unwrap();
        let report = service
            .process(TelemetryPayload {
                light_value: 90.0,
                ..telemetry("esp32-a", true, true, 0.0)
            })
            .await
            .unwrap();

        assert_eq!(report.history, HistoryStatus::Skipped);
        assert!(!report.classification.is_change());

        let state = DeviceStateRepository::new(storage.clone())
            .find_by_device_id("esp32-a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.light_value, 90.0);

        let count = HistoryEventRepository::new(storage).count(Some("esp32-a")).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_sound_edge_uses_stored_reading() {
        let storage = setup_test_db().await;
        let service = service(storage.clone());

        service.process(telemetry("esp32-a", false, false, 0.0)).await.unwrap();
        let report = service
            .process(telemetry("esp32-a", false, true, 1.0))
            .await
            .unwrap();

        assert_eq!(report.classification.method, CauseMethod::Sound);
    }

    #[tokio::test]
    async fn test_history_failure_keeps_state() {
        let storage = setup_test_db().await;
        let service = service(storage.clone());

        sqlx::query("DROP TABLE history_events")
            .execute(storage.get_pool())
            .await
            .unwrap();

        let report = service
            .process(telemetry("esp32-a", false, true, 0.0))
            .await
            .unwrap();

        assert_eq!(report.history, HistoryStatus::Failed);
        assert!(report.classification.is_change());

        let state = DeviceStateRepository::new(storage)
            .find_by_device_id("esp32-a")
            .await
            .unwrap();
        assert!(state.is_some());
    }

    #[tokio::test]
    async fn test_state_store_failure_is_reported() {
        let storage = setup_test_db().await;
        let service = service(storage.clone());

        sqlx::query("DROP TABLE device_states")
            .execute(storage.get_pool())
            .await
            .unwrap();

        let result = service.process(telemetry("esp32-a", false, true, 0.0)).await;

        assert!(matches!(result, Err(IngestError::Storage(_))));
    }

    #[tokio::test]
    async fn test_failed_upsert_records_no_history() {
        let storage = setup_test_db().await;
        let service = service(storage.clone());

        sqlx::query(
            r#"
            CREATE TRIGGER reject_state_writes BEFORE INSERT ON device_states
            BEGIN
                SELECT RAISE(ABORT, 'state store unavailable');
            END;
            "#,
        )
        .execute(storage.get_pool())
        .await
        .unwrap();

        let result = service.process(telemetry("esp32-a", false, true, 0.0)).await;

        assert!(matches!(result, Err(IngestError::Storage(_))));
        let count = HistoryEventRepository::new(storage).count(Some("esp32-a")).await.unwrap();
        assert_eq!(count, 0);
    }
}
