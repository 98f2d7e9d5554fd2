use std::sync::Arc;

use sqlx::{Error, Pool, Sqlite};

use crate::configs::Storage;
use crate::models::DeviceState;

#[derive(Clone)]
pub struct DeviceStateRepository {
    storage: Arc<Storage>,
}

impl DeviceStateRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl DeviceStateRepository {
    /// Creates the record for an unseen identifier or replaces the existing one.
    pub async fn upsert(&self, item: &DeviceState) -> Result<(), Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO device_states
                (device_id, automatic_mode, curtain_open, light_value, sound_value, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (device_id) DO UPDATE SET
                automatic_mode = excluded.automatic_mode,
                curtain_open = excluded.curtain_open,
                light_value = excluded.light_value,
                sound_value = excluded.sound_value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&item.device_id)
        .bind(item.automatic_mode)
        .bind(item.curtain_open)
        .bind(item.light_value)
        .bind(item.sound_value)
        .bind(item.updated_at)
        .execute(self.storage.get_pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::RowNotFound);
        }

        Ok(())
    }

    pub async fn find_by_device_id(&self, device_id: &str) -> Result<Option<DeviceState>, Error> {
        let state: Option<DeviceState> =
            sqlx::query_as("SELECT * FROM device_states WHERE device_id = $1")
                .bind(device_id)
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(state)
    }

    /// The device that reported most recently.
    pub async fn find_latest(&self) -> Result<Option<DeviceState>, Error> {
        let state: Option<DeviceState> = sqlx::query_as(
            "SELECT * FROM device_states ORDER BY updated_at DESC, device_id ASC LIMIT 1",
        )
        .fetch_optional(self.storage.get_pool())
        .await?;

        Ok(state)
    }

    pub async fn find_all(&self) -> Result<Vec<DeviceState>, Error> {
        let states: Vec<DeviceState> =
            sqlx::query_as("SELECT * FROM device_states ORDER BY device_id")
                .fetch_all(self.storage.get_pool())
                .await?;

        Ok(states)
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime};

    use crate::tests::*;

    use super::*;

    #[tokio::test]
    async fn test_upsert_creates_then_replaces() {
        let storage = setup_test_db().await;
        let repo = DeviceStateRepository::new(storage.clone());

        let now = OffsetDateTime::now_utc();
        let mut state = DeviceState {
            device_id: "esp32-kitchen".to_string(),
            automatic_mode: false,
            curtain_open: false,
            light_value: 120.0,
            sound_value: 0.0,
            updated_at: now,
        };
        repo.upsert(&state).await.unwrap();

        state.curtain_open = true;
        state.sound_value = 1.0;
        state.updated_at = now + Duration::seconds(5);
        repo.upsert(&state).await.unwrap();

        let found = repo.find_by_device_id("esp32-kitchen").await.unwrap().unwrap();
        assert!(found.curtain_open);
        assert_eq!(found.sound_value, 1.0);
        assert_eq!(found.updated_at, state.updated_at);

        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_unknown_device() {
        let storage = setup_test_db().await;
        let repo = DeviceStateRepository::new(storage.clone());

        assert!(repo.find_by_device_id("missing").await.unwrap().is_none());
        assert!(repo.find_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_latest_picks_most_recent_report() {
        let storage = setup_test_db().await;
        let repo = DeviceStateRepository::new(storage.clone());

        let now = OffsetDateTime::now_utc();
        create_test_device_state(storage.clone(), "esp32-a", false, true, now - Duration::minutes(3)).await;
        create_test_device_state(storage.clone(), "esp32-b", true, false, now).await;
        create_test_device_state(storage.clone(), "esp32-c", false, false, now - Duration::hours(1)).await;

        let latest = repo.find_latest().await.unwrap().unwrap();
        assert_eq!(latest.device_id, "esp32-b");

        let all = repo.find_all().await.unwrap();
        let ids: Vec<_> = all.iter().map(|s| s.device_id.as_str()).collect();
        assert_eq!(ids, vec!["esp32-a", "esp32-b", "esp32-c"]);
    }
}
