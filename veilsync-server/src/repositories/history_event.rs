use std::sync::Arc;

use sqlx::{Error, Pool, Sqlite};

use crate::configs::Storage;
use crate::models::HistoryEvent;

#[derive(Clone)]
pub struct HistoryEventRepository {
    storage: Arc<Storage>,
}

impl HistoryEventRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl HistoryEventRepository {
    pub async fn create(&self, item: &HistoryEvent) -> Result<i64, Error> {
        let id = sqlx::query(
            r#"
            INSERT INTO history_events (device_id, mode, state, method, time)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&item.device_id)
        .bind(&item.mode)
        .bind(&item.state)
        .bind(&item.method)
        .bind(item.time)
        .execute(self.storage.get_pool())
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<HistoryEvent>, Error> {
        let event: Option<HistoryEvent> =
            sqlx::query_as("SELECT * FROM history_events WHERE id = $1")
                .bind(id)
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(event)
    }

    /// Newest first; ties on `time` fall back to insertion order.
    pub async fn find_page(
        &self,
        device_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<HistoryEvent>, Error> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let events: Vec<HistoryEvent> = match device_id {
            Some(device_id) => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM history_events
                    WHERE device_id = $1
                    ORDER BY time DESC, id DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(device_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(self.storage.get_pool())
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM history_events
                    ORDER BY time DESC, id DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(self.storage.get_pool())
                .await?
            }
        };

        Ok(events)
    }

    pub async fn count(&self, device_id: Option<&str>) -> Result<u64, Error> {
        let (count,): (i64,) = match device_id {
            Some(device_id) => {
                sqlx::query_as("SELECT COUNT(*) FROM history_events WHERE device_id = $1")
                    .bind(device_id)
                    .fetch_one(self.storage.get_pool())
                    .await?
            }
            None => {
                sqlx::query_as("SELECT COUNT(*) FROM history_events")
                    .fetch_one(self.storage.get_pool())
                    .await?
            }
        };

        Ok(count.max(0) as u64)
    }
}
