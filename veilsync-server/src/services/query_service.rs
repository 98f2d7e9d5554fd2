use std::sync::Arc;

use veilsync_api::Page;

use crate::configs::History;
use crate::errors::{ApiError, CurtainError};
use crate::models::{DeviceState, HistoryEvent};
use crate::repositories::{DeviceStateRepository, HistoryEventRepository};

/// Read-only view over the state projection and the history log.
pub struct QueryService {
    device_state_repository: Arc<DeviceStateRepository>,
    history_event_repository: Arc<HistoryEventRepository>,
    history: History,
}

impl QueryService {
    pub fn new(
        device_state_repository: Arc<DeviceStateRepository>,
        history_event_repository: Arc<HistoryEventRepository>,
        history: History,
    ) -> Self {
        Self {
            device_state_repository,
            history_event_repository,
            history,
        }
    }

    pub fn default_limit(&self) -> u64 {
        self.history.default_limit
    }

    pub async fn get_latest_state(&self, device_id: &str) -> Result<DeviceState, ApiError> {
        let state = self
            .device_state_repository
            .find_by_device_id(device_id)
            .await?
            .ok_or(CurtainError::DeviceNotFound)?;

        Ok(state)
    }

    /// State of whichever device reported last.
    pub async fn get_most_recent_state(&self) -> Result<DeviceState, ApiError> {
        let state = self
            .device_state_repository
            .find_latest()
            .await?
            .ok_or(CurtainError::DeviceNotFound)?;

        Ok(state)
    }

    pub async fn list_states(&self) -> Result<Vec<DeviceState>, ApiError> {
        Ok(self.device_state_repository.find_all().await?)
    }

    /// Newest-first history. `limit` is capped at the configured maximum and
    /// a page past the end yields no documents rather than an error.
    pub async fn get_history(
        &self,
        device_id: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<Page<HistoryEvent>, ApiError> {
        let device_id = device_id.map(str::trim).filter(|id| !id.is_empty());

        if self.history.require_device_id && device_id.is_none() {
            return Err(CurtainError::MissingDeviceId.into());
        }

        if page < 1 || limit < 1 {
            return Err(CurtainError::InvalidPagination.into());
        }

        let page = page as u64;
        let limit = (limit as u64).min(self.history.max_limit);
        let offset = (page - 1).saturating_mul(limit);

        let total_docs = self.history_event_repository.count(device_id).await?;
        let docs = if offset >= total_docs {
            Vec::new()
        } else {
            self.history_event_repository
                .find_page(device_id, limit, offset)
                .await?
        };

        Ok(Page::new(docs, page, limit, total_docs))
    }
}
