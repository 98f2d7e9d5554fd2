use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use veilsync_server::app::create_router;
use veilsync_server::configs::{History, Storage};
use veilsync_server::repositories::{DeviceStateRepository, HistoryEventRepository};
use veilsync_server::services::{CommandService, IngestDispatcher, IngestService, QueryService};
use veilsync_server::tests::{MockBehaviour, MockChannel, setup_test_db, test_topics};

pub struct MockApp {
    pub storage: Arc<Storage>,
    pub channel: Arc<MockChannel>,
    pub router: Router,
    history: History,
}

impl MockApp {
    pub async fn new() -> Self {
        let storage = setup_test_db().await;
        let channel = Arc::new(MockChannel::new(MockBehaviour::Accept));
        let history = History::default();
        let router = Self::build_router(storage.clone(), channel.clone(), history.clone());

        Self {
            storage,
            channel,
            router,
            history,
        }
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.router = Self::build_router(self.storage.clone(), self.channel.clone(), history.clone());
        self.history = history;
        self
    }

    pub fn with_behaviour(mut self, behaviour: MockBehaviour) -> Self {
        self.channel = Arc::new(MockChannel::new(behaviour));
        self.router = Self::build_router(self.storage.clone(), self.channel.clone(), self.history.clone());
        self
    }

    /// Ingestion pipeline writing into the same storage the router reads.
    pub fn dispatcher(&self, shards: usize) -> IngestDispatcher {
        let service = Arc::new(IngestService::new(
            Arc::new(DeviceStateRepository::new(self.storage.clone())),
            Arc::new(HistoryEventRepository::new(self.storage.clone())),
            Duration::from_secs(5),
        ));

        IngestDispatcher::spawn(service, shards, 16)
    }

    fn build_router(storage: Arc<Storage>, channel: Arc<MockChannel>, history: History) -> Router {
        let query_service = Arc::new(QueryService::new(
            Arc::new(DeviceStateRepository::new(storage.clone())),
            Arc::new(HistoryEventRepository::new(storage)),
            history,
        ));
        let command_service = Arc::new(CommandService::new(
            channel,
            test_topics(),
            Duration::from_millis(100),
        ));

        create_router(query_service, command_service)
    }
}
