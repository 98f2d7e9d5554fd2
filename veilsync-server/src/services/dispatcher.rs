use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use veilsync_api::TelemetryPayload;

use crate::errors::IngestError;
use crate::services::{IngestService, decode_telemetry};

/// Routes telemetry to a fixed set of sequential workers.
///
/// Every identifier hashes to exactly one shard, so messages for one device
/// are processed one at a time and in arrival order while different devices
/// proceed in parallel.
pub struct IngestDispatcher {
    shards: Vec<mpsc::Sender<TelemetryPayload>>,
    workers: Vec<JoinHandle<()>>,
}

impl IngestDispatcher {
    pub fn spawn(service: Arc<IngestService>, shards: usize, queue_capacity: usize) -> Self {
        let shard_count = shards.max(1);
        let mut senders = Vec::with_capacity(shard_count);
        let mut workers = Vec::with_capacity(shard_count);

        for shard in 0..shard_count {
            let (tx, mut rx) = mpsc::channel::<TelemetryPayload>(queue_capacity.max(1));
            let service = service.clone();

            workers.push(tokio::spawn(async move {
                while let Some(telemetry) = rx.recv().await {
                    let device_id = telemetry.device_id.clone();
                    if let Err(e) = service.process(telemetry).await {
                        error!(shard, device_id = %device_id, "Telemetry dropped: {}", e);
                    }
                }

                debug!("ingest shard {} stopped", shard);
            }));
            senders.push(tx);
        }

        Self {
            shards: senders,
            workers,
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn shard_for(&self, device_id: &str) -> usize {
        shard_index(device_id, self.shards.len())
    }

    /// Decodes a raw message and hands it to its shard without waiting.
    ///
    /// A saturated shard drops the message instead of stalling the caller, so
    /// one slow device never holds back telemetry for the others.
    pub fn dispatch(&self, payload: &[u8]) -> Result<(), IngestError> {
        match decode_telemetry(payload) {
            Ok(telemetry) => self.enqueue(telemetry),
            Err(e) => {
                warn!(
                    payload = %String::from_utf8_lossy(payload),
                    "Dropping telemetry: {}", e
                );
                Err(e.into())
            }
        }
    }

    pub fn enqueue(&self, telemetry: TelemetryPayload) -> Result<(), IngestError> {
        let shard = self.shard_for(&telemetry.device_id);

        match self.shards[shard].try_send(telemetry) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(telemetry)) => {
                warn!(shard, device_id = %telemetry.device_id, "Ingest shard is saturated, telemetry dropped");
                Err(IngestError::QueueFull(shard))
            }
            Err(TrySendError::Closed(telemetry)) => {
                error!(shard, device_id = %telemetry.device_id, "Ingest shard is gone, telemetry dropped");
                Err(IngestError::ShardClosed(shard))
            }
        }
    }

    /// Stops accepting telemetry and waits until every queued message is processed.
    pub async fn close(self) {
        drop(self.shards);

        for worker in self.workers {
            if let Err(e) = worker.await {
                error!("Ingest worker terminated abnormally: {}", e);
            }
        }
    }
}

fn shard_index(device_id: &str, shards: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    device_id.hash(&mut hasher);

    (hasher.finish() % shards.max(1) as u64) as usize
}
