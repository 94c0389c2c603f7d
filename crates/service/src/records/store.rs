use std::{path::PathBuf, sync::Arc};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::{
    backend::RecordBackend,
    collection::{RecordCollection, RecordStatus, Upserted},
    model::ExamRecord,
};
use crate::{errors::ServiceError, metrics, storage::json_list_store::{JsonListFile, LoadOutcome}};

/// Result of submitting a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub replaced: bool,
    pub total: usize,
}

/// Result of merging a sync batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub processed: usize,
    pub inserted: usize,
    pub replaced: usize,
    pub total: usize,
}

/// Exam record store over a persistence backend.
///
/// Every call loads the full collection; mutations save it back in full.
/// Mutating calls hold `write_lock` for the whole load → mutate → save cycle,
/// so two writers going through the same store never drop each other's
/// update. Other processes writing the same file are not coordinated with.
pub struct RecordStore {
    backend: Arc<dyn RecordBackend>,
    write_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn RecordBackend>) -> Arc<Self> {
        Arc::new(Self { backend, write_lock: Mutex::new(()) })
    }

    /// Store persisted as a pretty-printed JSON array at `path`.
    pub fn json_file<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        Self::new(Arc::new(JsonListFile::<ExamRecord>::new(path)))
    }

    /// Read the persisted collection. Never fails: a missing file is an empty
    /// collection, an unreadable one is logged and treated the same.
    pub async fn load(&self) -> RecordCollection {
        let outcome = self.backend.load().await;
        if let LoadOutcome::Unreadable(reason) = &outcome {
            metrics::LOAD_FAILURES_TOTAL.inc();
            warn!(backend = %self.backend.describe(), %reason, "exam records unreadable; using empty collection");
        }
        RecordCollection::from_records(outcome.into_items())
    }

    /// Write the collection back. `false` on failure.
    pub async fn save(&self, collection: &RecordCollection) -> bool {
        let ok = self.backend.save(collection.records()).await;
        if !ok {
            metrics::SAVE_FAILURES_TOTAL.inc();
        }
        ok
    }

    pub async fn list(&self) -> RecordCollection {
        self.load().await
    }

    pub async fn status(&self) -> RecordStatus {
        self.load().await.status()
    }

    /// Upsert one record and persist.
    pub async fn submit(&self, record: ExamRecord) -> Result<SubmitOutcome, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.load().await;

        let id = record.id_label();
        let user = record.user_name().unwrap_or("anonymous").to_string();
        let upserted = collection.upsert(record);

        if !self.save(&collection).await {
            return Err(ServiceError::SaveFailed(self.backend.describe()));
        }

        let replaced = matches!(upserted, Upserted::Replaced { .. });
        if replaced {
            metrics::RECORDS_REPLACED_TOTAL.inc();
            info!(%id, total = collection.len(), "exam record updated");
        } else {
            metrics::RECORDS_INSERTED_TOTAL.inc();
            info!(%id, %user, total = collection.len(), "exam record added");
        }
        Ok(SubmitOutcome { replaced, total: collection.len() })
    }

    /// Merge a batch in order and persist.
    pub async fn sync(&self, batch: Vec<ExamRecord>) -> Result<SyncOutcome, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut collection = self.load().await;
        let summary = collection.merge(batch);

        if !self.save(&collection).await {
            return Err(ServiceError::SaveFailed(self.backend.describe()));
        }

        metrics::SYNC_BATCHES_TOTAL.inc();
        metrics::RECORDS_INSERTED_TOTAL.inc_by(summary.inserted as u64);
        metrics::RECORDS_REPLACED_TOTAL.inc_by(summary.replaced as u64);
        info!(
            processed = summary.processed,
            inserted = summary.inserted,
            replaced = summary.replaced,
            total = collection.len(),
            "exam records synced"
        );
        Ok(SyncOutcome {
            processed: summary.processed,
            inserted: summary.inserted,
            replaced: summary.replaced,
            total: collection.len(),
        })
    }
}
