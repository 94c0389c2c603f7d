use async_trait::async_trait;

use super::model::ExamRecord;
use crate::storage::json_list_store::{JsonListFile, LoadOutcome};

/// Persistence seam for the record store.
/// Implementations load and save the whole list; they never fail the caller.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    async fn load(&self) -> LoadOutcome<ExamRecord>;
    async fn save(&self, records: &[ExamRecord]) -> bool;
    fn describe(&self) -> String;
}

#[async_trait]
impl RecordBackend for JsonListFile<ExamRecord> {
    async fn load(&self) -> LoadOutcome<ExamRecord> {
        JsonListFile::load(self).await
    }

    async fn save(&self, records: &[ExamRecord]) -> bool {
        JsonListFile::save(self, records).await
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}
