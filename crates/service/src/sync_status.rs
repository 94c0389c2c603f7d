use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::{
    documents::{MasterConfig, QuestionBank, QuestionSummary},
    records::RecordStore,
};

#[derive(Debug, Clone, Serialize)]
pub struct RecordsSection {
    pub total: usize,
    pub last_record: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigSection {
    pub version: Option<Value>,
}

/// Combined view over the record store and the served documents.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub server_time: String,
    pub exam_records: RecordsSection,
    pub questions: QuestionSummary,
    pub config: ConfigSection,
}

pub async fn collect(records: &RecordStore, questions: &QuestionBank, config: &MasterConfig) -> SyncStatus {
    let status = records.status().await;
    SyncStatus {
        server_time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        exam_records: RecordsSection { total: status.total, last_record: status.last_timestamp },
        questions: questions.summary().await,
        config: ConfigSection { version: config.version().await },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ExamRecord;
    use serde_json::json;

    #[tokio::test]
    async fn collect_with_nothing_on_disk() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("sync_status_{}", uuid::Uuid::new_v4()));
        let records = RecordStore::json_file(dir.join("records.json"));
        let status = collect(&records, &QuestionBank::new(dir.join("q.json")), &MasterConfig::new(dir.join("c.json"))).await;

        let v = serde_json::to_value(&status)?;
        assert_eq!(v["exam_records"], json!({"total": 0, "last_record": null}));
        assert_eq!(v["questions"], json!({"total": 0, "version": null, "last_update": null}));
        assert_eq!(v["config"], json!({"version": null}));
        assert!(v["server_time"].as_str().is_some_and(|t| t.ends_with('Z')));
        Ok(())
    }

    #[tokio::test]
    async fn collect_reports_last_record_timestamp() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("sync_status_{}", uuid::Uuid::new_v4()));
        let records = RecordStore::json_file(dir.join("records.json"));
        records.submit(ExamRecord::new(json!({"id": "1", "timestamp": "2024-06-01T08:00:00.000Z"}))).await?;
        tokio::fs::write(dir.join("q.json"), br#"{"version": "2", "questions": [1, 2]}"#).await?;

        let status = collect(&records, &QuestionBank::new(dir.join("q.json")), &MasterConfig::new(dir.join("c.json"))).await;
        assert_eq!(status.exam_records.total, 1);
        assert_eq!(status.exam_records.last_record.as_deref(), Some("2024-06-01T08:00:00.000Z"));
        assert_eq!(status.questions.total, 2);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
