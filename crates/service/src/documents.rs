//! Read-only flat-file documents served next to the record store: the
//! master question bank and the master configuration.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::storage::json_document::JsonDocument;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSummary {
    pub total: usize,
    pub version: Option<Value>,
    pub last_update: Option<Value>,
}

/// `master-questions.json`, served verbatim.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    doc: JsonDocument,
}

impl QuestionBank {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { doc: JsonDocument::new(path) }
    }

    pub async fn read(&self) -> Option<Value> {
        self.doc.read().await
    }

    pub async fn summary(&self) -> QuestionSummary {
        summarize_questions(self.read().await.as_ref())
    }
}

pub fn summarize_questions(bank: Option<&Value>) -> QuestionSummary {
    match bank {
        Some(bank) => QuestionSummary {
            total: bank.get("questions").and_then(Value::as_array).map_or(0, Vec::len),
            version: bank.get("version").cloned(),
            last_update: bank.get("lastUpdate").cloned(),
        },
        None => QuestionSummary { total: 0, version: None, last_update: None },
    }
}

/// `master-config.json`. The stored LLM key never leaves the server.
#[derive(Debug, Clone)]
pub struct MasterConfig {
    doc: JsonDocument,
}

impl MasterConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { doc: JsonDocument::new(path) }
    }

    pub async fn read_redacted(&self) -> Option<Value> {
        let mut config = self.doc.read().await?;
        redact_api_key(&mut config);
        Some(config)
    }

    pub async fn version(&self) -> Option<Value> {
        self.doc.read().await.and_then(|c| c.get("version").cloned())
    }
}

/// Blank `apiConfig.key` when `apiConfig` is an object.
pub fn redact_api_key(config: &mut Value) {
    if let Some(api) = config.get_mut("apiConfig").and_then(Value::as_object_mut) {
        api.insert("key".to_string(), Value::String(String::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redaction_only_touches_api_key() {
        let mut cfg = json!({"version": "3", "apiConfig": {"url": "u", "key": "sk-secret"}});
        redact_api_key(&mut cfg);
        assert_eq!(cfg, json!({"version": "3", "apiConfig": {"url": "u", "key": ""}}));

        let mut no_api = json!({"version": "3"});
        redact_api_key(&mut no_api);
        assert_eq!(no_api, json!({"version": "3"}));

        let mut odd = json!({"apiConfig": "inline"});
        redact_api_key(&mut odd);
        assert_eq!(odd, json!({"apiConfig": "inline"}));
    }

    #[test]
    fn question_summary_counts_questions() {
        let bank = json!({"version": "1.0", "lastUpdate": "2024-03-01", "questions": [{}, {}, {}]});
        let s = summarize_questions(Some(&bank));
        assert_eq!(s.total, 3);
        assert_eq!(s.version, Some(json!("1.0")));
        assert_eq!(s.last_update, Some(json!("2024-03-01")));

        assert_eq!(summarize_questions(None).total, 0);
        assert_eq!(summarize_questions(Some(&json!({"version": 2}))).total, 0);
    }

    #[tokio::test]
    async fn master_config_file_is_redacted() -> Result<(), anyhow::Error> {
        let path = std::env::temp_dir().join(format!("master_config_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, br#"{"version": "7", "apiConfig": {"key": "sk-1"}}"#).await?;
        let cfg = MasterConfig::new(&path);
        assert_eq!(cfg.read_redacted().await, Some(json!({"version": "7", "apiConfig": {"key": ""}})));
        assert_eq!(cfg.version().await, Some(json!("7")));
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
