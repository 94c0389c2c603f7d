use std::{sync::Arc, time::Duration};

use configs::AppConfig;
use service::{
    documents::{MasterConfig, QuestionBank},
    llm_proxy::LlmForwarder,
    records::RecordStore,
};

/// What `/api/apiconfig` hands out.
#[derive(Clone, Debug)]
pub struct ApiDescriptorConfig {
    pub url: String,
    pub model: String,
    pub key: String,
}

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordStore>,
    pub questions: Arc<QuestionBank>,
    pub master_config: Arc<MasterConfig>,
    pub forwarder: Arc<LlmForwarder>,
    pub api_descriptor: Arc<ApiDescriptorConfig>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let forwarder = LlmForwarder::new(cfg.llm.upstream_url.clone(), Duration::from_secs(cfg.llm.timeout_secs))?;
        let public_url = if cfg.llm.public_url.trim().is_empty() {
            format!("http://{}/api/proxy", cfg.bind_addr())
        } else {
            cfg.llm.public_url.clone()
        };
        Ok(Self {
            records: RecordStore::json_file(cfg.storage.records_path()),
            questions: Arc::new(QuestionBank::new(cfg.storage.questions_file.clone())),
            master_config: Arc::new(MasterConfig::new(cfg.storage.master_config_file.clone())),
            forwarder: Arc::new(forwarder),
            api_descriptor: Arc::new(ApiDescriptorConfig {
                url: public_url,
                model: cfg.llm.model.clone(),
                key: cfg.llm.api_key.clone(),
            }),
            max_body_bytes: cfg.server.max_body_bytes,
        })
    }
}
