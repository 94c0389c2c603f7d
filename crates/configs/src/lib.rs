use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Request body cap for the record and proxy endpoints.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: None,
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Where the flat files live. Relative `records_file` is resolved against
/// `data_dir`; the read-only documents are used as given.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_records_file")]
    pub records_file: PathBuf,
    #[serde(default = "default_questions_file")]
    pub questions_file: PathBuf,
    #[serde(default = "default_master_config_file")]
    pub master_config_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            records_file: default_records_file(),
            questions_file: default_questions_file(),
            master_config_file: default_master_config_file(),
        }
    }
}

impl StorageConfig {
    pub fn records_path(&self) -> PathBuf {
        if self.records_file.is_absolute() {
            self.records_file.clone()
        } else {
            self.data_dir.join(&self.records_file)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    /// Public URL of this proxy, advertised by `/api/apiconfig`.
    #[serde(default)]
    pub public_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            upstream_url: default_upstream_url(),
            public_url: String::new(),
            model: default_model(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminConfig {
    /// `/healthz` + `/metrics` listener; disabled when unset.
    #[serde(default)]
    pub addr: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 3001 }
fn default_max_body_bytes() -> usize { 64 * 1024 * 1024 }
fn default_data_dir() -> PathBuf { PathBuf::from("./sync-data") }
fn default_records_file() -> PathBuf { PathBuf::from("exam-records.json") }
fn default_questions_file() -> PathBuf { PathBuf::from("../local-deploy/data/master-questions.json") }
fn default_master_config_file() -> PathBuf { PathBuf::from("../local-deploy/data/master-config.json") }
fn default_upstream_url() -> String {
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation".into()
}
fn default_model() -> String { "qwen-turbo".into() }
fn default_timeout() -> u64 { 60 }
fn default_log_format() -> String { "compact".into() }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = if std::path::Path::new(&config_path()).exists() {
            load_default()?
        } else {
            AppConfig::default()
        };
        cfg.apply_env_with(|k| std::env::var(k).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Environment wins over the file for the keys the old deployments used.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(n) = lookup("MAX_BODY_BYTES").and_then(|v| v.parse::<usize>().ok()) {
            self.server.max_body_bytes = n;
        }
        if let Some(dir) = lookup("SYNC_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(key) = lookup("QWEN_API_KEY") {
            self.llm.api_key = key;
        }
        if let Some(url) = lookup("LLM_UPSTREAM_URL") {
            self.llm.upstream_url = url;
        }
        if let Some(addr) = lookup("ADMIN_ADDR") {
            self.admin.addr = Some(addr);
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.llm.validate()?;
        if let Some(addr) = &self.admin.addr {
            if addr.trim().is_empty() {
                self.admin.addr = None;
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("server.max_body_bytes must be positive"));
        }
        if let Some(0) = self.worker_threads {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        if self.records_file.as_os_str().is_empty() {
            return Err(anyhow!("storage.records_file must not be empty"));
        }
        Ok(())
    }
}

impl LlmConfig {
    fn validate(&self) -> Result<()> {
        let lower = self.upstream_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("llm.upstream_url must start with http:// or https://"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("llm.timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}
