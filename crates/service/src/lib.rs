//! Service layer for the exam sync server.
//! - `records`: exam-attempt records, upsert/merge and the file-backed store.
//! - `documents`: read-only question bank and master config.
//! - `llm_proxy`: single-attempt forwarder to the text-generation API.
//! - `metrics`: Prometheus counters shared by the above.

pub mod errors;
pub mod storage;
pub mod records;
pub mod documents;
pub mod sync_status;
pub mod llm_proxy;
pub mod metrics;
