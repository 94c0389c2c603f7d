use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static RECORDS_INSERTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "exam_sync_records_inserted_total",
        "Exam records appended to the store"
    )
    .expect("register records_inserted_total")
});

pub static RECORDS_REPLACED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "exam_sync_records_replaced_total",
        "Exam records replaced in place by id"
    )
    .expect("register records_replaced_total")
});

pub static SYNC_BATCHES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "exam_sync_batches_total",
        "Batch sync requests merged into the store"
    )
    .expect("register batches_total")
});

pub static SAVE_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "exam_sync_save_failures_total",
        "Record collection writes that failed"
    )
    .expect("register save_failures_total")
});

pub static LOAD_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "exam_sync_load_failures_total",
        "Record collection reads that fell back to an empty list"
    )
    .expect("register load_failures_total")
});

pub static PROXY_FORWARDS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "exam_sync_proxy_forwards_total",
        "Prompts forwarded to the LLM upstream"
    )
    .expect("register proxy_forwards_total")
});

pub static PROXY_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "exam_sync_proxy_errors_total",
        "LLM forwards that ended in an error response"
    )
    .expect("register proxy_errors_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_text_output() {
        RECORDS_INSERTED_TOTAL.inc();
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("exam_sync_records_inserted_total"));
    }
}
