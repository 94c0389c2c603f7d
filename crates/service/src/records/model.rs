use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ServiceError;

/// Merge key of a record. Numbers compare by numeric value, so `1` and
/// `1.0` name the same record.
#[derive(Debug, Clone, Copy)]
pub enum RecordKey<'a> {
    Str(&'a str),
    Num(f64),
}

impl PartialEq for RecordKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RecordKey::Str(a), RecordKey::Str(b)) => a == b,
            (RecordKey::Num(a), RecordKey::Num(b)) => a == b,
            _ => false,
        }
    }
}

/// One exam attempt as submitted by the quiz front-end.
///
/// The value is kept verbatim (field order included); only `id`,
/// `userName` and `timestamp` are ever looked at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamRecord(Value);

impl ExamRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Merge key. String and numeric ids participate in matching; a missing,
    /// null or structured `id` leaves the record unkeyed.
    pub fn key(&self) -> Option<RecordKey<'_>> {
        match self.0.get("id")? {
            Value::String(s) => Some(RecordKey::Str(s)),
            Value::Number(n) => n.as_f64().map(RecordKey::Num),
            _ => None,
        }
    }

    /// Printable id for logs.
    pub fn id_label(&self) -> String {
        match self.0.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(v @ Value::Number(_)) => v.to_string(),
            _ => "<none>".to_string(),
        }
    }

    pub fn user_name(&self) -> Option<&str> {
        self.0.get("userName").and_then(Value::as_str)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.0.get("timestamp").and_then(Value::as_str)
    }
}

/// Parse one submitted record. Any well-formed JSON value is accepted.
pub fn parse_record(body: &[u8]) -> Result<ExamRecord, ServiceError> {
    serde_json::from_slice::<Value>(body)
        .map(ExamRecord::new)
        .map_err(|e| ServiceError::InputFormat(e.to_string()))
}

/// Parse a sync batch, which must be a JSON array.
pub fn parse_batch(body: &[u8]) -> Result<Vec<ExamRecord>, ServiceError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Array(items)) => Ok(items.into_iter().map(ExamRecord::new).collect()),
        Ok(_) => Err(ServiceError::InputFormat("sync payload must be a JSON array".into())),
        Err(e) => Err(ServiceError::InputFormat(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_only_for_string_and_number_ids() {
        assert_eq!(ExamRecord::new(json!({"id": "a1"})).key(), Some(RecordKey::Str("a1")));
        assert_eq!(ExamRecord::new(json!({"id": 7})).key(), Some(RecordKey::Num(7.0)));
        assert!(ExamRecord::new(json!({"id": null})).key().is_none());
        assert!(ExamRecord::new(json!({"id": {"x": 1}})).key().is_none());
        assert!(ExamRecord::new(json!({"userName": "li"})).key().is_none());
        assert!(ExamRecord::new(json!(42)).key().is_none());
    }

    #[test]
    fn numeric_ids_compare_by_value() {
        let int = ExamRecord::new(json!({"id": 1}));
        let float = ExamRecord::new(json!({"id": 1.0}));
        assert_eq!(int.key(), float.key());
        assert_ne!(int.key(), ExamRecord::new(json!({"id": "1"})).key());
        assert_ne!(int.key(), ExamRecord::new(json!({"id": 2})).key());
        assert_eq!(int.id_label(), "1");
    }

    #[test]
    fn accessors_read_known_fields() {
        let r = ExamRecord::new(json!({
            "id": "r-1",
            "userName": "Wang",
            "timestamp": "2024-05-01T10:00:00.000Z",
            "score": 88
        }));
        assert_eq!(r.id_label(), "r-1");
        assert_eq!(r.user_name(), Some("Wang"));
        assert_eq!(r.timestamp(), Some("2024-05-01T10:00:00.000Z"));
        assert_eq!(ExamRecord::new(json!({})).id_label(), "<none>");
    }

    #[test]
    fn parse_record_accepts_any_json_and_rejects_garbage() {
        assert!(parse_record(br#"{"score": 1}"#).is_ok());
        assert!(parse_record(b"5").is_ok());
        assert!(matches!(parse_record(b"{oops"), Err(ServiceError::InputFormat(_))));
        assert!(matches!(parse_record(b""), Err(ServiceError::InputFormat(_))));
    }

    #[test]
    fn parse_batch_requires_array() {
        let batch = parse_batch(br#"[{"id": "a"}, {"id": "b"}]"#).expect("array");
        assert_eq!(batch.len(), 2);
        assert!(matches!(parse_batch(br#"{"id": "a"}"#), Err(ServiceError::InputFormat(_))));
        assert!(matches!(parse_batch(b"[1,"), Err(ServiceError::InputFormat(_))));
    }

    #[test]
    fn field_order_survives_round_trip() {
        let text = r#"{"zeta":1,"id":"x","alpha":2}"#;
        let r = parse_record(text.as_bytes()).expect("parse");
        assert_eq!(serde_json::to_string(&r).expect("encode"), text);
    }
}
