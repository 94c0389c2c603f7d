use serde::{Deserialize, Serialize};
use super::model::{ExamRecord, RecordKey};

/// Ordered exam records with at most one record per key.
///
/// Lookups are a linear scan; collections are expected to stay in the
/// tens-to-thousands range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordCollection {
    records: Vec<ExamRecord>,
}

/// What `upsert` did with the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Inserted,
    Replaced { index: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub processed: usize,
    pub inserted: usize,
    pub replaced: usize,
}

/// Aggregate view reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStatus {
    pub total: usize,
    #[serde(rename = "lastTimestamp")]
    pub last_timestamp: Option<String>,
}

impl RecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ExamRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ExamRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExamRecord> {
        self.records.iter()
    }

    pub fn position_of(&self, key: RecordKey<'_>) -> Option<usize> {
        self.records.iter().position(|r| r.key() == Some(key))
    }

    /// Replace the record with the same key in place, or append it.
    /// Unkeyed records are always appended.
    pub fn upsert(&mut self, record: ExamRecord) -> Upserted {
        let existing = record.key().and_then(|key| self.position_of(key));
        match existing {
            Some(index) => {
                self.records[index] = record;
                Upserted::Replaced { index }
            }
            None => {
                self.records.push(record);
                Upserted::Inserted
            }
        }
    }

    /// Upsert each record in order; later records see earlier ones.
    pub fn merge<I>(&mut self, batch: I) -> MergeSummary
    where
        I: IntoIterator<Item = ExamRecord>,
    {
        let mut summary = MergeSummary::default();
        for record in batch {
            summary.processed += 1;
            match self.upsert(record) {
                Upserted::Inserted => summary.inserted += 1,
                Upserted::Replaced { .. } => summary.replaced += 1,
            }
        }
        summary
    }

    pub fn status(&self) -> RecordStatus {
        RecordStatus {
            total: self.records.len(),
            last_timestamp: self.records.last().and_then(|r| r.timestamp()).map(str::to_owned),
        }
    }
}
