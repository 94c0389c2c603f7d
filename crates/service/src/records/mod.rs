//! Exam-attempt records: the schema-agnostic record value, the ordered
//! collection with upsert/merge semantics, and the store that wraps every
//! mutation in a load → mutate → save cycle against a persistence backend.

pub mod model;
pub mod collection;
pub mod backend;
pub mod store;

pub use backend::RecordBackend;
pub use collection::{MergeSummary, RecordCollection, RecordStatus, Upserted};
pub use model::{parse_batch, parse_record, ExamRecord, RecordKey};
pub use store::{RecordStore, SubmitOutcome, SyncOutcome};
