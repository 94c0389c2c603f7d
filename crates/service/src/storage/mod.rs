//! Storage abstractions for service layer
//!
//! File-backed stores that keep a whole JSON document in one flat file and
//! rewrite it in full on every save.

pub mod json_list_store;
pub mod json_document;
