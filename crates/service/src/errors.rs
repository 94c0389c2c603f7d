use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Payload could not be read as the expected JSON shape.
    #[error("input format error: {0}")]
    InputFormat(String),
    /// The collection could not be written back.
    #[error("save failed: {0}")]
    SaveFailed(String),
}
