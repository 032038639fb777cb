use thiserror::Error;

/// Errors surfaced by the relay transport and snapshot handling.
#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed frame: {0}")]
    Frame(String),

    #[error("invalid message payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("inconsistent snapshot: {0}")]
    Snapshot(String),
}
