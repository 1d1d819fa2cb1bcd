use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Reference source answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode reference payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload decoded but is not a JSON array.
    #[error("Unexpected reference payload: expected a JSON array, got {0}")]
    Malformed(String),
}
