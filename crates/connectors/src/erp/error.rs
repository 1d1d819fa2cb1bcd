use thiserror::Error;

/// Errors raised while talking to the ERP gateway.
#[derive(Debug, Error)]
pub enum ErpError {
    /// The request never produced a response (connect, timeout, I/O).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The authentication endpoint answered with a non-200 status.
    #[error("Authentication failed: {status} - {body}")]
    Auth { status: u16, body: String },

    /// The authentication response carried no usable bearer token.
    #[error("Bearer token not found in authentication response")]
    MissingToken,

    /// A 200 response whose body is not valid JSON.
    #[error("Failed to decode ERP response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The request could not be rendered to the wire format.
    #[error("Failed to encode request: {0}")]
    Wire(#[from] WireError),
}

#[derive(Debug, Error, PartialEq)]
pub enum WireError {
    #[error("Request has no records")]
    Empty,

    #[error("Record {index} does not share the field layout of the first record")]
    FieldMismatch { index: usize },

    #[error("Field '{field}' expects {expected}, got {value}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        value: String,
    },
}
