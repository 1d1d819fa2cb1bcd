use engine_core::error::{SinkError, SourceError};
use model::execution::{failed_row::FailureStage, status::Rejection};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Column '{0}' is missing from the row")]
    MissingColumn(String),

    #[error("Column '{column}' does not hold a JSON array: {reason}")]
    NotAnArray { column: String, reason: String },
}

/// A failure confined to one row or item. Logged and tallied; the run goes on.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Authentication failed: {0}")]
    Authenticate(#[source] SinkError),

    #[error("Failed to build payload: {0}")]
    Project(#[from] TransformError),

    #[error("Submission failed: {0}")]
    Submit(#[source] SinkError),

    #[error("Rejected by ERP: {0}")]
    Rejected(Rejection),

    #[error("Failed to set integration marker: {0}")]
    Mark(#[source] SourceError),
}

impl RecordError {
    pub fn stage(&self) -> FailureStage {
        match self {
            RecordError::Authenticate(_) => FailureStage::Authenticate,
            RecordError::Project(_) => FailureStage::Project,
            RecordError::Submit(_) => FailureStage::Submit,
            RecordError::Rejected(_) => FailureStage::Rejected,
            RecordError::Mark(_) => FailureStage::Mark,
        }
    }
}

/// A failure that aborts the run before any row or chunk is processed.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to fetch pending rows for '{entity}': {source}")]
    Fetch {
        entity: String,
        #[source]
        source: SourceError,
    },

    #[error("Failed to authenticate for '{entity}': {source}")]
    Authenticate {
        entity: String,
        #[source]
        source: SinkError,
    },

    #[error("Failed to fetch reference list for '{entity}': {source}")]
    Reference {
        entity: String,
        #[source]
        source: SourceError,
    },
}
