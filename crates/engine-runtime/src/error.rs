use connectors::sql::base::error::ConnectorError;
use engine_processing::error::SyncError;
use thiserror::Error;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The row source connection could not be established.
    #[error("Failed to connect to the row source: {0}")]
    Connect(#[from] ConnectorError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error(transparent)]
    Sync(#[from] SyncError),
}
