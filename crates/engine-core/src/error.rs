use connectors::{
    erp::error::ErpError, reference::error::ReferenceError, sql::base::error::DbError,
};
use thiserror::Error;

/// Failures reading pending rows or reference data, or updating markers.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Reference source error: {0}")]
    Reference(#[from] ReferenceError),

    /// `WHERE key = NULL` matches nothing, so the row cannot be marked.
    #[error("Row of '{entity}' has no value in key column '{column}'")]
    MissingRowKey { entity: String, column: String },

    #[error("Source error: {0}")]
    Other(String),
}

/// Failures obtaining credentials or delivering upserts.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("ERP error: {0}")]
    Erp(#[from] ErpError),

    #[error("Sink error: {0}")]
    Other(String),
}
