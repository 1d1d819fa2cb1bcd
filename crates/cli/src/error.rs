use connectors::{
    erp::error::ErpError,
    sql::base::error::{ConnectorError, DbError},
};
use engine_config::error::ConfigError;
use engine_runtime::error::RunError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read or write a file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid env file: {0}")]
    EnvFile(String),

    #[error("Configuration error: {0}")]
    Settings(#[from] ConfigError),

    #[error("Sync run failed: {0}")]
    Runner(#[from] RunError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Invalid connection target provided: {0}")]
    InvalidTarget(String),

    /// MySQL connection error.
    #[error("MySQL connection error: {0}")]
    Connector(#[from] ConnectorError),

    /// MySQL query error.
    #[error("MySQL error: {0}")]
    Db(#[from] DbError),

    #[error("ERP error: {0}")]
    Erp(#[from] ErpError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
