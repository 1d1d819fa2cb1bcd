use super::vars::VarReader;
use crate::error::ConfigError;
use connectors::reference::ibge::IBGE_MUNICIPIOS_URL;
use std::time::Duration;

pub const SOURCE_URL: &str = "IBGE_MUNICIPIOS_URL";
pub const CHUNK_SIZE: &str = "SYNC_CHUNK_SIZE";
pub const AUTH_TIMEOUT: &str = "SYNC_AUTH_TIMEOUT_SECS";
pub const UPLOAD_TIMEOUT: &str = "SYNC_UPLOAD_TIMEOUT_SECS";

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 120;

/// Settings of the bulk reference load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkSettings {
    pub source_url: String,
    pub chunk_size: usize,
    pub auth_timeout: Duration,
    /// Applies to both the batch upload and the reference fetch.
    pub upload_timeout: Duration,
}

impl Default for BulkSettings {
    fn default() -> Self {
        BulkSettings {
            source_url: IBGE_MUNICIPIOS_URL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            auth_timeout: Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
            upload_timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
        }
    }
}

impl BulkSettings {
    pub(crate) fn read(vars: &VarReader<'_>) -> Result<Self, ConfigError> {
        let chunk_size = vars.parsed_or(CHUNK_SIZE, DEFAULT_CHUNK_SIZE)?;
        validate_chunk_size(chunk_size)?;

        Ok(BulkSettings {
            source_url: vars
                .optional(SOURCE_URL)
                .unwrap_or_else(|| IBGE_MUNICIPIOS_URL.to_string()),
            chunk_size,
            auth_timeout: Duration::from_secs(
                vars.parsed_or(AUTH_TIMEOUT, DEFAULT_AUTH_TIMEOUT_SECS)?,
            ),
            upload_timeout: Duration::from_secs(
                vars.parsed_or(UPLOAD_TIMEOUT, DEFAULT_UPLOAD_TIMEOUT_SECS)?,
            ),
        })
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self, ConfigError> {
        validate_chunk_size(chunk_size)?;
        self.chunk_size = chunk_size;
        Ok(self)
    }
}

fn validate_chunk_size(chunk_size: usize) -> Result<(), ConfigError> {
    if chunk_size == 0 {
        return Err(ConfigError::Invalid {
            key: CHUNK_SIZE.to_string(),
            value: chunk_size.to_string(),
        });
    }
    Ok(())
}
