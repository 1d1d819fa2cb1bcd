use crate::error::CliError;
use async_trait::async_trait;
use connectors::{
    erp::auth::ErpAuthenticator,
    sql::mysql::adapter::{MySqlAdapter, MySqlConnectParams},
};
use engine_config::settings::erp::ErpSettings;
use std::str::FromStr;
use tracing::{error, info};

/// What kind of connection to check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionTarget {
    MySql,
    Erp,
}

impl FromStr for ConnectionTarget {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(ConnectionTarget::MySql),
            "erp" | "sankhya" => Ok(ConnectionTarget::Erp),
            other => Err(CliError::InvalidTarget(other.to_string())),
        }
    }
}

/// Trait for "pinging" a collaborator
#[async_trait]
pub trait ConnectionPinger {
    /// Attempts to ping; returns Err if unreachable
    async fn ping(&self) -> Result<(), CliError>;
}

pub struct MySqlConnectionPinger {
    pub params: MySqlConnectParams,
}

pub struct ErpConnectionPinger {
    pub settings: ErpSettings,
}

#[async_trait]
impl ConnectionPinger for MySqlConnectionPinger {
    async fn ping(&self) -> Result<(), CliError> {
        let target = format!("{}:{}", self.params.host, self.params.port);
        info!("Pinging MySQL at '{}'", target);

        let mut adapter = MySqlAdapter::connect(&self.params).await.map_err(|e| {
            error!("MySQL connection to '{}' failed: {}", target, e);
            e
        })?;

        let result = adapter.ping().await;
        if let Err(e) = adapter.close().await {
            error!("Failed to close MySQL connection: {}", e);
        }
        result.map_err(|e| {
            error!("MySQL ping to '{}' failed: {}", target, e);
            e
        })?;

        info!("MySQL ping to '{}' succeeded", target);
        Ok(())
    }
}

#[async_trait]
impl ConnectionPinger for ErpConnectionPinger {
    async fn ping(&self) -> Result<(), CliError> {
        let url = &self.settings.credentials.auth_url;
        info!("Requesting ERP bearer token from '{}'", url);

        let http = reqwest::Client::builder().build()?;
        ErpAuthenticator::new(http, self.settings.credentials.clone())
            .authenticate()
            .await
            .map_err(|e| {
                error!("ERP authentication at '{}' failed: {}", url, e);
                e
            })?;

        info!("ERP authentication at '{}' succeeded", url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_targets() {
        assert_eq!(
            "MySQL".parse::<ConnectionTarget>().unwrap(),
            ConnectionTarget::MySql
        );
        assert_eq!(
            "erp".parse::<ConnectionTarget>().unwrap(),
            ConnectionTarget::Erp
        );
        assert!(matches!(
            "ftp".parse::<ConnectionTarget>(),
            Err(CliError::InvalidTarget(t)) if t == "ftp"
        ));
    }
}
