use crate::error::SinkError;
use async_trait::async_trait;
use connectors::erp::auth::{BearerToken, ErpAuthenticator};

/// Issues bearer credentials for the upsert endpoint.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<BearerToken, SinkError>;
}

#[async_trait]
impl CredentialProvider for ErpAuthenticator {
    async fn bearer_token(&self) -> Result<BearerToken, SinkError> {
        Ok(self.authenticate().await?)
    }
}
