use crate::error::SourceError;
use async_trait::async_trait;
use connectors::reference::ibge::MunicipalityClient;
use model::entity::reference::ReferenceItem;

/// Read-only provider of a reference list loaded in bulk.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ReferenceItem>, SourceError>;
}

#[async_trait]
impl ReferenceSource for MunicipalityClient {
    async fn fetch(&self) -> Result<Vec<ReferenceItem>, SourceError> {
        Ok(MunicipalityClient::fetch(self).await?)
    }
}
