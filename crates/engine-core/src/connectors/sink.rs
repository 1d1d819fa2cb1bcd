use crate::error::SinkError;
use async_trait::async_trait;
use connectors::erp::{auth::BearerToken, client::ErpClient};
use model::{execution::status::SubmitStatus, records::upsert::UpsertRequest};

/// Accepts upsert requests for the external system of record.
#[async_trait]
pub trait UpsertSink: Send + Sync {
    async fn upsert(
        &self,
        token: &BearerToken,
        request: &UpsertRequest,
    ) -> Result<SubmitStatus, SinkError>;
}

#[async_trait]
impl UpsertSink for ErpClient {
    async fn upsert(
        &self,
        token: &BearerToken,
        request: &UpsertRequest,
    ) -> Result<SubmitStatus, SinkError> {
        Ok(self.submit(token, request).await?)
    }
}
