use crate::erp::{
    auth::BearerToken,
    error::ErpError,
    wire::{classify_response, encode},
};
use model::{execution::status::SubmitStatus, records::upsert::UpsertRequest};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Posts `DatasetSP.save` requests to the ERP gateway.
pub struct ErpClient {
    http: Client,
    api_url: String,
    timeout: Option<Duration>,
}

impl ErpClient {
    pub fn new(http: Client, api_url: &str) -> Self {
        Self {
            http,
            api_url: api_url.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends one request. `Ok(Rejected)` when the ERP answered but refused;
    /// `Err` when no interpretable answer was obtained.
    pub async fn submit(
        &self,
        token: &BearerToken,
        request: &UpsertRequest,
    ) -> Result<SubmitStatus, ErpError> {
        let envelope = encode(request)?;

        debug!(
            entity = %request.target.entity_name,
            records = request.len(),
            "Posting upsert request"
        );

        let mut builder = self
            .http
            .post(&self.api_url)
            .bearer_auth(token.as_str())
            .json(&envelope);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        classify_response(status, &body)
    }
}
