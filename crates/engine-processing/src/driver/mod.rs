use crate::error::RecordError;
use connectors::erp::auth::BearerToken;
use engine_core::{
    connectors::sink::UpsertSink,
    metrics::{Metrics, MetricsSnapshot},
};
use model::{
    execution::{failed_row::FailedRecord, status::SubmitStatus},
    records::upsert::UpsertRequest,
};

pub mod bulk;
pub mod row;

/// What a driver hands back once every row or chunk has been visited.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub metrics: MetricsSnapshot,
    pub failures: Vec<FailedRecord>,
}

/// Sends one request and folds an ERP rejection into a `RecordError`.
pub(crate) async fn submit(
    sink: &dyn UpsertSink,
    token: &BearerToken,
    request: &UpsertRequest,
    metrics: &Metrics,
) -> Result<serde_json::Value, RecordError> {
    metrics.increment_requests(1);
    match sink.upsert(token, request).await {
        Ok(SubmitStatus::Accepted(body)) => Ok(body),
        Ok(SubmitStatus::Rejected(rejection)) => Err(RecordError::Rejected(rejection)),
        Err(err) => Err(RecordError::Submit(err)),
    }
}
