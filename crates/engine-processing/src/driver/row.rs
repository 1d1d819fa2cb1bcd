use crate::{
    dedup::{CanonicalOutcome, DedupSet},
    driver::{SyncOutcome, submit},
    error::{RecordError, SyncError},
    transform::projection::project,
};
use connectors::erp::auth::BearerToken;
use engine_config::settings::policy::TokenPolicy;
use engine_core::{
    connectors::{auth::CredentialProvider, sink::UpsertSink, source::RowSource},
    metrics::Metrics,
};
use model::{
    core::value::Value,
    entity::SyncEntity,
    execution::failed_row::FailedRecord,
    records::{row::RowData, upsert::UpsertRequest},
};
use tracing::{debug, info, warn};

/// Pushes the pending rows of one entity to the ERP, one row at a time.
///
/// Rows are visited in source order. The first row carrying a natural key is
/// submitted; later rows with the same key never send a request. They are
/// marked integrated when that first submission was accepted and left pending
/// otherwise. A row is marked only after every request built from it was
/// accepted, and the mark is durable before the next row starts. Failures are
/// confined to the row that raised them.
pub struct RowSyncDriver<'a> {
    entity: &'a SyncEntity,
    source: &'a mut dyn RowSource,
    credentials: &'a dyn CredentialProvider,
    sink: &'a dyn UpsertSink,
    token_policy: TokenPolicy,
    cached_token: Option<BearerToken>,
    metrics: Metrics,
    failures: Vec<FailedRecord>,
}

impl<'a> RowSyncDriver<'a> {
    pub fn new(
        entity: &'a SyncEntity,
        source: &'a mut dyn RowSource,
        credentials: &'a dyn CredentialProvider,
        sink: &'a dyn UpsertSink,
    ) -> Self {
        Self {
            entity,
            source,
            credentials,
            sink,
            token_policy: TokenPolicy::default(),
            cached_token: None,
            metrics: Metrics::new(),
            failures: Vec::new(),
        }
    }

    pub fn with_token_policy(mut self, policy: TokenPolicy) -> Self {
        self.token_policy = policy;
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub async fn run(mut self) -> Result<SyncOutcome, SyncError> {
        let entity = self.entity;
        let rows = self
            .source
            .fetch_pending(entity)
            .await
            .map_err(|source| SyncError::Fetch {
                entity: entity.name.clone(),
                source,
            })?;

        info!(entity = %entity.name, "{} records found", rows.len());
        self.metrics.increment_found(rows.len() as u64);

        let mut seen = DedupSet::new();
        for row in rows {
            let natural_key = row.get_value(&entity.natural_key);
            let row_key = row.get_value(&entity.row_key);

            match seen.outcome_of(&natural_key) {
                Some(CanonicalOutcome::Accepted) => {
                    self.mark_duplicate(&natural_key, &row_key).await;
                    continue;
                }
                Some(CanonicalOutcome::Failed) => {
                    self.metrics.increment_duplicates(1);
                    info!(
                        entity = %entity.name,
                        key = %natural_key,
                        "Duplicate key of a record not integrated, leaving pending"
                    );
                    continue;
                }
                None => {}
            }

            match self.sync_row(&row, &row_key).await {
                Ok(()) => {
                    seen.record(&natural_key, CanonicalOutcome::Accepted);
                    self.metrics.increment_integrated(1);
                    info!(
                        entity = %entity.name,
                        key = %natural_key,
                        outcome = "ok",
                        "Record integrated"
                    );
                }
                Err(err) => {
                    seen.record(&natural_key, CanonicalOutcome::Failed);
                    self.record_failure(&natural_key, err);
                }
            }
        }

        Ok(SyncOutcome {
            metrics: self.metrics.snapshot(),
            failures: self.failures,
        })
    }

    async fn mark_duplicate(&mut self, natural_key: &Value, row_key: &Value) {
        self.metrics.increment_duplicates(1);
        info!(
            entity = %self.entity.name,
            key = %natural_key,
            "Duplicate key, marking as integrated without sending"
        );

        if let Err(err) = self.source.mark_integrated(self.entity, row_key).await {
            self.record_failure(natural_key, RecordError::Mark(err));
        }
    }

    async fn sync_row(&mut self, row: &RowData, row_key: &Value) -> Result<(), RecordError> {
        let records = project(self.entity, row)?;

        if records.is_empty() {
            debug!(entity = %self.entity.name, key = %row_key, "Nothing to send for row");
        } else {
            let token = self.token().await?;
            for record in records {
                let request = UpsertRequest::single(&self.entity.target, record);
                let response = submit(self.sink, &token, &request, &self.metrics).await?;
                debug!(
                    entity = %self.entity.name,
                    key = %row_key,
                    response = %response,
                    "ERP response"
                );
            }
        }

        self.source
            .mark_integrated(self.entity, row_key)
            .await
            .map_err(RecordError::Mark)
    }

    async fn token(&mut self) -> Result<BearerToken, RecordError> {
        if let Some(token) = &self.cached_token {
            return Ok(token.clone());
        }

        let token = self
            .credentials
            .bearer_token()
            .await
            .map_err(RecordError::Authenticate)?;
        if self.token_policy == TokenPolicy::PerRun {
            self.cached_token = Some(token.clone());
        }
        Ok(token)
    }

    fn record_failure(&mut self, natural_key: &Value, err: RecordError) {
        self.metrics.increment_failures(1);
        warn!(
            entity = %self.entity.name,
            key = %natural_key,
            stage = %err.stage(),
            "Record not integrated: {}",
            err
        );
        self.failures.push(FailedRecord::new(
            &self.entity.name,
            natural_key.to_string(),
            err.stage(),
            err.to_string(),
        ));
    }
}
