use crate::{
    driver::{SyncOutcome, submit},
    error::{RecordError, SyncError},
};
use connectors::erp::auth::BearerToken;
use engine_core::{
    connectors::{auth::CredentialProvider, reference::ReferenceSource, sink::UpsertSink},
    metrics::Metrics,
};
use model::{
    core::identifiers::ChunkId,
    entity::reference::{ReferenceEntity, ReferenceItem},
    execution::failed_row::FailedRecord,
    records::upsert::UpsertRequest,
};
use tracing::{debug, error, info, warn};

pub const DEFAULT_CHUNK_SIZE: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WriteStrategy {
    /// Every member of the chunk in one request.
    Batch,
    /// One request per member, tallied independently.
    PerItem,
}

/// Loads a reference list into the ERP in fixed-size chunks.
///
/// Authentication and the reference fetch happen once, before the first
/// chunk; either failing aborts the run. A chunk whose batch request is not
/// accepted is resubmitted item by item.
pub struct BulkSyncDriver<'a> {
    reference: &'a ReferenceEntity,
    source: &'a dyn ReferenceSource,
    credentials: &'a dyn CredentialProvider,
    sink: &'a dyn UpsertSink,
    chunk_size: usize,
    metrics: Metrics,
    failures: Vec<FailedRecord>,
}

impl<'a> BulkSyncDriver<'a> {
    pub fn new(
        reference: &'a ReferenceEntity,
        source: &'a dyn ReferenceSource,
        credentials: &'a dyn CredentialProvider,
        sink: &'a dyn UpsertSink,
    ) -> Self {
        Self {
            reference,
            source,
            credentials,
            sink,
            chunk_size: DEFAULT_CHUNK_SIZE,
            metrics: Metrics::new(),
            failures: Vec::new(),
        }
    }

    /// Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub async fn run(mut self) -> Result<SyncOutcome, SyncError> {
        let reference = self.reference;
        let name = &reference.name;

        let token = self
            .credentials
            .bearer_token()
            .await
            .map_err(|source| SyncError::Authenticate {
                entity: name.clone(),
                source,
            })?;

        let items = self
            .source
            .fetch()
            .await
            .map_err(|source| SyncError::Reference {
                entity: name.clone(),
                source,
            })?;

        info!(entity = %name, "{} records found", items.len());
        self.metrics.increment_found(items.len() as u64);

        let total = items.len().div_ceil(self.chunk_size);
        for (index, chunk) in items.chunks(self.chunk_size).enumerate() {
            let chunk_id = ChunkId {
                index: index + 1,
                total,
            };
            self.metrics.increment_chunks(1);

            let records = chunk.iter().map(|item| reference.record_for(item)).collect();
            let request = UpsertRequest::batch(&reference.target, records);

            match self.write(&token, request, WriteStrategy::Batch).await {
                Ok(()) => {
                    self.metrics.increment_integrated(chunk.len() as u64);
                    info!(
                        entity = %name,
                        chunk = %chunk_id,
                        records = chunk.len(),
                        outcome = "ok",
                        "Chunk integrated"
                    );
                }
                Err(err) => {
                    warn!(
                        entity = %name,
                        chunk = %chunk_id,
                        records = chunk.len(),
                        "Batch not accepted, falling back to per-item submission: {}",
                        err
                    );
                    self.metrics.increment_fallbacks(1);
                    self.write_items(&token, chunk_id, chunk).await;
                }
            }
        }

        Ok(SyncOutcome {
            metrics: self.metrics.snapshot(),
            failures: self.failures,
        })
    }

    async fn write(
        &self,
        token: &BearerToken,
        request: UpsertRequest,
        strategy: WriteStrategy,
    ) -> Result<(), RecordError> {
        debug!(
            entity = %self.reference.name,
            strategy = ?strategy,
            records = request.len(),
            "Writing reference records"
        );
        let response = submit(self.sink, token, &request, &self.metrics).await?;
        debug!(entity = %self.reference.name, response = %response, "ERP response");
        Ok(())
    }

    async fn write_items(
        &mut self,
        token: &BearerToken,
        chunk_id: ChunkId,
        items: &[ReferenceItem],
    ) {
        let mut succeeded = 0;
        for item in items {
            let request =
                UpsertRequest::single(&self.reference.target, self.reference.record_for(item));

            match self.write(token, request, WriteStrategy::PerItem).await {
                Ok(()) => {
                    succeeded += 1;
                    self.metrics.increment_integrated(1);
                    debug!(
                        entity = %self.reference.name,
                        chunk = %chunk_id,
                        item = %item,
                        outcome = "ok",
                        "Item integrated"
                    );
                }
                Err(err) => {
                    self.metrics.increment_failures(1);
                    error!(
                        entity = %self.reference.name,
                        chunk = %chunk_id,
                        item = %item,
                        stage = %err.stage(),
                        "Failed to integrate item {}: {}",
                        item,
                        err
                    );
                    self.failures.push(FailedRecord::new(
                        &self.reference.name,
                        item.to_string(),
                        err.stage(),
                        err.to_string(),
                    ));
                }
            }
        }

        info!(
            entity = %self.reference.name,
            chunk = %chunk_id,
            succeeded,
            failed = items.len() - succeeded,
            "Per-item fallback finished"
        );
    }
}
