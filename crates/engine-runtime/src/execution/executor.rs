use crate::error::RunError;
use chrono::Utc;
use connectors::{
    erp::{auth::ErpAuthenticator, client::ErpClient},
    reference::ibge::MunicipalityClient,
    sql::mysql::adapter::MySqlAdapter,
};
use engine_config::{
    catalog,
    report::summary::{SyncMode, SyncSummary},
    settings::{BulkSyncSettings, RowSyncSettings, policy::TokenPolicy},
};
use engine_core::connectors::{
    auth::CredentialProvider, reference::ReferenceSource, sink::UpsertSink, source::RowSource,
};
use engine_processing::driver::{bulk::BulkSyncDriver, row::RowSyncDriver};
use model::{
    core::identifiers::RunId,
    entity::{SyncEntity, reference::ReferenceEntity},
};
use reqwest::Client;
use tracing::{error, info, warn};

/// Syncs `entities` in order over one MySQL connection.
///
/// The connection is opened once and closed on every exit path. The first
/// fatal error stops the remaining entities.
pub async fn run_entities(
    settings: &RowSyncSettings,
    entities: &[SyncEntity],
) -> Result<Vec<SyncSummary>, RunError> {
    let http = Client::builder().build()?;
    let credentials = ErpAuthenticator::new(http.clone(), settings.erp.credentials.clone());
    let sink = ErpClient::new(http, &settings.erp.api_url);

    let mut adapter = MySqlAdapter::connect(&settings.database.connect)
        .await
        .inspect_err(|err| error!("Fatal: {}", err))?;

    let result = sync_entities_with(
        &mut adapter,
        &credentials,
        &sink,
        entities,
        settings.token_policy,
    )
    .await;

    if let Err(err) = adapter.close().await {
        warn!("Failed to close MySQL connection: {}", err);
    }

    result
}

/// Runs the per-row driver for each entity against the given collaborators.
pub async fn sync_entities_with(
    source: &mut dyn RowSource,
    credentials: &dyn CredentialProvider,
    sink: &dyn UpsertSink,
    entities: &[SyncEntity],
    token_policy: TokenPolicy,
) -> Result<Vec<SyncSummary>, RunError> {
    let mut summaries = Vec::with_capacity(entities.len());

    for (idx, entity) in entities.iter().enumerate() {
        let run_id = RunId::generate();
        let started_at = Utc::now();
        info!(
            run_id = %run_id,
            entity = %entity.name,
            token_policy = %token_policy,
            "Syncing entity {}/{}",
            idx + 1,
            entities.len()
        );

        let outcome = RowSyncDriver::new(entity, &mut *source, credentials, sink)
            .with_token_policy(token_policy)
            .run()
            .await
            .inspect_err(|err| {
                error!(run_id = %run_id, entity = %entity.name, "Fatal: {}", err);
            })?;

        let summary = SyncSummary::from_metrics(
            run_id,
            &entity.name,
            SyncMode::Row,
            outcome.metrics,
            outcome.failures,
            started_at,
        );
        summary.log();
        summaries.push(summary);
    }

    Ok(summaries)
}

/// Loads the IBGE municipality list into the ERP.
pub async fn run_municipalities(settings: &BulkSyncSettings) -> Result<SyncSummary, RunError> {
    let bulk = &settings.bulk;
    let http = Client::builder().build()?;

    let credentials = ErpAuthenticator::new(http.clone(), settings.erp.credentials.clone())
        .with_timeout(Some(bulk.auth_timeout));
    let sink = ErpClient::new(http.clone(), &settings.erp.api_url)
        .with_timeout(Some(bulk.upload_timeout));
    let source =
        MunicipalityClient::new(http, &bulk.source_url).with_timeout(Some(bulk.upload_timeout));

    let reference = catalog::municipalities(&bulk.source_url);
    load_reference_with(&reference, &source, &credentials, &sink, bulk.chunk_size).await
}

/// Runs the bulk driver for one reference list against the given collaborators.
pub async fn load_reference_with(
    reference: &ReferenceEntity,
    source: &dyn ReferenceSource,
    credentials: &dyn CredentialProvider,
    sink: &dyn UpsertSink,
    chunk_size: usize,
) -> Result<SyncSummary, RunError> {
    let run_id = RunId::generate();
    let started_at = Utc::now();
    info!(
        run_id = %run_id,
        entity = %reference.name,
        chunk_size,
        "Loading reference list"
    );

    let outcome = BulkSyncDriver::new(reference, source, credentials, sink)
        .with_chunk_size(chunk_size)
        .run()
        .await
        .inspect_err(|err| {
            error!(run_id = %run_id, entity = %reference.name, "Fatal: {}", err);
        })?;

    let summary = SyncSummary::from_metrics(
        run_id,
        &reference.name,
        SyncMode::Bulk,
        outcome.metrics,
        outcome.failures,
        started_at,
    );
    summary.log();
    Ok(summary)
}
