use crate::error::SourceError;
use async_trait::async_trait;
use connectors::sql::mysql::adapter::MySqlAdapter;
use model::{core::value::Value, entity::SyncEntity, records::row::RowData};
use tracing::debug;

/// Where pending rows come from and where their integration marker is set.
#[async_trait]
pub trait RowSource: Send {
    /// All rows of `entity` whose integration marker is unset, in source order.
    async fn fetch_pending(&mut self, entity: &SyncEntity) -> Result<Vec<RowData>, SourceError>;

    /// Sets the marker on the rows addressed by `key` (the entity's row key)
    /// and makes the change durable before returning.
    async fn mark_integrated(
        &mut self,
        entity: &SyncEntity,
        key: &Value,
    ) -> Result<(), SourceError>;
}

#[async_trait]
impl RowSource for MySqlAdapter {
    async fn fetch_pending(&mut self, entity: &SyncEntity) -> Result<Vec<RowData>, SourceError> {
        Ok(MySqlAdapter::fetch_pending(self, entity).await?)
    }

    async fn mark_integrated(
        &mut self,
        entity: &SyncEntity,
        key: &Value,
    ) -> Result<(), SourceError> {
        require_row_key(entity, key)?;
        let affected = MySqlAdapter::mark_integrated(self, entity, key).await?;
        if affected == 0 {
            // rows sharing the key were flipped by an earlier accepted row
            debug!(entity = %entity.name, key = %key, "Marker update matched no pending rows");
        }
        Ok(())
    }
}

/// Fails for a null row key, which no marker update can address.
pub fn require_row_key(entity: &SyncEntity, key: &Value) -> Result<(), SourceError> {
    if key.is_null() {
        return Err(SourceError::MissingRowKey {
            entity: entity.name.clone(),
            column: entity.row_key.clone(),
        });
    }
    Ok(())
}
