use async_trait::async_trait;
use connectors::{
    erp::{auth::BearerToken, error::ErpError, wire::encode},
    reference::ibge::parse_municipalities,
};
use engine_core::{
    connectors::{
        auth::CredentialProvider, reference::ReferenceSource, sink::UpsertSink,
        source::{RowSource, require_row_key},
    },
    error::{SinkError, SourceError},
};
use model::{
    core::value::{FieldValue, Value},
    entity::{SyncEntity, reference::ReferenceItem},
    execution::status::{Rejection, SubmitStatus},
    records::{row::RowData, upsert::UpsertRequest},
};
use serde_json::{Value as JsonValue, json};
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

/// A stored row: its columns plus the integration markers that are set.
#[derive(Debug, Clone)]
pub struct StoredRow {
    pub table: String,
    pub columns: Vec<(String, Value)>,
    pub markers: HashSet<String>,
}

impl StoredRow {
    pub fn get(&self, column: &str) -> Value {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.clone())
            .unwrap_or(Value::Null)
    }
}

/// Tables held in memory, queried and updated the way the MySQL adapter
/// does: pending means the marker is unset, and marking flips every row of
/// the table that carries the key.
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    pub rows: Vec<StoredRow>,
    pub failing_tables: HashSet<String>,
    pub mark_calls: usize,
}

impl InMemoryDatabase {
    pub fn insert(&mut self, table: &str, columns: &[(&str, Value)]) {
        self.rows.push(StoredRow {
            table: table.to_string(),
            columns: columns
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            markers: HashSet::new(),
        });
    }

    pub fn is_marked(&self, table: &str, marker: &str, column: &str, key: &Value) -> bool {
        self.rows
            .iter()
            .filter(|r| r.table == table && &r.get(column) == key)
            .all(|r| r.markers.contains(marker))
    }

    pub fn pending_count(&self, table: &str, marker: &str) -> usize {
        self.rows
            .iter()
            .filter(|r| r.table == table && !r.markers.contains(marker))
            .count()
    }
}

#[async_trait]
impl RowSource for InMemoryDatabase {
    async fn fetch_pending(&mut self, entity: &SyncEntity) -> Result<Vec<RowData>, SourceError> {
        if self.failing_tables.contains(&entity.table) {
            return Err(SourceError::Other(format!(
                "Table '{}' doesn't exist",
                entity.table
            )));
        }

        Ok(self
            .rows
            .iter()
            .filter(|r| r.table == entity.table && !r.markers.contains(&entity.marker))
            .map(|r| {
                let fields = entity
                    .columns
                    .iter()
                    .map(|column| {
                        let value = r.get(column);
                        FieldValue {
                            name: column.clone(),
                            data_type: value.data_type(),
                            value: (!value.is_null()).then_some(value),
                        }
                    })
                    .collect();
                RowData::new(&entity.table, fields)
            })
            .collect())
    }

    async fn mark_integrated(
        &mut self,
        entity: &SyncEntity,
        key: &Value,
    ) -> Result<(), SourceError> {
        self.mark_calls += 1;
        require_row_key(entity, key)?;
        for row in self
            .rows
            .iter_mut()
            .filter(|r| r.table == entity.table && &r.get(&entity.row_key) == key)
        {
            row.markers.insert(entity.marker.clone());
        }
        Ok(())
    }
}

/// Stand-in for the ERP: issues tokens, encodes every request with the real
/// wire serializer, and upserts accepted records keyed by their first field.
#[derive(Default)]
pub struct InMemoryErp {
    pub token_calls: AtomicUsize,
    pub requests: Mutex<Vec<JsonValue>>,
    pub datasets: Mutex<HashMap<String, HashMap<String, JsonValue>>>,
    /// Requests whose records hold any of these texts are rejected.
    pub reject_containing: Mutex<Vec<String>>,
    /// Batch requests with more records than this are rejected.
    pub max_batch: Option<usize>,
}

impl InMemoryErp {
    pub fn reject_when_containing(&self, needle: &str) {
        self.reject_containing
            .lock()
            .unwrap()
            .push(needle.to_string());
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn dataset_len(&self, entity: &str) -> usize {
        self.datasets
            .lock()
            .unwrap()
            .get(entity)
            .map(|d| d.len())
            .unwrap_or(0)
    }

    pub fn record(&self, entity: &str, key: &str) -> Option<JsonValue> {
        self.datasets
            .lock()
            .unwrap()
            .get(entity)
            .and_then(|d| d.get(key).cloned())
    }
}

#[async_trait]
impl CredentialProvider for InMemoryErp {
    async fn bearer_token(&self) -> Result<BearerToken, SinkError> {
        let n = self.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(BearerToken::new(format!("bearer-{n}")))
    }
}

#[async_trait]
impl UpsertSink for InMemoryErp {
    async fn upsert(
        &self,
        _token: &BearerToken,
        request: &UpsertRequest,
    ) -> Result<SubmitStatus, SinkError> {
        let envelope = encode(request).map_err(ErpError::from)?;
        let body = serde_json::to_value(&envelope).map_err(ErpError::from)?;
        self.requests.lock().unwrap().push(body.clone());

        if self.max_batch.is_some_and(|max| request.len() > max) {
            return Ok(SubmitStatus::Rejected(Rejection::Http {
                status: 413,
                body: "payload too large".into(),
            }));
        }

        let records = body["requestBody"]["records"].to_string();
        let rejected = self
            .reject_containing
            .lock()
            .unwrap()
            .iter()
            .any(|needle| records.contains(needle.as_str()));
        if rejected {
            return Ok(SubmitStatus::Rejected(Rejection::Application {
                body: json!({"status": "ERROR", "statusMessage": "constraint violated"}),
            }));
        }

        let entity = body["requestBody"]["entityName"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let mut datasets = self.datasets.lock().unwrap();
        let dataset = datasets.entry(entity).or_default();
        for record in body["requestBody"]["records"].as_array().into_iter().flatten() {
            let values = &record["values"];
            let key = match values.get("2") {
                // serial numbers are keyed by item and serial
                Some(JsonValue::String(serial)) if values.as_object().map(|o| o.len()) == Some(3) => {
                    format!("{}:{}", values["0"], serial)
                }
                _ => values["0"].to_string(),
            };
            dataset.insert(key, values.clone());
        }

        Ok(SubmitStatus::Accepted(json!({"status": "1"})))
    }
}

/// Reference list decoded from a canned IBGE response body.
pub struct CannedReference {
    pub status: u16,
    pub body: String,
}

impl CannedReference {
    pub fn municipalities(count: usize) -> Self {
        let entries: Vec<JsonValue> = (0..count)
            .map(|i| json!({"id": 1_100_000 + i as i64, "nome": format!("Cidade {i}")}))
            .collect();
        Self {
            status: 200,
            body: JsonValue::Array(entries).to_string(),
        }
    }
}

#[async_trait]
impl ReferenceSource for CannedReference {
    async fn fetch(&self) -> Result<Vec<ReferenceItem>, SourceError> {
        Ok(parse_municipalities(self.status, &self.body)?)
    }
}
