use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// Declared type of a field on the ERP side. Drives how a value is written
/// on the wire, independent of how the row source typed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalType {
    Integer,
    Decimal,
    Text,
    /// Calendar date, written as `dd/mm/yyyy`.
    Date,
}

/// Where an upsert is addressed: the ERP service and the dataset entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTarget {
    pub service_name: String,
    pub entity_name: String,
}

impl ExternalTarget {
    pub const DATASET_SAVE: &'static str = "DatasetSP.save";

    pub fn dataset(entity_name: &str) -> Self {
        Self {
            service_name: Self::DATASET_SAVE.to_string(),
            entity_name: entity_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertField {
    pub name: String,
    pub value: Value,
    pub kind: ExternalType,
}

impl UpsertField {
    pub fn new(name: &str, value: Value, kind: ExternalType) -> Self {
        Self {
            name: name.to_string(),
            value,
            kind,
        }
    }
}

/// One record destined for the external entity, fields in wire order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpsertRecord {
    pub fields: Vec<UpsertField>,
}

impl UpsertRecord {
    pub fn new(fields: Vec<UpsertField>) -> Self {
        Self { fields }
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&UpsertField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A request carrying one or more records for the same target.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertRequest {
    pub target: ExternalTarget,
    pub records: Vec<UpsertRecord>,
}

impl UpsertRequest {
    pub fn single(target: &ExternalTarget, record: UpsertRecord) -> Self {
        Self {
            target: target.clone(),
            records: vec![record],
        }
    }

    pub fn batch(target: &ExternalTarget, records: Vec<UpsertRecord>) -> Self {
        Self {
            target: target.clone(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
