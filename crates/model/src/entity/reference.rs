use crate::{
    core::value::Value,
    records::upsert::{ExternalTarget, ExternalType, UpsertField, UpsertRecord},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of an externally published reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for ReferenceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID={} '{}'", self.id, self.name)
    }
}

/// Describes a reference list loaded in bulk into the ERP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntity {
    pub name: String,
    pub source_url: String,
    pub target: ExternalTarget,
    pub id_field: String,
    pub name_field: String,
}

impl ReferenceEntity {
    pub fn record_for(&self, item: &ReferenceItem) -> UpsertRecord {
        UpsertRecord::new(vec![
            UpsertField::new(&self.id_field, Value::Int(item.id), ExternalType::Integer),
            UpsertField::new(
                &self.name_field,
                Value::String(item.name.clone()),
                ExternalType::Text,
            ),
        ])
    }
}
