use crate::records::upsert::{ExternalTarget, ExternalType};
use serde::{Deserialize, Serialize};

pub mod reference;

/// Where a target field takes its value from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// A column of the pending row.
    Column(String),
    /// The current element of the row's expanded array column.
    Element,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub target: String,
    pub source: FieldSource,
    pub kind: ExternalType,
}

impl FieldMapping {
    pub fn column(target: &str, column: &str, kind: ExternalType) -> Self {
        Self {
            target: target.to_string(),
            source: FieldSource::Column(column.to_string()),
            kind,
        }
    }

    pub fn element(target: &str, kind: ExternalType) -> Self {
        Self {
            target: target.to_string(),
            source: FieldSource::Element,
            kind,
        }
    }
}

/// Describes one entity synced row by row: which table holds the pending
/// rows, how they are keyed, and how they project onto the ERP entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEntity {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    /// Integration marker; NULL means pending.
    pub marker: String,
    /// Column used to collapse duplicates within a run.
    pub natural_key: String,
    /// Column used to address the row when flipping its marker.
    pub row_key: String,
    pub target: ExternalTarget,
    pub fields: Vec<FieldMapping>,
    /// Column holding a JSON array; one record is sent per element.
    pub expand: Option<String>,
}

pub struct SyncEntityBuilder {
    name: String,
    table: String,
    columns: Vec<String>,
    marker: String,
    natural_key: Option<String>,
    row_key: Option<String>,
    target: Option<ExternalTarget>,
    fields: Vec<FieldMapping>,
    expand: Option<String>,
}

impl SyncEntityBuilder {
    pub fn new(name: &str, table: &str) -> Self {
        SyncEntityBuilder {
            name: name.to_string(),
            table: table.to_string(),
            columns: Vec::new(),
            marker: "integrado".to_string(),
            natural_key: None,
            row_key: None,
            target: None,
            fields: Vec::new(),
            expand: None,
        }
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn marker(mut self, marker: &str) -> Self {
        self.marker = marker.to_string();
        self
    }

    /// Sets both the natural key and the row key.
    pub fn key(mut self, column: &str) -> Self {
        self.natural_key = Some(column.to_string());
        self.row_key = Some(column.to_string());
        self
    }

    pub fn natural_key(mut self, column: &str) -> Self {
        self.natural_key = Some(column.to_string());
        self
    }

    pub fn row_key(mut self, column: &str) -> Self {
        self.row_key = Some(column.to_string());
        self
    }

    pub fn target(mut self, target: ExternalTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn field(mut self, mapping: FieldMapping) -> Self {
        self.fields.push(mapping);
        self
    }

    pub fn expand(mut self, column: &str) -> Self {
        self.expand = Some(column.to_string());
        self
    }

    pub fn build(self) -> SyncEntity {
        let row_key = self
            .row_key
            .or_else(|| self.columns.first().cloned())
            .unwrap_or_default();
        let natural_key = self.natural_key.unwrap_or_else(|| row_key.clone());
        let target = self
            .target
            .unwrap_or_else(|| ExternalTarget::dataset(&self.table));

        SyncEntity {
            name: self.name,
            table: self.table,
            columns: self.columns,
            marker: self.marker,
            natural_key,
            row_key,
            target,
            fields: self.fields,
            expand: self.expand,
        }
    }
}
