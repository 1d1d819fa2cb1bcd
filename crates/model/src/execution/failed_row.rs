use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record that could not be integrated during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedRecord {
    pub entity: String,
    /// Natural key or item identity, rendered for humans.
    pub key: String,
    pub stage: FailureStage,
    pub message: String,
    pub details: Option<String>,
    pub failed_at: DateTime<Utc>,
}

/// The step of a record's processing where the failure occurred
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FailureStage {
    /// Failed to obtain a bearer credential
    Authenticate,

    /// Failed to build the upsert payload from the row
    Project,

    /// The request never produced a usable response
    Submit,

    /// The ERP answered but refused the record
    Rejected,

    /// The ERP accepted the record but the integration marker could not be set
    Mark,
}

impl FailedRecord {
    pub fn new(entity: &str, key: impl Into<String>, stage: FailureStage, message: String) -> Self {
        Self {
            entity: entity.to_string(),
            key: key.into(),
            stage,
            message,
            details: None,
            failed_at: Utc::now(),
        }
    }

    /// Add detailed error information
    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureStage::Authenticate => write!(f, "Authenticate"),
            FailureStage::Project => write!(f, "Project"),
            FailureStage::Submit => write!(f, "Submit"),
            FailureStage::Rejected => write!(f, "Rejected"),
            FailureStage::Mark => write!(f, "Mark"),
        }
    }
}
