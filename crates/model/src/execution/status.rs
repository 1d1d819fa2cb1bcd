use serde::{Deserialize, Serialize};
use std::fmt;

/// How the ERP answered a request that reached it.
///
/// Transport faults (no response, undecodable body) are not represented
/// here; they travel as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubmitStatus {
    Accepted(serde_json::Value),
    Rejected(Rejection),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rejection {
    /// Non-200 HTTP status.
    Http { status: u16, body: String },
    /// HTTP 200 carrying `"status": "ERROR"`.
    Application { body: serde_json::Value },
}

impl SubmitStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitStatus::Accepted(_))
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            Rejection::Application { body } => write!(f, "application error: {body}"),
        }
    }
}
