use crate::error::ConfigError;
use serde::Serialize;
use std::{fmt, str::FromStr};

pub const TOKEN_POLICY: &str = "SYNC_TOKEN_POLICY";

/// When the per-row driver asks for a bearer token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenPolicy {
    /// A fresh token before every submitted row.
    #[default]
    PerRecord,
    /// One token for the whole run, fetched before the first submission.
    PerRun,
}

impl FromStr for TokenPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-record" | "per_record" => Ok(TokenPolicy::PerRecord),
            "per-run" | "per_run" => Ok(TokenPolicy::PerRun),
            _ => Err(ConfigError::Invalid {
                key: TOKEN_POLICY.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TokenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenPolicy::PerRecord => f.write_str("per-record"),
            TokenPolicy::PerRun => f.write_str("per-run"),
        }
    }
}
