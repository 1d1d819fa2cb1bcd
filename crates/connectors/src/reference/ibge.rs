use crate::reference::error::ReferenceError;
use model::entity::reference::ReferenceItem;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, warn};

pub const IBGE_MUNICIPIOS_URL: &str =
    "https://servicodados.ibge.gov.br/api/v1/localidades/municipios/";

/// Reads the municipality list published by IBGE.
pub struct MunicipalityClient {
    http: Client,
    url: String,
    timeout: Option<Duration>,
}

impl MunicipalityClient {
    pub fn new(http: Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn fetch(&self) -> Result<Vec<ReferenceItem>, ReferenceError> {
        debug!(url = %self.url, "Fetching municipality list");

        let mut request = self.http.get(&self.url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_municipalities(status, &body)
    }
}

/// Decodes an IBGE response. Entries lacking `id` or `nome` are skipped.
pub fn parse_municipalities(status: u16, body: &str) -> Result<Vec<ReferenceItem>, ReferenceError> {
    if status != 200 {
        return Err(ReferenceError::Status {
            status,
            body: body.to_string(),
        });
    }

    let json: JsonValue = serde_json::from_str(body)?;
    let entries = match json {
        JsonValue::Array(entries) => entries,
        other => return Err(ReferenceError::Malformed(json_kind(&other).to_string())),
    };

    let total = entries.len();
    let items: Vec<ReferenceItem> = entries.iter().filter_map(to_item).collect();
    if items.len() < total {
        warn!(
            skipped = total - items.len(),
            "Skipped municipality entries without id or name"
        );
    }

    Ok(items)
}

fn to_item(entry: &JsonValue) -> Option<ReferenceItem> {
    let id = match entry.get("id")? {
        JsonValue::Number(n) => n.as_i64()?,
        JsonValue::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    let name = entry.get("nome")?.as_str()?.to_string();
    Some(ReferenceItem { id, name })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
