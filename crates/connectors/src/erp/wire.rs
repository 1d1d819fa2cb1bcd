//! Rendering of typed upsert requests into the ERP's `DatasetSP.save`
//! envelope, and interpretation of its responses.
//!
//! ```json
//! {
//!   "serviceName": "DatasetSP.save",
//!   "requestBody": {
//!     "entityName": "AD_TGSCAB",
//!     "standAlone": false,
//!     "fields": ["NUPED", "ID"],
//!     "records": [{ "values": { "0": 10, "1": 7 } }]
//!   }
//! }
//! ```

use crate::erp::error::{ErpError, WireError};
use model::{
    core::value::Value,
    execution::status::{Rejection, SubmitStatus},
    records::upsert::{ExternalType, UpsertField, UpsertRequest},
};
use serde::Serialize;
use serde_json::{Map, Number, Value as JsonValue};

/// Date format expected by the ERP for `ExternalType::Date` fields.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSaveEnvelope {
    pub service_name: String,
    pub request_body: DatasetSaveBody,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSaveBody {
    pub entity_name: String,
    pub stand_alone: bool,
    pub fields: Vec<String>,
    pub records: Vec<WireRecord>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WireRecord {
    /// Positional index (as a string) to value.
    pub values: Map<String, JsonValue>,
}

pub fn encode(request: &UpsertRequest) -> Result<DatasetSaveEnvelope, WireError> {
    let first = request.records.first().ok_or(WireError::Empty)?;
    let fields: Vec<String> = first.fields.iter().map(|f| f.name.clone()).collect();

    let records = request
        .records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let same_layout = record.fields.len() == fields.len()
                && record
                    .fields
                    .iter()
                    .zip(&fields)
                    .all(|(field, name)| &field.name == name);
            if !same_layout {
                return Err(WireError::FieldMismatch { index });
            }

            let values = record
                .fields
                .iter()
                .enumerate()
                .map(|(pos, field)| Ok((pos.to_string(), encode_field(field)?)))
                .collect::<Result<Map<_, _>, WireError>>()?;
            Ok(WireRecord { values })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DatasetSaveEnvelope {
        service_name: request.target.service_name.clone(),
        request_body: DatasetSaveBody {
            entity_name: request.target.entity_name.clone(),
            stand_alone: false,
            fields,
            records,
        },
    })
}

fn encode_field(field: &UpsertField) -> Result<JsonValue, WireError> {
    if field.value.is_null() {
        return Ok(JsonValue::Null);
    }

    let mismatch = |expected: &'static str| WireError::TypeMismatch {
        field: field.name.clone(),
        expected,
        value: field.value.to_string(),
    };

    match field.kind {
        ExternalType::Integer => field
            .value
            .as_i64()
            .map(JsonValue::from)
            .ok_or_else(|| mismatch("an integer")),
        ExternalType::Decimal => field
            .value
            .as_f64()
            .and_then(Number::from_f64)
            .map(JsonValue::Number)
            .ok_or_else(|| mismatch("a decimal")),
        ExternalType::Text => field
            .value
            .as_string()
            .map(JsonValue::String)
            .ok_or_else(|| mismatch("text")),
        ExternalType::Date => encode_date(&field.value).ok_or_else(|| mismatch("a date")),
    }
}

fn encode_date(value: &Value) -> Option<JsonValue> {
    let date = match value {
        Value::Date(d) => *d,
        Value::Timestamp(ts) => ts.date_naive(),
        Value::String(s) => {
            let s = s.trim();
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| chrono::NaiveDate::parse_from_str(s, DATE_FORMAT))
                .ok()?
        }
        _ => return None,
    };
    Some(JsonValue::String(date.format(DATE_FORMAT).to_string()))
}

/// Interprets an upsert response. Only HTTP 200 counts as delivered; a
/// delivered body that is a JSON object with `"status": "ERROR"` is an
/// application-level rejection.
pub fn classify_response(status: u16, body: &str) -> Result<SubmitStatus, ErpError> {
    if status != 200 {
        return Ok(SubmitStatus::Rejected(Rejection::Http {
            status,
            body: body.to_string(),
        }));
    }

    let json: JsonValue = serde_json::from_str(body)?;
    let is_error = json
        .as_object()
        .and_then(|obj| obj.get("status"))
        .and_then(JsonValue::as_str)
        == Some("ERROR");

    if is_error {
        Ok(SubmitStatus::Rejected(Rejection::Application { body: json }))
    } else {
        Ok(SubmitStatus::Accepted(json))
    }
}
