use crate::sql::mysql::data_type::MySqlColumnDataType;
use chrono::{NaiveDate, NaiveTime};
use model::{
    core::{
        data_type::DataType,
        value::{FieldValue, Value},
    },
    records::row::RowData,
};
use mysql_async::{Row as MySqlRow, Value as MySqlValue};
use tracing::warn;

pub fn to_row_data(table: &str, row: &MySqlRow) -> RowData {
    let columns = row
        .columns_ref()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let data_type = DataType::from_mysql_column(column);
            let value = row
                .as_ref(idx)
                .and_then(|raw| convert_value(raw, data_type));

            FieldValue {
                name: column.name_str().into_owned(),
                value,
                data_type,
            }
        })
        .collect();

    RowData::new(table, columns)
}

/// Converts a raw binary-protocol value. `None` stands for SQL NULL and for
/// values MySQL cannot express as a calendar value (zero dates).
pub fn convert_value(raw: &MySqlValue, data_type: DataType) -> Option<Value> {
    match raw {
        MySqlValue::NULL => None,
        MySqlValue::Int(i) => Some(match data_type {
            DataType::Boolean => Value::Boolean(*i != 0),
            _ => Value::Int(*i),
        }),
        MySqlValue::UInt(u) => Some(Value::Uint(*u)),
        MySqlValue::Float(f) => Some(Value::Float(*f as f64)),
        MySqlValue::Double(d) => Some(Value::Float(*d)),
        MySqlValue::Bytes(bytes) => Some(bytes_value(bytes, data_type)),
        MySqlValue::Date(year, month, day, hour, minute, second, micros) => {
            let date = NaiveDate::from_ymd_opt(*year as i32, *month as u32, *day as u32)?;
            if data_type == DataType::Date {
                return Some(Value::Date(date));
            }
            let time = NaiveTime::from_hms_micro_opt(
                *hour as u32,
                *minute as u32,
                *second as u32,
                *micros,
            )?;
            Some(Value::Timestamp(date.and_time(time).and_utc()))
        }
        MySqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            let total_hours = *days * 24 + *hours as u32;
            Some(Value::String(format!(
                "{sign}{total_hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
            )))
        }
    }
}

fn bytes_value(bytes: &[u8], data_type: DataType) -> Value {
    let text = || String::from_utf8_lossy(bytes).into_owned();

    match data_type {
        DataType::Decimal | DataType::Float => text()
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or_else(|_| Value::String(text())),
        DataType::Int => text()
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::String(text())),
        DataType::IntUnsigned => text()
            .parse::<u64>()
            .map(Value::Uint)
            .unwrap_or_else(|_| Value::String(text())),
        DataType::Json => serde_json::from_slice(bytes)
            .map(Value::Json)
            .unwrap_or_else(|err| {
                warn!("Invalid JSON column value, keeping raw text: {}", err);
                Value::String(text())
            }),
        DataType::Bytes => Value::Bytes(bytes.to_vec()),
        _ => Value::String(text()),
    }
}
