use serde::{Deserialize, Serialize};
use std::fmt;

/// Column type as reported by the row source, reduced to what the sync cares about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataType {
    Int,
    IntUnsigned,
    Float,
    Decimal,
    String,
    Boolean,
    Json,
    Bytes,
    Date,
    Timestamp,
    Time,
    Null,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int => "INT",
            DataType::IntUnsigned => "INT UNSIGNED",
            DataType::Float => "FLOAT",
            DataType::Decimal => "DECIMAL",
            DataType::String => "VARCHAR",
            DataType::Boolean => "BOOLEAN",
            DataType::Json => "JSON",
            DataType::Bytes => "BLOB",
            DataType::Date => "DATE",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Time => "TIME",
            DataType::Null => "NULL",
        };
        write!(f, "{name}")
    }
}
