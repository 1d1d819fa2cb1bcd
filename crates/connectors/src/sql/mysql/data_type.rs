use model::core::data_type::DataType;
use mysql_async::{
    Column,
    consts::{ColumnFlags, ColumnType},
};

/// MySQL's `binary` collation id; string-family columns carrying it hold raw bytes.
const BINARY_CHARSET: u16 = 63;

pub trait MySqlColumnDataType {
    fn from_mysql_column(column: &Column) -> DataType;
}

impl MySqlColumnDataType for DataType {
    fn from_mysql_column(column: &Column) -> DataType {
        column_data_type(
            column.column_type(),
            column.flags(),
            column.character_set(),
        )
    }
}

pub fn column_data_type(column_type: ColumnType, flags: ColumnFlags, charset: u16) -> DataType {
    use ColumnType::*;

    match column_type {
        MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_INT24 | MYSQL_TYPE_LONG
        | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_YEAR => {
            if flags.contains(ColumnFlags::UNSIGNED_FLAG) {
                DataType::IntUnsigned
            } else {
                DataType::Int
            }
        }
        MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE => DataType::Float,
        MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL => DataType::Decimal,
        MYSQL_TYPE_DATE | MYSQL_TYPE_NEWDATE => DataType::Date,
        MYSQL_TYPE_DATETIME | MYSQL_TYPE_DATETIME2 | MYSQL_TYPE_TIMESTAMP
        | MYSQL_TYPE_TIMESTAMP2 => DataType::Timestamp,
        MYSQL_TYPE_TIME | MYSQL_TYPE_TIME2 => DataType::Time,
        MYSQL_TYPE_JSON => DataType::Json,
        MYSQL_TYPE_NULL => DataType::Null,
        MYSQL_TYPE_BIT | MYSQL_TYPE_GEOMETRY => DataType::Bytes,
        MYSQL_TYPE_TINY_BLOB | MYSQL_TYPE_MEDIUM_BLOB | MYSQL_TYPE_LONG_BLOB | MYSQL_TYPE_BLOB
        | MYSQL_TYPE_VAR_STRING | MYSQL_TYPE_STRING | MYSQL_TYPE_VARCHAR
            if charset == BINARY_CHARSET =>
        {
            DataType::Bytes
        }
        _ => DataType::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTF8MB4: u16 = 45;

    #[test]
    fn test_integer_signedness() {
        assert_eq!(
            column_data_type(ColumnType::MYSQL_TYPE_LONG, ColumnFlags::empty(), UTF8MB4),
            DataType::Int
        );
        assert_eq!(
            column_data_type(
                ColumnType::MYSQL_TYPE_LONGLONG,
                ColumnFlags::UNSIGNED_FLAG,
                UTF8MB4
            ),
            DataType::IntUnsigned
        );
    }

    #[test]
    fn test_text_vs_binary_blobs() {
        assert_eq!(
            column_data_type(ColumnType::MYSQL_TYPE_BLOB, ColumnFlags::empty(), UTF8MB4),
            DataType::String
        );
        assert_eq!(
            column_data_type(
                ColumnType::MYSQL_TYPE_BLOB,
                ColumnFlags::BINARY_FLAG,
                BINARY_CHARSET
            ),
            DataType::Bytes
        );
    }

    #[test]
    fn test_temporal_and_decimal_columns() {
        assert_eq!(
            column_data_type(ColumnType::MYSQL_TYPE_NEWDECIMAL, ColumnFlags::empty(), 63),
            DataType::Decimal
        );
        assert_eq!(
            column_data_type(ColumnType::MYSQL_TYPE_DATE, ColumnFlags::empty(), 63),
            DataType::Date
        );
        assert_eq!(
            column_data_type(ColumnType::MYSQL_TYPE_DATETIME, ColumnFlags::empty(), 63),
            DataType::Timestamp
        );
    }
}
