use crate::error::TransformError;
use model::{
    core::value::Value,
    entity::{FieldSource, SyncEntity},
    records::{
        row::RowData,
        upsert::{UpsertField, UpsertRecord},
    },
};
use serde_json::Value as JsonValue;

/// Projects one pending row onto the entity's external fields.
///
/// Entities without an expand column yield exactly one record. Otherwise the
/// expand column is decoded as a JSON array and one record is produced per
/// element; an empty array yields no records.
pub fn project(entity: &SyncEntity, row: &RowData) -> Result<Vec<UpsertRecord>, TransformError> {
    match &entity.expand {
        None => Ok(vec![build_record(entity, row, None)?]),
        Some(column) => expand_elements(row, column)?
            .into_iter()
            .map(|element| build_record(entity, row, Some(element)))
            .collect(),
    }
}

fn build_record(
    entity: &SyncEntity,
    row: &RowData,
    element: Option<Value>,
) -> Result<UpsertRecord, TransformError> {
    let fields = entity
        .fields
        .iter()
        .map(|mapping| {
            let value = match &mapping.source {
                FieldSource::Column(column) => row
                    .get(column)
                    .map(|fv| fv.value.clone().unwrap_or(Value::Null))
                    .ok_or_else(|| TransformError::MissingColumn(column.clone()))?,
                FieldSource::Element => element.clone().unwrap_or(Value::Null),
            };
            Ok(UpsertField::new(&mapping.target, value, mapping.kind))
        })
        .collect::<Result<Vec<_>, TransformError>>()?;

    Ok(UpsertRecord::new(fields))
}

fn expand_elements(row: &RowData, column: &str) -> Result<Vec<Value>, TransformError> {
    let not_an_array = |reason: String| TransformError::NotAnArray {
        column: column.to_string(),
        reason,
    };

    let raw = row
        .get(column)
        .ok_or_else(|| TransformError::MissingColumn(column.to_string()))?
        .value
        .clone()
        .unwrap_or(Value::Null);

    let json = match raw {
        Value::Json(json) => json,
        Value::String(text) => {
            serde_json::from_str(&text).map_err(|e| not_an_array(e.to_string()))?
        }
        Value::Bytes(bytes) => {
            serde_json::from_slice(&bytes).map_err(|e| not_an_array(e.to_string()))?
        }
        Value::Null => return Err(not_an_array("value is NULL".to_string())),
        other => return Err(not_an_array(format!("unexpected value {other}"))),
    };

    match json {
        JsonValue::Array(items) => Ok(items.into_iter().map(Value::from).collect()),
        other => Err(not_an_array(format!("found {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{
        core::{data_type::DataType, value::FieldValue},
        entity::{FieldMapping, SyncEntityBuilder},
        records::upsert::ExternalType,
    };

    fn field(name: &str, value: Value) -> FieldValue {
        FieldValue {
            name: name.to_string(),
            data_type: value.data_type(),
            value: Some(value),
        }
    }

    fn serials_entity() -> SyncEntity {
        SyncEntityBuilder::new("serial-numbers", "pedido_itens")
            .columns(&["id_item", "id_pedido", "numeros_serie"])
            .key("id_item")
            .expand("numeros_serie")
            .field(FieldMapping::column("IDITEM", "id_item", ExternalType::Integer))
            .field(FieldMapping::column("NUPED", "id_pedido", ExternalType::Integer))
            .field(FieldMapping::element("SERIE", ExternalType::Text))
            .build()
    }

    fn serials_row(serials: Value) -> RowData {
        RowData::new(
            "pedido_itens",
            vec![
                field("id_item", Value::Int(5)),
                field("id_pedido", Value::Int(9)),
                field("numeros_serie", serials),
            ],
        )
    }

    #[test]
    fn test_plain_projection_keeps_field_order() {
        let entity = SyncEntityBuilder::new("orders", "pedidos")
            .columns(&["id_pedido", "observacao"])
            .field(FieldMapping::column("NUPED", "id_pedido", ExternalType::Integer))
            .field(FieldMapping::column("OBSERVACAO", "observacao", ExternalType::Text))
            .build();
        let row = RowData::new(
            "pedidos",
            vec![
                field("id_pedido", Value::Int(10)),
                FieldValue {
                    name: "observacao".into(),
                    value: None,
                    data_type: DataType::String,
                },
            ],
        );

        let records = project(&entity, &row).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field_names(), vec!["NUPED", "OBSERVACAO"]);
        assert_eq!(records[0].fields[1].value, Value::Null);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let entity = SyncEntityBuilder::new("orders", "pedidos")
            .columns(&["id_pedido"])
            .field(FieldMapping::column("PGTO", "forma_pagamento", ExternalType::Text))
            .build();
        let row = RowData::new("pedidos", vec![field("id_pedido", Value::Int(1))]);

        assert!(matches!(
            project(&entity, &row),
            Err(TransformError::MissingColumn(c)) if c == "forma_pagamento"
        ));
    }

    #[test]
    fn test_expands_one_record_per_serial() {
        let row = serials_row(Value::String(r#"["SN-1", "SN-2", 300]"#.into()));
        let records = project(&serials_entity(), &row).unwrap();

        assert_eq!(records.len(), 3);
        let serials: Vec<_> = records
            .iter()
            .map(|r| r.get("SERIE").unwrap().value.clone())
            .collect();
        assert_eq!(
            serials,
            vec![
                Value::String("SN-1".into()),
                Value::String("SN-2".into()),
                Value::Int(300)
            ]
        );
        assert!(records.iter().all(|r| r.get("NUPED").unwrap().value == Value::Int(9)));
    }

    #[test]
    fn test_native_json_column_and_empty_array() {
        let row = serials_row(Value::Json(serde_json::json!(["A"])));
        assert_eq!(project(&serials_entity(), &row).unwrap().len(), 1);

        let row = serials_row(Value::String("[]".into()));
        assert!(project(&serials_entity(), &row).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_serial_column() {
        for bad in [
            Value::String("not json".into()),
            Value::String(r#"{"a": 1}"#.into()),
            Value::Null,
            Value::Int(3),
        ] {
            assert!(matches!(
                project(&serials_entity(), &serials_row(bad)),
                Err(TransformError::NotAnArray { .. })
            ));
        }
    }
}
