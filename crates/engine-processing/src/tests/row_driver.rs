use super::mocks::*;
use crate::{driver::row::RowSyncDriver, error::SyncError};
use engine_config::settings::policy::TokenPolicy;
use engine_core::error::SinkError;
use model::{
    core::value::Value,
    entity::{FieldMapping, SyncEntity, SyncEntityBuilder},
    execution::failed_row::FailureStage,
    records::upsert::{ExternalTarget, ExternalType},
};
use tracing_test::traced_test;

fn orders() -> SyncEntity {
    SyncEntityBuilder::new("orders", "pedidos")
        .columns(&["id_pedido", "observacao"])
        .key("id_pedido")
        .target(ExternalTarget::dataset("AD_TGSCAB"))
        .field(FieldMapping::column("NUPED", "id_pedido", ExternalType::Integer))
        .field(FieldMapping::column("OBSERVACAO", "observacao", ExternalType::Text))
        .build()
}

fn order(id: i64) -> model::records::row::RowData {
    row(
        "pedidos",
        &[
            ("id_pedido", Value::Int(id)),
            ("observacao", Value::String(format!("pedido {id}"))),
        ],
    )
}

fn clients() -> SyncEntity {
    SyncEntityBuilder::new("clients", "clientes")
        .columns(&["id_cliente", "documento"])
        .natural_key("documento")
        .row_key("id_cliente")
        .field(FieldMapping::column("ID", "id_cliente", ExternalType::Integer))
        .field(FieldMapping::column("DOCUMENTO", "documento", ExternalType::Text))
        .build()
}

fn client(id: i64, document: Option<&str>) -> model::records::row::RowData {
    let document = document
        .map(|d| Value::String(d.to_string()))
        .unwrap_or(Value::Null);
    row(
        "clientes",
        &[("id_cliente", Value::Int(id)), ("documento", document)],
    )
}

fn serials() -> SyncEntity {
    SyncEntityBuilder::new("serial-numbers", "pedido_itens")
        .columns(&["id_item", "id_pedido", "numeros_serie"])
        .marker("integradoser")
        .key("id_item")
        .expand("numeros_serie")
        .field(FieldMapping::column("IDITEM", "id_item", ExternalType::Integer))
        .field(FieldMapping::column("NUPED", "id_pedido", ExternalType::Integer))
        .field(FieldMapping::element("SERIE", ExternalType::Text))
        .build()
}

fn serial_row(id: i64, serials: &str) -> model::records::row::RowData {
    row(
        "pedido_itens",
        &[
            ("id_item", Value::Int(id)),
            ("id_pedido", Value::Int(100)),
            ("numeros_serie", Value::String(serials.to_string())),
        ],
    )
}

#[traced_test]
#[tokio::test]
async fn test_accepted_rows_are_marked_once_each() {
    let entity = orders();
    let mut source = MemorySource::with_rows(vec![order(1), order(2)]);
    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::accepting();

    let outcome = RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.metrics.records_found, 2);
    assert_eq!(outcome.metrics.records_integrated, 2);
    assert_eq!(outcome.metrics.requests_sent, 2);
    assert!(outcome.failures.is_empty());
    assert_eq!(source.marked, vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(sink.request_count(), 2);
    assert!(logs_contain("2 records found"));
    assert!(logs_contain("Record integrated"));
}

#[traced_test]
#[tokio::test]
async fn test_zero_pending_rows_send_nothing() {
    let entity = orders();
    let mut source = MemorySource::default();
    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::accepting();

    let outcome = RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.metrics.records_found, 0);
    assert_eq!(sink.request_count(), 0);
    assert_eq!(credentials.count(), 0);
    assert!(logs_contain("0 records found"));
}

#[tokio::test]
async fn test_duplicate_keys_are_marked_without_a_request() {
    let entity = orders();
    let mut source = MemorySource::with_rows(vec![order(7), order(7), order(8)]);
    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::accepting();

    let outcome = RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await
        .unwrap();

    assert_eq!(sink.request_count(), 2);
    assert_eq!(outcome.metrics.duplicates, 1);
    assert_eq!(outcome.metrics.records_integrated, 2);
    assert_eq!(
        source.marked,
        vec![Value::Int(7), Value::Int(7), Value::Int(8)]
    );
}

#[traced_test]
#[tokio::test]
async fn test_duplicate_of_a_rejected_record_stays_pending() {
    let entity = orders();
    let mut source = MemorySource::with_rows(vec![order(7), order(7), order(8)]);
    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::new(|request| match int_field(request, 0, "NUPED") {
        Some(7) => Ok(http_error(500)),
        _ => Ok(accepted()),
    });

    let outcome = RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await
        .unwrap();

    // the second 7 sends nothing and is not marked either
    assert_eq!(sink.request_count(), 2);
    assert_eq!(outcome.metrics.failure_count, 1);
    assert_eq!(outcome.metrics.duplicates, 1);
    assert_eq!(outcome.metrics.records_integrated, 1);
    assert_eq!(source.marked, vec![Value::Int(8)]);
    assert!(logs_contain("leaving pending"));
}

#[tokio::test]
async fn test_row_without_row_key_is_not_counted_as_integrated() {
    let entity = clients();
    let mut source = MemorySource::with_rows(vec![
        row(
            "clientes",
            &[
                ("id_cliente", Value::Null),
                ("documento", Value::String("555".into())),
            ],
        ),
        client(2, Some("666")),
    ]);
    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::accepting();

    let outcome = RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.metrics.records_integrated, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].key, "555");
    assert_eq!(outcome.failures[0].stage, FailureStage::Mark);
    assert_eq!(source.marked, vec![Value::Int(2)]);
}

#[traced_test]
#[tokio::test]
async fn test_rejected_rows_stay_unmarked_and_later_rows_continue() {
    let entity = orders();
    let mut source = MemorySource::with_rows(vec![order(1), order(2), order(3), order(4)]);
    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::new(|request| match int_field(request, 0, "NUPED") {
        Some(1) => Ok(http_error(502)),
        Some(2) => Ok(app_error()),
        Some(3) => Err(SinkError::Other("connection reset".into())),
        _ => Ok(accepted()),
    });

    let outcome = RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await
        .unwrap();

    assert_eq!(source.marked, vec![Value::Int(4)]);
    assert_eq!(outcome.metrics.failure_count, 3);
    assert_eq!(outcome.metrics.records_integrated, 1);

    let stages: Vec<_> = outcome.failures.iter().map(|f| f.stage.clone()).collect();
    assert_eq!(
        stages,
        vec![
            FailureStage::Rejected,
            FailureStage::Rejected,
            FailureStage::Submit
        ]
    );
    assert_eq!(outcome.failures[0].key, "1");
    assert!(logs_contain("Record not integrated"));
}

#[tokio::test]
async fn test_auth_failure_is_confined_to_its_row() {
    let entity = orders();
    let mut source = MemorySource::with_rows(vec![order(1), order(2)]);
    let credentials = CountingCredentials::failing_on(&[1]);
    let sink = ScriptedSink::accepting();

    let outcome = RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await
        .unwrap();

    assert_eq!(sink.request_count(), 1);
    assert_eq!(source.marked, vec![Value::Int(2)]);
    assert_eq!(outcome.failures[0].stage, FailureStage::Authenticate);
}

#[tokio::test]
async fn test_mark_failure_is_a_row_failure() {
    let entity = orders();
    let mut source = MemorySource::with_rows(vec![order(1), order(2)]);
    source.fail_mark_for = vec![Value::Int(1)];
    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::accepting();

    let outcome = RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await
        .unwrap();

    assert_eq!(outcome.metrics.records_integrated, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].stage, FailureStage::Mark);
}

#[tokio::test]
async fn test_fetch_failure_aborts_the_run() {
    let entity = orders();
    let mut source = MemorySource::default();
    source.fail_fetch = true;
    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::accepting();

    let result = RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await;

    assert!(matches!(result, Err(SyncError::Fetch { entity, .. }) if entity == "orders"));
    assert_eq!(sink.request_count(), 0);
}

#[tokio::test]
async fn test_token_policies() {
    let entity = orders();
    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::accepting();
    let mut source = MemorySource::with_rows(vec![order(1), order(2), order(3)]);

    RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await
        .unwrap();
    assert_eq!(credentials.count(), 3);
    assert_eq!(sink.tokens(), vec!["token-1", "token-2", "token-3"]);

    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::accepting();
    let mut source = MemorySource::with_rows(vec![order(1), order(2), order(3)]);

    RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .with_token_policy(TokenPolicy::PerRun)
        .run()
        .await
        .unwrap();
    assert_eq!(credentials.count(), 1);
    assert_eq!(sink.tokens(), vec!["token-1"; 3]);
}

#[tokio::test]
async fn test_clients_dedup_by_document_and_mark_by_id() {
    let entity = clients();
    let mut source = MemorySource::with_rows(vec![
        client(10, Some("111")),
        client(11, Some("111")),
        client(12, None),
        client(13, None),
    ]);
    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::accepting();

    let outcome = RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await
        .unwrap();

    // null documents are never treated as duplicates
    assert_eq!(sink.request_count(), 3);
    assert_eq!(outcome.metrics.duplicates, 1);
    assert_eq!(
        source.marked,
        vec![
            Value::Int(10),
            Value::Int(11),
            Value::Int(12),
            Value::Int(13)
        ]
    );
}

#[tokio::test]
async fn test_serial_numbers_need_every_sub_request_accepted() {
    let entity = serials();
    let mut source = MemorySource::with_rows(vec![
        serial_row(1, r#"["A", "B"]"#),
        serial_row(2, r#"["C", "BAD", "D"]"#),
        serial_row(3, "[]"),
        serial_row(4, "oops"),
    ]);
    let credentials = CountingCredentials::default();
    let sink = ScriptedSink::new(|request| {
        let serie = request.records[0].get("SERIE").and_then(|f| f.value.as_string());
        if serie.as_deref() == Some("BAD") {
            Ok(app_error())
        } else {
            Ok(accepted())
        }
    });

    let outcome = RowSyncDriver::new(&entity, &mut source, &credentials, &sink)
        .run()
        .await
        .unwrap();

    // row 2 stops at its first rejected serial
    assert_eq!(sink.request_count(), 4);
    assert_eq!(source.marked, vec![Value::Int(1), Value::Int(3)]);
    assert_eq!(outcome.metrics.records_integrated, 2);

    let stages: Vec<_> = outcome.failures.iter().map(|f| f.stage.clone()).collect();
    assert_eq!(stages, vec![FailureStage::Rejected, FailureStage::Project]);
    // one token per row that had something to send
    assert_eq!(credentials.count(), 2);
}
