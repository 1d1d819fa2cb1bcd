//! Built-in entity descriptors for the store database and the ERP's
//! custom datasets.

use crate::error::ConfigError;
use connectors::reference::ibge::IBGE_MUNICIPIOS_URL;
use model::{
    entity::{FieldMapping, SyncEntity, SyncEntityBuilder, reference::ReferenceEntity},
    records::upsert::{ExternalTarget, ExternalType},
};
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Entities synced row by row, in the order `--all` runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Orders,
    OrderItems,
    Clients,
    SerialNumbers,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Clients,
        EntityKind::Orders,
        EntityKind::OrderItems,
        EntityKind::SerialNumbers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Orders => "orders",
            EntityKind::OrderItems => "order-items",
            EntityKind::Clients => "clients",
            EntityKind::SerialNumbers => "serial-numbers",
        }
    }

    pub fn entity(&self) -> SyncEntity {
        match self {
            EntityKind::Orders => orders(),
            EntityKind::OrderItems => order_items(),
            EntityKind::Clients => clients(),
            EntityKind::SerialNumbers => serial_numbers(),
        }
    }
}

impl FromStr for EntityKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| ConfigError::UnknownEntity(s.to_string()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn orders() -> SyncEntity {
    SyncEntityBuilder::new(EntityKind::Orders.as_str(), "pedidos")
        .columns(&[
            "id_pedido",
            "id_cliente",
            "forma_pagamento",
            "data_pedido",
            "observacao",
        ])
        .key("id_pedido")
        .target(ExternalTarget::dataset("AD_TGSCAB"))
        .field(FieldMapping::column("NUPED", "id_pedido", ExternalType::Integer))
        .field(FieldMapping::column("ID", "id_cliente", ExternalType::Integer))
        .field(FieldMapping::column("PGTO", "forma_pagamento", ExternalType::Text))
        .field(FieldMapping::column("DTPED", "data_pedido", ExternalType::Date))
        .field(FieldMapping::column("OBSERVACAO", "observacao", ExternalType::Text))
        .build()
}

pub fn order_items() -> SyncEntity {
    SyncEntityBuilder::new(EntityKind::OrderItems.as_str(), "pedido_itens")
        .columns(&[
            "id_item",
            "id_pedido",
            "id_produto",
            "quantidade",
            "preco_unitario",
            "desconto",
        ])
        .key("id_item")
        .target(ExternalTarget::dataset("AD_TGSITE"))
        .field(FieldMapping::column("IDITEM", "id_item", ExternalType::Integer))
        .field(FieldMapping::column("NUPED", "id_pedido", ExternalType::Integer))
        .field(FieldMapping::column("QTDNEG", "quantidade", ExternalType::Decimal))
        .field(FieldMapping::column("VLRUNIT", "preco_unitario", ExternalType::Decimal))
        .field(FieldMapping::column("DESCONTO", "desconto", ExternalType::Decimal))
        .field(FieldMapping::column("CODPROD", "id_produto", ExternalType::Integer))
        .build()
}

pub fn clients() -> SyncEntity {
    const TEXT_FIELDS: [(&str, &str); 11] = [
        ("RAZAOSOCIAL", "nome"),
        ("DOCUMENTO", "documento"),
        ("EMAIL", "email"),
        ("TELEFONE", "telefone"),
        ("ENDERECO", "rua"),
        ("NUMERO", "numero"),
        ("CEP", "cep"),
        ("BAIRRO", "bairro"),
        ("CODCID", "cidade"),
        ("SIGLA", "estado"),
        ("COMPLEMENTO", "complemento"),
    ];

    let mut columns = vec!["id_cliente"];
    columns.extend(TEXT_FIELDS.iter().map(|(_, column)| *column));

    let builder = SyncEntityBuilder::new(EntityKind::Clients.as_str(), "clientes")
        .columns(&columns)
        .natural_key("documento")
        .row_key("id_cliente")
        .target(ExternalTarget::dataset("AD_TGSPAR"))
        .field(FieldMapping::column("ID", "id_cliente", ExternalType::Integer));

    TEXT_FIELDS
        .iter()
        .fold(builder, |builder, (target, column)| {
            builder.field(FieldMapping::column(target, column, ExternalType::Text))
        })
        .build()
}

pub fn serial_numbers() -> SyncEntity {
    SyncEntityBuilder::new(EntityKind::SerialNumbers.as_str(), "pedido_itens")
        .columns(&["id_item", "id_pedido", "numeros_serie"])
        .marker("integradoser")
        .key("id_item")
        .expand("numeros_serie")
        .target(ExternalTarget::dataset("AD_TGSSER"))
        .field(FieldMapping::column("IDITEM", "id_item", ExternalType::Integer))
        .field(FieldMapping::column("NUPED", "id_pedido", ExternalType::Integer))
        .field(FieldMapping::element("SERIE", ExternalType::Text))
        .build()
}

pub fn municipalities(source_url: &str) -> ReferenceEntity {
    ReferenceEntity {
        name: "municipalities".to_string(),
        source_url: source_url.to_string(),
        target: ExternalTarget::dataset("AD_TGSMDF"),
        id_field: "ID".to_string(),
        name_field: "MUNICIPIO".to_string(),
    }
}

/// Catalog listing printed by `erpsync entities`.
#[derive(Debug, Serialize)]
pub struct Catalog {
    pub entities: Vec<SyncEntity>,
    pub references: Vec<ReferenceEntity>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Catalog {
            entities: EntityKind::ALL.iter().map(EntityKind::entity).collect(),
            references: vec![municipalities(IBGE_MUNICIPIOS_URL)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::entity::FieldSource;

    #[test]
    fn test_entity_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
            assert_eq!(kind.entity().name, kind.as_str());
        }
        assert_eq!(
            "invoices".parse::<EntityKind>(),
            Err(ConfigError::UnknownEntity("invoices".into()))
        );
    }

    #[test]
    fn test_every_column_mapping_is_selected() {
        for kind in EntityKind::ALL {
            let entity = kind.entity();
            for field in &entity.fields {
                if let FieldSource::Column(column) = &field.source {
                    assert!(
                        entity.columns.contains(column),
                        "{}: {} not selected",
                        entity.name,
                        column
                    );
                }
            }
            assert!(entity.columns.contains(&entity.natural_key));
            assert!(entity.columns.contains(&entity.row_key));
        }
    }

    #[test]
    fn test_clients_dedup_by_document_and_mark_by_id() {
        let entity = clients();
        assert_eq!(entity.natural_key, "documento");
        assert_eq!(entity.row_key, "id_cliente");
        assert_eq!(entity.fields.len(), 12);
        assert_eq!(entity.fields[0].target, "ID");
        assert_eq!(entity.fields[11].target, "COMPLEMENTO");
    }

    #[test]
    fn test_serial_numbers_share_the_items_table() {
        let entity = serial_numbers();
        assert_eq!(entity.table, order_items().table);
        assert_eq!(entity.marker, "integradoser");
        assert_eq!(entity.expand.as_deref(), Some("numeros_serie"));
        assert_eq!(entity.target.entity_name, "AD_TGSSER");
    }

    #[test]
    fn test_catalog_serializes() {
        let json = serde_json::to_value(Catalog::builtin()).unwrap();
        assert_eq!(json["entities"].as_array().unwrap().len(), 4);
        assert_eq!(json["references"][0]["target"]["entity_name"], "AD_TGSMDF");
    }
}
