use crate::sql::base::error::DbError;
use model::entity::SyncEntity;

/// Quotes a MySQL identifier. Names are taken from the entity catalog, so
/// anything that could escape the quoting is refused instead of escaped.
pub fn quote_ident(name: &str) -> Result<String, DbError> {
    if name.is_empty() || name.contains('`') || name.contains('\0') {
        return Err(DbError::QueryBuildError(format!(
            "invalid identifier: {name:?}"
        )));
    }
    Ok(format!("`{name}`"))
}

/// `SELECT <columns> FROM <table> WHERE <marker> IS NULL`
pub fn select_pending(entity: &SyncEntity) -> Result<String, DbError> {
    if entity.columns.is_empty() {
        return Err(DbError::QueryBuildError(format!(
            "entity '{}' declares no columns",
            entity.name
        )));
    }

    let columns = entity
        .columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");

    Ok(format!(
        "SELECT {columns} FROM {} WHERE {} IS NULL",
        quote_ident(&entity.table)?,
        quote_ident(&entity.marker)?
    ))
}

/// `UPDATE <table> SET <marker> = TRUE WHERE <row key> = ?`
pub fn mark_integrated(entity: &SyncEntity) -> Result<String, DbError> {
    Ok(format!(
        "UPDATE {} SET {} = TRUE WHERE {} = ?",
        quote_ident(&entity.table)?,
        quote_ident(&entity.marker)?,
        quote_ident(&entity.row_key)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::entity::SyncEntityBuilder;

    fn clients() -> SyncEntity {
        SyncEntityBuilder::new("clients", "clientes")
            .columns(&["id_cliente", "nome", "documento"])
            .natural_key("documento")
            .row_key("id_cliente")
            .build()
    }

    #[test]
    fn test_select_pending() {
        assert_eq!(
            select_pending(&clients()).unwrap(),
            "SELECT `id_cliente`, `nome`, `documento` FROM `clientes` WHERE `integrado` IS NULL"
        );
    }

    #[test]
    fn test_mark_uses_row_key_not_natural_key() {
        assert_eq!(
            mark_integrated(&clients()).unwrap(),
            "UPDATE `clientes` SET `integrado` = TRUE WHERE `id_cliente` = ?"
        );
    }

    #[test]
    fn test_custom_marker() {
        let entity = SyncEntityBuilder::new("serial-numbers", "pedido_itens")
            .columns(&["id_item", "numeros_serie"])
            .marker("integradoser")
            .key("id_item")
            .build();
        assert_eq!(
            mark_integrated(&entity).unwrap(),
            "UPDATE `pedido_itens` SET `integradoser` = TRUE WHERE `id_item` = ?"
        );
    }

    #[test]
    fn test_rejects_unsafe_identifiers() {
        assert!(quote_ident("a`b").is_err());
        assert!(quote_ident("").is_err());

        let entity = SyncEntityBuilder::new("empty", "t").build();
        assert!(matches!(
            select_pending(&entity),
            Err(DbError::QueryBuildError(_))
        ));
    }
}
