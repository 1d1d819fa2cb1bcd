use crate::sql::{
    base::error::{ConnectorError, DbError},
    mysql::{params::MySqlParamStore, query, row::to_row_data},
};
use model::{core::value::Value, entity::SyncEntity, records::row::RowData};
use mysql_async::{Conn, OptsBuilder, Row, prelude::*};
use std::fmt;
use tracing::{debug, info};

/// Connection parameters for the source database.
#[derive(Clone)]
pub struct MySqlConnectParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl fmt::Debug for MySqlConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlConnectParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl MySqlConnectParams {
    fn opts(&self) -> OptsBuilder {
        OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(Some(self.password.clone()))
            .db_name(Some(self.database.clone()))
    }
}

/// A single MySQL connection held for the duration of one run.
///
/// Statements run in autocommit mode, so every marker update is durable as
/// soon as `mark_integrated` returns.
pub struct MySqlAdapter {
    conn: Conn,
}

impl MySqlAdapter {
    pub async fn connect(params: &MySqlConnectParams) -> Result<Self, ConnectorError> {
        if params.host.is_empty() {
            return Err(ConnectorError::InvalidSettings("empty MySQL host".into()));
        }

        info!(
            host = %params.host,
            port = params.port,
            database = %params.database,
            "Connecting to MySQL"
        );
        let conn = Conn::new(params.opts()).await?;
        Ok(MySqlAdapter { conn })
    }

    pub async fn ping(&mut self) -> Result<(), DbError> {
        let val: Option<i32> = self.conn.query_first("SELECT 1").await?;
        match val {
            Some(1) => Ok(()),
            Some(other) => Err(DbError::Unknown(format!(
                "ping returned unexpected result: {other}"
            ))),
            None => Err(DbError::Unknown("ping returned no result".into())),
        }
    }

    pub async fn fetch_pending(&mut self, entity: &SyncEntity) -> Result<Vec<RowData>, DbError> {
        let sql = query::select_pending(entity)?;
        debug!("Generated SQL: {}", sql);

        let rows: Vec<Row> = self.conn.exec(sql.as_str(), ()).await?;
        Ok(rows
            .iter()
            .map(|row| to_row_data(&entity.table, row))
            .collect())
    }

    /// Flips the integration marker for every row matching `key`.
    /// Returns the number of affected rows.
    pub async fn mark_integrated(
        &mut self,
        entity: &SyncEntity,
        key: &Value,
    ) -> Result<u64, DbError> {
        let sql = query::mark_integrated(entity)?;
        let params = MySqlParamStore::from_values(std::slice::from_ref(key));

        self.conn.exec_drop(sql.as_str(), params.params()).await?;
        Ok(self.conn.affected_rows())
    }

    pub async fn close(self) -> Result<(), DbError> {
        self.conn.disconnect().await?;
        Ok(())
    }
}
