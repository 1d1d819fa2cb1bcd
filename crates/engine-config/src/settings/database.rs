use super::vars::VarReader;
use crate::error::ConfigError;
use connectors::sql::mysql::adapter::MySqlConnectParams;

pub const HOST: &str = "MYSQL_HOST";
pub const PORT: &str = "MYSQL_PORT";
pub const USER: &str = "MYSQL_USER";
pub const PASSWORD: &str = "MYSQL_PASSWORD";
pub const DATABASE: &str = "MYSQL_DATABASE";

pub const DEFAULT_PORT: u16 = 3306;

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub connect: MySqlConnectParams,
}

impl DatabaseSettings {
    pub(crate) fn read(vars: &mut VarReader<'_>) -> Result<Self, ConfigError> {
        let port = vars.parsed_or(PORT, DEFAULT_PORT)?;
        Ok(DatabaseSettings {
            connect: MySqlConnectParams {
                host: vars.required(HOST),
                port,
                user: vars.required(USER),
                password: vars.required(PASSWORD),
                database: vars.required(DATABASE),
            },
        })
    }
}
