use crate::error::ConfigError;
use bulk::BulkSettings;
use database::DatabaseSettings;
use erp::ErpSettings;
use policy::{TOKEN_POLICY, TokenPolicy};
use std::collections::HashMap;
use vars::VarReader;

pub mod bulk;
pub mod database;
pub mod erp;
pub mod policy;
pub mod vars;

/// Settings for the per-row entity syncs.
#[derive(Debug, Clone)]
pub struct RowSyncSettings {
    pub erp: ErpSettings,
    pub database: DatabaseSettings,
    pub token_policy: TokenPolicy,
}

impl RowSyncSettings {
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut reader = VarReader::new(vars);
        let erp = ErpSettings::read(&mut reader);
        let database = DatabaseSettings::read(&mut reader)?;
        let token_policy = reader.parsed_or(TOKEN_POLICY, TokenPolicy::default())?;
        reader.finish()?;

        Ok(RowSyncSettings {
            erp,
            database,
            token_policy,
        })
    }
}

/// Settings for the bulk reference load. No database is involved.
#[derive(Debug, Clone)]
pub struct BulkSyncSettings {
    pub erp: ErpSettings,
    pub bulk: BulkSettings,
}

impl BulkSyncSettings {
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut reader = VarReader::new(vars);
        let erp = ErpSettings::read(&mut reader);
        let bulk = BulkSettings::read(&reader)?;
        reader.finish()?;

        Ok(BulkSyncSettings { erp, bulk })
    }
}

/// ERP settings alone, for connectivity checks.
pub fn erp_from_vars(vars: &HashMap<String, String>) -> Result<ErpSettings, ConfigError> {
    let mut reader = VarReader::new(vars);
    let erp = ErpSettings::read(&mut reader);
    reader.finish()?;
    Ok(erp)
}

/// Database settings alone, for connectivity checks.
pub fn database_from_vars(
    vars: &HashMap<String, String>,
) -> Result<DatabaseSettings, ConfigError> {
    let mut reader = VarReader::new(vars);
    let database = DatabaseSettings::read(&mut reader)?;
    reader.finish()?;
    Ok(database)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn erp_vars() -> HashMap<String, String> {
        [
            ("SANKHYA_AUTH_URL", "https://erp/login"),
            ("SANKHYA_API_URL", "https://erp/service"),
            ("SANKHYA_APP_KEY", "key"),
            ("SANKHYA_AUTH_TOKEN", "token"),
            ("SANKHYA_USERNAME", "user"),
            ("SANKHYA_PASSWORD", "pass"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn row_vars() -> HashMap<String, String> {
        let mut vars = erp_vars();
        vars.insert("MYSQL_HOST".into(), "db.local".into());
        vars.insert("MYSQL_USER".into(), "sync".into());
        vars.insert("MYSQL_PASSWORD".into(), "secret".into());
        vars.insert("MYSQL_DATABASE".into(), "loja".into());
        vars
    }

    #[test]
    fn test_row_settings_defaults() {
        let settings = RowSyncSettings::from_vars(&row_vars()).unwrap();
        assert_eq!(settings.database.connect.port, 3306);
        assert_eq!(settings.database.connect.host, "db.local");
        assert_eq!(settings.token_policy, TokenPolicy::PerRecord);
        assert_eq!(settings.erp.api_url, "https://erp/service");
    }

    #[test]
    fn test_missing_vars_are_all_reported() {
        let mut vars = row_vars();
        vars.remove("SANKHYA_APP_KEY");
        vars.remove("MYSQL_DATABASE");
        vars.insert("SANKHYA_PASSWORD".into(), "   ".into());

        let err = RowSyncSettings::from_vars(&vars).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingVars(vec![
                "SANKHYA_APP_KEY".into(),
                "SANKHYA_PASSWORD".into(),
                "MYSQL_DATABASE".into(),
            ])
        );
    }

    #[test]
    fn test_invalid_port_and_policy() {
        let mut vars = row_vars();
        vars.insert("MYSQL_PORT".into(), "abc".into());
        assert!(matches!(
            RowSyncSettings::from_vars(&vars),
            Err(ConfigError::Invalid { key, .. }) if key == "MYSQL_PORT"
        ));

        let mut vars = row_vars();
        vars.insert("SYNC_TOKEN_POLICY".into(), "per-run".into());
        let settings = RowSyncSettings::from_vars(&vars).unwrap();
        assert_eq!(settings.token_policy, TokenPolicy::PerRun);

        vars.insert("SYNC_TOKEN_POLICY".into(), "sometimes".into());
        assert!(RowSyncSettings::from_vars(&vars).is_err());
    }

    #[test]
    fn test_bulk_settings_need_no_database() {
        let settings = BulkSyncSettings::from_vars(&erp_vars()).unwrap();
        assert_eq!(settings.bulk.chunk_size, 500);
        assert_eq!(settings.bulk.auth_timeout, Duration::from_secs(60));
        assert_eq!(settings.bulk.upload_timeout, Duration::from_secs(120));
        assert!(settings.bulk.source_url.contains("ibge.gov.br"));
    }

    #[test]
    fn test_bulk_chunk_size_must_be_positive() {
        let mut vars = erp_vars();
        vars.insert("SYNC_CHUNK_SIZE".into(), "0".into());
        assert!(matches!(
            BulkSyncSettings::from_vars(&vars),
            Err(ConfigError::Invalid { key, .. }) if key == "SYNC_CHUNK_SIZE"
        ));

        assert!(BulkSettings::default().with_chunk_size(0).is_err());
        assert_eq!(
            BulkSettings::default().with_chunk_size(2).unwrap().chunk_size,
            2
        );
    }
}
