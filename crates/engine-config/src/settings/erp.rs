use super::vars::VarReader;
use connectors::erp::auth::ErpCredentials;

pub const AUTH_URL: &str = "SANKHYA_AUTH_URL";
pub const API_URL: &str = "SANKHYA_API_URL";
pub const APP_KEY: &str = "SANKHYA_APP_KEY";
pub const AUTH_TOKEN: &str = "SANKHYA_AUTH_TOKEN";
pub const USERNAME: &str = "SANKHYA_USERNAME";
pub const PASSWORD: &str = "SANKHYA_PASSWORD";

#[derive(Debug, Clone)]
pub struct ErpSettings {
    pub credentials: ErpCredentials,
    pub api_url: String,
}

impl ErpSettings {
    pub(crate) fn read(vars: &mut VarReader<'_>) -> Self {
        ErpSettings {
            credentials: ErpCredentials {
                auth_url: vars.required(AUTH_URL),
                app_key: vars.required(APP_KEY),
                token: vars.required(AUTH_TOKEN),
                username: vars.required(USERNAME),
                password: vars.required(PASSWORD),
            },
            api_url: vars.required(API_URL),
        }
    }
}
