use crate::erp::error::ErpError;
use reqwest::Client;
use std::{fmt, time::Duration};
use tracing::debug;

/// Static credentials presented to the ERP's authentication endpoint.
#[derive(Clone)]
pub struct ErpCredentials {
    pub auth_url: String,
    pub app_key: String,
    pub token: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ErpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErpCredentials")
            .field("auth_url", &self.auth_url)
            .field("app_key", &"***")
            .field("token", &"***")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// A bearer token issued by the ERP. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

pub struct ErpAuthenticator {
    http: Client,
    credentials: ErpCredentials,
    timeout: Option<Duration>,
}

impl ErpAuthenticator {
    pub fn new(http: Client, credentials: ErpCredentials) -> Self {
        Self {
            http,
            credentials,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exchanges the static credentials for a bearer token.
    pub async fn authenticate(&self) -> Result<BearerToken, ErpError> {
        debug!(url = %self.credentials.auth_url, "Requesting bearer token");

        let mut request = self
            .http
            .post(&self.credentials.auth_url)
            .header("AppKey", &self.credentials.app_key)
            .header("Token", &self.credentials.token)
            .header("Username", &self.credentials.username)
            .header("Password", &self.credentials.password);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        extract_bearer_token(status, &body)
    }
}

/// Reads `bearerToken` out of an authentication response.
pub fn extract_bearer_token(status: u16, body: &str) -> Result<BearerToken, ErpError> {
    if status != 200 {
        return Err(ErpError::Auth {
            status,
            body: body.to_string(),
        });
    }

    let json: serde_json::Value = serde_json::from_str(body)?;
    json.get("bearerToken")
        .and_then(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .map(BearerToken::new)
        .ok_or(ErpError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_token() {
        let token = extract_bearer_token(200, r#"{"bearerToken":"abc.def"}"#).unwrap();
        assert_eq!(token.as_str(), "abc.def");
    }

    #[test]
    fn test_missing_or_empty_token() {
        assert!(matches!(
            extract_bearer_token(200, r#"{"error":"nope"}"#),
            Err(ErpError::MissingToken)
        ));
        assert!(matches!(
            extract_bearer_token(200, r#"{"bearerToken":""}"#),
            Err(ErpError::MissingToken)
        ));
    }

    #[test]
    fn test_non_200_is_an_auth_failure() {
        match extract_bearer_token(401, "unauthorized") {
            Err(ErpError::Auth { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_secrets_are_not_printed() {
        let creds = ErpCredentials {
            auth_url: "https://erp/login".into(),
            app_key: "k".into(),
            token: "t".into(),
            username: "u".into(),
            password: "secret".into(),
        };
        let printed = format!("{creds:?} {:?}", BearerToken::new("xyz"));
        assert!(!printed.contains("secret"));
        assert!(!printed.contains("xyz"));
    }
}
