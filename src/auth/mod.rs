mod approle;
mod token;
mod userpass;

pub use approle::ApproleAuth;
pub use token::TokenAuth;
pub use userpass::UserpassAuth;

use crate::client::Client;
use crate::error::VaultError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Token and lease returned by a successful login.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub token: String,
    /// Remaining validity in seconds.
    pub lease_duration: u64,
}

/// Trait for authentication backends.
#[async_trait]
pub trait AuthMethod: Send + Sync {
    async fn login(
        &self,
        client: &Client,
        params: &Map<String, Value>,
    ) -> Result<TokenInfo, VaultError>;
}

/// Resolves the auth mount: the client's configured path, or the adapter's
/// canonical default. Applied per call; never written back into the client.
pub(crate) fn mount_path<'a>(client: &'a Client, default: &'a str) -> &'a str {
    client.auth_path().unwrap_or(default)
}

/// Validates that every required key is present and holds a string, and
/// returns the extracted values in order. All missing or non-string fields
/// are reported in one message, before any network traffic.
pub(crate) fn require_strings<'a>(
    params: &'a Map<String, Value>,
    required: &[&str],
) -> Result<Vec<&'a str>, VaultError> {
    let mut values = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for &key in required {
        match params.get(key).and_then(Value::as_str) {
            Some(value) => values.push(value),
            None => missing.push(key),
        }
    }
    if missing.is_empty() {
        Ok(values)
    } else {
        Err(VaultError::Validation(format!(
            "Missing credentials - {} must be set and strings",
            missing.join(" and ")
        )))
    }
}

/// Pulls a non-empty `errors` list out of a response body, if present.
pub(crate) fn error_messages(body: &Value) -> Option<Vec<String>> {
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    Some(
        errors
            .iter()
            .map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
    )
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: AuthData,
}

#[derive(Deserialize)]
struct AuthData {
    client_token: String,
    lease_duration: u64,
}

/// Parses the shared login envelope: a non-empty `errors` list is a login
/// failure passed through verbatim; `auth.client_token` + `auth.lease_duration`
/// is success; anything else is a protocol mismatch.
pub(crate) fn parse_login(body: Option<Value>) -> Result<TokenInfo, VaultError> {
    let Some(body) = body else {
        return Err(VaultError::unexpected(
            "Unexpected response from vault",
            Value::Null,
        ));
    };

    if let Some(messages) = error_messages(&body) {
        return Err(VaultError::Vault(messages));
    }

    match serde_json::from_value::<LoginResponse>(body.clone()) {
        Ok(login) => Ok(TokenInfo {
            token: login.auth.client_token,
            lease_duration: login.auth.lease_duration,
        }),
        Err(_) => Err(VaultError::unexpected(
            "Unexpected response from vault",
            body,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn test_require_strings_ok() {
        let params = params(&[("username", "alice"), ("password", "hunter2")]);
        let values = require_strings(&params, &["username", "password"]).unwrap();
        assert_eq!(values, vec!["alice", "hunter2"]);
    }

    #[test]
    fn test_require_strings_reports_all_missing() {
        let params = params(&[("username", "alice")]);
        let err = require_strings(&params, &["role_id", "secret_id"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Missing credentials"));
        assert!(message.contains("role_id"));
        assert!(message.contains("secret_id"));
    }

    #[test]
    fn test_require_strings_rejects_non_string() {
        let mut params = Map::new();
        params.insert("username".to_string(), json!(42));
        let err = require_strings(&params, &["username"]).unwrap_err();
        assert!(err.to_string().contains("Missing credentials"));
    }

    #[test]
    fn test_parse_login_success() {
        let body = json!({
            "auth": {"client_token": "s.abc", "lease_duration": 3600, "renewable": true}
        });
        let info = parse_login(Some(body)).unwrap();
        assert_eq!(info.token, "s.abc");
        assert_eq!(info.lease_duration, 3600);
    }

    #[test]
    fn test_parse_login_remote_errors_verbatim() {
        let body = json!({"errors": ["invalid username or password"]});
        let err = parse_login(Some(body)).unwrap_err();
        match err {
            VaultError::Vault(messages) => {
                assert_eq!(messages, vec!["invalid username or password"]);
            }
            other => panic!("expected Vault error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_login_unexpected_shape() {
        let err = parse_login(Some(json!({"data": {}}))).unwrap_err();
        assert!(matches!(err, VaultError::UnexpectedResponse { .. }));
    }
}
