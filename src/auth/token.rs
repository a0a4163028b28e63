use super::{error_messages, mount_path, require_strings, AuthMethod, TokenInfo};
use crate::client::Client;
use crate::error::VaultError;
use crate::request::{self, RequestOptions};
use crate::transport::Method;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

const DEFAULT_MOUNT: &str = "token";

/// Token introspection: validates an existing token via `lookup-self` and
/// adopts it together with its remaining TTL. The candidate token travels as
/// a header, not a body.
pub struct TokenAuth;

#[derive(Deserialize)]
struct LookupResponse {
    data: LookupData,
}

#[derive(Deserialize)]
struct LookupData {
    id: String,
    ttl: u64,
}

#[async_trait]
impl AuthMethod for TokenAuth {
    async fn login(
        &self,
        client: &Client,
        params: &Map<String, Value>,
    ) -> Result<TokenInfo, VaultError> {
        let values = require_strings(params, &["token"])?;
        let token = values[0];

        let path = format!("auth/{}/lookup-self", mount_path(client, DEFAULT_MOUNT));
        let options = RequestOptions {
            headers: vec![("X-Vault-Token".to_string(), token.to_string())],
            ..Default::default()
        };
        let body = request::dispatch(client, Method::Get, &path, options).await?;

        let Some(body) = body else {
            return Err(VaultError::unexpected(
                "Unexpected response from vault",
                Value::Null,
            ));
        };

        if let Some(messages) = error_messages(&body) {
            return Err(VaultError::Vault(messages));
        }

        match serde_json::from_value::<LookupResponse>(body.clone()) {
            Ok(lookup) => Ok(TokenInfo {
                token: lookup.data.id,
                lease_duration: lookup.data.ttl,
            }),
            Err(_) => Err(VaultError::unexpected(
                "Unexpected response from vault",
                body,
            )),
        }
    }
}
