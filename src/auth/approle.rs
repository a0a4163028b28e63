use super::{mount_path, parse_login, require_strings, AuthMethod, TokenInfo};
use crate::client::Client;
use crate::error::VaultError;
use crate::request::{self, RequestOptions};
use crate::transport::Method;
use async_trait::async_trait;
use serde_json::{json, Map, Value};

const DEFAULT_MOUNT: &str = "approle";

/// AppRole authentication (`role_id` + `secret_id`).
pub struct ApproleAuth;

#[async_trait]
impl AuthMethod for ApproleAuth {
    async fn login(
        &self,
        client: &Client,
        params: &Map<String, Value>,
    ) -> Result<TokenInfo, VaultError> {
        let values = require_strings(params, &["role_id", "secret_id"])?;
        let (role_id, secret_id) = (values[0], values[1]);

        let path = format!("auth/{}/login", mount_path(client, DEFAULT_MOUNT));
        let body = request::dispatch(
            client,
            Method::Post,
            &path,
            RequestOptions::with_body(json!({
                "role_id": role_id,
                "secret_id": secret_id,
            })),
        )
        .await?;

        parse_login(body)
    }
}
