use super::{mount_path, parse_login, require_strings, AuthMethod, TokenInfo};
use crate::client::Client;
use crate::error::VaultError;
use crate::request::{self, RequestOptions};
use crate::transport::Method;
use async_trait::async_trait;
use serde_json::{json, Map, Value};

const DEFAULT_MOUNT: &str = "userpass";

/// Username/password authentication.
///
/// Also serves LDAP-style backends mounted elsewhere: configure the
/// client's auth path to the mount name and the login convention is the same.
pub struct UserpassAuth;

#[async_trait]
impl AuthMethod for UserpassAuth {
    async fn login(
        &self,
        client: &Client,
        params: &Map<String, Value>,
    ) -> Result<TokenInfo, VaultError> {
        let values = require_strings(params, &["username", "password"])?;
        let (username, password) = (values[0], values[1]);

        let path = format!("auth/{}/login/{}", mount_path(client, DEFAULT_MOUNT), username);
        let body = request::dispatch(
            client,
            Method::Post,
            &path,
            RequestOptions::with_body(json!({"password": password})),
        )
        .await?;

        parse_login(body)
    }
}
