use crate::auth::AuthMethod;
use crate::codec::Codec;
use crate::engine::{EngineOptions, GenericEngine, SecretEngine};
use crate::error::VaultError;
use crate::request::{self, RequestOptions};
use crate::transport::{Method, Transport};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Client configuration and authentication state.
///
/// A `Client` is a value: every setter consumes and returns it, and a
/// successful `auth` returns a fresh copy carrying the new token. Nothing in
/// this crate mutates a client in place, so sharing one across tasks is a
/// matter of cloning it.
#[derive(Clone)]
pub struct Client {
    host: String,
    transport: Option<Arc<dyn Transport>>,
    codec: Option<Arc<dyn Codec>>,
    auth: Option<Arc<dyn AuthMethod>>,
    auth_path: Option<String>,
    engine: Arc<dyn SecretEngine>,
    token: Option<String>,
    token_expires_at: Option<DateTime<Utc>>,
    credentials: Map<String, Value>,
    transport_options: Value,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.host)
            .field("auth_path", &self.auth_path)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_expires_at", &self.token_expires_at)
            .finish_non_exhaustive()
    }
}

/// Strips trailing slashes and defaults the scheme to https.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

impl Client {
    pub fn new(host: impl AsRef<str>) -> Self {
        Self {
            host: normalize_host(host.as_ref()),
            transport: None,
            codec: None,
            auth: None,
            auth_path: None,
            engine: Arc::new(GenericEngine),
            token: None,
            token_expires_at: None,
            credentials: Map::new(),
            transport_options: Value::Null,
        }
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    pub fn with_auth(mut self, auth: impl AuthMethod + 'static) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    /// Mount segment under `/auth/`; adapters fall back to their own default
    /// when this is unset.
    pub fn with_auth_path(mut self, path: impl Into<String>) -> Self {
        self.auth_path = Some(path.into());
        self
    }

    pub fn with_engine(mut self, engine: impl SecretEngine + 'static) -> Self {
        self.engine = Arc::new(engine);
        self
    }

    pub fn with_token(mut self, token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        self.token = Some(token.into());
        self.token_expires_at = Some(expires_at);
        self
    }

    /// Pre-seeds login parameters so later `auth` calls can omit them.
    pub fn with_credentials(mut self, credentials: Map<String, Value>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Opaque settings forwarded verbatim to the transport on every request.
    pub fn with_transport_options(mut self, options: Value) -> Self {
        self.transport_options = options;
        self
    }

    pub(crate) fn host(&self) -> &str {
        &self.host
    }

    pub(crate) fn transport(&self) -> Option<&Arc<dyn Transport>> {
        self.transport.as_ref()
    }

    pub(crate) fn codec(&self) -> Option<&Arc<dyn Codec>> {
        self.codec.as_ref()
    }

    pub(crate) fn auth_path(&self) -> Option<&str> {
        self.auth_path.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Stored login parameters; grows by shallow merge on every `auth` call.
    pub fn credentials(&self) -> &Map<String, Value> {
        &self.credentials
    }

    pub(crate) fn transport_options(&self) -> &Value {
        &self.transport_options
    }

    /// True when no expiry is recorded or the recorded expiry has passed.
    /// Evaluated against the clock on every call.
    pub fn token_expired(&self) -> bool {
        match self.token_expires_at {
            Some(expires_at) => expires_at < Utc::now(),
            None => true,
        }
    }

    fn require_transport(&self) -> Result<(), VaultError> {
        if self.transport.is_none() {
            return Err(VaultError::Config("Http transport not set".to_string()));
        }
        Ok(())
    }

    /// Logs in through the configured auth adapter and returns a new client
    /// carrying the token, its absolute expiry, and the merged credentials.
    ///
    /// `params` is shallow-merged over the stored credentials, so repeated
    /// re-authentication can omit unchanged fields. No automatic renewal
    /// happens anywhere; check `token_expired` and call this again.
    pub async fn auth(&self, params: Map<String, Value>) -> Result<Client, VaultError> {
        self.require_transport()?;
        let auth = self
            .auth
            .clone()
            .ok_or_else(|| VaultError::Config("Auth adapter not set".to_string()))?;

        let mut credentials = self.credentials.clone();
        for (key, value) in params {
            credentials.insert(key, value);
        }

        let info = auth.login(self, &credentials).await?;
        debug!(lease_duration = info.lease_duration, "vault login succeeded");

        let mut next = self.clone();
        next.token = Some(info.token);
        next.token_expires_at = Some(Utc::now() + Duration::seconds(info.lease_duration as i64));
        next.credentials = credentials;
        Ok(next)
    }

    pub async fn read(&self, path: &str, options: EngineOptions) -> Result<Value, VaultError> {
        self.require_transport()?;
        let path = path.trim_start_matches('/');
        debug!(path, "vault read");
        self.engine.read(self, path, &options).await
    }

    /// Writes `value` at `path`. The success payload carries the written
    /// value under `"value"` alongside any engine-returned metadata;
    /// engine-returned keys win on collision so server data is never
    /// clobbered.
    pub async fn write(
        &self,
        path: &str,
        value: Value,
        options: EngineOptions,
    ) -> Result<Value, VaultError> {
        self.require_transport()?;
        let path = path.trim_start_matches('/');
        debug!(path, "vault write");
        let response = self
            .engine
            .write(self, path, value.clone(), &options)
            .await?;

        match response {
            Value::Object(returned) => {
                let mut merged = Map::new();
                merged.insert("value".to_string(), value);
                for (key, entry) in returned {
                    merged.insert(key, entry);
                }
                Ok(Value::Object(merged))
            }
            other => Ok(other),
        }
    }

    pub async fn list(&self, path: &str, options: EngineOptions) -> Result<Value, VaultError> {
        self.require_transport()?;
        let path = path.trim_start_matches('/');
        debug!(path, "vault list");
        self.engine.list(self, path, &options).await
    }

    pub async fn delete(&self, path: &str, options: EngineOptions) -> Result<Value, VaultError> {
        self.require_transport()?;
        let path = path.trim_start_matches('/');
        debug!(path, "vault delete");
        self.engine.delete(self, path, &options).await
    }

    /// Escape hatch to the raw request pipeline for endpoints the engine
    /// contract does not cover (sys mounts, token renewal, health).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<Value>, VaultError> {
        self.require_transport()?;
        request::dispatch(self, method, path, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host_trailing_slash() {
        assert_eq!(
            normalize_host("http://vault:8200/"),
            "http://vault:8200"
        );
    }

    #[test]
    fn test_normalize_host_defaults_scheme() {
        assert_eq!(normalize_host("vault:8200"), "https://vault:8200");
        assert_eq!(normalize_host("https://vault:8200"), "https://vault:8200");
    }

    #[test]
    fn test_fresh_client_token_expired() {
        let client = Client::new("http://vault:8200");
        assert!(client.token_expired());
    }

    #[test]
    fn test_token_expired_boundaries() {
        let client = Client::new("http://vault:8200");

        let past = client
            .clone()
            .with_token("t", Utc::now() - Duration::seconds(5));
        assert!(past.token_expired());

        let future = client.with_token("t", Utc::now() + Duration::seconds(3600));
        assert!(!future.token_expired());
    }

    #[tokio::test]
    async fn test_read_without_transport_is_config_error() {
        let client = Client::new("http://vault:8200");
        let err = client
            .read("secret/foo", EngineOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Config(_)));
    }

    #[tokio::test]
    async fn test_auth_without_adapter_is_config_error() {
        let client = Client::new("http://vault:8200")
            .with_transport(crate::transport::ReqwestTransport::new());
        let err = client.auth(Map::new()).await.unwrap_err();
        match err {
            VaultError::Config(message) => assert!(message.contains("Auth adapter")),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
