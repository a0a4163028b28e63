use super::{EngineOptions, SecretEngine};
use crate::client::Client;
use crate::error::VaultError;
use crate::request::{self, RequestOptions};
use crate::transport::Method;
use async_trait::async_trait;
use serde_json::{json, Value};

/// REST-conventional engine: read→GET, write→POST, list→GET with
/// `list=true`, delete→DELETE. Works against KV v1 and most other mounts.
pub struct GenericEngine;

/// Applies Vault's envelope rules to a decoded response body.
///
/// An empty body is success with no data. A present `errors` list is a
/// remote failure: empty means "key not found", non-empty carries the
/// server's messages verbatim. Otherwise the `data` sub-value is the
/// payload, unless the caller asked for the full envelope.
pub(crate) fn unwrap_response(
    body: Option<Value>,
    options: &EngineOptions,
) -> Result<Value, VaultError> {
    let Some(body) = body else {
        return Ok(json!({}));
    };

    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if errors.is_empty() {
            return Err(VaultError::KeyNotFound);
        }
        let messages = errors
            .iter()
            .map(|e| match e {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        return Err(VaultError::Vault(messages));
    }

    if options.full_response {
        return Ok(body);
    }

    match body.get("data") {
        Some(data) => Ok(data.clone()),
        None => Err(VaultError::unexpected("Unknown response from vault", body)),
    }
}

fn request_options(body: Option<Value>, options: &EngineOptions) -> RequestOptions {
    RequestOptions {
        body,
        query: options.query.clone(),
        ..Default::default()
    }
}

#[async_trait]
impl SecretEngine for GenericEngine {
    async fn read(
        &self,
        client: &Client,
        path: &str,
        options: &EngineOptions,
    ) -> Result<Value, VaultError> {
        let method = options.method.unwrap_or(Method::Get);
        let body = request::dispatch(client, method, path, request_options(None, options)).await?;
        unwrap_response(body, options)
    }

    async fn write(
        &self,
        client: &Client,
        path: &str,
        value: Value,
        options: &EngineOptions,
    ) -> Result<Value, VaultError> {
        let method = options.method.unwrap_or(Method::Post);
        let body =
            request::dispatch(client, method, path, request_options(Some(value), options)).await?;
        unwrap_response(body, options)
    }

    async fn list(
        &self,
        client: &Client,
        path: &str,
        options: &EngineOptions,
    ) -> Result<Value, VaultError> {
        let method = options.method.unwrap_or(Method::Get);
        let mut req = request_options(None, options);
        req.query.push(("list".to_string(), "true".to_string()));
        let body = request::dispatch(client, method, path, req).await?;
        unwrap_response(body, options)
    }

    async fn delete(
        &self,
        client: &Client,
        path: &str,
        options: &EngineOptions,
    ) -> Result<Value, VaultError> {
        let method = options.method.unwrap_or(Method::Delete);
        let body = request::dispatch(client, method, path, request_options(None, options)).await?;
        unwrap_response(body, options)
    }
}
