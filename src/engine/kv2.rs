use super::{EngineOptions, GenericEngine, SecretEngine};
use crate::client::Client;
use crate::error::VaultError;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Versioned key-value engine (KV v2).
///
/// Every sub-resource sits directly under the mount point, so
/// `secret/app/db` becomes `secret/data/app/db`, `secret/metadata/app/db`,
/// and so on. Payloads are nested one level deeper than the generic
/// envelope (`data.data`).
pub struct Kv2Engine;

/// Interposes a sub-resource word between the mount and the secret path.
fn insert_segment(path: &str, segment: &str) -> String {
    match path.split_once('/') {
        Some((mount, rest)) => format!("{}/{}/{}", mount, segment, rest),
        None => format!("{}/{}", path, segment),
    }
}

#[async_trait]
impl SecretEngine for Kv2Engine {
    async fn read(
        &self,
        client: &Client,
        path: &str,
        options: &EngineOptions,
    ) -> Result<Value, VaultError> {
        let path = insert_segment(path, "data");
        let mut options = options.clone();
        if let Some(version) = options.version {
            options
                .query
                .push(("version".to_string(), version.to_string()));
        }

        let result = GenericEngine.read(client, &path, &options).await?;
        if options.full_response {
            return Ok(result);
        }

        // A soft-deleted version comes back as HTTP 200 with a null inner
        // payload rather than a 404.
        match result.get("data") {
            Some(Value::Null) | None => Err(VaultError::KeyNotFound),
            Some(data) => Ok(data.clone()),
        }
    }

    async fn write(
        &self,
        client: &Client,
        path: &str,
        value: Value,
        options: &EngineOptions,
    ) -> Result<Value, VaultError> {
        let path = insert_segment(path, "data");
        let payload = match options.cas {
            Some(cas) => json!({"data": value, "options": {"cas": cas}}),
            None => json!({"data": value}),
        };
        GenericEngine.write(client, &path, payload, options).await
    }

    async fn list(
        &self,
        client: &Client,
        path: &str,
        options: &EngineOptions,
    ) -> Result<Value, VaultError> {
        let path = insert_segment(path, "metadata");
        GenericEngine.list(client, &path, options).await
    }

    async fn delete(
        &self,
        client: &Client,
        path: &str,
        options: &EngineOptions,
    ) -> Result<Value, VaultError> {
        if options.versions.is_empty() {
            return Err(VaultError::Validation(
                "A list of versions is required".to_string(),
            ));
        }

        let segment = if options.destroy { "destroy" } else { "delete" };
        let path = insert_segment(path, segment);
        let payload = json!({"versions": options.versions});

        let mut options = options.clone();
        options.method = None;
        GenericEngine.write(client, &path, payload, &options).await
    }
}
