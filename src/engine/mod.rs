mod generic;
mod kv2;

pub use generic::GenericEngine;
pub use kv2::Kv2Engine;

use crate::client::Client;
use crate::error::VaultError;
use crate::transport::Method;
use async_trait::async_trait;
use serde_json::Value;

/// Per-call options understood by the secret engines.
///
/// Engines ignore the fields that do not apply to them; `Default` gives the
/// plain behavior described by each operation.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Override the engine's default HTTP verb for this operation.
    pub method: Option<Method>,
    /// Return the entire decoded envelope instead of the unwrapped `data`.
    pub full_response: bool,
    /// KV v2 read: select an explicit secret version.
    pub version: Option<u64>,
    /// KV v2 write: check-and-set guard. 0 = only if absent, N = current version must be N.
    pub cas: Option<u64>,
    /// KV v2 delete: versions to delete or destroy.
    pub versions: Vec<u64>,
    /// KV v2 delete: permanently destroy instead of soft delete.
    pub destroy: bool,
    /// Extra query parameters forwarded to the pipeline.
    pub query: Vec<(String, String)>,
}

/// Uniform contract every secret engine translates into HTTP calls.
#[async_trait]
pub trait SecretEngine: Send + Sync {
    async fn read(
        &self,
        client: &Client,
        path: &str,
        options: &EngineOptions,
    ) -> Result<Value, VaultError>;

    async fn write(
        &self,
        client: &Client,
        path: &str,
        value: Value,
        options: &EngineOptions,
    ) -> Result<Value, VaultError>;

    async fn list(
        &self,
        client: &Client,
        path: &str,
        options: &EngineOptions,
    ) -> Result<Value, VaultError>;

    async fn delete(
        &self,
        client: &Client,
        path: &str,
        options: &EngineOptions,
    ) -> Result<Value, VaultError>;
}
