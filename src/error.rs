use serde_json::Value;
use thiserror::Error;

/// Uniform error shape for every layer of the client.
///
/// Callers can match on a single enum regardless of whether the failure came
/// from local configuration, credential validation, the HTTP transport, the
/// JSON codec, or the Vault server itself.
#[derive(Debug, Error)]
pub enum VaultError {
    /// A required adapter or setting is missing; detected before any network call.
    #[error("{0}")]
    Config(String),

    /// Locally rejected input (missing credentials, missing required options).
    #[error("{0}")]
    Validation(String),

    /// The transport capability itself failed.
    #[error("Http adapter error: {0}")]
    HttpAdapter(String),

    /// The codec capability failed to encode or decode a body.
    #[error("Codec error: {0}")]
    Codec(String),

    /// Vault responded with a non-empty `errors` list; messages pass through verbatim.
    #[error("Vault error: {}", .0.join(", "))]
    Vault(Vec<String>),

    /// Vault signalled an empty `errors` list, or a KV v2 version was soft-deleted.
    #[error("Key not found")]
    KeyNotFound,

    /// A successful response whose shape matches no recognized pattern.
    #[error("Unexpected response from vault: {context}: {body}")]
    UnexpectedResponse { context: String, body: Value },
}

impl VaultError {
    pub(crate) fn unexpected(context: impl Into<String>, body: Value) -> Self {
        VaultError::UnexpectedResponse {
            context: context.into(),
            body,
        }
    }
}
