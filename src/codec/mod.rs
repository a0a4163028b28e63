mod json;

pub use json::JsonCodec;

use serde_json::Value;
use std::fmt;

/// Opaque codec failure, wrapped by the pipeline as `VaultError::Codec`.
#[derive(Debug)]
pub struct CodecError(pub String);

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for CodecError {}

/// Trait for the injected body codec.
///
/// Leaving the client's codec unset is a valid configuration: bodies then
/// pass through as raw bytes and responses surface as plain strings.
pub trait Codec: Send + Sync {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError>;
}
