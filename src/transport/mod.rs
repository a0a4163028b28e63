mod reqwest;

pub use reqwest::ReqwestTransport;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// HTTP verbs accepted by the Vault API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
    Patch,
    Head,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// One HTTP exchange as seen by the core: status, headers, raw body.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Opaque transport failure; the core wraps it without inspecting it.
#[derive(Debug)]
pub struct TransportError(pub String);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for TransportError {}

/// Trait for the injected HTTP capability.
///
/// Performs exactly one request. Retry and timeout policy belong to the
/// implementation; the client forwards the opaque `options` value verbatim.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Vec<u8>,
        headers: &[(String, String)],
        options: &Value,
    ) -> Result<TransportResponse, TransportError>;
}
