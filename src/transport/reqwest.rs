use super::{Method, Transport, TransportError, TransportResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Transport adapter backed by `reqwest`.
///
/// Recognizes `timeout_secs` in the forwarded transport options; everything
/// else is ignored so callers can carry implementation-specific settings
/// without the core caring.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Build on top of a preconfigured `reqwest::Client` (TLS, proxies, pools).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Put => reqwest::Method::PUT,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Head => reqwest::Method::HEAD,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Vec<u8>,
        headers: &[(String, String)],
        options: &Value,
    ) -> Result<TransportResponse, TransportError> {
        let mut request = self.client.request(to_reqwest_method(method), url);

        for (name, value) in headers {
            request = request.header(name, value);
        }

        if !body.is_empty() {
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }

        if let Some(secs) = options.get("timeout_secs").and_then(Value::as_u64) {
            request = request.timeout(Duration::from_secs(secs));
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(e.to_string()))?
            .to_vec();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
