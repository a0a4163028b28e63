use crate::client::Client;
use crate::error::VaultError;
use crate::transport::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;
use tracing::debug;

const DEFAULT_API_VERSION: &str = "v1";

/// Characters that would change the query's structure if left bare.
const QUERY_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'=')
    .add(b'?');

/// Per-request knobs for the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Structured request body; `None` sends no body at all.
    pub body: Option<Value>,
    /// Query parameters, appended in order.
    pub query: Vec<(String, String)>,
    /// Extra headers, appended after the token header.
    pub headers: Vec<(String, String)>,
    /// API path segment between host and path; defaults to `v1`.
    pub version: Option<String>,
}

impl RequestOptions {
    pub fn with_body(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Default::default()
        }
    }
}

fn build_url(host: &str, version: &str, path: &str, query: &[(String, String)]) -> String {
    let path = path.trim_start_matches('/');
    let mut url = format!("{}/{}/{}", host, version, path);
    if !query.is_empty() {
        let qs: Vec<String> = query
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, QUERY_ENCODE),
                    utf8_percent_encode(v, QUERY_ENCODE)
                )
            })
            .collect();
        url.push('?');
        url.push_str(&qs.join("&"));
    }
    url
}

/// Runs one request through the configured transport and codec.
///
/// Returns the decoded response body, or `None` when the server sent an
/// empty body (common for 204-style deletes). Transport and codec failures
/// are normalized into `VaultError`. HTTP status is not interpreted here;
/// Vault signals application errors through the body's `errors` list, which
/// the engine layer inspects.
pub(crate) async fn dispatch(
    client: &Client,
    method: Method,
    path: &str,
    options: RequestOptions,
) -> Result<Option<Value>, VaultError> {
    let transport = client
        .transport()
        .ok_or_else(|| VaultError::Config("Http transport not set".to_string()))?;

    let version = options.version.as_deref().unwrap_or(DEFAULT_API_VERSION);
    let url = build_url(client.host(), version, path, &options.query);

    let mut headers: Vec<(String, String)> = Vec::new();
    if let Some(token) = client.token() {
        headers.push(("X-Vault-Token".to_string(), token.to_string()));
    }
    headers.extend(options.headers.iter().cloned());

    let body = encode_body(client, options.body)?;

    debug!(%method, %url, "dispatching vault request");

    let response = transport
        .request(method, &url, body, &headers, client.transport_options())
        .await
        .map_err(|e| VaultError::HttpAdapter(e.to_string()))?;

    decode_body(client, response.body)
}

fn encode_body(client: &Client, body: Option<Value>) -> Result<Vec<u8>, VaultError> {
    let Some(body) = body else {
        return Ok(Vec::new());
    };
    match client.codec() {
        Some(codec) => codec
            .encode(&body)
            .map_err(|e| VaultError::Codec(e.to_string())),
        // Without a codec only raw string bodies can pass through.
        None => match body {
            Value::String(s) => Ok(s.into_bytes()),
            Value::Null => Ok(Vec::new()),
            other => Err(VaultError::Config(format!(
                "Codec not set, cannot encode structured body: {}",
                other
            ))),
        },
    }
}

fn decode_body(client: &Client, body: Vec<u8>) -> Result<Option<Value>, VaultError> {
    if body.is_empty() {
        return Ok(None);
    }
    match client.codec() {
        Some(codec) => codec
            .decode(&body)
            .map(Some)
            .map_err(|e| VaultError::Codec(e.to_string())),
        None => Ok(Some(Value::String(
            String::from_utf8_lossy(&body).into_owned(),
        ))),
    }
}
