// tests/auth.rs — HTTP-level tests for the login backends and token lifecycle.

use serde_json::{json, Map, Value};
use vault_core::auth::{ApproleAuth, TokenAuth, UserpassAuth};
use vault_core::codec::JsonCodec;
use vault_core::transport::ReqwestTransport;
use vault_core::{Client, VaultError};
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn params(pairs: &[(&str, &str)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

fn login_response(token: &str, lease_duration: u64) -> Value {
    json!({
        "request_id": "test-request-id",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": null,
        "auth": {
            "client_token": token,
            "accessor": "accessor-id",
            "policies": ["default"],
            "lease_duration": lease_duration,
            "renewable": true
        }
    })
}

fn base_client(mock_uri: &str) -> Client {
    Client::new(mock_uri)
        .with_transport(ReqwestTransport::new())
        .with_codec(JsonCodec)
}

#[tokio::test]
async fn test_userpass_login_sets_token_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/userpass/login/alice"))
        .and(body_json(json!({"password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response("s.abc", 3600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = base_client(&mock_server.uri()).with_auth(UserpassAuth);
    let authed = client
        .auth(params(&[("username", "alice"), ("password", "hunter2")]))
        .await
        .expect("login should succeed");

    assert_eq!(authed.token(), Some("s.abc"));
    assert!(!authed.token_expired());
    // The original client value is untouched.
    assert!(client.token_expired());
    assert_eq!(client.token(), None);
}

#[tokio::test]
async fn test_custom_auth_path_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/ldap/login/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response("s.ldap", 600)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = base_client(&mock_server.uri())
        .with_auth(UserpassAuth)
        .with_auth_path("ldap");
    let authed = client
        .auth(params(&[("username", "alice"), ("password", "hunter2")]))
        .await
        .unwrap();
    assert_eq!(authed.token(), Some("s.ldap"));
}

#[tokio::test]
async fn test_approle_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/approle/login"))
        .and(body_json(json!({"role_id": "rid", "secret_id": "sid"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response("s.role", 1800)))
        .mount(&mock_server)
        .await;

    let client = base_client(&mock_server.uri()).with_auth(ApproleAuth);
    let authed = client
        .auth(params(&[("role_id", "rid"), ("secret_id", "sid")]))
        .await
        .unwrap();
    assert_eq!(authed.token(), Some("s.role"));
    assert!(!authed.token_expired());
}

#[tokio::test]
async fn test_token_lookup_self_adopts_token() {
    let mock_server = MockServer::start().await;

    // The candidate token travels as the header, not a body.
    Mock::given(method("GET"))
        .and(path("/v1/auth/token/lookup-self"))
        .and(header("X-Vault-Token", "s.existing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "s.existing",
                "ttl": 2764800,
                "policies": ["default"]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = base_client(&mock_server.uri()).with_auth(TokenAuth);
    let authed = client.auth(params(&[("token", "s.existing")])).await.unwrap();
    assert_eq!(authed.token(), Some("s.existing"));
    assert!(!authed.token_expired());
}

#[tokio::test]
async fn test_missing_credentials_make_no_transport_call() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = base_client(&mock_server.uri()).with_auth(UserpassAuth);
    let err = client
        .auth(params(&[("username", "alice")]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Missing credentials"));
}

#[tokio::test]
async fn test_login_failure_passes_messages_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/userpass/login/alice"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": ["invalid username or password"]
        })))
        .mount(&mock_server)
        .await;

    let client = base_client(&mock_server.uri()).with_auth(UserpassAuth);
    let err = client
        .auth(params(&[("username", "alice"), ("password", "wrong")]))
        .await
        .unwrap_err();
    match err {
        VaultError::Vault(messages) => {
            assert_eq!(messages, vec!["invalid username or password"]);
        }
        other => panic!("expected Vault error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unexpected_login_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/userpass/login/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"weird": true})))
        .mount(&mock_server)
        .await;

    let client = base_client(&mock_server.uri()).with_auth(UserpassAuth);
    let err = client
        .auth(params(&[("username", "alice"), ("password", "hunter2")]))
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::UnexpectedResponse { .. }));
}

#[tokio::test]
async fn test_credentials_merge_across_auth_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/userpass/login/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_response("s.abc", 3600)))
        .expect(2)
        .mount(&mock_server)
        .await;

    // Username pre-seeded; the auth call only supplies the password.
    let client = base_client(&mock_server.uri())
        .with_auth(UserpassAuth)
        .with_credentials(params(&[("username", "alice")]));

    let authed = client
        .auth(params(&[("password", "hunter2")]))
        .await
        .unwrap();
    assert_eq!(authed.credentials()["username"], json!("alice"));
    assert_eq!(authed.credentials()["password"], json!("hunter2"));

    // Re-auth with no params at all rides on the stored credentials.
    let reauthed = authed.auth(Map::new()).await.unwrap();
    assert_eq!(reauthed.token(), Some("s.abc"));
}

#[tokio::test]
async fn test_auth_transport_failure_is_http_adapter_error() {
    let client = Client::new("http://127.0.0.1:1")
        .with_transport(ReqwestTransport::new())
        .with_codec(JsonCodec)
        .with_auth(ApproleAuth);

    let err = client
        .auth(params(&[("role_id", "rid"), ("secret_id", "sid")]))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Http adapter error"));
}
