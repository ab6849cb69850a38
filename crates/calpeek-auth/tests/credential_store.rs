//! CredentialStore behavior against a fake consent flow and a mock token endpoint.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::Cell;
use std::path::Path;

use calpeek_auth::{AuthError, ClientSecret, ConsentFlow, Credential, CredentialStore, TokenStore};
use chrono::{Duration, Utc};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Consent flow that counts invocations instead of opening a browser.
#[derive(Default)]
struct FakeConsent {
    calls: Cell<usize>,
}

impl ConsentFlow for FakeConsent {
    async fn authorize(
        &self,
        secret: &ClientSecret,
        scopes: &[String],
    ) -> Result<Credential, AuthError> {
        self.calls.set(self.calls.get() + 1);
        Ok(Credential {
            access_token: "granted".to_string(),
            refresh_token: Some("granted-refresh".to_string()),
            token_uri: secret.token_uri.clone(),
            client_id: Some(secret.client_id.clone()),
            client_secret: Some(secret.client_secret.clone()),
            scopes: scopes.to_vec(),
            expiry: Some(Utc::now() + Duration::hours(1)),
        })
    }
}

fn write_client_secret(path: &Path) {
    std::fs::write(
        path,
        r#"{"installed": {"client_id": "file-id", "client_secret": "file-secret"}}"#,
    )
    .unwrap();
}

fn cached(token_uri: &str, expires_in: Duration, refresh: Option<&str>) -> Credential {
    Credential {
        access_token: "cached".to_string(),
        refresh_token: refresh.map(str::to_string),
        token_uri: token_uri.to_string(),
        client_id: Some("cached-id".to_string()),
        client_secret: Some("cached-secret".to_string()),
        scopes: vec![SCOPE.to_string()],
        expiry: Some(Utc::now() + expires_in),
    }
}

fn store<'a>(dir: &Path, consent: &'a FakeConsent) -> CredentialStore<&'a FakeConsent> {
    CredentialStore::new(
        dir.join("token.json"),
        dir.join("credentials.json"),
        vec![SCOPE.to_string()],
        consent,
    )
}

#[tokio::test]
async fn test_valid_cache_twice_never_consents() {
    let dir = tempfile::tempdir().unwrap();
    TokenStore::new(dir.path().join("token.json"))
        .save(&cached("https://oauth2.googleapis.com/token", Duration::hours(1), None))
        .unwrap();

    let consent = FakeConsent::default();
    let store = store(dir.path(), &consent);

    let first = store.obtain().await.unwrap();
    let second = store.obtain().await.unwrap();

    assert_eq!(first.access_token, "cached");
    assert_eq!(second.access_token, "cached");
    assert_eq!(consent.calls.get(), 0);
}

#[tokio::test]
async fn test_missing_client_secret_without_cache() {
    let dir = tempfile::tempdir().unwrap();
    let consent = FakeConsent::default();
    let result = store(dir.path(), &consent).obtain().await;

    assert!(matches!(result, Err(AuthError::MissingClientSecret(_))));
    assert_eq!(consent.calls.get(), 0);
    assert!(!dir.path().join("token.json").exists());
}

#[tokio::test]
async fn test_first_run_consents_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    write_client_secret(&dir.path().join("credentials.json"));
    let consent = FakeConsent::default();

    let credential = store(dir.path(), &consent).obtain().await.unwrap();

    assert_eq!(credential.access_token, "granted");
    assert_eq!(credential.client_id.as_deref(), Some("file-id"));
    assert_eq!(consent.calls.get(), 1);

    let saved = TokenStore::new(dir.path().join("token.json")).load().unwrap();
    assert_eq!(saved, Some(credential));
}

#[tokio::test]
async fn test_expired_without_refresh_token_consents() {
    let dir = tempfile::tempdir().unwrap();
    write_client_secret(&dir.path().join("credentials.json"));
    TokenStore::new(dir.path().join("token.json"))
        .save(&cached("https://oauth2.googleapis.com/token", -Duration::hours(1), None))
        .unwrap();

    let consent = FakeConsent::default();
    let credential = store(dir.path(), &consent).obtain().await.unwrap();
    assert_eq!(credential.access_token, "granted");
    assert_eq!(consent.calls.get(), 1);
}

#[tokio::test]
async fn test_corrupt_cache_consents() {
    let dir = tempfile::tempdir().unwrap();
    write_client_secret(&dir.path().join("credentials.json"));
    std::fs::write(dir.path().join("token.json"), "not json").unwrap();

    let consent = FakeConsent::default();
    let credential = store(dir.path(), &consent).obtain().await.unwrap();
    assert_eq!(credential.access_token, "granted");
    assert_eq!(consent.calls.get(), 1);
}

#[tokio::test]
async fn test_expired_refreshes_without_consent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=cached-refresh"))
        .and(body_string_contains("client_id=cached-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "refreshed",
            "expires_in": 3599,
            "token_type": "Bearer",
            "scope": SCOPE
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let token_uri = format!("{}/token", mock_server.uri());
    TokenStore::new(dir.path().join("token.json"))
        .save(&cached(&token_uri, -Duration::hours(1), Some("cached-refresh")))
        .unwrap();

    let consent = FakeConsent::default();
    let store = store(dir.path(), &consent);
    let credential = store.obtain().await.unwrap();

    assert_eq!(credential.access_token, "refreshed");
    assert_eq!(credential.refresh_token.as_deref(), Some("cached-refresh"));
    assert!(!credential.is_expired());
    assert_eq!(consent.calls.get(), 0);

    let saved = TokenStore::new(dir.path().join("token.json")).load().unwrap().unwrap();
    assert_eq!(saved, credential);
}

#[tokio::test]
async fn test_rejected_refresh_falls_back_to_consent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Token has been expired or revoked."
        })))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_client_secret(&dir.path().join("credentials.json"));
    let token_uri = format!("{}/token", mock_server.uri());
    TokenStore::new(dir.path().join("token.json"))
        .save(&cached(&token_uri, -Duration::hours(1), Some("revoked")))
        .unwrap();

    let consent = FakeConsent::default();
    let credential = store(dir.path(), &consent).obtain().await.unwrap();
    assert_eq!(credential.access_token, "granted");
    assert_eq!(consent.calls.get(), 1);
}
