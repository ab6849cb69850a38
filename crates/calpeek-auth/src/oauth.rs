use chrono::{Duration, Utc};
use oauth2::basic::{BasicClient, BasicErrorResponse, BasicTokenResponse};
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, CsrfToken, PkceCodeChallenge, RedirectUrl,
    RefreshToken, RequestTokenError, Scope, TokenResponse, TokenUrl,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use warp::Filter;

use crate::client_secret::{ClientSecret, GOOGLE_AUTH_URL};
use crate::error::AuthError;
use crate::storage::Credential;

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

const CALLBACK_PAGE: &str = "<html><body><h1>Authorization complete</h1>\
<p>You can close this window and return to the terminal.</p></body></html>";

type CallbackSender = Arc<Mutex<Option<oneshot::Sender<HashMap<String, String>>>>>;

/// Interactive grant that turns a client secret into a fresh credential.
#[allow(async_fn_in_trait)]
pub trait ConsentFlow {
    async fn authorize(
        &self,
        secret: &ClientSecret,
        scopes: &[String],
    ) -> Result<Credential, AuthError>;
}

impl<T: ConsentFlow + ?Sized> ConsentFlow for &T {
    async fn authorize(
        &self,
        secret: &ClientSecret,
        scopes: &[String],
    ) -> Result<Credential, AuthError> {
        (**self).authorize(secret, scopes).await
    }
}

/// Authorization-code flow with PKCE, completed through a loopback redirect.
pub struct BrowserConsent {
    open_browser: bool,
}

impl BrowserConsent {
    pub fn new(open_browser: bool) -> Self {
        Self { open_browser }
    }
}

impl Default for BrowserConsent {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConsentFlow for BrowserConsent {
    async fn authorize(
        &self,
        secret: &ClientSecret,
        scopes: &[String],
    ) -> Result<Credential, AuthError> {
        let (params_tx, params_rx) = oneshot::channel();
        let params_tx: CallbackSender = Arc::new(Mutex::new(Some(params_tx)));

        let routes = warp::get()
            .and(warp::path::end())
            .and(warp::query::<HashMap<String, String>>())
            .and(warp::any().map(move || params_tx.clone()))
            .and_then(|params: HashMap<String, String>, tx: CallbackSender| async move {
                if let Some(sender) = tx.lock().await.take() {
                    let _ = sender.send(params);
                }
                Ok::<_, warp::Rejection>(warp::reply::html(CALLBACK_PAGE))
            });

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (addr, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(([127, 0, 0, 1], 0), async {
                let _ = shutdown_rx.await;
            })
            .map_err(|e| AuthError::CallbackServer(e.to_string()))?;
        let server = tokio::spawn(server);

        let redirect_uri = format!("http://localhost:{}/", addr.port());
        tracing::debug!("OAuth callback listening on {}", addr);

        let client = oauth_client(
            &secret.client_id,
            Some(secret.client_secret.as_str()),
            &secret.auth_uri,
            &secret.token_uri,
        )?
        .set_redirect_uri(
            RedirectUrl::new(redirect_uri)
                .map_err(|e| AuthError::OAuthFailed(format!("redirect URI: {}", e)))?,
        );

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let (auth_url, csrf_token) = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(scopes.iter().cloned().map(Scope::new))
            .add_extra_param("access_type", "offline")
            .set_pkce_challenge(pkce_challenge)
            .url();

        println!("Please visit this URL to authorize this application:\n{}", auth_url);
        if self.open_browser {
            if let Err(e) = webbrowser::open(auth_url.as_str()) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        let params = params_rx
            .await
            .map_err(|_| AuthError::OAuthFailed("callback listener closed".into()));
        let _ = shutdown_tx.send(());
        let _ = server.await;
        let params = params?;

        if let Some(error) = params.get("error") {
            return Err(AuthError::ConsentDenied(error.clone()));
        }

        if params.get("state").map(String::as_str) != Some(csrf_token.secret().as_str()) {
            return Err(AuthError::CsrfMismatch);
        }

        let code = params
            .get("code")
            .cloned()
            .ok_or_else(|| AuthError::OAuthFailed("callback carried no authorization code".into()))?;

        let token = client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::OAuthFailed(describe_token_error(e)))?;

        let base = Credential {
            access_token: String::new(),
            refresh_token: None,
            token_uri: secret.token_uri.clone(),
            client_id: Some(secret.client_id.clone()),
            client_secret: Some(secret.client_secret.clone()),
            scopes: scopes.to_vec(),
            expiry: None,
        };

        tracing::info!("OAuth consent completed");
        Ok(apply_token(base, &token))
    }
}

/// Exchange a refresh token for a new access token.
///
/// Client credentials come from the credential itself, falling back to the
/// client secret file when the credential predates them.
#[tracing::instrument(skip_all, level = "info")]
pub async fn refresh_credential(
    credential: &Credential,
    fallback: Option<&ClientSecret>,
) -> Result<Credential, AuthError> {
    let refresh_token = credential
        .refresh_token
        .clone()
        .ok_or_else(|| AuthError::RefreshFailed("credential has no refresh token".into()))?;

    let client_id = credential
        .client_id
        .clone()
        .or_else(|| fallback.map(|s| s.client_id.clone()))
        .ok_or_else(|| AuthError::RefreshFailed("no client id available".into()))?;
    let client_secret = credential
        .client_secret
        .clone()
        .or_else(|| fallback.map(|s| s.client_secret.clone()));

    let client = oauth_client(
        &client_id,
        client_secret.as_deref(),
        GOOGLE_AUTH_URL,
        &credential.token_uri,
    )?;

    let token = client
        .exchange_refresh_token(&RefreshToken::new(refresh_token))
        .request_async(async_http_client)
        .await
        .map_err(|e| AuthError::RefreshFailed(describe_token_error(e)))?;

    let base = Credential {
        client_id: Some(client_id),
        client_secret,
        ..credential.clone()
    };

    tracing::info!("Access token refreshed");
    Ok(apply_token(base, &token))
}

fn oauth_client(
    client_id: &str,
    client_secret: Option<&str>,
    auth_uri: &str,
    token_uri: &str,
) -> Result<BasicClient, AuthError> {
    let auth_url = AuthUrl::new(auth_uri.to_string())
        .map_err(|e| AuthError::OAuthFailed(format!("auth URL {}: {}", auth_uri, e)))?;
    let token_url = TokenUrl::new(token_uri.to_string())
        .map_err(|e| AuthError::OAuthFailed(format!("token URL {}: {}", token_uri, e)))?;

    Ok(BasicClient::new(
        ClientId::new(client_id.to_string()),
        client_secret.map(|s| oauth2::ClientSecret::new(s.to_string())),
        auth_url,
        Some(token_url),
    )
    .set_auth_type(AuthType::RequestBody))
}

/// Overlay a token endpoint response on an existing credential.
///
/// The previous refresh token survives when the response carries none.
fn apply_token(mut credential: Credential, token: &BasicTokenResponse) -> Credential {
    credential.access_token = token.access_token().secret().clone();

    if let Some(refresh_token) = token.refresh_token() {
        credential.refresh_token = Some(refresh_token.secret().clone());
    }

    let lifetime = token
        .expires_in()
        .and_then(|d| Duration::from_std(d).ok())
        .unwrap_or_else(|| Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS));
    credential.expiry = Some(Utc::now() + lifetime);

    if let Some(scopes) = token.scopes() {
        credential.scopes = scopes.iter().map(|s| s.as_str().to_string()).collect();
    }

    credential
}

fn describe_token_error<RE>(err: RequestTokenError<RE, BasicErrorResponse>) -> String
where
    RE: std::error::Error + 'static,
{
    match err {
        RequestTokenError::ServerResponse(response) => response.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn token_response(json: &str) -> BasicTokenResponse {
        serde_json::from_str(json).unwrap()
    }

    fn base_credential() -> Credential {
        Credential {
            access_token: "old".to_string(),
            refresh_token: Some("keep-me".to_string()),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            scopes: vec!["scope-a".to_string()],
            expiry: None,
        }
    }

    #[test]
    fn test_apply_token_keeps_refresh_token() {
        let token = token_response(
            r#"{"access_token": "new", "token_type": "Bearer", "expires_in": 3599}"#,
        );
        let credential = apply_token(base_credential(), &token);

        assert_eq!(credential.access_token, "new");
        assert_eq!(credential.refresh_token.as_deref(), Some("keep-me"));
        assert_eq!(credential.scopes, vec!["scope-a".to_string()]);
        assert!(!credential.is_expired());
    }

    #[test]
    fn test_apply_token_takes_new_refresh_token_and_scopes() {
        let token = token_response(
            r#"{"access_token": "new", "token_type": "Bearer", "refresh_token": "rotated",
                "scope": "scope-a scope-b"}"#,
        );
        let credential = apply_token(base_credential(), &token);

        assert_eq!(credential.refresh_token.as_deref(), Some("rotated"));
        assert_eq!(credential.scopes.len(), 2);
        assert!(credential.expiry.is_some());
    }

    #[test]
    fn test_oauth_client_rejects_bad_token_uri() {
        let result = oauth_client("id", None, GOOGLE_AUTH_URL, "not a url");
        assert!(matches!(result, Err(AuthError::OAuthFailed(_))));
    }
}
