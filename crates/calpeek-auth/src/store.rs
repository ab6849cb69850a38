//! Cached-credential lifecycle: load, refresh, consent, persist.

use std::path::{Path, PathBuf};

use crate::client_secret::ClientSecret;
use crate::error::AuthError;
use crate::oauth::{refresh_credential, ConsentFlow};
use crate::storage::{Credential, TokenStore};

pub struct CredentialStore<C> {
    tokens: TokenStore,
    client_secret_path: PathBuf,
    scopes: Vec<String>,
    consent: C,
}

impl<C: ConsentFlow> CredentialStore<C> {
    pub fn new(
        token_path: impl Into<PathBuf>,
        client_secret_path: impl Into<PathBuf>,
        scopes: Vec<String>,
        consent: C,
    ) -> Self {
        Self {
            tokens: TokenStore::new(token_path),
            client_secret_path: client_secret_path.into(),
            scopes,
            consent,
        }
    }

    pub fn token_path(&self) -> &Path {
        self.tokens.path()
    }

    /// Return a usable credential and persist it.
    ///
    /// A valid cached credential is used as is. An expired one is refreshed
    /// when it carries a refresh token. Everything else goes through the
    /// consent flow, which needs the client secret file.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn obtain(&self) -> Result<Credential, AuthError> {
        let cached = match self.tokens.load() {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Ignoring unreadable cached credential: {}", e);
                None
            }
        };

        let credential = match cached {
            Some(credential) if !credential.is_expired() => {
                tracing::debug!("Using cached credential");
                credential
            }
            Some(credential) if credential.can_refresh() => {
                let fallback = ClientSecret::from_file(&self.client_secret_path).ok();
                match refresh_credential(&credential, fallback.as_ref()).await {
                    Ok(refreshed) => refreshed,
                    Err(e) => {
                        tracing::warn!("Refresh failed, asking for consent again: {}", e);
                        self.consent().await?
                    }
                }
            }
            _ => self.consent().await?,
        };

        self.tokens.save(&credential)?;
        Ok(credential)
    }

    async fn consent(&self) -> Result<Credential, AuthError> {
        let secret = ClientSecret::from_file(&self.client_secret_path)?;
        tracing::info!("Starting OAuth consent flow");
        self.consent.authorize(&secret, &self.scopes).await
    }
}
