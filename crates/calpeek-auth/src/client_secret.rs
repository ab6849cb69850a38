//! OAuth client configuration as downloaded from the Google Cloud Console.

use serde::Deserialize;
use std::path::Path;

use crate::error::AuthError;
use crate::storage::GOOGLE_TOKEN_URL;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URL.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// Desktop clients use `installed`, web clients use `web`.
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        if !path.exists() {
            return Err(AuthError::MissingClientSecret(path.to_path_buf()));
        }

        let json = std::fs::read_to_string(path)
            .map_err(|e| AuthError::InvalidClientSecret(format!("{}: {}", path.display(), e)))?;

        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let file: ClientSecretFile = serde_json::from_str(json)
            .map_err(|e| AuthError::InvalidClientSecret(e.to_string()))?;

        file.installed.or(file.web).ok_or_else(|| {
            AuthError::InvalidClientSecret("expected an \"installed\" or \"web\" section".into())
        })
    }
}
