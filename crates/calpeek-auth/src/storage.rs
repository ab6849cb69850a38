use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AuthError;

/// Default token endpoint written into credentials that lack one.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are treated as expired.
const EXPIRY_SKEW_SECS: i64 = 300;

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

/// Authorized credential, serialized in Google's "authorized user" layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Access token for API requests
    #[serde(rename = "token")]
    pub access_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(default)]
    pub scopes: Vec<String>,

    /// Absent means the token never expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl Credential {
    /// Check if the token is expired (or within 5 minutes of it)
    pub fn is_expired(&self) -> bool {
        self.expiry
            .map(|expiry| Utc::now() + Duration::seconds(EXPIRY_SKEW_SECS) >= expiry)
            .unwrap_or(false)
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }
}

/// File-backed credential cache.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached credential; `None` when nothing is cached yet.
    pub fn load(&self) -> Result<Option<Credential>, AuthError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .map_err(|e| AuthError::Storage(format!("read {}: {}", self.path.display(), e)))?;

        let credential: Credential = serde_json::from_str(&json)
            .map_err(|e| AuthError::Storage(format!("parse {}: {}", self.path.display(), e)))?;

        tracing::debug!("Loaded cached credential from {:?}", self.path);
        Ok(Some(credential))
    }

    pub fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AuthError::Storage(format!("create {}: {}", parent.display(), e)))?;
        }

        let json = serde_json::to_string_pretty(credential)
            .map_err(|e| AuthError::Storage(format!("serialize credential: {}", e)))?;

        fs::write(&self.path, json)
            .map_err(|e| AuthError::Storage(format!("write {}: {}", self.path.display(), e)))?;

        tracing::info!("Stored credential at {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    fn credential(expiry: Option<DateTime<Utc>>) -> Credential {
        Credential {
            access_token: "test".to_string(),
            refresh_token: None,
            token_uri: default_token_uri(),
            client_id: None,
            client_secret: None,
            scopes: vec![],
            expiry,
        }
    }

    #[test]
    fn test_token_expiry() {
        let now = Utc::now();

        assert!(credential(Some(now - Duration::hours(1))).is_expired());
        assert!(!credential(Some(now + Duration::hours(1))).is_expired());
        // Inside the skew window
        assert!(credential(Some(now + Duration::seconds(200))).is_expired());
        assert!(!credential(None).is_expired());
    }

    #[test]
    fn test_reads_authorized_user_layout() {
        let json = r#"{
            "token": "ya29.abc",
            "refresh_token": "1//refresh",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_id": "id.apps.googleusercontent.com",
            "client_secret": "shh",
            "scopes": ["https://www.googleapis.com/auth/calendar.readonly"],
            "universe_domain": "googleapis.com",
            "account": "",
            "expiry": "2024-02-01T10:00:00.123456Z"
        }"#;

        let credential: Credential = serde_json::from_str(json).unwrap();
        assert_eq!(credential.access_token, "ya29.abc");
        assert!(credential.can_refresh());
        assert!(credential.is_expired());
        assert_eq!(credential.scopes.len(), 1);
    }

    #[test]
    fn test_store_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join("token.json"));

        assert!(store.load().unwrap().is_none());

        let cred = credential(Some(Utc::now() + Duration::hours(1)));
        store.save(&cred).unwrap();
        assert_eq!(store.load().unwrap(), Some(cred));
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, "{not json").unwrap();

        let result = TokenStore::new(&path).load();
        assert!(matches!(result, Err(AuthError::Storage(_))));
    }
}
