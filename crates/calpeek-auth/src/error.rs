//! Authentication error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Client secret file not found: {}", .0.display())]
    MissingClientSecret(PathBuf),

    #[error("Invalid client secret file: {0}")]
    InvalidClientSecret(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("Consent was denied: {0}")]
    ConsentDenied(String),

    #[error("CSRF token mismatch")]
    CsrfMismatch,

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("OAuth callback server error: {0}")]
    CallbackServer(String),
}

impl AuthError {
    /// Short operator-facing explanation.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::MissingClientSecret(_) => {
                "OAuth client secret file is missing. Download it from the Google Cloud Console."
            }
            AuthError::InvalidClientSecret(_) => {
                "OAuth client secret file is malformed. Download it again."
            }
            AuthError::Storage(_) => "Failed to read or write the cached token.",
            AuthError::OAuthFailed(_) => "Sign-in failed. Please try again.",
            AuthError::ConsentDenied(_) => "Access was not granted.",
            AuthError::CsrfMismatch => "Sign-in response could not be verified. Please try again.",
            AuthError::RefreshFailed(_) => "Your session could not be renewed. Please sign in again.",
            AuthError::CallbackServer(_) => "Could not start the local sign-in listener.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_client_secret_names_path() {
        let err = AuthError::MissingClientSecret(PathBuf::from("credentials.json"));
        assert!(err.to_string().contains("credentials.json"));
        assert!(err.user_message().contains("Google Cloud Console"));
    }
}
