//! Google OAuth credentials for calpeek.
//!
//! Loads the cached token, refreshes it when it has expired and falls back to
//! an interactive browser consent when neither works.

pub mod client_secret;
pub mod error;
pub mod oauth;
pub mod storage;
pub mod store;

pub use client_secret::ClientSecret;
pub use error::AuthError;
pub use oauth::{refresh_credential, BrowserConsent, ConsentFlow};
pub use storage::{Credential, TokenStore};
pub use store::CredentialStore;
