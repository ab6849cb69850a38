//! Calendar-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl CalendarError {
    /// HTTP status behind this error, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::RateLimited(_) => Some(429),
            Self::Api { status, .. } => Some(*status),
            Self::Decode(_) => None,
            Self::Network(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// Operator-facing message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(_) => "The access token was rejected. Delete the token file and sign in again.".to_string(),
            Self::Forbidden(_) => "Access to this calendar is not permitted.".to_string(),
            Self::NotFound(_) => "Calendar or event not found".to_string(),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::Api { status, message } => format!("Calendar error ({}): {}", status, message),
            Self::Decode(_) => "Unexpected response from the calendar service".to_string(),
            Self::Network(_) => "Network error. Check your connection.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CalendarError::Unauthorized("x".into()).status_code(), Some(401));
        assert_eq!(
            CalendarError::Api {
                status: 500,
                message: "boom".into()
            }
            .status_code(),
            Some(500)
        );
        assert_eq!(CalendarError::Decode("x".into()).status_code(), None);
    }

    #[test]
    fn test_error_user_messages() {
        let err = CalendarError::RateLimited(30);
        assert!(err.user_message().contains("30"));

        let err = CalendarError::Api {
            status: 503,
            message: "backend unavailable".into(),
        };
        assert!(err.user_message().contains("503"));
        assert!(err.user_message().contains("backend unavailable"));
    }
}
