use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Google Calendar API root.
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Read-only calendar scope.
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Longest default search window side, in days.
pub const MAX_SEARCH_DAYS: u32 = 1_000_000;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined into one line
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Output language for prompts and event details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ja" => Ok(Locale::Ja),
            other => Err(format!("unsupported locale: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OAuth client secret file downloaded from the Google Cloud Console
    pub credentials_file: PathBuf,

    /// Where the authorized credential is cached between runs
    pub token_file: PathBuf,

    pub auth: AuthConfig,
    pub calendar: CalendarConfig,
    pub search: SearchConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Scopes requested during the consent grant
    pub scopes: Vec<String>,

    /// Open the consent page in the default browser
    pub open_browser: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            scopes: vec![CALENDAR_READONLY_SCOPE.to_string()],
            open_browser: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub api_base_url: String,

    /// Upper bound on events returned by one search
    pub max_results: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_results: 500,
        }
    }
}

/// Defaults offered by the search-window prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub days_back: u32,
    pub days_forward: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            days_back: 30,
            days_forward: 90,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub locale: Locale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_file: PathBuf::from("credentials.json"),
            token_file: PathBuf::from("token.json"),
            auth: AuthConfig::default(),
            calendar: CalendarConfig::default(),
            search: SearchConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and built-in defaults are used when nothing is there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Validate, logging warnings. Errors fail the whole config.
    pub fn ensure_valid(&self) -> Result<ValidationResult> {
        let validation = self.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(validation)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.calendar.api_base_url,
            "calendar.api_base_url",
            &mut result,
        );

        if self.calendar.max_results == 0 {
            result.add_error("calendar.max_results", "Must be greater than 0");
        }

        if self.auth.scopes.is_empty() {
            result.add_error("auth.scopes", "At least one scope is required");
        }

        for (field, days) in [
            ("search.days_back", self.search.days_back),
            ("search.days_forward", self.search.days_forward),
        ] {
            if days > MAX_SEARCH_DAYS {
                result.add_error(field, format!("Must be at most {} days", MAX_SEARCH_DAYS));
            }
        }

        if self.search.days_back == 0 && self.search.days_forward == 0 {
            result.add_warning("search", "Default search window is empty");
        }

        if !self.credentials_file.exists() && !self.token_file.exists() {
            result.add_warning(
                "credentials_file",
                format!(
                    "Neither {} nor {} exists; sign-in will fail",
                    self.credentials_file.display(),
                    self.token_file.display()
                ),
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// `~/.config/calpeek/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("calpeek").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.calendar.api_base_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.calendar.api_base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "calendar.api_base_url"));
    }

    #[test]
    fn test_zero_max_results() {
        let mut config = Config::default();
        config.calendar.max_results = 0;
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_oversized_search_window() {
        let mut config = Config::default();
        config.search.days_forward = MAX_SEARCH_DAYS + 1;
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "search.days_forward"));

        config.search.days_forward = MAX_SEARCH_DAYS;
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_missing_files_is_warning() {
        let mut config = Config::default();
        config.credentials_file = PathBuf::from("/nonexistent/credentials.json");
        config.token_file = PathBuf::from("/nonexistent/token.json");
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "credentials_file"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "token_file = \"/tmp/calpeek-token.json\"\n\n[display]\nlocale = \"ja\"\n\n[search]\ndays_back = 7\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.token_file, PathBuf::from("/tmp/calpeek-token.json"));
        assert_eq!(config.credentials_file, PathBuf::from("credentials.json"));
        assert_eq!(config.display.locale, Locale::Ja);
        assert_eq!(config.search.days_back, 7);
        assert_eq!(config.search.days_forward, 90);
        assert_eq!(config.calendar.max_results, 500);
    }

    #[test]
    fn test_explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("missing.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("JA".parse::<Locale>(), Ok(Locale::Ja));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
