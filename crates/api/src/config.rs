use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiConfigError {
    #[error("invalid INTERVIEW_API_URL `{raw}`: {source}")]
    InvalidBaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid INTERVIEW_API_TIMEOUT_SECS `{raw}`: expected a positive integer")]
    InvalidTimeout { raw: String },
}

/// Where the interview service lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url should be valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Reads `INTERVIEW_API_URL` and `INTERVIEW_API_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `ApiConfigError` when a variable is set but unusable.
    pub fn from_env() -> Result<Self, ApiConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`] with an injectable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ApiConfigError` when a variable is set but unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("INTERVIEW_API_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = Self::parse_base_url(&raw)?;
        }

        if let Some(raw) = lookup("INTERVIEW_API_TIMEOUT_SECS").filter(|v| !v.trim().is_empty()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ApiConfigError::InvalidTimeout { raw: raw.clone() })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `ApiConfigError::InvalidBaseUrl` if `raw` is not an absolute url.
    pub fn parse_base_url(raw: &str) -> Result<Url, ApiConfigError> {
        Url::parse(raw.trim()).map_err(|source| ApiConfigError::InvalidBaseUrl {
            raw: raw.to_string(),
            source,
        })
    }

    /// Joins `path` onto the base url, keeping any path prefix the base carries.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
