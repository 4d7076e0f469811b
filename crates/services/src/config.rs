use std::env;

use api::ApiConfig;
use interview_core::model::Language;

use crate::controller::ControllerOptions;
use crate::error::ConfigError;

/// Everything the services layer reads from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceConfig {
    pub api: ApiConfig,
    pub language: Language,
}

impl ServiceConfig {
    /// Reads the api settings plus `INTERVIEW_LANGUAGE`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServiceConfig::from_env`] with an injectable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api = ApiConfig::from_lookup(&lookup)?;
        let language = match lookup("INTERVIEW_LANGUAGE").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.parse().map_err(ConfigError::Language)?,
            None => Language::default(),
        };
        Ok(Self { api, language })
    }

    #[must_use]
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            language: self.language,
            ..ControllerOptions::default()
        }
    }
}
