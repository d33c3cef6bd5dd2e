//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the tripboard application.

use std::path::Path;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tripboard_protocol::TripLimits;

use crate::error::Result;
use crate::persistence::{find_config_file, read_config_file, write_config_file};
use crate::planner::PlannerConfig;

/// Environment variable overriding [`PlannerConfig::endpoint`].
pub const ENV_PLANNER_ENDPOINT: &str = "TRIPBOARD_PLANNER_ENDPOINT";

/// Environment variable overriding [`PlannerConfig::api_token`].
pub const ENV_PLANNER_TOKEN: &str = "TRIPBOARD_PLANNER_TOKEN";

/// The main configuration struct for the tripboard application.
///
/// # Examples
///
/// ```
/// use tripboard_config::{Config, PlannerConfig};
///
/// let config = Config::default();
/// assert!(config.log_filter.is_none());
///
/// let config = Config {
///     planner: PlannerConfig::with_endpoint("https://trips.example.com/plan"),
///     log_filter: Some("tripboard=debug".to_string()),
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Suggestion service settings.
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Log filter directive, e.g. `tripboard=debug`.
    ///
    /// Used when neither `--verbose` nor `RUST_LOG` is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the default file locations and the
    /// environment.
    ///
    /// If no configuration file is found, defaults are used. Environment
    /// variables override file values.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be read
    /// or parsed, or if the resulting configuration is invalid.
    pub fn load() -> Result<Self> {
        let mut config = match find_config_file() {
            Some(path) => read_config_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific file, then applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration is invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config: Config = read_config_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Applies overrides looked up by environment variable name.
    ///
    /// Empty values are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use tripboard_config::Config;
    ///
    /// let mut config = Config::default();
    /// config.apply_overrides(|key| match key {
    ///     "TRIPBOARD_PLANNER_ENDPOINT" => Some("https://plan.example.com".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.planner.endpoint, "https://plan.example.com");
    /// ```
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(endpoint) = non_empty(ENV_PLANNER_ENDPOINT) {
            debug!(%endpoint, "planner endpoint overridden from environment");
            self.planner.endpoint = endpoint;
        }
        if let Some(token) = non_empty(ENV_PLANNER_TOKEN) {
            debug!("planner token overridden from environment");
            self.planner.api_token = Some(token);
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<()> {
        self.planner.validate()
    }

    /// Returns the trip length limits for suggestions.
    #[must_use]
    pub fn trip_limits(&self) -> TripLimits {
        self.planner.trip_limits()
    }

    /// Returns the planner token as a secret, if one is configured.
    #[must_use]
    pub fn planner_token(&self) -> Option<SecretString> {
        self.planner.api_token()
    }
}
