//! Suggestion service configuration.
//!
//! This module provides the [`PlannerConfig`] type which describes where
//! itinerary suggestions are requested from and which trips qualify.
//!
//! # Trip Limits
//!
//! Suggestions are only requested for trips between
//! [`DEFAULT_MIN_TRIP_DAYS`] and [`DEFAULT_MAX_TRIP_DAYS`] days long unless
//! configured otherwise. The generated text grows with the trip length, so
//! the upper bound keeps responses to a manageable size.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tripboard_protocol::TripLimits;
use url::Url;

pub use tripboard_protocol::trip::{DEFAULT_MAX_TRIP_DAYS, DEFAULT_MIN_TRIP_DAYS};

use crate::error::{ConfigError, Result};

/// Default suggestion endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/boards/plan";

/// Configuration for the suggestion service.
///
/// # Examples
///
/// ```
/// use tripboard_config::PlannerConfig;
///
/// let config = PlannerConfig::default();
/// assert_eq!(config.max_trip_days, 10);
/// assert!(config.validate().is_ok());
///
/// let config = PlannerConfig::with_endpoint("https://trips.example.com/plan");
/// assert_eq!(config.endpoint, "https://trips.example.com/plan");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// URL the trip is posted to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token sent with suggestion requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Shortest trip, in days, for which suggestions are requested.
    #[serde(default = "default_min_trip_days")]
    pub min_trip_days: u32,

    /// Longest trip, in days, for which suggestions are requested.
    #[serde(default = "default_max_trip_days")]
    pub max_trip_days: u32,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_min_trip_days() -> u32 {
    DEFAULT_MIN_TRIP_DAYS
}

fn default_max_trip_days() -> u32 {
    DEFAULT_MAX_TRIP_DAYS
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_token: None,
            min_trip_days: DEFAULT_MIN_TRIP_DAYS,
            max_trip_days: DEFAULT_MAX_TRIP_DAYS,
        }
    }
}

impl PlannerConfig {
    /// Creates a configuration for the given endpoint with default limits.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Returns the trip length limits.
    #[must_use]
    pub fn trip_limits(&self) -> TripLimits {
        TripLimits {
            min_days: self.min_trip_days,
            max_days: self.max_trip_days,
        }
    }

    /// Returns the API token wrapped as a secret, if configured.
    #[must_use]
    pub fn api_token(&self) -> Option<SecretString> {
        self.api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.to_string()))
    }

    /// Parses the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the endpoint is not an
    /// absolute `http` or `https` URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme {scheme:?}"),
            }),
        }
    }

    /// Validates the planner configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the trip limits are
    /// empty or start below one day.
    pub fn validate(&self) -> Result<()> {
        self.endpoint_url()?;

        if self.min_trip_days < 1 {
            return Err(ConfigError::InvalidTripLimits {
                reason: "minimum trip length must be at least 1 day".to_string(),
            });
        }

        if self.max_trip_days < self.min_trip_days {
            return Err(ConfigError::InvalidTripLimits {
                reason: format!(
                    "maximum of {} days is below minimum of {} days",
                    self.max_trip_days, self.min_trip_days
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.api_token.is_none());
        assert_eq!(config.trip_limits(), TripLimits::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_relative_endpoint() {
        let config = PlannerConfig::with_endpoint("/api/boards/plan");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn validate_rejects_non_http_scheme() {
        let config = PlannerConfig::with_endpoint("ftp://example.com/plan");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn validate_rejects_inverted_limits() {
        let config = PlannerConfig {
            min_trip_days: 5,
            max_trip_days: 3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTripLimits { .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_minimum() {
        let config = PlannerConfig {
            min_trip_days: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_token_is_secret() {
        let config = PlannerConfig {
            api_token: Some("sk_test".to_string()),
            ..Default::default()
        };
        let token = config.api_token().expect("token");
        assert_eq!(token.expose_secret(), "sk_test");

        let empty = PlannerConfig {
            api_token: Some(String::new()),
            ..Default::default()
        };
        assert!(empty.api_token().is_none());
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: PlannerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn deserialize_partial() {
        let config: PlannerConfig = serde_json::from_str(r#"{"max_trip_days": 7}"#).unwrap();
        assert_eq!(config.max_trip_days, 7);
        assert_eq!(config.min_trip_days, DEFAULT_MIN_TRIP_DAYS);
    }
}
