//! Runtime configuration read from the environment

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use healthy_life_domain::i18n::Locale;

/// Default analytics beacon endpoint
pub const DEFAULT_ANALYTICS_ENDPOINT: &str = "https://event.health.kerala.care/create";

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Reported by the health check (APP_ENV)
    pub environment: String,
    /// Locale used when a request names none
    pub default_locale: Locale,
    pub analytics_enabled: bool,
    pub analytics_endpoint: String,
    /// JSON array of JAK entries; the directory is empty when unset
    pub jak_data_path: Option<PathBuf>,
    /// Idle time after which a session record is discarded
    pub session_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            environment: "development".to_string(),
            default_locale: Locale::En,
            analytics_enabled: true,
            analytics_endpoint: DEFAULT_ANALYTICS_ENDPOINT.to_string(),
            jak_data_path: None,
            session_ttl: Duration::minutes(60),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => defaults.port,
        };

        let default_locale = match get("DEFAULT_LOCALE") {
            Some(value) => value
                .parse::<Locale>()
                .map_err(|_| ConfigError::Invalid { name: "DEFAULT_LOCALE", value })?,
            None => defaults.default_locale,
        };

        let analytics_enabled = match get("ANALYTICS_ENABLED") {
            Some(value) => match value.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => return Err(ConfigError::Invalid { name: "ANALYTICS_ENABLED", value }),
            },
            None => defaults.analytics_enabled,
        };

        let session_ttl = match get("SESSION_TTL_MINUTES") {
            Some(value) => match value.trim().parse::<i64>() {
                Ok(minutes) if minutes > 0 => match Duration::try_minutes(minutes) {
                    Some(ttl) => ttl,
                    None => return Err(ConfigError::Invalid { name: "SESSION_TTL_MINUTES", value }),
                },
                _ => return Err(ConfigError::Invalid { name: "SESSION_TTL_MINUTES", value }),
            },
            None => defaults.session_ttl,
        };

        Ok(Self {
            port,
            environment: get("APP_ENV").unwrap_or(defaults.environment),
            default_locale,
            analytics_enabled,
            analytics_endpoint: get("ANALYTICS_ENDPOINT").unwrap_or(defaults.analytics_endpoint),
            jak_data_path: get("JAK_DATA_PATH").map(PathBuf::from),
            session_ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_locale, Locale::En);
        assert!(config.analytics_enabled);
        assert_eq!(config.analytics_endpoint, DEFAULT_ANALYTICS_ENDPOINT);
        assert!(config.jak_data_path.is_none());
        assert_eq!(config.session_ttl, Duration::minutes(60));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("DEFAULT_LOCALE", "ml"),
            ("ANALYTICS_ENABLED", "true"),
            ("JAK_DATA_PATH", "/srv/jak.json"),
            ("SESSION_TTL_MINUTES", "15"),
            ("APP_ENV", "production"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.default_locale, Locale::Ml);
        assert!(config.analytics_enabled);
        assert_eq!(config.jak_data_path, Some(PathBuf::from("/srv/jak.json")));
        assert_eq!(config.session_ttl, Duration::minutes(15));
        assert_eq!(config.environment, "production");
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config_from(&[("PORT", "eighty")]).unwrap_err(),
            ConfigError::Invalid { name: "PORT", value: "eighty".to_string() }
        );
        assert!(config_from(&[("DEFAULT_LOCALE", "fr")]).is_err());
        assert!(config_from(&[("ANALYTICS_ENABLED", "maybe")]).is_err());
        assert!(config_from(&[("SESSION_TTL_MINUTES", "0")]).is_err());
    }

    #[test]
    fn test_session_ttl_beyond_duration_range() {
        let minutes = i64::MAX.to_string();
        assert_eq!(
            config_from(&[("SESSION_TTL_MINUTES", minutes.as_str())]).unwrap_err(),
            ConfigError::Invalid { name: "SESSION_TTL_MINUTES", value: minutes.clone() }
        );
    }

    #[test]
    fn test_analytics_can_be_disabled() {
        let config = config_from(&[("ANALYTICS_ENABLED", "false")]).unwrap();
        assert!(!config.analytics_enabled);
    }
}
