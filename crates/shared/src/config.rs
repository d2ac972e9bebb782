//! Application configuration management.

use std::time::Duration;

use serde::Deserialize;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "FXLEDGER";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Upstream rate source configuration.
    pub rates: RatesConfig,
    /// Change notifier configuration.
    pub notifier: NotifierConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Upstream rate source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// GET endpoint returning `{"Valute": {"USD": {"Value": ...}}}`.
    #[serde(default = "default_rates_url")]
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_rates_timeout")]
    pub timeout_secs: u64,
}

impl RatesConfig {
    /// Request timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            url: default_rates_url(),
            timeout_secs: default_rates_timeout(),
        }
    }
}

fn default_rates_url() -> String {
    "https://www.cbr-xml-daily.ru/daily_json.js".to_string()
}

fn default_rates_timeout() -> u64 {
    10
}

/// Change notifier configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    /// Seconds between two checks of the change signal.
    #[serde(default = "default_notify_interval")]
    pub interval_secs: u64,
}

impl NotifierConfig {
    /// Notification cadence as a `Duration`.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_notify_interval(),
        }
    }
}

fn default_notify_interval() -> u64 {
    60
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails
    /// [`validate`](Self::validate).
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would stall the background loops.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` for a zero rate timeout or notifier interval.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.rates.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "rates.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.notifier.interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "notifier.interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "FXLEDGER__SERVER__PORT",
                "FXLEDGER__RATES__URL",
                "FXLEDGER__RATES__TIMEOUT_SECS",
                "FXLEDGER__NOTIFIER__INTERVAL_SECS",
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.host, "127.0.0.1");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.rates.url, default_rates_url());
                assert_eq!(config.rates.timeout(), Duration::from_secs(10));
                assert_eq!(config.notifier.interval(), Duration::from_secs(60));
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("FXLEDGER__SERVER__PORT", Some("9090")),
                ("FXLEDGER__RATES__URL", Some("http://localhost:1234/rates")),
                ("FXLEDGER__NOTIFIER__INTERVAL_SECS", Some("5")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.rates.url, "http://localhost:1234/rates");
                assert_eq!(config.notifier.interval_secs, 5);
            },
        );
    }

    #[rstest]
    #[case("FXLEDGER__RATES__TIMEOUT_SECS", "rates.timeout_secs")]
    #[case("FXLEDGER__NOTIFIER__INTERVAL_SECS", "notifier.interval_secs")]
    fn test_zero_duration_rejected(#[case] var: &str, #[case] field: &str) {
        temp_env::with_var(var, Some("0"), || {
            let err = AppConfig::load().unwrap_err();
            assert!(err.to_string().contains(field), "unexpected error: {err}");
        });
    }
}
