use crate::payroll::{DictionarySource, ReportOptions, DEFAULT_DICTIONARY_URL};
use chrono::NaiveDateTime;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Layout of `START_TIME`, e.g. `2024-04-01 10:15:30.000000`.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub dictionary: DictionarySource,
    pub collection: CollectionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            dictionary: load_dictionary_source()?,
            collection: CollectionConfig::from_env()?,
        })
    }
}

fn load_dictionary_source() -> Result<DictionarySource, ConfigError> {
    if let Ok(path) = env::var("DICTIONARY_PATH") {
        if !path.trim().is_empty() {
            return Ok(DictionarySource::File(PathBuf::from(path)));
        }
    }

    let url = env::var("DICTIONARY_URL").unwrap_or_else(|_| DEFAULT_DICTIONARY_URL.to_string());
    let timeout_secs = env::var("DICTIONARY_TIMEOUT_SECS")
        .unwrap_or_else(|_| "30".to_string())
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or(ConfigError::InvalidDictionaryTimeout)?;

    Ok(DictionarySource::Remote {
        url,
        timeout: Duration::from_secs(timeout_secs),
    })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Facts about the collection run that the orchestrator passes through the
/// environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionConfig {
    pub manual_collection: bool,
    pub started_at: Option<NaiveDateTime>,
}

impl CollectionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        // Presence is the signal; the value is ignored.
        let manual_collection = env::var_os("MANUAL_COLLECTION").is_some();

        let started_at = match env::var("START_TIME") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                NaiveDateTime::parse_from_str(raw.trim(), START_TIME_FORMAT).map_err(
                    |source| ConfigError::InvalidStartTime {
                        value: raw.clone(),
                        source,
                    },
                )?,
            ),
            _ => None,
        };

        Ok(Self {
            manual_collection,
            started_at,
        })
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            manual_collection: self.manual_collection,
            started_at: self.started_at,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("DICTIONARY_TIMEOUT_SECS must be a positive integer")]
    InvalidDictionaryTimeout,
    #[error("START_TIME '{value}' must match {}", START_TIME_FORMAT)]
    InvalidStartTime {
        value: String,
        source: chrono::ParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "DICTIONARY_URL",
            "DICTIONARY_PATH",
            "DICTIONARY_TIMEOUT_SECS",
            "MANUAL_COLLECTION",
            "START_TIME",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.dictionary, DictionarySource::default());
        assert_eq!(config.collection, CollectionConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn dictionary_path_overrides_remote_url() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DICTIONARY_URL", "https://example.org/dictionary.json");
        env::set_var("DICTIONARY_PATH", "/tmp/dictionary.json");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.dictionary,
            DictionarySource::File(PathBuf::from("/tmp/dictionary.json"))
        );
    }

    #[test]
    fn rejects_zero_dictionary_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DICTIONARY_TIMEOUT_SECS", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidDictionaryTimeout)
        ));
    }

    #[test]
    fn reads_manual_collection_and_start_time() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MANUAL_COLLECTION", "");
        env::set_var("START_TIME", "2024-04-01 10:15:30.250000");
        let config = AppConfig::load().expect("config loads");
        let expected = NaiveDate::from_ymd_opt(2024, 4, 1)
            .and_then(|date| date.and_hms_milli_opt(10, 15, 30, 250));
        assert!(config.collection.manual_collection);
        assert_eq!(config.collection.started_at, expected);

        env::set_var("START_TIME", "01/04/2024");
        match AppConfig::load() {
            Err(ConfigError::InvalidStartTime { value, .. }) => assert_eq!(value, "01/04/2024"),
            other => panic!("expected start time error, got {other:?}"),
        }
    }
}
