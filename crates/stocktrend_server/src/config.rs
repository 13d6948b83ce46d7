//! Server configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and CLI arguments.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use stocktrend_feeds::config::{MAX_LOOKBACK_DAYS, MIN_LOOKBACK_DAYS};
use stocktrend_feeds::FeedsConfig;
use thiserror::Error;

const ENV_HOST: &str = "STOCKTREND_SERVER_HOST";
const ENV_PORT: &str = "STOCKTREND_SERVER_PORT";
const ENV_LOG_LEVEL: &str = "STOCKTREND_LOG_LEVEL";
const ENV_ENVIRONMENT: &str = "STOCKTREND_ENV";
const ENV_API_PREFIX: &str = "STOCKTREND_API_PREFIX";
const ENV_MAX_UPLOAD_BYTES: &str = "STOCKTREND_MAX_UPLOAD_BYTES";
const ENV_TICKERS: &str = "STOCKTREND_TICKERS";
const ENV_CHROME_PATH: &str = "STOCKTREND_CHROME_PATH";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port number: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid environment: {0}. Must be one of: development, staging, production")]
    InvalidEnvironment(String),

    #[error("Invalid API prefix: {0}. Must start with '/' and not end with '/'")]
    InvalidApiPrefix(String),

    #[error("Invalid lookback: {0} days. Must be between 2 and 3650")]
    InvalidLookback(i64),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels supported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Server configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Environment (development, staging, production)
    #[serde(deserialize_with = "deserialize_environment")]
    pub environment: Environment,
    /// Path prefix of the stock API routes
    pub api_prefix: String,
    /// Largest accepted request body (report uploads)
    pub max_upload_bytes: usize,
    /// Source settings
    pub feeds: FeedsConfig,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_environment<'de, D>(deserializer: D) -> Result<Environment, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Environment::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            log_level: LogLevel::Info,
            environment: Environment::Development,
            api_prefix: "/api/stocktrend".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            feeds: FeedsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Apply environment variable overrides on top of `self`
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var(ENV_HOST) {
            self.host = host;
        }

        if let Ok(port_str) = std::env::var(ENV_PORT) {
            self.port = port_str
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("{}={}", ENV_PORT, port_str)))?;
        }

        if let Ok(log_level) = std::env::var(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&log_level)?;
        }

        if let Ok(env) = std::env::var(ENV_ENVIRONMENT) {
            self.environment = Environment::from_str(&env)?;
        }

        if let Ok(prefix) = std::env::var(ENV_API_PREFIX) {
            self.api_prefix = prefix;
        }

        if let Ok(limit) = std::env::var(ENV_MAX_UPLOAD_BYTES) {
            self.max_upload_bytes = limit
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("{}={}", ENV_MAX_UPLOAD_BYTES, limit)))?;
        }

        // Tickers (comma-separated)
        if let Ok(tickers) = std::env::var(ENV_TICKERS) {
            self.feeds.international.tickers = tickers
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(path) = std::env::var(ENV_CHROME_PATH) {
            self.feeds.domestic.chrome_path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        if !self.api_prefix.starts_with('/') || self.api_prefix.ends_with('/') {
            return Err(ConfigError::InvalidApiPrefix(self.api_prefix.clone()));
        }

        if !self.feeds.international.lookback_in_range() {
            return Err(ConfigError::InvalidLookback(
                self.feeds.international.lookback_days,
            ));
        }

        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        Ok(())
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Host address override
    pub host: Option<String>,
    /// Port override
    pub port: Option<u16>,
    /// Log level override
    pub log_level: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<ServerConfig, ConfigError> {
    let mut config = if let Some(config_path) = &cli.config_file {
        ServerConfig::from_file(config_path)?
    } else {
        ServerConfig::default()
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;

    // Final validation
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serialises tests that touch process environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            ENV_HOST,
            ENV_PORT,
            ENV_LOG_LEVEL,
            ENV_ENVIRONMENT,
            ENV_API_PREFIX,
            ENV_MAX_UPLOAD_BYTES,
            ENV_TICKERS,
            ENV_CHROME_PATH,
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.api_prefix, "/api/stocktrend");
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.feeds.international.tickers.len(), 10);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str("dev").unwrap(),
            Environment::Development
        );
        assert_eq!(
            Environment::from_str("stage").unwrap(),
            Environment::Staging
        );
        assert_eq!(
            Environment::from_str("production").unwrap(),
            Environment::Production
        );

        assert!(Environment::from_str("invalid").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_port() {
        let mut config = ServerConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());

        config.port = 8081;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_api_prefix() {
        let mut config = ServerConfig::default();
        config.api_prefix = "api/stocktrend".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidApiPrefix(_))
        ));

        config.api_prefix = "/api/stocktrend/".to_string();
        assert!(config.validate().is_err());

        config.api_prefix = "/v2".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = ServerConfig::default();
        let cli = CliArgs {
            host: Some("192.168.1.1".to_string()),
            port: Some(9000),
            log_level: Some("debug".to_string()),
            config_file: None,
        };

        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.host, "192.168.1.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_cli_rejects_bad_log_level() {
        let mut config = ServerConfig::default();
        let cli = CliArgs {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };

        let result = config.merge_with_cli(&cli);

        assert!(matches!(result, Err(ConfigError::InvalidLogLevel(_))));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_build_config_rejects_bad_cli_log_level() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let cli = CliArgs {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            build_config(&cli),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_validate_lookback_days() {
        let mut config = ServerConfig::default();
        for days in [1, 0, -7, MAX_LOOKBACK_DAYS + 1, i64::MAX] {
            config.feeds.international.lookback_days = days;
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidLookback(d)) if d == days),
                "days = {}",
                days
            );
        }

        config.feeds.international.lookback_days = MIN_LOOKBACK_DAYS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_rejects_huge_lookback() {
        let path = std::env::temp_dir().join(format!(
            "stocktrend-lookback-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[feeds.international]\nlookback_days = 9223372036854775807\n")
            .unwrap();

        let result = ServerConfig::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::InvalidLookback(_))));
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            host = "127.0.0.1"
            port = 3000
            log_level = "debug"
            environment = "production"
            api_prefix = "/stocks-api"

            [feeds.domestic]
            wait_timeout_secs = 15
            chrome_path = "/usr/bin/chromium"

            [feeds.international]
            tickers = ["EA", "NTDOY"]

            [feeds.announcements]
            "Electronic Arts Inc." = "Annual shareholder meeting"
        "#;

        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.api_prefix, "/stocks-api");
        assert_eq!(config.feeds.domestic.wait_timeout_secs, 15);
        assert_eq!(
            config.feeds.domestic.chrome_path,
            Some(PathBuf::from("/usr/bin/chromium"))
        );
        assert_eq!(config.feeds.international.tickers, vec!["EA", "NTDOY"]);
        assert_eq!(config.feeds.announcements.len(), 1);
    }

    #[test]
    fn test_partial_toml_deserialization() {
        let toml_str = r#"
            port = 9000
        "#;

        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        // Should use defaults for unspecified fields
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.feeds.domestic.header_rows, 2);
    }

    #[test]
    fn test_from_file_missing() {
        let err = ServerConfig::from_file(&PathBuf::from("/nonexistent/stocktrend.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }

    #[test]
    fn test_build_config_with_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let cli = CliArgs::default();
        let config = build_config(&cli).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_build_config_precedence() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var(ENV_PORT, "7000");
        std::env::set_var(ENV_HOST, "10.0.0.1");
        std::env::set_var(ENV_TICKERS, "ea, ttwo ,");

        let cli = CliArgs {
            port: Some(7100),
            ..Default::default()
        };
        let config = build_config(&cli).unwrap();
        clear_env();

        // CLI beats env, env beats defaults
        assert_eq!(config.port, 7100);
        assert_eq!(config.host, "10.0.0.1");
        assert_eq!(config.feeds.international.tickers, vec!["EA", "TTWO"]);
    }

    #[test]
    fn test_build_config_rejects_bad_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        std::env::set_var(ENV_LOG_LEVEL, "loud");

        let result = build_config(&CliArgs::default());
        clear_env();

        assert!(matches!(result, Err(ConfigError::InvalidLogLevel(_))));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidPort(0);
        assert!(err.to_string().contains("Invalid port"));

        let err = ConfigError::InvalidLogLevel("bad".to_string());
        assert!(err.to_string().contains("Invalid log level"));

        let err = ConfigError::InvalidApiPrefix("bad/".to_string());
        assert!(err.to_string().contains("Invalid API prefix"));
    }
}
