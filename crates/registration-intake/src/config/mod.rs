use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub storage: StorageConfig,
    pub notify: NotifyConfig,
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
            storage: StorageConfig::from_env()?,
            notify: NotifyConfig::from_env()?,
        })
    }
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where submitted applications are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Sqlite,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "sqlite" | "db" => Ok(Self::Sqlite),
            _ => Err(ConfigError::InvalidStorage(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding one JSON document per application.
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let backend =
            StorageBackend::parse(&env::var("APP_STORAGE").unwrap_or_else(|_| "file".to_string()))?;
        let data_dir = env::var("APP_DATA_DIR").unwrap_or_else(|_| "applications".to_string());
        let database_path =
            env::var("APP_DATABASE_PATH").unwrap_or_else(|_| "registration.db".to_string());

        Ok(Self {
            backend,
            data_dir: PathBuf::from(data_dir),
            database_path: PathBuf::from(database_path),
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("applications"),
            database_path: PathBuf::from("registration.db"),
        }
    }
}

/// Confirmation notice settings. Notices are composed and logged, not delivered.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub enabled: bool,
    pub from: String,
    pub reply_to: String,
    pub signature: String,
}

impl NotifyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let enabled = match env::var("APP_NOTIFY_CONFIRMATIONS") {
            Ok(raw) => parse_flag(&raw)
                .ok_or_else(|| ConfigError::InvalidFlag("APP_NOTIFY_CONFIRMATIONS", raw))?,
            Err(_) => defaults.enabled,
        };

        Ok(Self {
            enabled,
            from: env::var("APP_NOTIFY_FROM").unwrap_or(defaults.from),
            reply_to: env::var("APP_NOTIFY_REPLY_TO").unwrap_or(defaults.reply_to),
            signature: env::var("APP_NOTIFY_SIGNATURE").unwrap_or(defaults.signature),
        })
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            from: "noreply@yourwebsite.com".to_string(),
            reply_to: "admissions@yourwebsite.com".to_string(),
            signature: "Admissions Team".to_string(),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStorage(String),
    InvalidFlag(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStorage(value) => {
                write!(f, "APP_STORAGE must be 'file' or 'sqlite' (found '{value}')")
            }
            ConfigError::InvalidFlag(name, value) => {
                write!(f, "{name} must be true or false (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidStorage(_)
            | ConfigError::InvalidFlag(..) => None,
        }
    }
}
