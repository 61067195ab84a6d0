use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Default stem for downloaded ranking files, e.g. `ENT_Ranking_2025-11-03.csv`.
pub const DEFAULT_EXPORT_PREFIX: &str = "ENT_Ranking";

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

/// Top-level configuration for the ranking service and CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub export: ExportConfig,
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

        let file_prefix =
            env::var("APP_EXPORT_PREFIX").unwrap_or_else(|_| DEFAULT_EXPORT_PREFIX.to_string());
        let export = ExportConfig::new(file_prefix)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            export,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Naming for the CSV downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    file_prefix: String,
}

impl ExportConfig {
    pub fn new(file_prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let file_prefix = file_prefix.into().trim().to_string();
        if file_prefix.is_empty() || file_prefix.contains(['/', '\\', '"']) {
            return Err(ConfigError::InvalidExportPrefix { value: file_prefix });
        }
        Ok(Self { file_prefix })
    }

    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidExportPrefix { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidExportPrefix { value } => write!(
                f,
                "APP_EXPORT_PREFIX '{}' must be non-empty and free of path separators or quotes",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidExportPrefix { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
