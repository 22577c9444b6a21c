use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

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

/// Top-level configuration for the loan service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub database: DatabaseConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value).ok_or(ConfigError::InvalidLogFormat(value))?,
            Err(_) => LogFormat::Compact,
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://lms.db".to_string()),
            applicants_url: env::var("APPLICANTS_DATABASE_URL").ok(),
            submissions_url: env::var("SUBMISSIONS_DATABASE_URL").ok(),
            payments_url: env::var("PAYMENTS_DATABASE_URL").ok(),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5_u32)
                .filter(|count| *count > 0)
                .ok_or(ConfigError::InvalidNumber("DATABASE_MAX_CONNECTIONS"))?,
            acquire_timeout: parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", 5_u64)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidNumber("DATABASE_ACQUIRE_TIMEOUT_SECS"))?,
        };

        let seed = SeedConfig {
            enabled: parse_flag("SEED_ENABLED", true)?,
            directory: env::var("SEED_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("seed")),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            database,
            seed,
        })
    }
}

/// Reads a numeric variable, falling back to `default` when unset.
/// `None` means the variable was set but did not parse.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Option<T> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().ok(),
        Err(_) => Some(default),
    }
}

fn parse_flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidFlag(name)),
        },
        Err(_) => Ok(default),
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

/// Output layout for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Connection settings for the three store pools.
///
/// Every store uses `url` unless its own override is set.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub applicants_url: Option<String>,
    pub submissions_url: Option<String>,
    pub payments_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            applicants_url: None,
            submissions_url: None,
            payments_url: None,
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    pub fn applicants_url(&self) -> &str {
        self.applicants_url.as_deref().unwrap_or(&self.url)
    }

    pub fn submissions_url(&self) -> &str {
        self.submissions_url.as_deref().unwrap_or(&self.url)
    }

    pub fn payments_url(&self) -> &str {
        self.payments_url.as_deref().unwrap_or(&self.url)
    }
}

/// Start-up seeding from `<directory>/{applicants,submissions,payments}.json`.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub enabled: bool,
    pub directory: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat(String),
    InvalidNumber(&'static str),
    InvalidFlag(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json', got '{value}'")
            }
            ConfigError::InvalidNumber(name) => write!(f, "{name} must be a positive integer"),
            ConfigError::InvalidFlag(name) => write!(f, "{name} must be true or false"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
