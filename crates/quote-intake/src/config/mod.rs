use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_INITIAL_STATUS: &str = "pending";

/// Deployment stage the intake service runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    /// Unknown names fall back to development.
    pub fn from_name(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Environment-driven settings for the quote intake service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub intake: IntakeConfig,
}

impl AppConfig {
    /// Read `APP_*` and `QUOTE_*` variables, after loading `.env` when one exists.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = var("APP_ENV")
            .map(|name| AppEnvironment::from_name(&name))
            .unwrap_or_default();

        let server = ServerConfig {
            host: var("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: match var("APP_PORT") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort { raw })?,
                None => DEFAULT_PORT,
            },
        };

        let telemetry = TelemetryConfig {
            log_level: var("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        };

        let intake = match var("QUOTE_INITIAL_STATUS") {
            Some(status) if status.trim().is_empty() => {
                return Err(ConfigError::BlankInitialStatus)
            }
            Some(status) => IntakeConfig {
                initial_status: status.trim().to_string(),
            },
            None => IntakeConfig::default(),
        };

        Ok(Self {
            environment,
            server,
            telemetry,
            intake,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// HTTP listener binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive, e.g. `info` or `quote_intake=debug`.
    pub log_level: String,
}

/// Settings for the quote sink the binary wires up.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Lifecycle tag a freshly stored quote starts with.
    pub initial_status: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            initial_status: DEFAULT_INITIAL_STATUS.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16, got '{raw}'")]
    InvalidPort { raw: String },
    #[error("APP_HOST '{host}' must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("QUOTE_INITIAL_STATUS must not be blank when set")]
    BlankInitialStatus,
}
