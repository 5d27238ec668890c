use crate::eligibility::{EvaluationConfig, IncomeBasis, ThresholdError};
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
    pub database: DatabaseConfig,
    pub eligibility: EvaluationConfig,
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

        let path = env::var("APP_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("households.db"));
        let income_basis = match env::var("APP_INCOME_BASIS") {
            Ok(raw) => IncomeBasis::parse(&raw).ok_or(ConfigError::InvalidIncomeBasis(raw))?,
            Err(_) => IncomeBasis::default(),
        };

        let eligibility = load_threshold()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            database: DatabaseConfig { path, income_basis },
            eligibility,
        })
    }
}

fn load_threshold() -> Result<EvaluationConfig, ConfigError> {
    let raw = env::var(INCOME_THRESHOLD_VAR).map_err(|_| ConfigError::MissingIncomeThreshold)?;
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::UnparseableIncomeThreshold(raw.clone()))?;
    EvaluationConfig::new(value).map_err(ConfigError::InvalidIncomeThreshold)
}

pub const INCOME_THRESHOLD_VAR: &str = "ELIGIBILITY_ANNUAL_INCOME_THRESHOLD";

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

/// Location of the household store and the unit of its income column.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub income_basis: IncomeBasis,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidIncomeBasis(String),
    MissingIncomeThreshold,
    UnparseableIncomeThreshold(String),
    InvalidIncomeThreshold(ThresholdError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidIncomeBasis(value) => {
                write!(f, "APP_INCOME_BASIS must be 'monthly' or 'annual', got '{value}'")
            }
            ConfigError::MissingIncomeThreshold => {
                write!(f, "{INCOME_THRESHOLD_VAR} must be set")
            }
            ConfigError::UnparseableIncomeThreshold(value) => {
                write!(f, "{INCOME_THRESHOLD_VAR} must be a number, got '{value}'")
            }
            ConfigError::InvalidIncomeThreshold(err) => {
                write!(f, "{INCOME_THRESHOLD_VAR} is invalid: {err}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidIncomeThreshold(err) => Some(err),
            ConfigError::InvalidPort
            | ConfigError::InvalidIncomeBasis(_)
            | ConfigError::MissingIncomeThreshold
            | ConfigError::UnparseableIncomeThreshold(_) => None,
        }
    }
}
