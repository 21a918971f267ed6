use std::env;
use std::fmt;
use std::str::FromStr;

/// Base URL used in development
pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:3000";

/// Base URL used in production
pub const PRODUCTION_BASE_URL: &str = "https://api.devops.example.com";

/// Deployment environment, selects default data mode and base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn default_mode(self) -> DataMode {
        match self {
            Self::Development => DataMode::Mock,
            Self::Production => DataMode::Upstream,
        }
    }

    fn default_base_url(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(()),
        }
    }
}

/// Where records come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    /// Synthesized by the seeded generator
    Mock,
    /// Fetched from the upstream API
    Upstream,
}

impl DataMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Upstream => "upstream",
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mock generator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockConfig {
    /// Base seed for record generation
    pub seed: u64,
    /// Change documents generated for list and lookup requests
    pub change_document_count: u32,
    /// Jobs generated for list and build lookup requests
    pub job_count: u32,
    /// Projects generated for list requests
    pub project_count: u32,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            change_document_count: 50,
            job_count: 30,
            project_count: 10,
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    pub environment: Environment,
    pub data_mode: DataMode,
    /// Upstream API root, used in upstream mode
    pub upstream_base_url: String,
    pub mock: MockConfig,
}

impl Default for Config {
    fn default() -> Self {
        let environment = Environment::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment,
            data_mode: environment.default_mode(),
            upstream_base_url: environment.default_base_url().to_string(),
            mock: MockConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match var("APP_ENV") {
            Some(value) => value
                .parse::<Environment>()
                .map_err(|_| ConfigError::InvalidValue("APP_ENV"))?,
            None => Environment::default(),
        };

        let data_mode = match var("USE_MOCK_DATA") {
            Some(value) => {
                if parse_bool(&value).ok_or(ConfigError::InvalidValue("USE_MOCK_DATA"))? {
                    DataMode::Mock
                } else {
                    DataMode::Upstream
                }
            }
            None => environment.default_mode(),
        };

        let upstream_base_url = var("UPSTREAM_BASE_URL")
            .unwrap_or_else(|| environment.default_base_url().to_string());

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = var("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let defaults = MockConfig::default();
        let mock = MockConfig {
            seed: parse_or(&var, "MOCK_SEED", defaults.seed)?,
            change_document_count: parse_or(
                &var,
                "MOCK_CHANGE_DOCUMENT_COUNT",
                defaults.change_document_count,
            )?,
            job_count: parse_or(&var, "MOCK_JOB_COUNT", defaults.job_count)?,
            project_count: parse_or(&var, "MOCK_PROJECT_COUNT", defaults.project_count)?,
        };

        Ok(Self {
            host,
            port,
            environment,
            data_mode,
            upstream_base_url,
            mock,
        })
    }
}

fn parse_or<F, T>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(key) {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue(key)),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
