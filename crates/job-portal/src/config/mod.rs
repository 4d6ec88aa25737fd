use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use url::Url;

use crate::intake::resume::ResumePolicy;
use crate::intake::transport::{AuthHeader, FileEncoding, WebhookTarget};

const URL_PLACEHOLDER: &str = "YOUR_WEBHOOK_URL_HERE";
const AUTH_PLACEHOLDER: &str = "YOUR_WEBHOOK_AUTH_TOKEN_HERE";
const DEFAULT_AUTH_HEADER: &str = "key";
const DEFAULT_SIMULATION_DELAY_MS: u64 = 1000;

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
    pub webhook: WebhookConfig,
    pub uploads: UploadConfig,
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
            webhook: WebhookConfig::from_env()?,
            uploads: UploadConfig {
                max_size_mb: parse_number("RESUME_MAX_SIZE_MB", ResumePolicy::DEFAULT_MAX_SIZE_MB)?,
            },
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

/// Destination and credentials for outbound webhook submissions.
///
/// The same settings drive both the direct submission client and the
/// pass-through proxy; a client that talks to the proxy is simply configured
/// with the proxy URL and no header value. `header_name` is `None` unless
/// `WEBHOOK_HEADER_NAME` is set.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: Option<Url>,
    pub header_name: Option<String>,
    pub header_value: Option<String>,
    pub file_encoding: FileEncoding,
    pub simulation_delay: Duration,
}

impl WebhookConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = optional_var("WEBHOOK_URL", URL_PLACEHOLDER)
            .map(|raw| {
                Url::parse(&raw).map_err(|source| ConfigError::InvalidWebhookUrl {
                    value: raw.clone(),
                    source,
                })
            })
            .transpose()?;

        let header_name = optional_var("WEBHOOK_HEADER_NAME", "");
        let header_value = optional_var("WEBHOOK_HEADER_VALUE", AUTH_PLACEHOLDER);

        let file_encoding = match optional_var("WEBHOOK_FILE_ENCODING", "") {
            Some(raw) => raw
                .parse::<FileEncoding>()
                .map_err(|_| ConfigError::InvalidFileEncoding(raw))?,
            None => FileEncoding::default(),
        };

        let delay_ms = parse_number("WEBHOOK_SIMULATION_DELAY_MS", DEFAULT_SIMULATION_DELAY_MS)?;

        Ok(Self {
            url,
            header_name,
            header_value,
            file_encoding,
            simulation_delay: Duration::from_millis(delay_ms),
        })
    }

    /// Auth header for the direct client: attached whenever a secret is configured, under
    /// `key` if no header name was given.
    pub fn auth_header(&self) -> Option<AuthHeader> {
        self.header_value.as_ref().map(|value| AuthHeader {
            name: self
                .header_name
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTH_HEADER.to_string()),
            value: value.clone(),
        })
    }

    /// Auth header for the proxy, which only attaches one when both name and value are set.
    pub fn proxy_auth_header(&self) -> Option<AuthHeader> {
        match (&self.header_name, &self.header_value) {
            (Some(name), Some(value)) => Some(AuthHeader {
                name: name.clone(),
                value: value.clone(),
            }),
            _ => None,
        }
    }

    /// Fully resolved destination, or `None` when submissions should be simulated.
    pub fn target(&self) -> Option<WebhookTarget> {
        self.url.as_ref().map(|url| WebhookTarget {
            url: url.clone(),
            auth: self.auth_header(),
        })
    }
}

/// Limits applied to uploaded resumes before anything is sent.
#[derive(Debug, Clone, Copy)]
pub struct UploadConfig {
    pub max_size_mb: u64,
}

impl UploadConfig {
    pub fn resume_policy(&self) -> ResumePolicy {
        ResumePolicy::with_max_size_mb(self.max_size_mb)
    }
}

fn optional_var(name: &str, placeholder: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && value != placeholder)
}

fn parse_number(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match optional_var(name, "") {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        None => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidWebhookUrl { value: String, source: url::ParseError },
    InvalidFileEncoding(String),
    InvalidNumber { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidWebhookUrl { value, .. } => {
                write!(f, "WEBHOOK_URL '{value}' is not an absolute URL")
            }
            ConfigError::InvalidFileEncoding(value) => write!(
                f,
                "WEBHOOK_FILE_ENCODING must be 'multipart' or 'base64' (found '{value}')"
            ),
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a non-negative integer (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidWebhookUrl { source, .. } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidFileEncoding(_)
            | ConfigError::InvalidNumber { .. } => None,
        }
    }
}
