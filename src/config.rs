use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5505;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::ConfigError(format!("Invalid log format: {}", other))),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub openai_model: String,
    pub static_dir: Option<PathBuf>,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Defaults for everything except the API key.
    pub fn new(openai_api_key: impl Into<String>) -> Self {
        Config {
            server_addr: SocketAddr::new(IpAddr::from([127, 0, 0, 1]), DEFAULT_PORT),
            openai_api_key: openai_api_key.into(),
            openai_api_base: DEFAULT_API_BASE.to_string(),
            openai_model: DEFAULT_MODEL.to_string(),
            static_dir: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_format: LogFormat::Compact,
        }
    }

    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let openai_api_key = env::var("OPENAI_API_KEY")?;
        if openai_api_key.trim().is_empty() {
            return Err(AppError::ConfigError("OPENAI_API_KEY is empty".to_string()));
        }

        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?,
            Err(_) => DEFAULT_PORT,
        };
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(secs) => secs
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| AppError::ConfigError(format!("Invalid request timeout: {}", e)))?,
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let log_format = match env::var("LOG_FORMAT") {
            Ok(format) => format.parse()?,
            Err(_) => LogFormat::default(),
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            openai_api_key,
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            static_dir: env::var("STATIC_DIR").ok().map(PathBuf::from),
            request_timeout,
            log_format,
        })
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.openai_api_base.trim_end_matches('/'))
    }
}

// Hand-written so the API key can never reach a log line.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_addr", &self.server_addr)
            .field("openai_api_key", &"<redacted>")
            .field("openai_api_base", &self.openai_api_base)
            .field("openai_model", &self.openai_model)
            .field("static_dir", &self.static_dir)
            .field("request_timeout", &self.request_timeout)
            .field("log_format", &self.log_format)
            .finish()
    }
}
