use std::{
    env,
    net::SocketAddr,
    path::PathBuf,
    time::Duration,
};

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_CERT_PATH: &str = "ssl/selfsigned.crt";
pub const DEFAULT_KEY_PATH: &str = "ssl/selfsigned.key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OpenAI API key not found in 'OPENAI_API_KEY'.")]
    MissingApiKey,

    #[error("Invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: Box<str> },
}

/// Settings for the outbound completion API.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub api_key: Box<str>,
    pub base_url: Box<str>,
    /// `None` leaves the HTTP client's own default in place.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Process-wide configuration, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub tls: TlsConfig,
    pub upstream: UpstreamConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key: Box<str> = lookup("OPENAI_API_KEY")
            .map(|key| key.trim().into())
            .unwrap_or_default();

        if api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        let base_url: Box<str> = lookup("OPENAI_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into())
            .into();

        let port = match lookup("PORT") {
            Some(port) => port.trim().parse::<u16>().map_err(|e| ConfigError::InvalidVar {
                name: "PORT",
                reason: e.to_string().into(),
            })?,
            None => DEFAULT_PORT,
        };

        let timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(secs) => {
                let secs = secs.trim().parse::<u64>().map_err(|e| ConfigError::InvalidVar {
                    name: "UPSTREAM_TIMEOUT_SECS",
                    reason: e.to_string().into(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidVar {
                        name: "UPSTREAM_TIMEOUT_SECS",
                        reason: "must be greater than zero".into(),
                    });
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let tls = TlsConfig {
            cert_path: lookup("TLS_CERT_PATH")
                .unwrap_or_else(|| DEFAULT_CERT_PATH.into())
                .into(),
            key_path: lookup("TLS_KEY_PATH")
                .unwrap_or_else(|| DEFAULT_KEY_PATH.into())
                .into(),
        };

        Ok(Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            tls,
            upstream: UpstreamConfig {
                api_key,
                base_url,
                timeout,
            },
        })
    }
}
