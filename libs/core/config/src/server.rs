use crate::{env_or_default, ConfigError, FromEnv};
use std::net::Ipv4Addr;

/// Default listening port of the catalog API.
pub const DEFAULT_PORT: u16 = 5000;

/// Default request body cap: 25 MiB, enough for five full-size product photos.
pub const DEFAULT_MAX_BODY_SIZE: usize = 25 * 1024 * 1024;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 5000
    /// - MAX_BODY_SIZE: defaults to 25 MiB
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_or_default("PORT", &DEFAULT_PORT.to_string())
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "PORT".to_string(),
                details: format!("{}", e),
            })?;
        let max_body_size = env_or_default("MAX_BODY_SIZE", &DEFAULT_MAX_BODY_SIZE.to_string())
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "MAX_BODY_SIZE".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            host,
            port,
            max_body_size,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), DEFAULT_PORT)
    }
}
