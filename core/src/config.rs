//! Connection settings for the cloud API.

use std::{env, fmt};

use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.nature.global";
pub const DEFAULT_VERSION: u32 = 1;

pub const TOKEN_VAR: &str = "REMO_TOKEN";
pub const ENDPOINT_VAR: &str = "REMO_ENDPOINT";
pub const VERSION_VAR: &str = "REMO_API_VERSION";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("REMO_TOKEN is not set")]
    MissingToken,

    #[error("invalid API version {0:?}")]
    InvalidVersion(String),
}

/// Where to reach the API and how to authenticate.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub endpoint: String,
    pub version: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("version", &self.version)
            .finish()
    }
}

impl Config {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            version: DEFAULT_VERSION,
        }
    }

    /// Read `REMO_TOKEN`, `REMO_ENDPOINT` and `REMO_API_VERSION`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_token(None)
    }

    /// Like `from_env`, but an explicit `token` wins over `REMO_TOKEN`.
    /// Endpoint and version still come from the environment.
    pub fn from_env_with_token(token: Option<&str>) -> Result<Self, ConfigError> {
        Self::from_lookup(token, |key| env::var(key).ok())
    }

    fn from_lookup(
        token: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = token
            .map(str::to_string)
            .or_else(|| lookup(TOKEN_VAR))
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        let mut config = Self::new(&token);
        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            config.endpoint = endpoint;
        }
        if let Some(version) = lookup(VERSION_VAR) {
            config.version = version
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidVersion(version.clone()))?;
        }
        Ok(config)
    }

    /// `{endpoint}/{version}`, e.g. `https://api.nature.global/1`.
    pub fn base_url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.version)
    }
}
