//! Runtime configuration resolved from the environment and config files.
//!
//! Precedence (highest first): command-line flags (applied by the binaries),
//! environment variables, `.docchat.toml` in the working directory, the
//! platform config file, built-in defaults.

use std::fmt;

use thiserror::Error;

use crate::config_file::ConfigFile;
use crate::gemini::DEFAULT_API_BASE;
use crate::{Model, UnknownModel};

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "DOCCHAT_MODEL";
pub const ENV_API_BASE: &str = "GEMINI_API_BASE";
pub const ENV_BIND: &str = "DOCCHAT_BIND";

pub const DEFAULT_BIND: &str = "127.0.0.1:5001";
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 200;

/// An API credential. `Debug` never prints the secret.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Surrounding whitespace is trimmed, so a blank key is empty.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw secret, for building requests only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("ApiKey(<empty>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Model(#[from] UnknownModel),
    #[error("max_upload_mb must be greater than zero")]
    ZeroUploadLimit,
}

/// Fully resolved settings shared by the CLI and the web server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: ApiKey,
    pub model: Model,
    pub api_base: String,
    pub bind: String,
    pub max_upload_mb: u64,
}

impl AppConfig {
    /// Resolve from the process environment and the cascaded config files.
    pub fn load() -> Result<Self, ConfigError> {
        Self::resolve(&crate::config_file::load_config(), |key| {
            std::env::var(key).ok()
        })
    }

    /// Resolve from an explicit config file and environment lookup.
    pub fn resolve(
        file: &ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let api_key = env(ENV_API_KEY)
            .or_else(|| file.api_keys.as_ref().and_then(|k| k.gemini_api_key.clone()))
            .map(ApiKey::new)
            .unwrap_or_default();

        let model = match env(ENV_MODEL)
            .or_else(|| file.model.as_ref().and_then(|m| m.default.clone()))
        {
            Some(name) => name.parse()?,
            None => Model::default(),
        };

        let api_base = env(ENV_API_BASE)
            .or_else(|| file.model.as_ref().and_then(|m| m.api_base.clone()))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let bind = env(ENV_BIND)
            .or_else(|| file.server.as_ref().and_then(|s| s.bind.clone()))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let max_upload_mb = file
            .server
            .as_ref()
            .and_then(|s| s.max_upload_mb)
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);
        if max_upload_mb == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }

        Ok(Self {
            api_key,
            model,
            api_base,
            bind,
            max_upload_mb,
        })
    }
}
