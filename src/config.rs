//! Service configuration, read from the environment (after `.env` is loaded).

use std::path::PathBuf;
use std::time::Duration;

use crate::{AdminError, Result};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_REPLICATE_API_BASE: &str = "https://api.replicate.com/v1";
pub const DEFAULT_REPLICATE_MODEL: &str = "black-forest-labs/flux-kontext-pro";
pub const DEFAULT_IMAGES_DIR: &str = "public/generated-images";
pub const DEFAULT_IMAGES_URL_PREFIX: &str = "/generated-images";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// Absent means generation requests fail with a configuration error.
    pub replicate_api_token: Option<String>,
    pub replicate_api_base: String,
    pub replicate_model: String,
    pub images_dir: PathBuf,
    pub images_url_prefix: String,
    pub backend_url: String,
    pub http_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            replicate_api_token: None,
            replicate_api_base: DEFAULT_REPLICATE_API_BASE.into(),
            replicate_model: DEFAULT_REPLICATE_MODEL.into(),
            images_dir: DEFAULT_IMAGES_DIR.into(),
            images_url_prefix: DEFAULT_IMAGES_URL_PREFIX.into(),
            backend_url: DEFAULT_BACKEND_URL.into(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|e| AdminError::Config(format!("PORT={raw}: {e}")))?,
            None => defaults.port,
        };
        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse().map_err(|e| AdminError::Config(format!("HTTP_TIMEOUT_SECS={raw}: {e}")))?,
            ),
            None => defaults.http_timeout,
        };

        Ok(Self {
            port,
            replicate_api_token: get("REPLICATE_API_TOKEN"),
            replicate_api_base: get("REPLICATE_API_BASE").unwrap_or(defaults.replicate_api_base),
            replicate_model: get("REPLICATE_MODEL").unwrap_or(defaults.replicate_model),
            images_dir: get("GENERATED_IMAGES_DIR").map(PathBuf::from).unwrap_or(defaults.images_dir),
            images_url_prefix: get("GENERATED_IMAGES_URL_PREFIX").unwrap_or(defaults.images_url_prefix),
            backend_url: get("NEXT_PUBLIC_BACKEND_URL").unwrap_or(defaults.backend_url),
            http_timeout,
        })
    }
}
