//! SDK configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > box.toml > defaults

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.box.com/2.0/";
pub const DEFAULT_BASE_UPLOAD_URL: &str = "https://upload.box.com/api/2.0/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub fn default_user_agent() -> String {
    concat!("box-sdk-rust/", env!("CARGO_PKG_VERSION")).to_owned()
}

#[derive(Debug, Deserialize, Clone)]
pub struct BoxConfig {
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Root of the content API, always ending in `/`.
    pub base_url: String,
    /// Root of the upload API, always ending in `/`.
    pub base_upload_url: String,
    /// OAuth2 access token sent as a bearer token. Obtaining and refreshing
    /// it is the caller's business.
    pub access_token: String,
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl BoxConfig {
    /// Load configuration from defaults, an optional `box.toml`, `.env` and
    /// the environment (`BOX__API__ACCESS_TOKEN`, `BOX__API__BASE_URL`, ...).
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::load_with(env_source())
    }

    /// [`load`](Self::load) without touching `.env`, reading variables
    /// through `environment` instead of [`env_source`].
    pub fn load_with(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let cfg = config::Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.base_upload_url", DEFAULT_BASE_UPLOAD_URL)?
            .set_default("api.access_token", "")?
            .set_default("api.user_agent", default_user_agent())?
            .set_default("api.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .add_source(config::File::with_name("box").required(false))
            .add_source(environment)
            .build()?;

        cfg.try_deserialize()
    }
}

/// `BOX__API__ACCESS_TOKEN` maps to `api.access_token`.
pub fn env_source() -> config::Environment {
    config::Environment::with_prefix("BOX").separator("__").try_parsing(true)
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_owned(),
                base_upload_url: DEFAULT_BASE_UPLOAD_URL.to_owned(),
                access_token: String::new(),
                user_agent: default_user_agent(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        }
    }
}
