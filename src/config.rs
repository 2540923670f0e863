use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use config::{Config as ConfigLoader, Environment, File};

use crate::error::{AppError, Result};
use crate::limiter::{LimiterSettings, RefillPolicy};

pub const ENV_PREFIX: &str = "CRPT";
pub const CONFIG_FILE: &str = "crpt";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RefillMode {
    /// Slots come back when work finishes.
    Completion,
    /// Slots come back one window after admission at the earliest.
    Windowed,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // General
    pub log_level: String,
    pub log_json: bool,
    pub bind_addr: SocketAddr,

    // Admission
    pub request_limit: usize,
    pub window_ms: u64,
    pub refill: RefillMode,
    pub acquire_timeout_ms: Option<u64>,

    // Documents
    pub signature: String,
    pub max_body_bytes: usize,
}

impl Config {
    /// Defaults, then an optional `crpt.{toml,yaml,json}` file, then `CRPT_*`
    /// environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let loader = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: Config = loader.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(ConfigLoader::builder()
            .set_default("log_level", "info")?
            .set_default("log_json", false)?
            .set_default("bind_addr", "0.0.0.0:8080")?
            .set_default("request_limit", 5)?
            .set_default("window_ms", 1000)?
            .set_default("refill", "completion")?
            .set_default("signature", "example_signature")?
            .set_default("max_body_bytes", 1024 * 1024)?)
    }

    fn validate(&self) -> Result<()> {
        if self.request_limit == 0 {
            return Err(AppError::Init("request_limit must be at least 1".into()));
        }
        if self.refill == RefillMode::Windowed && self.window_ms == 0 {
            return Err(AppError::Init("window_ms must be positive for windowed refill".into()));
        }
        if self.signature.trim().is_empty() {
            return Err(AppError::Init("signature must not be empty".into()));
        }
        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn limiter_settings(&self) -> LimiterSettings {
        let refill = match self.refill {
            RefillMode::Completion => RefillPolicy::OnCompletion,
            RefillMode::Windowed => RefillPolicy::Windowed(self.window()),
        };

        let settings = LimiterSettings::new(self.request_limit).with_refill(refill);
        match self.acquire_timeout_ms {
            Some(ms) => settings.with_acquire_timeout(Duration::from_millis(ms)),
            None => settings,
        }
    }
}
