//! Shared state handed to every axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::document::{Signer, StaticSigner};
use crate::error::Result;
use crate::limiter::AdmissionLimiter;

/// Static build metadata included in health responses.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub limiter: AdmissionLimiter,
    pub signer: Arc<dyn Signer>,
    pub max_body_bytes: usize,
    pub build: BuildInfo,
}

impl AppState {
    pub fn new(limiter: AdmissionLimiter, signer: Arc<dyn Signer>, max_body_bytes: usize) -> Self {
        Self {
            limiter,
            signer,
            max_body_bytes,
            build: BuildInfo::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let limiter = AdmissionLimiter::new(config.limiter_settings())?;
        let signer = Arc::new(StaticSigner::new(config.signature.clone())?);
        Ok(Self::new(limiter, signer, config.max_body_bytes))
    }
}
