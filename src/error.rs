use thiserror::Error;
use crate::limiter::AdmissionError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Admission error: {0}")]
    Admission(#[from] AdmissionError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request body exceeds {0} bytes")]
    BodyTooLarge(usize),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Initialization error: {0}")]
    Init(String),
}

impl AppError {
    /// Short machine-readable kind, used as the `error` field of HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Parse(_) => "parse",
            AppError::Validation(_) => "validation",
            AppError::Admission(_) => "admission",
            AppError::Transport(_) => "transport",
            AppError::BodyTooLarge(_) => "body_too_large",
            AppError::Serialization(_) => "serialization",
            AppError::Init(_) => "init",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
