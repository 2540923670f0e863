pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod limiter;
pub mod utils;
