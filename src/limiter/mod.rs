pub mod admission;
pub mod stats;

pub use admission::{AdmissionError, AdmissionLimiter, LimiterSettings, RefillPolicy};
pub use stats::{AdmissionStats, StatsSnapshot};
