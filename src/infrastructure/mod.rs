// src/infrastructure/mod.rs
pub mod config;
pub mod rate_limiter;
pub mod tana_api;

pub use config::{ApiConfig, Config, Mode};
pub use rate_limiter::RateLimiter;
pub use tana_api::TanaApiClient;
