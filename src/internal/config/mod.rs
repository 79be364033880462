// src/internal/config/mod.rs

#[path = "_config.rs"]
pub mod config;

pub use self::config::{LoggingConfig, ENV_PREFIX};
