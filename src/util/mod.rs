//! Shared utilities

pub mod config;

pub use config::{load_config, CacheConfig, EngineConfig, TranslationConfig};
