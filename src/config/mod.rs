//! Layered application configuration

mod app_config;

pub use app_config::{AppConfig, BedrockConfig, LogFormat, LoggingConfig, RagSettings, ServerConfig};
