//! Shared domain types and configuration for the xgrowth workspace.

pub mod app_config;
pub mod config;
pub mod layout;
pub mod record;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, parse_horizon};
pub use layout::{load_layout, LayoutPaths};
pub use record::{StatField, StatRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read layout file {path}: {source}")]
    LayoutFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse layout file: {0}")]
    LayoutFileParse(#[from] serde_yaml::Error),

    #[error("layout validation failed: {0}")]
    Validation(String),
}
