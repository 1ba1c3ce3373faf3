// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::cluster::ValidationError;

#[derive(Error, Debug)]
pub enum KubedeployError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cluster not found: {0}")]
    ClusterNotFound(i64),

    #[error("Record store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Inventory parse error: {0}")]
    InventoryParse(String),

    #[error("Automation engine error: {0}")]
    Engine(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, KubedeployError>;
