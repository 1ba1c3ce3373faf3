// src/config/mod.rs

//! Application configuration for kubedeploy.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and overlay env vars (`loader.rs`).
//! - Validate basic invariants like the bind address (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_env_overrides, load_and_validate, load_from_path};
pub use model::{
    AppConfig, ArtifactsSection, AuthSection, EngineSection, RawAppConfig, ServerSection,
    StoreSection,
};
