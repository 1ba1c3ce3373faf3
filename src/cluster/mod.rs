// src/cluster/mod.rs

//! Cluster definitions and their validation.
//!
//! - [`model`] holds the raw form input and the validated `ClusterDefinition`.
//! - [`address`] splits address lists and checks IPv4 syntax.
//! - [`keypath`] expands `~` in private key paths.
//! - [`validate`] applies every rule and aggregates violations.

pub mod address;
pub mod keypath;
pub mod model;
pub mod validate;

pub use model::{ClusterDefinition, DEFAULT_CNI_PLUGIN, DEFAULT_K8S_VERSION, RawClusterInput};
pub use validate::{ValidationError, Violation, ViolationKind, validate};
