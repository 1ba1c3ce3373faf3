use std::collections::BTreeMap;

use serde::Deserialize;

pub const DEFAULT_K8S_VERSION: &str = "1.29.0";
pub const DEFAULT_CNI_PLUGIN: &str = "calico";

/// Raw, unvalidated cluster fields as submitted by the create form or read
/// back from a stored row.
///
/// Every field is optional so that missing inputs can be reported alongside
/// every other violation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawClusterInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ssh_user: Option<String>,
    #[serde(default)]
    pub private_key_path: Option<String>,
    /// Comma-separated addresses.
    #[serde(default)]
    pub control_plane: Option<String>,
    /// Comma-separated addresses.
    #[serde(default)]
    pub workers: Option<String>,
    #[serde(default)]
    pub k8s_version: Option<String>,
    #[serde(default)]
    pub cni_plugin: Option<String>,
}

impl RawClusterInput {
    /// Build from a plain field map (e.g. a decoded form body).
    pub fn from_fields(fields: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).cloned();
        Self {
            name: get("name"),
            ssh_user: get("ssh_user"),
            private_key_path: get("private_key_path"),
            control_plane: get("control_plane"),
            workers: get("workers"),
            k8s_version: get("k8s_version"),
            cni_plugin: get("cni_plugin"),
        }
    }

    /// Values to pre-fill an empty create form with.
    pub fn form_defaults() -> Self {
        Self {
            k8s_version: Some(DEFAULT_K8S_VERSION.to_string()),
            cni_plugin: Some(DEFAULT_CNI_PLUGIN.to_string()),
            ..Self::default()
        }
    }
}

/// A validated cluster definition.
///
/// Only produced by [`crate::cluster::validate`]; fields are read-only so the
/// address and key-path invariants hold for as long as the value lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterDefinition {
    pub(crate) name: String,
    pub(crate) ssh_user: String,
    pub(crate) private_key_path: String,
    pub(crate) control_plane: Vec<String>,
    pub(crate) workers: Vec<String>,
    pub(crate) k8s_version: String,
    pub(crate) cni_plugin: String,
}

impl ClusterDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ssh_user(&self) -> &str {
        &self.ssh_user
    }

    /// Home-expanded key path, as checked at validation time.
    pub fn private_key_path(&self) -> &str {
        &self.private_key_path
    }

    pub fn control_plane(&self) -> &[String] {
        &self.control_plane
    }

    pub fn workers(&self) -> &[String] {
        &self.workers
    }

    pub fn k8s_version(&self) -> &str {
        &self.k8s_version
    }

    pub fn cni_plugin(&self) -> &str {
        &self.cni_plugin
    }
}
