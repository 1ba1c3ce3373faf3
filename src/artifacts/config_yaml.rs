//! `config.yml`: the cluster definition as a YAML document.

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterDefinition;
use crate::errors::Result;

/// Shape of `config.yml`. Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigArtifact {
    pub cluster_name: String,
    pub ssh_user: String,
    pub private_key_path: String,
    pub control_plane: Vec<String>,
    pub workers: Vec<String>,
}

impl ConfigArtifact {
    pub fn from_cluster(cluster: &ClusterDefinition) -> Self {
        Self {
            cluster_name: cluster.name().to_string(),
            ssh_user: cluster.ssh_user().to_string(),
            private_key_path: cluster.private_key_path().to_string(),
            control_plane: cluster.control_plane().to_vec(),
            workers: cluster.workers().to_vec(),
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Lenient view of a `config.yml` that may have been edited by hand: every
/// key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialConfigArtifact {
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub ssh_user: Option<String>,
    #[serde(default)]
    pub private_key_path: Option<String>,
    #[serde(default)]
    pub control_plane: Vec<String>,
    #[serde(default)]
    pub workers: Vec<String>,
}

impl PartialConfigArtifact {
    pub fn from_yaml(text: &str) -> Result<Self> {
        // An empty document deserializes to `null`.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
