// src/artifacts/mod.rs

//! Files the automation engine consumes, rendered from a validated cluster.
//!
//! Both files live in one directory and are overwritten in place on every
//! deploy/destroy. Overlapping requests race on them; nothing here locks.

pub mod config_yaml;
pub mod inventory;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cluster::ClusterDefinition;
use crate::errors::Result;
use crate::fs::FileSystem;

pub use config_yaml::{ConfigArtifact, PartialConfigArtifact};
pub use inventory::Inventory;

pub const CONFIG_FILE_NAME: &str = "config.yml";
pub const INVENTORY_FILE_NAME: &str = "inventory.ini";

/// Where the two artifacts were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub config: PathBuf,
    pub inventory: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            config: dir.join(CONFIG_FILE_NAME),
            inventory: dir.join(INVENTORY_FILE_NAME),
        }
    }
}

/// Render `(config.yml, inventory.ini)` contents without touching disk.
pub fn render(cluster: &ClusterDefinition) -> Result<(String, String)> {
    let config = ConfigArtifact::from_cluster(cluster).to_yaml()?;
    let inventory = Inventory::from_cluster(cluster).render();
    Ok((config, inventory))
}

/// Render both artifacts and write them into `dir`.
pub fn emit(cluster: &ClusterDefinition, dir: &Path, fs: &dyn FileSystem) -> Result<ArtifactPaths> {
    let (config, inventory) = render(cluster)?;
    let paths = ArtifactPaths::in_dir(dir);

    fs.write(&paths.config, config.as_bytes())?;
    fs.write(&paths.inventory, inventory.as_bytes())?;

    info!(
        cluster = %cluster.name(),
        inventory = %paths.inventory.display(),
        "wrote cluster artifacts"
    );

    Ok(paths)
}
