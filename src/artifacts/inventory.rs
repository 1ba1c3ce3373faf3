//! `inventory.ini`: the grouped host list handed to the automation engine.
//!
//! Layout (always in this order):
//!
//! ```ini
//! [control-plane]
//! 10.0.0.1
//!
//! [workers]
//! 10.0.0.2
//!
//! [all:vars]
//! ansible_user = root
//! ansible_ssh_private_key_file = /home/op/.ssh/id_rsa
//! ```

use std::fmt::Write as _;

use crate::artifacts::config_yaml::PartialConfigArtifact;
use crate::cluster::ClusterDefinition;
use crate::cluster::keypath::expand_home;
use crate::errors::{KubedeployError, Result};

pub const CONTROL_PLANE_GROUP: &str = "control-plane";
pub const WORKERS_GROUP: &str = "workers";
pub const VARS_GROUP: &str = "all:vars";
pub const USER_VAR: &str = "ansible_user";
pub const KEY_VAR: &str = "ansible_ssh_private_key_file";

const FALLBACK_SSH_USER: &str = "ubuntu";
const FALLBACK_KEY_PATH: &str = "~/.ssh/id_rsa";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    pub control_plane: Vec<String>,
    pub workers: Vec<String>,
    pub ssh_user: String,
    pub private_key_file: String,
}

impl Inventory {
    pub fn from_cluster(cluster: &ClusterDefinition) -> Self {
        Self {
            control_plane: cluster.control_plane().to_vec(),
            workers: cluster.workers().to_vec(),
            ssh_user: cluster.ssh_user().to_string(),
            private_key_file: cluster.private_key_path().to_string(),
        }
    }

    /// Build from a possibly hand-edited `config.yml`, filling gaps with
    /// `ubuntu` / `~/.ssh/id_rsa` and expanding `~` in the key path.
    pub fn from_config_artifact(cfg: &PartialConfigArtifact) -> Self {
        let ssh_user = cfg
            .ssh_user
            .clone()
            .unwrap_or_else(|| FALLBACK_SSH_USER.to_string());
        let key = cfg.private_key_path.as_deref().unwrap_or(FALLBACK_KEY_PATH);

        Self {
            control_plane: cfg.control_plane.clone(),
            workers: cfg.workers.clone(),
            ssh_user,
            private_key_file: expand_home(key).to_string_lossy().into_owned(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "[{CONTROL_PLANE_GROUP}]");
        for host in &self.control_plane {
            let _ = writeln!(out, "{host}");
        }
        out.push('\n');

        let _ = writeln!(out, "[{WORKERS_GROUP}]");
        for host in &self.workers {
            let _ = writeln!(out, "{host}");
        }
        out.push('\n');

        let _ = writeln!(out, "[{VARS_GROUP}]");
        let _ = writeln!(out, "{USER_VAR} = {}", self.ssh_user);
        let _ = writeln!(out, "{KEY_VAR} = {}", self.private_key_file);
        out.push('\n');

        out
    }

    /// Parse an inventory previously produced by [`Inventory::render`].
    ///
    /// Blank lines and `#` / `;` comments are skipped. Unknown groups or
    /// variables, or a missing variable, are errors.
    pub fn parse(text: &str) -> Result<Self> {
        let mut control_plane = Vec::new();
        let mut workers = Vec::new();
        let mut ssh_user = None;
        let mut private_key_file = None;
        let mut group: Option<String> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                group = Some(name.trim().to_string());
                continue;
            }

            match group.as_deref() {
                Some(CONTROL_PLANE_GROUP) => control_plane.push(line.to_string()),
                Some(WORKERS_GROUP) => workers.push(line.to_string()),
                Some(VARS_GROUP) => {
                    let (key, value) = split_var(line).ok_or_else(|| {
                        parse_error(idx, format!("expected `key = value`, got {line:?}"))
                    })?;
                    match key {
                        USER_VAR => ssh_user = Some(value.to_string()),
                        KEY_VAR => private_key_file = Some(value.to_string()),
                        other => {
                            return Err(parse_error(idx, format!("unexpected variable {other:?}")));
                        }
                    }
                }
                Some(other) => {
                    return Err(parse_error(idx, format!("unexpected group [{other}]")));
                }
                None => {
                    return Err(parse_error(idx, "entry before any group header".to_string()));
                }
            }
        }

        Ok(Self {
            control_plane,
            workers,
            ssh_user: ssh_user
                .ok_or_else(|| KubedeployError::InventoryParse(format!("missing {USER_VAR}")))?,
            private_key_file: private_key_file
                .ok_or_else(|| KubedeployError::InventoryParse(format!("missing {KEY_VAR}")))?,
        })
    }
}

fn split_var(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    let (key, rest) = line.split_at(pos);
    Some((key.trim(), rest[1..].trim()))
}

fn parse_error(idx: usize, msg: String) -> KubedeployError {
    KubedeployError::InventoryParse(format!("line {}: {}", idx + 1, msg))
}
