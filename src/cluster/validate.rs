//! Turn raw cluster input into a [`ClusterDefinition`], collecting every
//! violation instead of stopping at the first.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::cluster::address::{is_valid_ipv4, split_address_list};
use crate::cluster::keypath::expand_home;
use crate::cluster::model::{
    ClusterDefinition, DEFAULT_CNI_PLUGIN, DEFAULT_K8S_VERSION, RawClusterInput,
};
use crate::fs::FileSystem;

/// What is wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    Empty,
    /// Line breaks or other control characters, which would leak into the
    /// line-oriented inventory file.
    ControlCharacter,
    NoControlPlane,
    InvalidAddress(String),
    DuplicateAddress(String),
    KeyNotFound(PathBuf),
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Missing => f.write_str("field required"),
            ViolationKind::Empty => f.write_str("must not be empty"),
            ViolationKind::ControlCharacter => f.write_str("must not contain control characters"),
            ViolationKind::NoControlPlane => {
                f.write_str("at least one control-plane address is required")
            }
            ViolationKind::InvalidAddress(ip) => write!(f, "Invalid IP {ip}"),
            ViolationKind::DuplicateAddress(ip) => write!(f, "Duplicate IP detected: {ip}"),
            ViolationKind::KeyNotFound(path) => {
                write!(f, "Private key path not found: {}", path.display())
            }
        }
    }
}

/// A field-level violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// Every violation found in one validation pass. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn has(&self, pred: impl Fn(&ViolationKind) -> bool) -> bool {
        self.violations.iter().any(|v| pred(&v.kind))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.violations.len();
        write!(
            f,
            "{n} validation error{} for cluster definition: ",
            if n == 1 { "" } else { "s" }
        )?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Validate raw input against the cluster-definition rules.
///
/// - `control_plane` / `workers` are split on `,`, trimmed, blanks dropped.
/// - Each address must be a dotted-quad IPv4 address.
/// - No address may appear twice across control-plane and workers combined.
/// - `private_key_path` is home-expanded and must exist on `fs` right now.
/// - `name`, `ssh_user` and `private_key_path` must be free of control
///   characters.
/// - `k8s_version` / `cni_plugin` fall back to defaults when absent or blank.
pub fn validate(
    input: &RawClusterInput,
    fs: &dyn FileSystem,
) -> Result<ClusterDefinition, ValidationError> {
    let mut violations = Vec::new();

    let name = required_text("name", input.name.as_deref(), &mut violations);
    let ssh_user = required_text("ssh_user", input.ssh_user.as_deref(), &mut violations);

    let private_key_path =
        match required_text("private_key_path", input.private_key_path.as_deref(), &mut violations)
        {
            Some(raw) => {
                let expanded = expand_home(&raw);
                if !fs.exists(&expanded) {
                    violations.push(Violation {
                        field: "private_key_path",
                        kind: ViolationKind::KeyNotFound(expanded.clone()),
                    });
                }
                Some(expanded.to_string_lossy().into_owned())
            }
            None => None,
        };

    let control_plane = match input.control_plane.as_deref() {
        Some(raw) => split_address_list(raw),
        None => {
            violations.push(Violation {
                field: "control_plane",
                kind: ViolationKind::Missing,
            });
            Vec::new()
        }
    };
    if input.control_plane.is_some() && control_plane.is_empty() {
        violations.push(Violation {
            field: "control_plane",
            kind: ViolationKind::NoControlPlane,
        });
    }

    let workers = input
        .workers
        .as_deref()
        .map(split_address_list)
        .unwrap_or_default();

    check_addresses(&control_plane, &workers, &mut violations);

    if !violations.is_empty() {
        debug!(count = violations.len(), "cluster definition rejected");
        return Err(ValidationError { violations });
    }

    Ok(ClusterDefinition {
        // All three are `Some` when no violation was recorded.
        name: name.unwrap_or_default(),
        ssh_user: ssh_user.unwrap_or_default(),
        private_key_path: private_key_path.unwrap_or_default(),
        control_plane,
        workers,
        k8s_version: or_default(input.k8s_version.as_deref(), DEFAULT_K8S_VERSION),
        cni_plugin: or_default(input.cni_plugin.as_deref(), DEFAULT_CNI_PLUGIN),
    })
}

fn required_text(
    field: &'static str,
    value: Option<&str>,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    match value.map(str::trim) {
        None => {
            violations.push(Violation {
                field,
                kind: ViolationKind::Missing,
            });
            None
        }
        Some("") => {
            violations.push(Violation {
                field,
                kind: ViolationKind::Empty,
            });
            None
        }
        Some(v) if v.chars().any(char::is_control) => {
            violations.push(Violation {
                field,
                kind: ViolationKind::ControlCharacter,
            });
            None
        }
        Some(v) => Some(v.to_string()),
    }
}

fn check_addresses(control_plane: &[String], workers: &[String], violations: &mut Vec<Violation>) {
    let tagged = control_plane
        .iter()
        .map(|ip| ("control_plane", ip))
        .chain(workers.iter().map(|ip| ("workers", ip)));

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for (field, ip) in tagged {
        if !is_valid_ipv4(ip) {
            violations.push(Violation {
                field,
                kind: ViolationKind::InvalidAddress(ip.clone()),
            });
        }
        if !seen.insert(ip.as_str()) && reported.insert(ip.as_str()) {
            violations.push(Violation {
                field,
                kind: ViolationKind::DuplicateAddress(ip.clone()),
            });
        }
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}
