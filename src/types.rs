use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which automation engine backs the job runner.
///
/// - `Ansible`: spawn `ansible-playbook` (or the configured program) for each
///   run (default behaviour).
/// - `Noop`: never launch anything; every run finishes immediately with zero
///   lines. Useful for demos and for hosts without the engine installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Ansible,
    Noop,
}

impl Default for EngineKind {
    fn default() -> Self {
        EngineKind::Ansible
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ansible" => Ok(EngineKind::Ansible),
            "noop" => Ok(EngineKind::Noop),
            other => Err(format!(
                "invalid engine kind: {other} (expected \"ansible\" or \"noop\")"
            )),
        }
    }
}

/// The two provisioning procedures the front end can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playbook {
    Deploy,
    Destroy,
}

impl fmt::Display for Playbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Playbook::Deploy => f.write_str("deploy"),
            Playbook::Destroy => f.write_str("destroy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_kind_parses_loosely() {
        assert_eq!(" Noop ".parse::<EngineKind>(), Ok(EngineKind::Noop));
        assert_eq!("ANSIBLE".parse::<EngineKind>(), Ok(EngineKind::Ansible));
        assert!("puppet".parse::<EngineKind>().is_err());
    }
}
