use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{EngineKind, Playbook};

/// Top-level application configuration as read from a TOML file.
///
/// ```toml
/// [server]
/// bind = "0.0.0.0:5000"
///
/// [auth]
/// username = "admin"
/// password = "secret"
///
/// [store]
/// database = "database/clusters.db"
///
/// [artifacts]
/// dir = "ansible"
///
/// [engine]
/// kind = "ansible"
/// deploy_playbook = "ansible/site.yml"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawAppConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub auth: AuthSection,

    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub artifacts: ArtifactsSection,

    #[serde(default)]
    pub engine: EngineSection,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawAppConfig>` (see `validate.rs`), so
/// holders can rely on the bind address parsing and the engine section being
/// usable.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerSection,
    pub auth: AuthSection,
    pub store: StoreSection,
    pub artifacts: ArtifactsSection,
    pub engine: EngineSection,
    bind_addr: SocketAddr,
}

impl AppConfig {
    pub(crate) fn new_unchecked(raw: RawAppConfig, bind_addr: SocketAddr) -> Self {
        Self {
            server: raw.server,
            auth: raw.auth,
            store: raw.store,
            artifacts: raw.artifacts,
            engine: raw.engine,
            bind_addr,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

/// `[auth]` section: the single shared credential pair.
#[derive(Clone, Deserialize)]
pub struct AuthSection {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "secret".to_string()
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

impl std::fmt::Debug for AuthSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSection")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

fn default_database() -> PathBuf {
    PathBuf::from("database/clusters.db")
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

/// `[artifacts]` section: where `config.yml` and `inventory.ini` are written.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsSection {
    #[serde(default = "default_artifacts_dir")]
    pub dir: PathBuf,
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("ansible")
}

impl Default for ArtifactsSection {
    fn default() -> Self {
        Self {
            dir: default_artifacts_dir(),
        }
    }
}

/// `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    #[serde(default)]
    pub kind: EngineKind,

    /// Executable invoked as `<program> -i <inventory> <playbook>`.
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_deploy_playbook")]
    pub deploy_playbook: PathBuf,

    #[serde(default = "default_destroy_playbook")]
    pub destroy_playbook: PathBuf,

    /// Working directory of the engine process.
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// Capacity of the line channel between a run and its HTTP consumer.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_program() -> String {
    "ansible-playbook".to_string()
}

fn default_deploy_playbook() -> PathBuf {
    PathBuf::from("ansible/site.yml")
}

fn default_destroy_playbook() -> PathBuf {
    PathBuf::from("ansible/cleanup.yml")
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_channel_capacity() -> usize {
    256
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            program: default_program(),
            deploy_playbook: default_deploy_playbook(),
            destroy_playbook: default_destroy_playbook(),
            working_dir: default_working_dir(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl EngineSection {
    pub fn playbook_path(&self, playbook: Playbook) -> &PathBuf {
        match playbook {
            Playbook::Deploy => &self.deploy_playbook,
            Playbook::Destroy => &self.destroy_playbook,
        }
    }
}
