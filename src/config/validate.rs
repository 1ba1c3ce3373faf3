use std::net::SocketAddr;

use crate::config::model::{AppConfig, RawAppConfig};
use crate::errors::{KubedeployError, Result};

impl TryFrom<RawAppConfig> for AppConfig {
    type Error = crate::errors::KubedeployError;

    fn try_from(raw: RawAppConfig) -> std::result::Result<Self, Self::Error> {
        let bind_addr = validate_server(&raw)?;
        validate_auth(&raw)?;
        validate_engine(&raw)?;
        Ok(AppConfig::new_unchecked(raw, bind_addr))
    }
}

fn validate_server(cfg: &RawAppConfig) -> Result<SocketAddr> {
    cfg.server.bind.trim().parse::<SocketAddr>().map_err(|e| {
        KubedeployError::ConfigError(format!(
            "[server].bind '{}' is not a socket address: {}",
            cfg.server.bind, e
        ))
    })
}

fn validate_auth(cfg: &RawAppConfig) -> Result<()> {
    if cfg.auth.username.is_empty() {
        return Err(KubedeployError::ConfigError(
            "[auth].username must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_engine(cfg: &RawAppConfig) -> Result<()> {
    let engine = &cfg.engine;

    if engine.channel_capacity == 0 {
        return Err(KubedeployError::ConfigError(
            "[engine].channel_capacity must be >= 1 (got 0)".to_string(),
        ));
    }

    if engine.program.trim().is_empty() {
        return Err(KubedeployError::ConfigError(
            "[engine].program must not be empty".to_string(),
        ));
    }

    for (key, path) in [
        ("deploy_playbook", &engine.deploy_playbook),
        ("destroy_playbook", &engine.destroy_playbook),
    ] {
        if path.as_os_str().is_empty() {
            return Err(KubedeployError::ConfigError(format!(
                "[engine].{key} must not be empty"
            )));
        }
    }

    Ok(())
}
