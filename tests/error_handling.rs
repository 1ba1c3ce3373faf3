// tests/error_handling.rs

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;

use kubedeploy::config::load_and_validate;
use kubedeploy::errors::KubedeployError;
use kubedeploy::types::EngineKind;

#[test]
fn test_full_config_file_is_loaded() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[server]
bind = "0.0.0.0:8080"

[artifacts]
dir = "out/ansible"

[engine]
kind = "noop"
deploy_playbook = "playbooks/up.yml"
channel_capacity = 16
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).expect("valid config");

    assert_eq!(cfg.bind_addr().port(), 8080);
    assert_eq!(cfg.artifacts.dir, PathBuf::from("out/ansible"));
    assert_eq!(cfg.engine.kind, EngineKind::Noop);
    assert_eq!(cfg.engine.deploy_playbook, PathBuf::from("playbooks/up.yml"));
    assert_eq!(cfg.engine.destroy_playbook, PathBuf::from("ansible/cleanup.yml"));
    assert_eq!(cfg.engine.channel_capacity, 16);
}

#[test]
fn test_missing_config_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let cfg = load_and_validate(dir.path().join("absent.toml")).expect("defaults");

    assert_eq!(cfg.bind_addr().port(), 5000);
    assert_eq!(cfg.engine.kind, EngineKind::Ansible);
    assert_eq!(cfg.engine.program, "ansible-playbook");
}

#[test]
fn test_bad_bind_address_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[server]
bind = "localhost"
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(KubedeployError::ConfigError(msg)) => {
            assert!(msg.contains("[server].bind"));
            assert!(msg.contains("localhost"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_unknown_engine_kind_returns_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[engine]
kind = "terraform"
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(KubedeployError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_empty_playbook_program_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[engine]
program = "  "
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(KubedeployError::ConfigError(msg)) => assert!(msg.contains("[engine].program")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[tokio::test]
async fn test_generate_on_empty_database_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("empty.db");
    let out = dir.path().join("ansible");

    let err = kubedeploy::generate(&db, &out).await.unwrap_err();

    assert!(err.to_string().contains("No clusters defined in database"));
    assert!(!out.join("inventory.ini").exists());
}

#[test]
fn test_inventory_from_missing_config_yml_fails() {
    let dir = tempfile::tempdir().unwrap();

    let result = kubedeploy::inventory(
        &dir.path().join("config.yml"),
        &dir.path().join("inventory.ini"),
    );

    assert!(result.is_err());
}
