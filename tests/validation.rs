// tests/validation.rs

mod common;
use crate::common::{Sandbox, init_tracing};

use kubedeploy::cluster::{
    DEFAULT_CNI_PLUGIN, DEFAULT_K8S_VERSION, RawClusterInput, ViolationKind, validate,
};
use kubedeploy::fs::RealFileSystem;
use kubedeploy_test_utils::builders::ClusterInputBuilder;

#[test]
fn duplicate_control_plane_address_is_rejected() {
    init_tracing();
    let sandbox = Sandbox::new();

    let input = ClusterInputBuilder::new(&sandbox.key_path())
        .control_plane("10.0.0.1,10.0.0.1")
        .build();

    let err = validate(&input, &RealFileSystem).unwrap_err();
    assert!(err.to_string().contains("Duplicate IP"), "{err}");
}

#[test]
fn malformed_address_is_rejected() {
    init_tracing();
    let sandbox = Sandbox::new();

    let input = ClusterInputBuilder::new(&sandbox.key_path())
        .control_plane("invalid")
        .build();

    let err = validate(&input, &RealFileSystem).unwrap_err();
    assert!(err.to_string().contains("Invalid IP invalid"), "{err}");
}

#[test]
fn duplicate_split_across_roles_is_rejected() {
    let sandbox = Sandbox::new();

    let input = ClusterInputBuilder::new(&sandbox.key_path())
        .control_plane("10.0.0.1, 10.0.0.2")
        .workers("10.0.0.3,10.0.0.2")
        .build();

    let err = validate(&input, &RealFileSystem).unwrap_err();
    assert!(err.has(|k| *k == ViolationKind::DuplicateAddress("10.0.0.2".into())));
}

#[test]
fn missing_key_is_reported_whatever_the_addresses() {
    let sandbox = Sandbox::new();
    let missing = sandbox.dir.path().join("nope");
    let missing = missing.to_string_lossy();

    for (cp, workers) in [("10.0.0.1", "10.0.0.2"), ("bogus", "10.0.0.2,10.0.0.2")] {
        let input = ClusterInputBuilder::new(&missing)
            .control_plane(cp)
            .workers(workers)
            .build();

        let err = validate(&input, &RealFileSystem).unwrap_err();
        assert!(
            err.has(|k| matches!(k, ViolationKind::KeyNotFound(_))),
            "{cp}/{workers}: {err}"
        );
        assert!(err.to_string().contains("Private key path not found"));
    }
}

#[test]
fn all_violations_are_listed_together() {
    let input = ClusterInputBuilder::new("/definitely/not/here")
        .control_plane("1.2.3")
        .workers("1.2.3.4,1.2.3.4")
        .without("ssh_user")
        .build();

    let err = validate(&input, &RealFileSystem).unwrap_err();
    let text = err.to_string();

    assert_eq!(err.violations().len(), 4, "{text}");
    for needle in [
        "ssh_user: field required",
        "Private key path not found",
        "Invalid IP 1.2.3",
        "Duplicate IP detected: 1.2.3.4",
    ] {
        assert!(text.contains(needle), "missing {needle:?} in {text}");
    }
}

#[test]
fn valid_definition_is_canonicalised() {
    let sandbox = Sandbox::new();

    let input = ClusterInputBuilder::new(&sandbox.key_path())
        .name("prod")
        .control_plane(" 10.0.0.1 ,, 10.0.0.2 ")
        .workers("10.0.1.1,\t10.0.1.2")
        .build();

    let cluster = validate(&input, &RealFileSystem).expect("valid");
    assert_eq!(cluster.name(), "prod");
    assert_eq!(cluster.control_plane(), ["10.0.0.1", "10.0.0.2"]);
    assert_eq!(cluster.workers(), ["10.0.1.1", "10.0.1.2"]);
    assert_eq!(cluster.k8s_version(), DEFAULT_K8S_VERSION);
    assert_eq!(cluster.cni_plugin(), DEFAULT_CNI_PLUGIN);
    assert_eq!(cluster.private_key_path(), sandbox.key_path());
}

#[test]
fn explicit_versions_are_kept() {
    let sandbox = Sandbox::new();

    let input = ClusterInputBuilder::new(&sandbox.key_path())
        .k8s_version("1.30.2")
        .cni_plugin("cilium")
        .build();

    let cluster = validate(&input, &RealFileSystem).expect("valid");
    assert_eq!(cluster.k8s_version(), "1.30.2");
    assert_eq!(cluster.cni_plugin(), "cilium");
}

#[test]
fn plain_field_map_is_accepted() {
    let sandbox = Sandbox::new();
    let fields: std::collections::BTreeMap<String, String> = [
        ("name", "lab"),
        ("control_plane", "10.0.0.1"),
        ("workers", "10.0.0.2, 10.0.0.3"),
        ("ssh_user", "ubuntu"),
        ("private_key_path", sandbox.key_path().as_str()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let cluster = validate(&RawClusterInput::from_fields(&fields), &RealFileSystem).unwrap();

    assert_eq!(cluster.name(), "lab");
    assert_eq!(cluster.workers(), ["10.0.0.2", "10.0.0.3"]);
    assert_eq!(cluster.k8s_version(), DEFAULT_K8S_VERSION);
}

#[test]
fn multi_line_ssh_user_is_rejected_with_the_other_violations() {
    let sandbox = Sandbox::new();

    let input = ClusterInputBuilder::new(&sandbox.key_path())
        .ssh_user("root\nansible_become_password = x")
        .control_plane("10.0.0.1,bogus")
        .build();

    let err = validate(&input, &RealFileSystem).unwrap_err();

    assert_eq!(err.violations().len(), 2, "{err}");
    assert!(err.has(|k| *k == ViolationKind::ControlCharacter));
    assert!(err.has(|k| *k == ViolationKind::InvalidAddress("bogus".into())));
}
