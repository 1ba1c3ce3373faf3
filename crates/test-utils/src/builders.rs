#![allow(dead_code)]

use kubedeploy::cluster::RawClusterInput;

/// Builder for `RawClusterInput` to simplify test setup.
///
/// Starts from a complete, valid-looking submission (one control-plane
/// address, no workers) so each test only states what it changes.
pub struct ClusterInputBuilder {
    input: RawClusterInput,
}

impl ClusterInputBuilder {
    pub fn new(private_key_path: &str) -> Self {
        Self {
            input: RawClusterInput {
                name: Some("demo".to_string()),
                ssh_user: Some("root".to_string()),
                private_key_path: Some(private_key_path.to_string()),
                control_plane: Some("10.0.0.1".to_string()),
                workers: Some(String::new()),
                k8s_version: None,
                cni_plugin: None,
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.input.name = Some(name.to_string());
        self
    }

    pub fn ssh_user(mut self, user: &str) -> Self {
        self.input.ssh_user = Some(user.to_string());
        self
    }

    pub fn control_plane(mut self, raw: &str) -> Self {
        self.input.control_plane = Some(raw.to_string());
        self
    }

    pub fn workers(mut self, raw: &str) -> Self {
        self.input.workers = Some(raw.to_string());
        self
    }

    pub fn k8s_version(mut self, version: &str) -> Self {
        self.input.k8s_version = Some(version.to_string());
        self
    }

    pub fn cni_plugin(mut self, plugin: &str) -> Self {
        self.input.cni_plugin = Some(plugin.to_string());
        self
    }

    pub fn without(mut self, field: &str) -> Self {
        match field {
            "name" => self.input.name = None,
            "ssh_user" => self.input.ssh_user = None,
            "private_key_path" => self.input.private_key_path = None,
            "control_plane" => self.input.control_plane = None,
            "workers" => self.input.workers = None,
            other => panic!("unknown field {other}"),
        }
        self
    }

    pub fn build(self) -> RawClusterInput {
        self.input
    }

    /// URL-encoded form body for the create route.
    pub fn form_body(self) -> String {
        let i = self.input;
        let fields: Vec<(&str, String)> = [
            ("name", i.name),
            ("ssh_user", i.ssh_user),
            ("private_key_path", i.private_key_path),
            ("control_plane", i.control_plane),
            ("workers", i.workers),
            ("k8s_version", i.k8s_version),
            ("cni_plugin", i.cni_plugin),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect();

        serde_urlencoded::to_string(&fields).expect("form fields always encode")
    }
}
