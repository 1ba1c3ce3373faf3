// src/store/mod.rs

//! Record store: one SQLite table of cluster definitions.
//!
//! Address lists are flattened into comma-joined strings. Rows are read back
//! as plain strings and re-validated by the caller before use, since the
//! database may have been edited out of band.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::cluster::{ClusterDefinition, RawClusterInput};
use crate::errors::Result;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS clusters (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    control_plane TEXT NOT NULL,
    workers TEXT NOT NULL DEFAULT '',
    ssh_user TEXT NOT NULL,
    private_key_path TEXT NOT NULL,
    k8s_version TEXT NOT NULL DEFAULT '1.29.0',
    cni_plugin TEXT NOT NULL DEFAULT 'calico'
)
"#;

const SELECT_COLUMNS: &str =
    "SELECT id, name, control_plane, workers, ssh_user, private_key_path, k8s_version, cni_plugin FROM clusters";

/// A stored row, exactly as persisted.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ClusterRow {
    pub id: i64,
    pub name: String,
    pub control_plane: String,
    pub workers: String,
    pub ssh_user: String,
    pub private_key_path: String,
    pub k8s_version: String,
    pub cni_plugin: String,
}

impl ClusterRow {
    /// Turn the row back into raw input so it can go through validation again.
    pub fn to_input(&self) -> RawClusterInput {
        RawClusterInput {
            name: Some(self.name.clone()),
            ssh_user: Some(self.ssh_user.clone()),
            private_key_path: Some(self.private_key_path.clone()),
            control_plane: Some(self.control_plane.clone()),
            workers: Some(self.workers.clone()),
            k8s_version: Some(self.k8s_version.clone()),
            cni_plugin: Some(self.cni_plugin.clone()),
        }
    }
}

/// Column values for an insert. Usually built from a validated
/// [`ClusterDefinition`]; `seed_example` builds one directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClusterRow {
    pub name: String,
    pub control_plane: String,
    pub workers: String,
    pub ssh_user: String,
    pub private_key_path: String,
    pub k8s_version: String,
    pub cni_plugin: String,
}

impl From<&ClusterDefinition> for NewClusterRow {
    fn from(cluster: &ClusterDefinition) -> Self {
        Self {
            name: cluster.name().to_string(),
            control_plane: cluster.control_plane().join(","),
            workers: cluster.workers().join(","),
            ssh_user: cluster.ssh_user().to_string(),
            private_key_path: cluster.private_key_path().to_string(),
            k8s_version: cluster.k8s_version().to_string(),
            cni_plugin: cluster.cni_plugin().to_string(),
        }
    }
}

/// Cloneable handle over the SQLite pool.
#[derive(Debug, Clone)]
pub struct ClusterStore {
    pool: SqlitePool,
}

impl ClusterStore {
    /// Open (creating if needed) the database at `path` and ensure the schema.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!(database = %path.display(), "opened cluster store");

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// A private in-memory database, mainly for tests.
    pub async fn in_memory() -> Result<Self> {
        // One connection that never expires, otherwise the database vanishes.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn fetch_all(&self) -> Result<Vec<ClusterRow>> {
        let rows = sqlx::query_as::<_, ClusterRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn fetch_by_id(&self, id: i64) -> Result<Option<ClusterRow>> {
        let row = sqlx::query_as::<_, ClusterRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// The lowest-id row, if any.
    pub async fn fetch_first(&self) -> Result<Option<ClusterRow>> {
        let row = sqlx::query_as::<_, ClusterRow>(&format!("{SELECT_COLUMNS} ORDER BY id LIMIT 1"))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Persist a validated cluster; returns the new row id.
    pub async fn insert(&self, cluster: &ClusterDefinition) -> Result<i64> {
        self.insert_row(&NewClusterRow::from(cluster)).await
    }

    pub async fn insert_row(&self, row: &NewClusterRow) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO clusters
                (name, control_plane, workers, ssh_user, private_key_path, k8s_version, cni_plugin)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.name)
        .bind(&row.control_plane)
        .bind(&row.workers)
        .bind(&row.ssh_user)
        .bind(&row.private_key_path)
        .bind(&row.k8s_version)
        .bind(&row.cni_plugin)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, name = %row.name, "inserted cluster row");
        Ok(id)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Replace the database at `path` with a fresh one holding the demo cluster.
pub async fn seed_example(path: &Path) -> Result<i64> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }

    let store = ClusterStore::open(path).await?;
    let id = store
        .insert_row(&NewClusterRow {
            name: "demo".to_string(),
            control_plane: "192.0.2.10".to_string(),
            workers: "192.0.2.11".to_string(),
            ssh_user: "root".to_string(),
            private_key_path: "/tmp/id_rsa".to_string(),
            k8s_version: crate::cluster::DEFAULT_K8S_VERSION.to_string(),
            cni_plugin: crate::cluster::DEFAULT_CNI_PLUGIN.to_string(),
        })
        .await?;
    store.close().await;

    info!(database = %path.display(), id, "seeded example database");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::validate;
    use crate::fs::mock::MockFileSystem;

    fn cluster() -> ClusterDefinition {
        let fs = MockFileSystem::new();
        fs.add_file("/keys/id_rsa", "k");
        validate(
            &RawClusterInput {
                name: Some("demo".into()),
                ssh_user: Some("root".into()),
                private_key_path: Some("/keys/id_rsa".into()),
                control_plane: Some("10.0.0.1,10.0.0.2".into()),
                workers: Some("".into()),
                ..Default::default()
            },
            &fs,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_then_fetch_flattens_lists() {
        let store = ClusterStore::in_memory().await.unwrap();
        let id = store.insert(&cluster()).await.unwrap();

        let row = store.fetch_by_id(id).await.unwrap().expect("row exists");
        assert_eq!(row.control_plane, "10.0.0.1,10.0.0.2");
        assert_eq!(row.workers, "");
        assert_eq!(row.k8s_version, "1.29.0");

        assert!(store.fetch_by_id(id + 100).await.unwrap().is_none());
        assert_eq!(store.fetch_all().await.unwrap().len(), 1);
        assert_eq!(store.fetch_first().await.unwrap().map(|r| r.id), Some(id));
    }

    #[tokio::test]
    async fn stored_row_revalidates_to_the_same_definition() {
        let store = ClusterStore::in_memory().await.unwrap();
        let original = cluster();
        let id = store.insert(&original).await.unwrap();
        let row = store.fetch_by_id(id).await.unwrap().unwrap();

        let fs = MockFileSystem::new();
        fs.add_file("/keys/id_rsa", "k");
        assert_eq!(validate(&row.to_input(), &fs).unwrap(), original);
    }
}
