// src/lib.rs

pub mod artifacts;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod store;
pub mod types;
pub mod web;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::info;

use crate::artifacts::{Inventory, PartialConfigArtifact};
use crate::cli::{CliArgs, Command};
use crate::config::{AppConfig, load_and_validate};
use crate::exec::engine_from_config;
use crate::fs::{FileSystem, RealFileSystem};
use crate::store::ClusterStore;
use crate::web::AppContext;

/// High-level entry point used by `main.rs`.
///
/// Loads the config, then dispatches on the subcommand (`serve` when none
/// is given).
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cfg).await,
        Command::Generate { db, out } => {
            let out = out.unwrap_or_else(|| cfg.artifacts.dir.clone());
            generate(&db, &out).await
        }
        Command::Inventory { config_yml, out } => inventory(&config_yml, &out),
        Command::SeedExample { db } => {
            store::seed_example(&db).await?;
            println!("Example database written to {}", db.display());
            Ok(())
        }
    }
}

async fn serve(cfg: AppConfig) -> Result<()> {
    let store = ClusterStore::open(&cfg.store.database).await?;
    let engine = engine_from_config(&cfg.engine);
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    info!(
        engine = ?cfg.engine.kind,
        artifacts = %cfg.artifacts.dir.display(),
        "starting web front end"
    );

    let ctx = Arc::new(AppContext::new(&cfg, store, fs, engine));
    web::serve(ctx, cfg.bind_addr()).await?;
    Ok(())
}

/// Write both artifacts for the first cluster stored in `db`.
pub async fn generate(db: &Path, out: &Path) -> Result<()> {
    let store = ClusterStore::open(db).await?;
    let row = store
        .fetch_first()
        .await?
        .ok_or_else(|| anyhow!("No clusters defined in database"))?;
    store.close().await;

    let cluster = cluster::validate(&row.to_input(), &RealFileSystem)?;
    let paths = artifacts::emit(&cluster, out, &RealFileSystem)?;

    println!(
        "Wrote {} and {}",
        paths.config.display(),
        paths.inventory.display()
    );
    Ok(())
}

/// Rebuild `inventory.ini` from an existing `config.yml`.
pub fn inventory(config_yml: &Path, out: &Path) -> Result<()> {
    let fs = RealFileSystem;
    let text = fs.read_to_string(config_yml)?;
    let cfg = PartialConfigArtifact::from_yaml(&text)?;
    let inventory = Inventory::from_config_artifact(&cfg);

    fs.write(out, inventory.render().as_bytes())?;
    println!("Inventory written to {}", out.display());
    Ok(())
}
