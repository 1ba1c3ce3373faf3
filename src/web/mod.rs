// src/web/mod.rs

//! HTTP layer.
//!
//! Routes:
//! - `GET /` list clusters
//! - `GET|POST /cluster/new` create form
//! - `GET /deploy/{id}`, `GET /destroy/{id}` playbook output as SSE
//!
//! Every route sits behind the Basic-auth gate in [`auth`]. Handlers receive
//! an explicitly constructed [`AppContext`]; there is no global state.

pub mod auth;
pub mod handlers;
pub mod render;
pub mod sse;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::middleware;
use axum::routing::get;
use tracing::info;

use crate::config::{AppConfig, EngineSection};
use crate::errors::Result;
use crate::exec::{AutomationEngine, JobRunner};
use crate::fs::FileSystem;
use crate::store::ClusterStore;

pub use auth::Credentials;

/// Everything a request handler needs.
pub struct AppContext {
    pub store: ClusterStore,
    pub credentials: Credentials,
    pub fs: Arc<dyn FileSystem>,
    pub runner: JobRunner,
    pub artifacts_dir: PathBuf,
    pub engine: EngineSection,
}

impl AppContext {
    pub fn new(
        cfg: &AppConfig,
        store: ClusterStore,
        fs: Arc<dyn FileSystem>,
        engine: Arc<dyn AutomationEngine>,
    ) -> Self {
        Self {
            store,
            credentials: Credentials {
                username: cfg.auth.username.clone(),
                password: cfg.auth.password.clone(),
            },
            fs,
            runner: JobRunner::new(engine, cfg.engine.channel_capacity),
            artifacts_dir: cfg.artifacts.dir.clone(),
            engine: cfg.engine.clone(),
        }
    }
}

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/cluster/new",
            get(handlers::new_cluster_form).post(handlers::create_cluster),
        )
        .route("/deploy/{id}", get(handlers::deploy))
        .route("/destroy/{id}", get(handlers::destroy))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&ctx),
            auth::require_basic_auth,
        ))
        .with_state(ctx)
}

/// Serve until Ctrl-C.
pub async fn serve(ctx: Arc<AppContext>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(%addr, "listening");

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
            info!("shutdown requested");
        })
        .await
        .context("serving HTTP")?;

    Ok(())
}
