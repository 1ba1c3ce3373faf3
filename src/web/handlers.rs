//! Route handlers.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::artifacts;
use crate::cluster::{self, RawClusterInput};
use crate::errors::KubedeployError;
use crate::types::Playbook;

use super::AppContext;
use super::render::{form_page, index_page};
use super::sse::job_sse;

/// Handler error mapped onto an HTTP status.
#[derive(Debug)]
pub struct AppError(KubedeployError);

impl<E> From<E> for AppError
where
    E: Into<KubedeployError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0 {
            KubedeployError::ClusterNotFound(_) => {
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
            KubedeployError::Validation(err) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
            }
            other => {
                error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    #[serde(default)]
    pub saved: Option<i64>,
}

pub async fn index(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, AppError> {
    let clusters = ctx.store.fetch_all().await?;
    let notice = query.saved.map(|_| "Cluster saved");
    Ok(Html(index_page(&clusters, notice)))
}

pub async fn new_cluster_form() -> Html<String> {
    Html(form_page(&RawClusterInput::form_defaults(), None))
}

pub async fn create_cluster(
    State(ctx): State<Arc<AppContext>>,
    Form(input): Form<RawClusterInput>,
) -> Result<Response, AppError> {
    let cluster = match cluster::validate(&input, ctx.fs.as_ref()) {
        Ok(cluster) => cluster,
        Err(err) => {
            info!(errors = err.violations().len(), "cluster form rejected");
            return Ok(Html(form_page(&input, Some(&err.to_string()))).into_response());
        }
    };

    let id = ctx.store.insert(&cluster).await?;
    info!(id, cluster = %cluster.name(), "cluster saved");

    Ok(Redirect::to(&format!("/?saved={id}")).into_response())
}

pub async fn deploy(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    run_playbook(&ctx, id, Playbook::Deploy).await
}

pub async fn destroy(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    run_playbook(&ctx, id, Playbook::Destroy).await
}

/// Load, re-validate, write artifacts, then stream the engine run.
async fn run_playbook(ctx: &AppContext, id: i64, playbook: Playbook) -> Result<Response, AppError> {
    let row = ctx
        .store
        .fetch_by_id(id)
        .await?
        .ok_or(KubedeployError::ClusterNotFound(id))?;

    let cluster = cluster::validate(&row.to_input(), ctx.fs.as_ref()).map_err(|err| {
        warn!(id, error = %err, "stored cluster no longer validates");
        err
    })?;

    let paths = artifacts::emit(&cluster, &ctx.artifacts_dir, ctx.fs.as_ref())?;
    let playbook_path = ctx.engine.playbook_path(playbook);

    info!(id, cluster = %cluster.name(), %playbook, "starting playbook run");
    let stream = ctx.runner.run(&paths.inventory, playbook_path);

    Ok(job_sse(stream).into_response())
}
