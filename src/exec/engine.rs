// src/exec/engine.rs

//! Pluggable automation-engine abstraction.
//!
//! The job runner talks to an `AutomationEngine` instead of spawning
//! processes itself. Production uses [`super::process::ProcessEngine`]
//! (`ansible-playbook`); [`NoopEngine`] is selected by `[engine].kind =
//! "noop"`, and tests provide scripted engines.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::EngineSection;
use crate::errors::Result;
use crate::types::EngineKind;

use super::process::ProcessEngine;

/// One engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRequest {
    pub run_id: u64,
    pub inventory: PathBuf,
    pub playbook: PathBuf,
}

/// A progress event. Only events carrying non-empty `stdout` reach the HTTP
/// consumer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineEvent {
    pub stdout: Option<String>,
}

impl EngineEvent {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            stdout: Some(text.into()),
        }
    }
}

/// How an engine run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineExit {
    Success,
    Failed { code: Option<i32> },
    /// Nothing was launched (no-op engine).
    NoOp,
    /// The run was stopped through its cancellation token.
    Cancelled,
}

pub type EngineFuture<'a> = Pin<Box<dyn Future<Output = Result<EngineExit>> + Send + 'a>>;

/// Trait abstracting how a playbook is run.
pub trait AutomationEngine: Send + Sync {
    /// Run `request` to completion, pushing events into `events` in emission
    /// order.
    ///
    /// - `Err` means the engine could not be launched at all.
    /// - When `cancel` fires the implementation should stop the run and
    ///   return [`EngineExit::Cancelled`].
    /// - A closed `events` channel must not stop the run.
    fn run(
        &self,
        request: EngineRequest,
        events: mpsc::Sender<EngineEvent>,
        cancel: CancellationToken,
    ) -> EngineFuture<'_>;
}

/// Engine that never launches anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEngine;

impl AutomationEngine for NoopEngine {
    fn run(
        &self,
        request: EngineRequest,
        _events: mpsc::Sender<EngineEvent>,
        _cancel: CancellationToken,
    ) -> EngineFuture<'_> {
        Box::pin(async move {
            tracing::debug!(run_id = request.run_id, "noop engine: nothing to run");
            Ok(EngineExit::NoOp)
        })
    }
}

/// Pick the engine named by `[engine].kind`.
pub fn engine_from_config(cfg: &EngineSection) -> Arc<dyn AutomationEngine> {
    match cfg.kind {
        EngineKind::Ansible => Arc::new(ProcessEngine::new(
            cfg.program.clone(),
            cfg.working_dir.clone(),
        )),
        EngineKind::Noop => Arc::new(NoopEngine),
    }
}
