use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use kubedeploy::errors::KubedeployError;
use kubedeploy::exec::{AutomationEngine, EngineEvent, EngineExit, EngineFuture, EngineRequest};

/// A fake engine that:
/// - records every request it was asked to run
/// - replays a fixed list of events, then reports a fixed exit.
#[derive(Clone)]
pub struct ScriptedEngine {
    events: Vec<EngineEvent>,
    exit: EngineExit,
    requests: Arc<Mutex<Vec<EngineRequest>>>,
}

impl ScriptedEngine {
    pub fn new(events: Vec<EngineEvent>, exit: EngineExit) -> Self {
        Self {
            events,
            exit,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Successful run printing `lines`, one event each.
    pub fn lines(lines: &[&str]) -> Self {
        Self::new(
            lines.iter().map(|l| EngineEvent::line(*l)).collect(),
            EngineExit::Success,
        )
    }

    pub fn requests(&self) -> Vec<EngineRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl AutomationEngine for ScriptedEngine {
    fn run(
        &self,
        request: EngineRequest,
        events: mpsc::Sender<EngineEvent>,
        _cancel: CancellationToken,
    ) -> EngineFuture<'_> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request);
            for event in self.events.iter().cloned() {
                if events.send(event).await.is_err() {
                    break;
                }
            }
            Ok(self.exit.clone())
        })
    }
}

/// Engine that can never be launched, like a missing `ansible-playbook`.
#[derive(Clone, Copy, Default)]
pub struct UnlaunchableEngine;

impl AutomationEngine for UnlaunchableEngine {
    fn run(
        &self,
        _request: EngineRequest,
        _events: mpsc::Sender<EngineEvent>,
        _cancel: CancellationToken,
    ) -> EngineFuture<'_> {
        Box::pin(async {
            Err(KubedeployError::Engine(
                "launching 'ansible-playbook': No such file or directory".to_string(),
            ))
        })
    }
}

/// Engine that emits one line and then waits until cancelled.
#[derive(Clone, Copy, Default)]
pub struct StalledEngine;

impl AutomationEngine for StalledEngine {
    fn run(
        &self,
        _request: EngineRequest,
        events: mpsc::Sender<EngineEvent>,
        cancel: CancellationToken,
    ) -> EngineFuture<'_> {
        Box::pin(async move {
            let _ = events.send(EngineEvent::line("TASK [wait for nodes]")).await;
            cancel.cancelled().await;
            Ok(EngineExit::Cancelled)
        })
    }
}
