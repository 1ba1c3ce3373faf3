// src/exec/job_runner.rs

//! Background playbook runs exposed as a single-consumer line stream.
//!
//! `JobRunner::run` spawns a producer task that drives the engine and
//! forwards every non-empty stdout line, in order, into a bounded channel.
//! The last item is always `JobEvent::Finished`; it is a separate variant so
//! it cannot be confused with output.
//!
//! Per-run lifecycle: `Launched -> Streaming* -> Completed`. Runs for the same
//! cluster are not serialized against each other.

use std::fmt;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::engine::{AutomationEngine, EngineEvent, EngineExit, EngineRequest};

/// Final state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    /// Engine ran and reported failure, or could not be launched.
    Failed {
        code: Option<i32>,
        reason: Option<String>,
    },
    /// The configured engine is the no-op engine.
    NoOp,
    Cancelled,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded | JobOutcome::NoOp)
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Succeeded => f.write_str("succeeded"),
            JobOutcome::Failed {
                reason: Some(reason),
                ..
            } => write!(f, "failed: {reason}"),
            JobOutcome::Failed {
                code: Some(code), ..
            } => write!(f, "failed (exit code {code})"),
            JobOutcome::Failed { .. } => f.write_str("failed"),
            JobOutcome::NoOp => f.write_str("noop"),
            JobOutcome::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl From<EngineExit> for JobOutcome {
    fn from(exit: EngineExit) -> Self {
        match exit {
            EngineExit::Success => JobOutcome::Succeeded,
            EngineExit::Failed { code } => JobOutcome::Failed { code, reason: None },
            EngineExit::NoOp => JobOutcome::NoOp,
            EngineExit::Cancelled => JobOutcome::Cancelled,
        }
    }
}

/// Items yielded by a [`JobStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Line(String),
    Finished(JobOutcome),
}

/// Launches engine runs in the background.
pub struct JobRunner {
    engine: Arc<dyn AutomationEngine>,
    capacity: usize,
    next_run_id: AtomicU64,
}

impl JobRunner {
    pub fn new(engine: Arc<dyn AutomationEngine>, capacity: usize) -> Self {
        Self {
            engine,
            capacity: capacity.max(1),
            next_run_id: AtomicU64::new(1),
        }
    }

    /// Start a run of `playbook` against `inventory` and return its output.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn run(&self, inventory: &Path, playbook: &Path) -> JobStream {
        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        let request = EngineRequest {
            run_id,
            inventory: inventory.to_path_buf(),
            playbook: playbook.to_path_buf(),
        };

        let (job_tx, job_rx) = mpsc::channel::<JobEvent>(self.capacity);
        let cancel = CancellationToken::new();

        info!(
            run_id,
            playbook = %request.playbook.display(),
            "job launched"
        );

        tokio::spawn(produce(
            Arc::clone(&self.engine),
            request,
            self.capacity,
            job_tx,
            cancel.clone(),
        ));

        JobStream {
            run_id,
            rx: job_rx,
            cancel,
            finished: false,
        }
    }
}

/// Producer side: drive the engine and forward filtered lines.
async fn produce(
    engine: Arc<dyn AutomationEngine>,
    request: EngineRequest,
    capacity: usize,
    job_tx: mpsc::Sender<JobEvent>,
    cancel: CancellationToken,
) {
    let run_id = request.run_id;
    let (event_tx, mut event_rx) = mpsc::channel::<EngineEvent>(capacity);

    let engine_task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { engine.run(request, event_tx, cancel).await })
    };

    let mut lines = 0usize;
    let mut consumer_gone = false;

    while let Some(event) = event_rx.recv().await {
        let Some(text) = event.stdout.filter(|s| !s.is_empty()) else {
            continue;
        };
        lines += 1;
        if !consumer_gone && job_tx.send(JobEvent::Line(text)).await.is_err() {
            debug!(run_id, "job consumer dropped; run continues unobserved");
            consumer_gone = true;
        }
    }

    let outcome = match engine_task.await {
        Ok(Ok(exit)) => JobOutcome::from(exit),
        Ok(Err(e)) => {
            error!(run_id, error = %e, "automation engine failed to run");
            JobOutcome::Failed {
                code: None,
                reason: Some(e.to_string()),
            }
        }
        Err(e) => {
            error!(run_id, error = %e, "automation engine task aborted");
            JobOutcome::Failed {
                code: None,
                reason: Some("engine task aborted".to_string()),
            }
        }
    };

    info!(run_id, lines, outcome = %outcome, "job completed");

    let _ = job_tx.send(JobEvent::Finished(outcome)).await;
}

/// Consumer side of a run. Yields lines in emission order, then exactly one
/// `Finished`, then ends.
pub struct JobStream {
    run_id: u64,
    rx: mpsc::Receiver<JobEvent>,
    cancel: CancellationToken,
    finished: bool,
}

impl JobStream {
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Token that stops the underlying engine run when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receive the next event; `None` after `Finished` has been yielded.
    pub async fn next_event(&mut self) -> Option<JobEvent> {
        if self.finished {
            return None;
        }
        let event = self.rx.recv().await;
        self.observe(event)
    }

    /// Drain the whole run. Convenience for CLI use and tests.
    pub async fn drain(mut self) -> (Vec<String>, JobOutcome) {
        let mut lines = Vec::new();
        while let Some(event) = self.next_event().await {
            match event {
                JobEvent::Line(line) => lines.push(line),
                JobEvent::Finished(outcome) => return (lines, outcome),
            }
        }
        (lines, lost_producer())
    }

    fn observe(&mut self, event: Option<JobEvent>) -> Option<JobEvent> {
        match event {
            Some(JobEvent::Finished(outcome)) => {
                self.finished = true;
                Some(JobEvent::Finished(outcome))
            }
            Some(line) => Some(line),
            // Producer vanished without a terminal event; still terminate.
            None => {
                self.finished = true;
                Some(JobEvent::Finished(lost_producer()))
            }
        }
    }
}

fn lost_producer() -> JobOutcome {
    JobOutcome::Failed {
        code: None,
        reason: Some("job producer stopped without reporting completion".to_string()),
    }
}

impl Stream for JobStream {
    type Item = JobEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }
        match self.rx.poll_recv(cx) {
            Poll::Ready(event) => Poll::Ready(self.observe(event)),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::engine::NoopEngine;

    #[tokio::test]
    async fn noop_engine_finishes_with_zero_lines() {
        let runner = JobRunner::new(Arc::new(NoopEngine), 4);
        let (lines, outcome) = runner
            .run(Path::new("inventory.ini"), Path::new("site.yml"))
            .drain()
            .await;

        assert!(lines.is_empty());
        assert_eq!(outcome, JobOutcome::NoOp);
    }

    #[tokio::test]
    async fn stream_ends_after_finished() {
        let runner = JobRunner::new(Arc::new(NoopEngine), 1);
        let mut stream = runner.run(Path::new("i"), Path::new("p"));

        assert_eq!(stream.next_event().await, Some(JobEvent::Finished(JobOutcome::NoOp)));
        assert_eq!(stream.next_event().await, None);
    }

    #[test]
    fn outcome_text() {
        assert_eq!(JobOutcome::Succeeded.to_string(), "succeeded");
        assert_eq!(
            JobOutcome::Failed { code: Some(2), reason: None }.to_string(),
            "failed (exit code 2)"
        );
        assert_eq!(
            JobOutcome::Failed { code: None, reason: Some("no such file".into()) }.to_string(),
            "failed: no such file"
        );
    }

    #[tokio::test]
    async fn run_ids_increase() {
        let runner = JobRunner::new(Arc::new(NoopEngine), 1);
        let a = runner.run(Path::new("i"), Path::new("p"));
        let b = runner.run(Path::new("i"), Path::new("p"));
        assert!(b.run_id() > a.run_id());
    }
}
