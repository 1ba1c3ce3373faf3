// src/exec/process.rs

//! Engine backed by an external playbook runner process.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::KubedeployError;

use super::engine::{AutomationEngine, EngineEvent, EngineExit, EngineFuture, EngineRequest};

/// Runs `<program> -i <inventory> <playbook>`; every stdout line becomes an
/// [`EngineEvent`], stderr is logged at debug.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: String,
    working_dir: PathBuf,
}

impl ProcessEngine {
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
        }
    }

    fn command(&self, request: &EngineRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-i")
            .arg(&request.inventory)
            .arg(&request.playbook)
            .current_dir(&self.working_dir)
            // Line-buffered, uncoloured output streams better over SSE.
            .env("PYTHONUNBUFFERED", "1")
            .env("ANSIBLE_NOCOLOR", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl AutomationEngine for ProcessEngine {
    fn run(
        &self,
        request: EngineRequest,
        events: mpsc::Sender<EngineEvent>,
        cancel: CancellationToken,
    ) -> EngineFuture<'_> {
        Box::pin(async move {
            info!(
                run_id = request.run_id,
                program = %self.program,
                inventory = %request.inventory.display(),
                playbook = %request.playbook.display(),
                "starting engine process"
            );

            let mut child = self.command(&request).spawn().map_err(|e| {
                KubedeployError::Engine(format!("launching '{}': {}", self.program, e))
            })?;

            let stdout = child.stdout.take();
            let stderr = child.stderr.take();

            // Always consume stderr so buffers don't fill; log at debug.
            if let Some(stderr) = stderr {
                let run_id = request.run_id;
                tokio::spawn(async move {
                    let mut reader = BufReader::new(stderr);
                    let mut buf = Vec::new();
                    while let Ok(Some(line)) = read_line_lossy(&mut reader, &mut buf).await {
                        debug!(run_id, "stderr: {}", line);
                    }
                });
            }

            let mut consumer_gone = false;
            if let Some(stdout) = stdout {
                let mut reader = BufReader::new(stdout);
                let mut buf = Vec::new();
                loop {
                    tokio::select! {
                        next = read_line_lossy(&mut reader, &mut buf) => {
                            let line = match next {
                                Ok(Some(line)) => line,
                                Ok(None) => break,
                                Err(e) => {
                                    warn!(run_id = request.run_id, error = %e, "reading engine stdout failed");
                                    break;
                                }
                            };
                            let event = if line.is_empty() {
                                EngineEvent::default()
                            } else {
                                EngineEvent::line(line)
                            };
                            if !consumer_gone && events.send(event).await.is_err() {
                                // Keep draining so the process is never blocked on a full pipe.
                                debug!(run_id = request.run_id, "event receiver closed; draining output");
                                consumer_gone = true;
                            }
                        }
                        _ = cancel.cancelled() => {
                            return Ok(kill_on_cancel(&mut child, request.run_id).await);
                        }
                    }
                }
            }

            tokio::select! {
                status = child.wait() => {
                    let status = status.map_err(|e| {
                        KubedeployError::Engine(format!("waiting for '{}': {}", self.program, e))
                    })?;

                    info!(
                        run_id = request.run_id,
                        exit_code = ?status.code(),
                        success = status.success(),
                        "engine process exited"
                    );

                    Ok(if status.success() {
                        EngineExit::Success
                    } else {
                        EngineExit::Failed { code: status.code() }
                    })
                }
                _ = cancel.cancelled() => Ok(kill_on_cancel(&mut child, request.run_id).await),
            }
        })
    }
}

/// Read one `\n`-terminated line, dropping the terminator (and a preceding
/// `\r`). Invalid UTF-8 is replaced rather than ending the stream.
///
/// `Ok(None)` at end of input. `buf` is cleared before each read.
pub(crate) async fn read_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

async fn kill_on_cancel(child: &mut tokio::process::Child, run_id: u64) -> EngineExit {
    info!(run_id, "cancellation requested; killing engine process");
    if let Err(e) = child.kill().await {
        warn!(run_id, error = %e, "failed to kill engine process on cancellation");
    }
    EngineExit::Cancelled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lines_survive_invalid_utf8_and_crlf() {
        let input: &[u8] = b"PLAY [all]\r\ncaf\xe9\n\nlast";
        let mut reader = BufReader::new(input);
        let mut buf = Vec::new();

        let mut lines = Vec::new();
        while let Some(line) = read_line_lossy(&mut reader, &mut buf).await.unwrap() {
            lines.push(line);
        }

        assert_eq!(lines, ["PLAY [all]", "caf\u{FFFD}", "", "last"]);
    }
}
