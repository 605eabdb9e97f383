//! Subprocess stdio transport.
//!
//! Runs an MCP server as a local child process and frames JSON-RPC messages
//! over its standard streams. The transport exclusively owns the child: the
//! child's stdout is drained by a reader task that parses frames, its stderr
//! by a drain task that forwards diagnostics to a configurable sink, and its
//! stdin is the write sink, serialized so each frame lands atomically.

use std::process::{ ExitStatus, Stdio };
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{ AsyncBufReadExt, AsyncWriteExt, BufReader };
use tokio::process::{ Child, ChildStdin, Command };
use tokio::sync::{ mpsc, Mutex };
use tokio::task::JoinHandle;
use tracing::{ debug, error, warn };

use crate::protocol::{ Error, JSONRPCMessage };
use crate::transport::{ codec, Transport };

/// Buffer size for the inbound message channel.
const CHANNEL_BUFFER_SIZE: usize = 100;

fn pipe_error(stream: &str) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("failed to capture child {stream}")
    )
}

/// Sink for the child's stderr lines.
pub type StderrSink = Arc<dyn Fn(&str) + Send + Sync>;

/// A transport that communicates with an MCP server subprocess over its
/// standard streams.
pub struct StdioTransport {
    /// Write half of the child's stdin. Taken (and thereby closed) on close.
    stdin: Mutex<Option<ChildStdin>>,
    /// Parsed inbound messages from the reader task.
    inbound: Mutex<mpsc::Receiver<JSONRPCMessage>>,
    /// The child process. Taken on close to await its exit.
    child: Mutex<Option<Child>>,
    /// Reader task draining the child's stdout.
    reader_task: Mutex<Option<JoinHandle<()>>>,
    /// Drain task forwarding the child's stderr.
    stderr_task: Mutex<Option<JoinHandle<()>>>,
}

impl StdioTransport {
    /// Spawn `command [args...]` and connect to its standard streams.
    ///
    /// The parent's environment is inherited and overlaid by `env` in order
    /// (later entries win). stderr lines are forwarded to the tracing
    /// subscriber, tagged with the server command.
    pub fn spawn(command: &str, args: &[&str], env: &[(&str, &str)]) -> Result<Self, Error> {
        let tag = command.to_string();
        let sink: StderrSink = Arc::new(move |line: &str| {
            warn!(server = %tag, "{}", line);
        });
        Self::spawn_with_stderr_sink(command, args, env, sink)
    }

    /// Like [`spawn`](Self::spawn), but forwards the child's stderr lines to
    /// a caller-supplied sink instead of the tracing subscriber.
    pub fn spawn_with_stderr_sink(
        command: &str,
        args: &[&str],
        env: &[(&str, &str)],
        stderr_sink: StderrSink
    ) -> Result<Self, Error> {
        let mut cmd = Command::new(command);
        cmd.args(args).stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());

        // Overlay on top of the inherited parent environment; later entries
        // win because Command::env replaces prior values for the same key.
        for (key, value) in env {
            cmd.env(key, value);
        }

        // The child must not outlive the transport.
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(Error::Spawn)?;

        let stdin = child.stdin.take().ok_or_else(|| Error::Spawn(pipe_error("stdin")))?;
        let stdout = child.stdout.take().ok_or_else(|| Error::Spawn(pipe_error("stdout")))?;
        let stderr = child.stderr.take().ok_or_else(|| Error::Spawn(pipe_error("stderr")))?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let reader_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        match codec::decode(&line) {
                            Ok(Some(message)) => {
                                if tx.send(message).await.is_err() {
                                    debug!("inbound channel closed, stopping reader");
                                    break;
                                }
                            }
                            Ok(None) => {} // empty line
                            Err(e) => {
                                warn!("skipping malformed frame: {}", e);
                            }
                        }
                    }
                    Ok(None) => {
                        debug!("server stdout reached end of stream");
                        break;
                    }
                    Err(e) => {
                        error!("error reading server stdout: {}", e);
                        break;
                    }
                }
            }
            // Dropping the sender here is what surfaces TransportClosed to
            // the session's read loop.
        });

        let stderr_task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                stderr_sink(&line);
            }
            debug!("server stderr reached end of stream");
        });

        Ok(Self {
            stdin: Mutex::new(Some(stdin)),
            inbound: Mutex::new(rx),
            child: Mutex::new(Some(child)),
            reader_task: Mutex::new(Some(reader_task)),
            stderr_task: Mutex::new(Some(stderr_task)),
        })
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn send(&self, message: &JSONRPCMessage) -> Result<(), Error> {
        let bytes = codec::encode(message)?;

        // The lock is held across the whole frame so two messages can never
        // interleave on one line.
        let mut stdin = self.stdin.lock().await;
        let stdin = stdin.as_mut().ok_or(Error::TransportClosed)?;
        stdin.write_all(&bytes).await.map_err(Error::Write)?;
        stdin.flush().await.map_err(Error::Write)?;
        Ok(())
    }

    async fn receive(&self) -> Result<JSONRPCMessage, Error> {
        let mut inbound = self.inbound.lock().await;
        inbound.recv().await.ok_or(Error::TransportClosed)
    }

    async fn close(&self) -> Result<Option<ExitStatus>, Error> {
        // Dropping stdin closes the child's input stream, which is the
        // signal for a well-behaved server to exit.
        self.stdin.lock().await.take();

        let child = self.child.lock().await.take();
        let status = match child {
            Some(mut child) => {
                let status = child.wait().await.map_err(Error::Wait)?;
                debug!(code = ?status.code(), "server process exited");
                Some(status)
            }
            None => None,
        };

        if let Some(task) = self.reader_task.lock().await.take() {
            let _ = task.await;
        }
        if let Some(task) = self.stderr_task.lock().await.take() {
            let _ = task.await;
        }

        Ok(status)
    }
}
