use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::command::EngineCommand;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::reply::{parse_line, EngineReply};

/// Identifies one `request_best_move` call for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchId(pub u64);

impl fmt::Display for SearchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Ready,
    Searching,
    /// The engine closed its output; nothing more can be sent
    Terminated,
}

/// The engine's answer to one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMove {
    pub search: SearchId,
    /// UCI token, or `None` when the engine had no legal move
    pub mv: Option<String>,
    pub ponder: Option<String>,
}

type ReplySender = oneshot::Sender<Result<BestMove, EngineError>>;

/// A search awaiting its `bestmove`. `reply` is taken once the search is
/// cancelled, so the engine's eventual answer is recognised as stale.
struct Outstanding {
    id: SearchId,
    reply: Option<ReplySender>,
}

/// State shared between the session and its reader task.
#[derive(Default)]
struct Dispatch {
    pending: VecDeque<Outstanding>,
    closed: bool,
}

impl Dispatch {
    fn live(&mut self) -> Option<&mut Outstanding> {
        self.pending.iter_mut().find(|o| o.reply.is_some())
    }

    fn deliver(&mut self, mv: Option<String>, ponder: Option<String>) {
        let Some(entry) = self.pending.pop_front() else {
            debug!(?mv, "ignoring bestmove with no outstanding search");
            return;
        };
        match entry.reply {
            Some(tx) => {
                let reply = BestMove {
                    search: entry.id,
                    mv,
                    ponder,
                };
                if tx.send(Ok(reply)).is_err() {
                    debug!(search = %entry.id, "search handle dropped before reply");
                }
            }
            None => debug!(search = %entry.id, ?mv, "discarding stale reply"),
        }
    }

    fn close(&mut self) {
        self.closed = true;
        for entry in self.pending.drain(..) {
            if let Some(tx) = entry.reply {
                let _ = tx.send(Err(EngineError::Disconnected));
            }
        }
    }
}

/// Resolves once the engine answers the search it was created for.
///
/// Resolves to [`EngineError::Cancelled`] if the search is stopped and
/// [`EngineError::Disconnected`] if the engine goes away first.
#[derive(Debug)]
pub struct SearchHandle {
    id: SearchId,
    rx: oneshot::Receiver<Result<BestMove, EngineError>>,
}

impl SearchHandle {
    pub fn id(&self) -> SearchId {
        self.id
    }
}

impl Future for SearchHandle {
    type Output = Result<BestMove, EngineError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.unwrap_or(Err(EngineError::Cancelled)))
    }
}

pub struct EngineSession {
    writer: Box<dyn AsyncWrite + Send + Unpin>,
    dispatch: Arc<Mutex<Dispatch>>,
    readyok_rx: watch::Receiver<u64>,
    isready_sent: u64,
    initialized: bool,
    next_id: u64,
    quit_timeout: Duration,
    reader: JoinHandle<()>,
    child: Option<Child>,
}

impl EngineSession {
    /// Launch the engine executable with piped stdio. Must be called from
    /// within a tokio runtime.
    pub fn spawn(config: &EngineConfig) -> Result<Self, EngineError> {
        let mut child = Command::new(&config.path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::Spawn {
                path: config.path.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(EngineError::Disconnected);
        };
        debug!(path = %config.path, pid = ?child.id(), "engine started");

        let mut session = Self::from_io(stdout, stdin);
        session.child = Some(child);
        session.quit_timeout = config.quit_timeout();
        Ok(session)
    }

    /// Build a session over arbitrary streams: `reader` is the engine's
    /// output, `writer` its input.
    pub fn from_io<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let dispatch = Arc::new(Mutex::new(Dispatch::default()));
        let (readyok_tx, readyok_rx) = watch::channel(0);
        let reader = tokio::spawn(read_loop(reader, Arc::clone(&dispatch), readyok_tx));

        Self {
            writer: Box::new(writer),
            dispatch,
            readyok_rx,
            isready_sent: 0,
            initialized: false,
            next_id: 0,
            quit_timeout: EngineConfig::default().quit_timeout(),
            reader,
            child: None,
        }
    }

    pub fn state(&self) -> SessionState {
        let mut dispatch = self.dispatch.lock();
        if dispatch.closed {
            SessionState::Terminated
        } else if !self.initialized {
            SessionState::Uninitialized
        } else if dispatch.live().is_some() {
            SessionState::Searching
        } else {
            SessionState::Ready
        }
    }

    /// Send the `uci` / `isready` handshake. Safe to repeat.
    pub async fn initialize(&mut self) -> Result<(), EngineError> {
        self.send(EngineCommand::Uci).await?;
        self.send(EngineCommand::IsReady).await?;
        self.initialized = true;
        Ok(())
    }

    /// Wait for the `readyok` answering the most recent `isready`.
    pub async fn wait_ready(&mut self, timeout: Duration) -> Result<(), EngineError> {
        let target = self.isready_sent;
        let mut rx = self.readyok_rx.clone();
        let seen = tokio::time::timeout(timeout, rx.wait_for(|&seen| seen >= target))
            .await
            .map(|waited| waited.map(|_| ()));
        match seen {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(EngineError::Disconnected),
            Err(_) => Err(EngineError::HandshakeTimeout(timeout)),
        }
    }

    /// Ask for the best move in `fen` at a fixed depth. Returns as soon as
    /// the commands are written.
    pub async fn request_best_move(
        &mut self,
        fen: &str,
        depth: u32,
    ) -> Result<SearchHandle, EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }
        if depth == 0 {
            return Err(EngineError::InvalidDepth);
        }

        self.next_id += 1;
        let id = SearchId(self.next_id);
        let (tx, rx) = oneshot::channel();
        {
            let mut dispatch = self.dispatch.lock();
            if dispatch.closed {
                return Err(EngineError::Terminated);
            }
            if dispatch.live().is_some() {
                return Err(EngineError::SearchInFlight);
            }
            // Registered before `go` is written so the reply cannot arrive first.
            dispatch.pending.push_back(Outstanding {
                id,
                reply: Some(tx),
            });
        }

        let sent = async {
            self.send(EngineCommand::Position {
                fen: fen.to_string(),
            })
            .await?;
            self.send(EngineCommand::Go { depth }).await
        }
        .await;
        if let Err(err) = sent {
            self.dispatch.lock().pending.retain(|o| o.id != id);
            return Err(err);
        }

        debug!(search = %id, depth, "search requested");
        Ok(SearchHandle { id, rx })
    }

    /// Cancel the live search, if any. Its handle resolves to `Cancelled` and
    /// the engine's late reply is dropped.
    pub async fn stop(&mut self) -> Result<Option<SearchId>, EngineError> {
        let mut cancelled = None;
        if let Some(live) = self.dispatch.lock().live() {
            if let Some(tx) = live.reply.take() {
                let _ = tx.send(Err(EngineError::Cancelled));
                cancelled = Some(live.id);
            }
        }
        if let Some(id) = cancelled {
            debug!(search = %id, "search cancelled");
            self.send(EngineCommand::Stop).await?;
        }
        Ok(cancelled)
    }

    /// Stop any search and tell the engine a new game begins.
    pub async fn new_game(&mut self) -> Result<(), EngineError> {
        self.stop().await?;
        self.send(EngineCommand::UciNewGame).await?;
        self.send(EngineCommand::IsReady).await
    }

    /// Send `quit`, then give the process `quit_timeout` to exit before
    /// killing it.
    pub async fn terminate(mut self) -> Result<(), EngineError> {
        if let Err(err) = self.send(EngineCommand::Quit).await {
            debug!(error = %err, "quit not delivered");
        }
        let _ = self.writer.shutdown().await;

        if let Some(mut child) = self.child.take() {
            match tokio::time::timeout(self.quit_timeout, child.wait()).await {
                Ok(Ok(status)) => debug!(%status, "engine exited"),
                Ok(Err(err)) => return Err(err.into()),
                Err(_) => {
                    warn!(timeout = ?self.quit_timeout, "engine ignored quit, killing it");
                    child.kill().await?;
                }
            }
        }
        self.dispatch.lock().close();
        Ok(())
    }

    async fn send(&mut self, command: EngineCommand) -> Result<(), EngineError> {
        if self.dispatch.lock().closed {
            return Err(EngineError::Terminated);
        }
        let line = command.to_string();
        debug!(command = %line, "to engine");
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        if command == EngineCommand::IsReady {
            self.isready_sent += 1;
        }
        Ok(())
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop<R>(reader: R, dispatch: Arc<Mutex<Dispatch>>, readyok: watch::Sender<u64>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                trace!(line = %line, "from engine");
                match parse_line(&line) {
                    Some(EngineReply::BestMove { mv, ponder }) => {
                        dispatch.lock().deliver(mv, ponder);
                    }
                    Some(EngineReply::ReadyOk) => readyok.send_modify(|seen| *seen += 1),
                    None => {}
                }
            }
            Ok(None) => {
                debug!("engine closed its output");
                break;
            }
            Err(err) => {
                warn!(error = %err, "reading engine output failed");
                break;
            }
        }
    }
    dispatch.lock().close();
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
