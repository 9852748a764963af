//! Connects the game record to the engine session.
//!
//! The controller owns both. Human moves are validated by [`GameState`]; when
//! one is accepted and the game goes on, the engine is asked for its reply at
//! a fixed depth. The engine's answer comes back through the same validation
//! path. Everything happens on the controller's task, so `GameState` is never
//! touched concurrently.

use std::time::Duration;

use chess_core::{Color, GameState, MoveError, MoveIntent, MoveRecord};
use engine_session::{BestMove, EngineError, EngineSession, SearchHandle, SearchId};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::PlayConfig;
use crate::events::{GameEvent, Mover};

/// Requests from the presentation layer.
#[derive(Debug)]
pub enum PlayerInput {
    /// `reply` answers with the applied move or the reason it was refused.
    Move {
        intent: MoveIntent,
        reply: oneshot::Sender<Result<MoveRecord, MoveRejection>>,
    },
    NewGame,
    /// Snapshot of the game record, for display.
    Inspect { reply: oneshot::Sender<GameState> },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error(transparent)]
    Illegal(#[from] MoveError),
    #[error("it is the engine's turn")]
    NotYourTurn,
    #[error("the engine is still thinking")]
    EngineThinking,
    #[error("the engine is out of sync with the game; start a new game")]
    Desynced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Thinking(SearchId),
    /// Never started, failed the handshake, or went away
    Unavailable,
    /// Proposed a move the game refused; cleared by a new game
    Desynced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOptions {
    pub human: Color,
    pub depth: u32,
    pub handshake_timeout: Duration,
}

impl Default for PlayOptions {
    fn default() -> Self {
        PlayOptions::from(&PlayConfig::default())
    }
}

impl From<&PlayConfig> for PlayOptions {
    fn from(config: &PlayConfig) -> Self {
        Self {
            human: config.human_color,
            depth: config.search_depth,
            handshake_timeout: config.engine.handshake_timeout(),
        }
    }
}

pub struct PlayController {
    game: GameState,
    engine: Option<EngineSession>,
    engine_state: EngineState,
    search: Option<SearchHandle>,
    options: PlayOptions,
    events: mpsc::Sender<GameEvent>,
}

impl PlayController {
    pub fn new(game: GameState, options: PlayOptions, events: mpsc::Sender<GameEvent>) -> Self {
        Self {
            game,
            engine: None,
            engine_state: EngineState::Unavailable,
            search: None,
            options,
            events,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn engine_state(&self) -> EngineState {
        self.engine_state
    }

    /// Announce the game and attach the engine. A failed spawn or handshake
    /// is reported as `EngineUnavailable`; play continues without an engine.
    pub async fn start(&mut self, engine: Result<EngineSession, EngineError>) {
        let fen = self.game.fen();
        self.emit(GameEvent::NewGame { fen }).await;

        let mut session = match engine {
            Ok(session) => session,
            Err(err) => return self.engine_failed(err).await,
        };
        let timeout = self.options.handshake_timeout;
        let handshake = async {
            session.initialize().await?;
            session.wait_ready(timeout).await
        }
        .await;
        self.engine = Some(session);
        if let Err(err) = handshake {
            return self.engine_failed(err).await;
        }

        info!(human = %self.options.human, depth = self.options.depth, "engine ready");
        self.engine_state = EngineState::Idle;
        self.after_move().await;
    }

    /// Validate and apply a human move, then hand the turn to the engine.
    pub async fn submit_move(&mut self, intent: MoveIntent) -> Result<MoveRecord, MoveRejection> {
        if self.game.is_game_over() {
            return Err(MoveError::GameOver.into());
        }
        match self.engine_state {
            EngineState::Thinking(_) => return Err(MoveRejection::EngineThinking),
            EngineState::Desynced => return Err(MoveRejection::Desynced),
            EngineState::Idle | EngineState::Unavailable => {}
        }
        if self.game.side_to_move() != self.options.human {
            return Err(MoveRejection::NotYourTurn);
        }

        let record = self.game.apply_move(intent)?;
        debug!(uci = %record.uci, ply = record.ply, "human move applied");
        self.emit_move(&record, Mover::Human).await;
        self.after_move().await;
        Ok(record)
    }

    /// Abandon the current game: cancel any search, tell the engine, and go
    /// back to the standard start.
    pub async fn new_game(&mut self) {
        self.search = None;
        let timeout = self.options.handshake_timeout;
        if self.engine_state != EngineState::Unavailable {
            if let Some(engine) = self.engine.as_mut() {
                let ready = async {
                    engine.new_game().await?;
                    engine.wait_ready(timeout).await
                }
                .await;
                match ready {
                    Ok(()) => self.engine_state = EngineState::Idle,
                    Err(err) => self.engine_failed(err).await,
                }
            }
        }

        self.game.reset();
        let fen = self.game.fen();
        self.emit(GameEvent::NewGame { fen }).await;
        self.after_move().await;
    }

    /// Serve player input and engine replies until `Quit` or the input
    /// channel closes, then shut the engine down.
    pub async fn run(mut self, mut inputs: mpsc::Receiver<PlayerInput>) -> Result<(), EngineError> {
        loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    Some(PlayerInput::Move { intent, reply }) => {
                        let result = self.submit_move(intent).await;
                        let _ = reply.send(result);
                    }
                    Some(PlayerInput::NewGame) => self.new_game().await,
                    Some(PlayerInput::Inspect { reply }) => {
                        let _ = reply.send(self.game.clone());
                    }
                    Some(PlayerInput::Quit) | None => break,
                },
                reply = next_reply(&mut self.search) => {
                    self.search = None;
                    self.on_engine_reply(reply).await;
                }
            }
        }
        self.teardown().await
    }

    /// Terminate the engine session. Consumes the controller.
    pub async fn teardown(mut self) -> Result<(), EngineError> {
        self.search = None;
        match self.engine.take() {
            Some(engine) => engine.terminate().await,
            None => Ok(()),
        }
    }

    async fn after_move(&mut self) {
        if self.game.is_game_over() {
            let status = self.game.status();
            info!(%status, "game over");
            self.emit(GameEvent::GameOver { status }).await;
        } else if self.game.side_to_move() != self.options.human {
            self.request_engine_move().await;
        }
    }

    async fn request_engine_move(&mut self) {
        if self.engine_state != EngineState::Idle {
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let fen = self.game.fen();
        match engine.request_best_move(&fen, self.options.depth).await {
            Ok(handle) => {
                let id = handle.id();
                self.engine_state = EngineState::Thinking(id);
                self.search = Some(handle);
                self.emit(GameEvent::EngineThinking {
                    search: id.0,
                    depth: self.options.depth,
                })
                .await;
            }
            Err(err) if err.is_fatal() => self.engine_failed(err).await,
            Err(err) => warn!(error = %err, "engine search not started"),
        }
    }

    async fn on_engine_reply(&mut self, reply: Result<BestMove, EngineError>) {
        let EngineState::Thinking(expected) = self.engine_state else {
            debug!("engine reply with no search outstanding");
            return;
        };
        match reply {
            Ok(best) if best.search != expected => {
                debug!(search = %best.search, %expected, "ignoring reply for another search");
            }
            Ok(best) => {
                self.engine_state = EngineState::Idle;
                self.apply_engine_move(best).await;
            }
            Err(err) if err.is_fatal() => self.engine_failed(err).await,
            Err(err) => {
                debug!(search = %expected, error = %err, "search ended without a move");
                self.engine_state = EngineState::Idle;
            }
        }
    }

    async fn apply_engine_move(&mut self, best: BestMove) {
        let Some(token) = best.mv else {
            let reason = "engine reported no legal move".to_string();
            return self.desync("(none)".to_string(), reason).await;
        };
        let intent: MoveIntent = match token.parse() {
            Ok(intent) => intent,
            Err(err) => return self.desync(token, format!("{err}")).await,
        };
        match self.game.apply_move(intent) {
            Ok(record) => {
                debug!(uci = %record.uci, ply = record.ply, "engine move applied");
                self.emit_move(&record, Mover::Engine).await;
                self.after_move().await;
            }
            Err(err) => self.desync(token, err.to_string()).await,
        }
    }

    async fn desync(&mut self, token: String, reason: String) {
        let fen = self.game.fen();
        warn!(%token, %fen, %reason, "engine move refused");
        self.engine_state = EngineState::Desynced;
        self.emit(GameEvent::EngineDesync { token, fen, reason }).await;
    }

    async fn engine_failed(&mut self, err: EngineError) {
        warn!(error = %err, "engine unavailable");
        self.engine_state = EngineState::Unavailable;
        self.search = None;
        self.emit(GameEvent::EngineUnavailable {
            reason: err.to_string(),
        })
        .await;
    }

    async fn emit_move(&mut self, record: &MoveRecord, by: Mover) {
        self.emit(GameEvent::PositionChanged {
            fen: record.fen_after.clone(),
            uci: record.uci.clone(),
            san: record.san.clone(),
            by,
        })
        .await;
    }

    async fn emit(&mut self, event: GameEvent) {
        if self.events.send(event).await.is_err() {
            debug!("event receiver dropped");
        }
    }
}

/// The live search's reply, or never when there is none.
async fn next_reply(search: &mut Option<SearchHandle>) -> Result<BestMove, EngineError> {
    match search {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}
