pub mod roster;
pub mod round;
pub mod session;
pub mod timer;
mod worker;

use crate::bank::QuestionBank;
use crate::error::SessionError;
use crate::protocol::{ServerMessage, SessionSnapshot};
use crate::types::{DifficultyLevel, GameConfig, Level, Player};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};

pub use session::Session;
use worker::{Command, SessionWorker};

/// Shared application state: a handle to the session worker
#[derive(Clone)]
pub struct AppState {
    command_tx: mpsc::Sender<Command>,
    /// Broadcast channel for sending messages to every connected screen
    pub broadcast: broadcast::Sender<ServerMessage>,
    pub bank: Arc<QuestionBank>,
    pub config: GameConfig,
}

impl AppState {
    /// Spawn a session worker seeded from the OS
    pub fn spawn(bank: Arc<QuestionBank>, config: GameConfig) -> Self {
        Self::spawn_with_rng(bank, config, StdRng::from_os_rng())
    }

    /// Spawn a session worker with an explicit random source
    pub fn spawn_with_rng<R>(bank: Arc<QuestionBank>, config: GameConfig, rng: R) -> Self
    where
        R: Rng + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (tx, _rx) = broadcast::channel(100);

        let session = Session::new(bank.clone(), config.clone(), rng);
        let worker = SessionWorker::new(session, command_rx, tx.clone());
        tokio::spawn(worker.run());

        tracing::info!(
            "Session started ({} questions, {}-{} players, {}s turns)",
            bank.len(),
            config.min_players,
            config.max_players,
            config.turn_seconds
        );

        Self {
            command_tx,
            broadcast: tx,
            bank,
            config,
        }
    }

    /// Send a command and wait for the worker's reply
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(make(reply_tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn select_level(&self, level: Level) -> Result<DifficultyLevel, SessionError> {
        self.request(|reply| Command::SelectLevel { level, reply }).await?
    }

    pub async fn add_player(&self, name: String) -> Result<Player, SessionError> {
        self.request(|reply| Command::AddPlayer { name, reply }).await?
    }

    /// Remove a player; unknown ids yield `Ok(None)`
    pub async fn remove_player(&self, player_id: String) -> Result<Option<Player>, SessionError> {
        self.request(|reply| Command::RemovePlayer { player_id, reply }).await
    }

    pub async fn shuffle_players(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| Command::ShufflePlayers { reply }).await
    }

    /// Begin selecting; a no-op while a round is already in flight
    pub async fn start(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| Command::Start { reply }).await?
    }

    pub async fn advance_turn(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| Command::AdvanceTurn { reply }).await
    }

    pub async fn reset(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| Command::Reset { reply }).await
    }

    pub async fn end_session(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| Command::EndSession { reply }).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }
}
