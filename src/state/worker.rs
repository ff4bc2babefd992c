//! Session worker that owns the authoritative [`Session`].
//!
//! Receives commands from [`AppState`](super::AppState), applies them to the
//! session, keeps the reveal and countdown timers in step with the phase, and
//! publishes every change on the broadcast channel.

use crate::error::SessionError;
use crate::protocol::{format_clock, timer_warning, ServerMessage, SessionSnapshot};
use crate::types::{DifficultyLevel, GamePhase, Level, Player, PlayerId};
use rand::Rng;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};

use super::session::Session;
use super::timer::{TimerEvent, TimerGuard};

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Commands accepted by the session worker
#[derive(Debug)]
pub enum Command {
    SelectLevel {
        level: Level,
        reply: oneshot::Sender<Result<DifficultyLevel, SessionError>>,
    },
    AddPlayer {
        name: String,
        reply: oneshot::Sender<Result<Player, SessionError>>,
    },
    RemovePlayer {
        player_id: PlayerId,
        reply: oneshot::Sender<Option<Player>>,
    },
    ShufflePlayers {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Start {
        reply: oneshot::Sender<Result<SessionSnapshot, SessionError>>,
    },
    AdvanceTurn {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Reset {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    EndSession {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

/// (phase, round number) identifies the state that owns the running timers
type TimerOwner = (GamePhase, u32);

pub struct SessionWorker<R> {
    session: Session<R>,
    command_rx: mpsc::Receiver<Command>,
    timer_tx: mpsc::Sender<TimerEvent>,
    timer_rx: mpsc::Receiver<TimerEvent>,
    events: broadcast::Sender<ServerMessage>,
    reveal: Option<TimerGuard>,
    countdown: Option<TimerGuard>,
    epoch: u64,
}

impl<R: Rng + Send + 'static> SessionWorker<R> {
    pub fn new(
        session: Session<R>,
        command_rx: mpsc::Receiver<Command>,
        events: broadcast::Sender<ServerMessage>,
    ) -> Self {
        let (timer_tx, timer_rx) = mpsc::channel(16);
        Self {
            session,
            command_rx,
            timer_tx,
            timer_rx,
            events,
            reveal: None,
            countdown: None,
            epoch: 0,
        }
    }

    /// Main worker loop; ends when every handle is dropped
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Some(event) = self.timer_rx.recv() => {
                    self.handle_timer(event);
                }
            }
        }

        self.cancel_timers();
        tracing::info!("Session worker stopped");
    }

    fn owner(&self) -> TimerOwner {
        let round = self.session.round();
        (round.phase, round.round_number)
    }

    fn handle_command(&mut self, cmd: Command) {
        let before = self.owner();

        match cmd {
            Command::SelectLevel { level, reply } => {
                let result = self.session.select_level(level).copied();
                self.after_command(before, result.is_ok());
                if reply.send(result).is_err() {
                    tracing::debug!("SelectLevel reply channel closed");
                }
            }
            Command::AddPlayer { name, reply } => {
                let result = self.session.add_player(&name);
                self.after_command(before, result.is_ok());
                if reply.send(result).is_err() {
                    tracing::debug!("AddPlayer reply channel closed");
                }
            }
            Command::RemovePlayer { player_id, reply } => {
                let removed = self.session.remove_player(&player_id);
                self.after_command(before, true);
                if reply.send(removed).is_err() {
                    tracing::debug!("RemovePlayer reply channel closed");
                }
            }
            Command::ShufflePlayers { reply } => {
                self.session.shuffle_players();
                self.after_command(before, true);
                if reply.send(self.session.snapshot()).is_err() {
                    tracing::debug!("ShufflePlayers reply channel closed");
                }
            }
            Command::Start { reply } => {
                let result = self.session.start();
                self.after_command(before, result.is_ok());
                if reply.send(result.map(|_| self.session.snapshot())).is_err() {
                    tracing::debug!("Start reply channel closed");
                }
            }
            Command::AdvanceTurn { reply } => {
                self.session.advance_turn();
                self.after_command(before, true);
                if reply.send(self.session.snapshot()).is_err() {
                    tracing::debug!("AdvanceTurn reply channel closed");
                }
            }
            Command::Reset { reply } => {
                self.session.reset();
                self.after_command(before, true);
                if reply.send(self.session.snapshot()).is_err() {
                    tracing::debug!("Reset reply channel closed");
                }
            }
            Command::EndSession { reply } => {
                self.session.end();
                self.after_command(before, true);
                if reply.send(self.session.snapshot()).is_err() {
                    tracing::debug!("EndSession reply channel closed");
                }
            }
            Command::Snapshot { reply } => {
                if reply.send(self.session.snapshot()).is_err() {
                    tracing::debug!("Snapshot reply channel closed");
                }
            }
        }
    }

    fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::RevealDue { epoch } => {
                if epoch != self.epoch {
                    tracing::debug!("Dropping stale reveal from epoch {}", epoch);
                    return;
                }
                let before = self.owner();
                self.reveal = None;
                if self.session.complete_selection() {
                    self.after_command(before, true);
                }
            }
            TimerEvent::Tick { epoch } => {
                if epoch != self.epoch {
                    tracing::debug!("Dropping stale tick from epoch {}", epoch);
                    return;
                }
                if !self.session.tick() {
                    self.countdown = None;
                    return;
                }

                let seconds = self.session.round().timer_seconds;
                if seconds == 0 {
                    tracing::info!(
                        "Time is up for round {}",
                        self.session.round().round_number
                    );
                    self.countdown = None;
                }
                self.publish(ServerMessage::Timer {
                    seconds,
                    display: format_clock(seconds),
                    warning: timer_warning(seconds),
                });
            }
        }
    }

    /// Re-arm timers if the state that owned them was left, then publish.
    /// Every accepted command publishes exactly one snapshot, no-ops included.
    fn after_command(&mut self, before: TimerOwner, publish: bool) {
        if self.owner() != before {
            self.cancel_timers();
            self.epoch += 1;

            let round = self.session.round();
            match round.phase {
                GamePhase::Selecting => {
                    let delay = Duration::from_millis(self.session.config().reveal_delay_ms);
                    self.reveal = Some(TimerGuard::after(
                        delay,
                        self.timer_tx.clone(),
                        TimerEvent::RevealDue { epoch: self.epoch },
                    ));
                }
                GamePhase::Active if round.timer_running() => {
                    self.countdown = Some(TimerGuard::every(
                        COUNTDOWN_PERIOD,
                        self.timer_tx.clone(),
                        TimerEvent::Tick { epoch: self.epoch },
                    ));
                }
                _ => {}
            }
        }

        if publish {
            self.publish(ServerMessage::Session(self.session.snapshot()));
        }
    }

    fn cancel_timers(&mut self) {
        self.reveal = None;
        self.countdown = None;
    }

    fn publish(&self, msg: ServerMessage) {
        // No subscribers is fine
        let _ = self.events.send(msg);
    }
}
