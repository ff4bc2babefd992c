//! One game session: roster, level, round state and the random source.
//!
//! Everything here is synchronous. Scheduling of the reveal delay and the
//! countdown lives in the worker; the session only exposes the transitions.

use crate::bank::QuestionBank;
use crate::error::SessionError;
use crate::protocol::{
    format_clock, timer_warning, PlayerInfo, QuestionView, RoundSnapshot, SessionSnapshot,
};
use crate::types::{DifficultyLevel, GameConfig, GamePhase, Level, Player};
use rand::Rng;
use std::sync::Arc;

use super::round::{Prompt, RoundState};
use super::roster::Roster;

pub struct Session<R> {
    config: GameConfig,
    bank: Arc<QuestionBank>,
    roster: Roster,
    round: RoundState,
    level: Option<Level>,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(bank: Arc<QuestionBank>, config: GameConfig, rng: R) -> Self {
        Self {
            roster: Roster::new(&config),
            round: RoundState::new(),
            level: None,
            config,
            bank,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn phase(&self) -> GamePhase {
        self.round.phase
    }

    pub fn level(&self) -> Option<&'static DifficultyLevel> {
        self.level.and_then(DifficultyLevel::get)
    }

    /// Choose the difficulty; takes effect from the next selection
    pub fn select_level(&mut self, level: Level) -> Result<&'static DifficultyLevel, SessionError> {
        let info = DifficultyLevel::get(level)
            .ok_or(SessionError::UnknownLevel(level))?;
        self.level = Some(level);
        tracing::info!("Level set to {} ({})", level, info.name);
        Ok(info)
    }

    pub fn add_player(&mut self, name: &str) -> Result<Player, SessionError> {
        Ok(self.roster.add(name)?)
    }

    /// Remove a player. Losing the current player, or dropping below the
    /// minimum while a round is in flight, resets the round.
    pub fn remove_player(&mut self, id: &str) -> Option<Player> {
        let player = self.roster.remove(id)?;

        let in_flight = matches!(self.round.phase, GamePhase::Selecting | GamePhase::Active);
        let was_current = self.round.current_player.as_deref() == Some(id);
        if in_flight && (was_current || !self.roster.is_ready()) {
            tracing::info!(
                "Player {} left mid-round, resetting round {}",
                player.name,
                self.round.round_number
            );
            self.round.reset();
        }

        Some(player)
    }

    pub fn shuffle_players(&mut self) {
        self.roster.shuffle(&mut self.rng);
    }

    /// Ready roster and a selected level
    pub fn can_start(&self) -> bool {
        self.level.is_some() && self.roster.is_ready()
    }

    /// Begin a selection. Returns Ok(false) when a round is already in flight
    /// or the session has ended.
    pub fn start(&mut self) -> Result<bool, SessionError> {
        if self.round.phase != GamePhase::Idle {
            tracing::debug!("Start ignored while {:?}", self.round.phase);
            return Ok(false);
        }

        if self.level.is_none() {
            return Err(SessionError::NoLevelSelected);
        }

        if !self.roster.is_ready() {
            return Err(SessionError::NotEnoughPlayers {
                min: self.roster.min_players(),
                have: self.roster.len(),
            });
        }

        Ok(self.round.start())
    }

    /// Commit a player, category and question for the turn
    pub fn complete_selection(&mut self) -> bool {
        let Some(level) = self.level else {
            return false;
        };
        self.round.complete_selection(
            &self.roster,
            &self.bank,
            level,
            self.config.turn_seconds,
            &mut self.rng,
        )
    }

    pub fn advance_turn(&mut self) -> bool {
        self.round.advance_turn()
    }

    pub fn tick(&mut self) -> bool {
        self.round.tick()
    }

    /// Back to setup; players and level are kept
    pub fn reset(&mut self) {
        tracing::info!("Resetting round state");
        self.round.reset();
    }

    /// Tear the session down
    pub fn end(&mut self) {
        tracing::info!("Ending session after round {}", self.round.round_number);
        self.round.finish();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let current = self.round.current_player.as_deref();
        let players: Vec<PlayerInfo> = self
            .roster
            .players()
            .iter()
            .map(|p| PlayerInfo {
                id: p.id.clone(),
                name: p.name.clone(),
                color: p.color.clone(),
                is_active: Some(p.id.as_str()) == current,
            })
            .collect();

        let current_player = players.iter().find(|p| p.is_active).cloned();
        let question = self.round.current_question.as_ref().map(question_view);
        let seconds = self.round.timer_seconds;

        SessionSnapshot {
            level: self.level().copied(),
            players,
            min_players: self.config.min_players,
            max_players: self.config.max_players,
            can_start: self.can_start(),
            round: RoundSnapshot {
                phase: self.round.phase,
                round_number: self.round.round_number,
                current_player,
                category: self.round.category,
                question,
                timer_seconds: seconds,
                timer_display: format_clock(seconds),
                timer_warning: timer_warning(seconds),
            },
        }
    }
}

fn question_view(prompt: &Prompt) -> QuestionView {
    match prompt {
        Prompt::Question(q) => QuestionView {
            id: Some(q.id),
            text: q.text.clone(),
            level: q.level,
            category: q.category,
            available: true,
        },
        Prompt::Unavailable { category, level } => QuestionView {
            id: None,
            text: prompt.text(),
            level: *level,
            category: *category,
            available: false,
        },
    }
}
