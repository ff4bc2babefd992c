use crate::types::*;
use serde::{Deserialize, Serialize};

/// Commands from the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    SelectLevel {
        level: Level,
    },
    AddPlayer {
        name: String,
    },
    RemovePlayer {
        player_id: PlayerId,
    },
    ShufflePlayers,
    /// Spin: begin selecting the next player and question
    Start,
    AdvanceTurn,
    /// Back to setup: clear the round, keep players and level
    Reset,
    EndSession,
    RequestState,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        levels: Vec<DifficultyLevel>,
        session: SessionSnapshot,
        server_now: String,
    },
    /// Full state after any change
    Session(SessionSnapshot),
    /// Countdown update, sent once per second while the timer runs
    Timer {
        seconds: u32,
        display: String,
        warning: bool,
    },
    Error {
        code: String,
        msg: String,
    },
}

/// Seconds at or below which the countdown is shown as a warning
pub const TIMER_WARNING_SECONDS: u32 = 10;

/// Render seconds as `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn timer_warning(seconds: u32) -> bool {
    seconds > 0 && seconds <= TIMER_WARNING_SECONDS
}

/// Player entry with the active-turn marker
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
    pub is_active: bool,
}

/// The committed challenge as shown to players
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuestionView {
    /// None for the fallback text
    pub id: Option<QuestionId>,
    pub text: String,
    pub level: Level,
    pub category: Category,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RoundSnapshot {
    pub phase: GamePhase,
    pub round_number: u32,
    pub current_player: Option<PlayerInfo>,
    pub category: Option<Category>,
    pub question: Option<QuestionView>,
    pub timer_seconds: u32,
    pub timer_display: String,
    pub timer_warning: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSnapshot {
    pub level: Option<DifficultyLevel>,
    pub players: Vec<PlayerInfo>,
    pub min_players: usize,
    pub max_players: usize,
    /// Ready roster and a selected level
    pub can_start: bool,
    pub round: RoundSnapshot,
}
