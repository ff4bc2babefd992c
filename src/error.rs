//! Error taxonomy
//!
//! Roster and session errors are user-correctable and never touch round state.
//! An empty question pool is not an error; see [`crate::state::round::Prompt`].

use crate::types::{Category, Level};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RosterError {
    #[error("Please enter a player name")]
    EmptyName,

    #[error("Player names are limited to {max} characters")]
    NameTooLong { max: usize },

    #[error("Player name already exists: {0}")]
    DuplicateName(String),

    #[error("Maximum {max} players allowed")]
    RosterFull { max: usize },
}

impl RosterError {
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::EmptyName => "EMPTY_NAME",
            RosterError::NameTooLong { .. } => "NAME_TOO_LONG",
            RosterError::DuplicateName(_) => "DUPLICATE_NAME",
            RosterError::RosterFull { .. } => "ROSTER_FULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error("Unknown difficulty level: {0}")]
    UnknownLevel(u8),

    #[error("Select a difficulty level first")]
    NoLevelSelected,

    #[error("At least {min} players are needed to start (have {have})")]
    NotEnoughPlayers { min: usize, have: usize },

    #[error("Game session is no longer running")]
    Closed,
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::Roster(e) => e.code(),
            SessionError::UnknownLevel(_) => "UNKNOWN_LEVEL",
            SessionError::NoLevelSelected => "NO_LEVEL_SELECTED",
            SessionError::NotEnoughPlayers { .. } => "NOT_ENOUGH_PLAYERS",
            SessionError::Closed => "SESSION_CLOSED",
        }
    }
}

/// Errors raised while loading a question catalog
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("Failed to read question catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse question catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid level {level} in {category} questions")]
    InvalidLevel { category: Category, level: Level },

    #[error("Empty question text in level {level} {category} questions")]
    EmptyText { category: Category, level: Level },
}
