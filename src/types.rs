use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque ID types
pub type PlayerId = String;
pub type QuestionId = u32;

/// Difficulty tier, 1 (mild) through 5 (extreme)
pub type Level = u8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Truth,
    Dare,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Truth, Category::Dare];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Truth => "truth",
            Category::Dare => "dare",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    /// Unique within its category only
    pub id: QuestionId,
    pub text: String,
    pub level: Level,
    pub category: Category,
}

/// Presentation metadata for a difficulty tier. Selection only uses `level`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DifficultyLevel {
    pub level: Level,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

pub const DIFFICULTY_LEVELS: [DifficultyLevel; 5] = [
    DifficultyLevel {
        level: 1,
        name: "Mild Wasabi",
        description: "Fun & Light - Perfect for family gatherings",
        icon: "🥒",
        color: "green",
    },
    DifficultyLevel {
        level: 2,
        name: "Spicy Roll",
        description: "Bold & Silly - Get ready to laugh",
        icon: "🍣",
        color: "yellow",
    },
    DifficultyLevel {
        level: 3,
        name: "Hot Sake",
        description: "Flirty - Adults only",
        icon: "🍶",
        color: "orange",
    },
    DifficultyLevel {
        level: 4,
        name: "Dragon Roll",
        description: "Daring - Proceed with caution",
        icon: "🐉",
        color: "red",
    },
    DifficultyLevel {
        level: 5,
        name: "Ghost Pepper",
        description: "Extreme - Only for the brave",
        icon: "👻",
        color: "purple",
    },
];

impl DifficultyLevel {
    /// Look up a level in the fixed catalog
    pub fn get(level: Level) -> Option<&'static DifficultyLevel> {
        DIFFICULTY_LEVELS.iter().find(|l| l.level == level)
    }
}

/// Player color tags, reused cyclically by insertion order
pub const PALETTE: [&str; 8] = [
    "red", "blue", "green", "yellow", "purple", "pink", "indigo", "orange",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Idle,
    Selecting,
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub min_players: usize,
    pub max_players: usize,
    pub max_name_chars: usize,
    pub turn_seconds: u32,
    /// Presentation delay between `start` and the reveal
    pub reveal_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 8,
            max_name_chars: 20,
            turn_seconds: 60,
            reveal_delay_ms: 2000,
        }
    }
}
