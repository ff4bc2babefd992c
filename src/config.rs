//! Environment configuration

use crate::types::GameConfig;
use std::path::PathBuf;
use std::str::FromStr;

/// Port used when PORT is unset
pub const DEFAULT_PORT: u16 = 6565;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Directory served for the presentation page
    pub static_dir: PathBuf,
    /// Optional JSON catalog replacing the embedded questions
    pub questions_path: Option<PathBuf>,
    pub game: GameConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("static"),
            questions_path: None,
            game: GameConfig::default(),
        }
    }
}

/// Read and parse an env var, falling back to `default` when unset or invalid
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

impl AppConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let defaults = GameConfig::default();

        let mut min_players = env_or("MIN_PLAYERS", defaults.min_players);
        if min_players == 0 {
            tracing::warn!("MIN_PLAYERS must be at least 1");
            min_players = 1;
        }

        let mut max_players = env_or("MAX_PLAYERS", defaults.max_players);
        if max_players < min_players {
            tracing::warn!(
                "MAX_PLAYERS ({}) is below MIN_PLAYERS ({}), raising it",
                max_players,
                min_players
            );
            max_players = min_players;
        }

        let game = GameConfig {
            min_players,
            max_players,
            max_name_chars: env_or("MAX_NAME_CHARS", defaults.max_name_chars),
            turn_seconds: env_or("TURN_SECONDS", defaults.turn_seconds),
            reveal_delay_ms: env_or("REVEAL_DELAY_MS", defaults.reveal_delay_ms),
        };

        Self {
            port: env_or("PORT", DEFAULT_PORT),
            static_dir: env_path("STATIC_DIR")
                .unwrap_or_else(|| PathBuf::from("static")),
            questions_path: env_path("QUESTIONS_PATH"),
            game,
        }
    }
}
