//! Turn state machine
//!
//! Idle -> Selecting -> Active -> Selecting -> ... with `reset` back to Idle
//! from anywhere and `finish` into Completed. Every transition is plain state
//! mutation; calls that do not apply to the current phase are ignored.

use crate::bank::QuestionBank;
use crate::types::{Category, GamePhase, Level, PlayerId, Question};
use serde::Serialize;

use super::roster::Roster;

/// The challenge committed for the current turn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    Question(Question),
    /// No authored content for this category and level
    Unavailable { category: Category, level: Level },
}

impl Prompt {
    pub fn text(&self) -> String {
        match self {
            Prompt::Question(q) => q.text.clone(),
            Prompt::Unavailable { category, level } => {
                format!("No {} questions available for level {}", category, level)
            }
        }
    }

    pub fn question(&self) -> Option<&Question> {
        match self {
            Prompt::Question(q) => Some(q),
            Prompt::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    pub round_number: u32,
    /// Refers into the roster by id; never owns the player
    pub current_player: Option<PlayerId>,
    pub current_question: Option<Prompt>,
    pub category: Option<Category>,
    pub timer_seconds: u32,
    pub phase: GamePhase,
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            round_number: 1,
            current_player: None,
            current_question: None,
            category: None,
            timer_seconds: 0,
            phase: GamePhase::Idle,
        }
    }

    /// Idle -> Selecting. Returns false (and changes nothing) in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            tracing::debug!("Ignoring start while {:?}", self.phase);
            return false;
        }
        self.phase = GamePhase::Selecting;
        true
    }

    /// Selecting -> Active: draw a player, then a category, then a question.
    ///
    /// An empty question pool still commits, with an `Unavailable` prompt and
    /// no countdown.
    pub fn complete_selection<R: rand::Rng + ?Sized>(
        &mut self,
        roster: &Roster,
        bank: &QuestionBank,
        level: Level,
        turn_seconds: u32,
        rng: &mut R,
    ) -> bool {
        if self.phase != GamePhase::Selecting {
            tracing::debug!("Ignoring selection while {:?}", self.phase);
            return false;
        }

        let player = roster.pick_random(rng).map(|p| p.id.clone());
        let category = if rng.random_bool(0.5) {
            Category::Truth
        } else {
            Category::Dare
        };

        let prompt = match bank.select_random(category, level, rng) {
            Some(question) => Prompt::Question(question.clone()),
            None => Prompt::Unavailable { category, level },
        };

        self.timer_seconds = match prompt {
            Prompt::Question(_) => turn_seconds,
            Prompt::Unavailable { .. } => 0,
        };
        self.current_player = player;
        self.category = Some(category);
        self.current_question = Some(prompt);
        self.phase = GamePhase::Active;

        tracing::info!(
            "Round {}: {} for {:?} at level {}",
            self.round_number,
            category,
            self.current_player,
            level
        );
        true
    }

    /// Active -> Selecting for the next round
    pub fn advance_turn(&mut self) -> bool {
        if self.phase != GamePhase::Active {
            tracing::debug!("Ignoring advance while {:?}", self.phase);
            return false;
        }
        self.clear_turn();
        self.round_number += 1;
        self.phase = GamePhase::Selecting;
        true
    }

    /// Any phase -> Idle, round counter back to 1
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Any phase -> Completed. Only `reset` leaves Completed.
    pub fn finish(&mut self) {
        self.clear_turn();
        self.phase = GamePhase::Completed;
    }

    /// Count down one second. Reaching zero has no effect beyond stopping.
    pub fn tick(&mut self) -> bool {
        if !self.timer_running() {
            return false;
        }
        self.timer_seconds -= 1;
        true
    }

    pub fn timer_running(&self) -> bool {
        self.phase == GamePhase::Active && self.timer_seconds > 0
    }

    fn clear_turn(&mut self) {
        self.current_player = None;
        self.current_question = None;
        self.category = None;
        self.timer_seconds = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixture() -> (Roster, QuestionBank, StdRng) {
        let mut roster = Roster::new(&GameConfig::default());
        for name in ["Alice", "Bob", "Carol"] {
            roster.add(name).unwrap();
        }
        (roster, QuestionBank::builtin().unwrap(), StdRng::seed_from_u64(5))
    }

    #[test]
    fn test_initial_state() {
        let round = RoundState::new();
        assert_eq!(round.phase, GamePhase::Idle);
        assert_eq!(round.round_number, 1);
        assert!(round.current_player.is_none());
        assert!(round.current_question.is_none());
        assert_eq!(round.timer_seconds, 0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut round = RoundState::new();
        assert!(round.start());
        let after_first = round.clone();

        assert!(!round.start());
        assert_eq!(round, after_first);
        assert_eq!(round.phase, GamePhase::Selecting);
    }

    #[test]
    fn test_start_ignored_while_active() {
        let (roster, bank, mut rng) = fixture();
        let mut round = RoundState::new();
        round.start();
        round.complete_selection(&roster, &bank, 3, 60, &mut rng);

        let active = round.clone();
        assert!(!round.start());
        assert_eq!(round, active);
    }

    #[test]
    fn test_complete_selection_commits_turn() {
        let (roster, bank, mut rng) = fixture();
        let mut round = RoundState::new();
        round.start();

        assert!(round.complete_selection(&roster, &bank, 3, 60, &mut rng));
        assert_eq!(round.phase, GamePhase::Active);
        assert_eq!(round.timer_seconds, 60);

        let player_id = round.current_player.clone().unwrap();
        let name = &roster.get(&player_id).unwrap().name;
        assert!(["Alice", "Bob", "Carol"].contains(&name.as_str()));

        let question = round
            .current_question
            .as_ref()
            .and_then(Prompt::question)
            .unwrap();
        assert_eq!(question.level, 3);
        assert_eq!(Some(question.category), round.category);
    }

    #[test]
    fn test_complete_selection_requires_selecting() {
        let (roster, bank, mut rng) = fixture();
        let mut round = RoundState::new();
        assert!(!round.complete_selection(&roster, &bank, 1, 60, &mut rng));
        assert_eq!(round, RoundState::new());
    }

    #[test]
    fn test_both_categories_get_drawn() {
        let (roster, bank, mut rng) = fixture();
        let mut round = RoundState::new();
        let mut truths = 0;
        let mut dares = 0;

        round.start();
        for _ in 0..200 {
            round.complete_selection(&roster, &bank, 1, 60, &mut rng);
            match round.category {
                Some(Category::Truth) => truths += 1,
                Some(Category::Dare) => dares += 1,
                None => panic!("category missing after selection"),
            }
            round.advance_turn();
        }

        assert!(truths > 50 && dares > 50, "truths={truths} dares={dares}");
    }

    #[test]
    fn test_unauthored_level_falls_back() {
        let (roster, bank, mut rng) = fixture();
        let mut round = RoundState::new();
        round.start();

        assert!(round.complete_selection(&roster, &bank, 6, 60, &mut rng));
        assert_eq!(round.phase, GamePhase::Active);
        assert_eq!(round.timer_seconds, 0);

        let prompt = round.current_question.clone().unwrap();
        assert!(prompt.question().is_none());
        let category = round.category.unwrap();
        assert_eq!(
            prompt.text(),
            format!("No {} questions available for level 6", category)
        );
    }

    #[test]
    fn test_advance_turn_increments_and_clears() {
        let (roster, bank, mut rng) = fixture();
        let mut round = RoundState::new();
        round.start();
        round.complete_selection(&roster, &bank, 2, 60, &mut rng);

        assert!(round.advance_turn());
        assert_eq!(round.round_number, 2);
        assert_eq!(round.phase, GamePhase::Selecting);
        assert!(round.current_player.is_none());
        assert!(round.current_question.is_none());
        assert!(round.category.is_none());
        assert_eq!(round.timer_seconds, 0);

        // Not Active any more, so a second advance does nothing
        assert!(!round.advance_turn());
        assert_eq!(round.round_number, 2);
    }

    #[test]
    fn test_reset_from_every_phase() {
        let (roster, bank, mut rng) = fixture();

        let mut idle = RoundState::new();
        idle.reset();
        assert_eq!(idle, RoundState::new());

        let mut selecting = RoundState::new();
        selecting.start();
        selecting.reset();
        assert_eq!(selecting, RoundState::new());

        let mut active = RoundState::new();
        active.start();
        active.complete_selection(&roster, &bank, 1, 60, &mut rng);
        active.advance_turn();
        active.complete_selection(&roster, &bank, 1, 60, &mut rng);
        active.reset();
        assert_eq!(active.round_number, 1);
        assert_eq!(active.phase, GamePhase::Idle);
        assert!(active.current_player.is_none());

        let mut completed = RoundState::new();
        completed.finish();
        completed.reset();
        assert_eq!(completed, RoundState::new());
    }

    #[test]
    fn test_completed_only_leaves_via_reset() {
        let mut round = RoundState::new();
        round.finish();
        assert_eq!(round.phase, GamePhase::Completed);
        assert!(!round.start());
        assert!(!round.advance_turn());
        assert_eq!(round.phase, GamePhase::Completed);
    }

    #[test]
    fn test_tick_counts_down_and_stops_at_zero() {
        let (roster, bank, mut rng) = fixture();
        let mut round = RoundState::new();
        round.start();
        round.complete_selection(&roster, &bank, 1, 3, &mut rng);

        assert!(round.tick());
        assert!(round.tick());
        assert!(round.tick());
        assert_eq!(round.timer_seconds, 0);
        assert!(!round.tick());
        assert_eq!(round.timer_seconds, 0);

        // Running out of time does not move the turn along
        assert_eq!(round.phase, GamePhase::Active);
        assert!(round.current_question.is_some());
    }

    #[test]
    fn test_tick_ignored_outside_active() {
        let mut round = RoundState::new();
        round.timer_seconds = 5;
        assert!(!round.tick());
        assert_eq!(round.timer_seconds, 5);
    }
}
