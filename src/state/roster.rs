use crate::error::RosterError;
use crate::types::{GameConfig, Player, PlayerId, PALETTE};
use rand::seq::SliceRandom;
use rand::Rng;

/// Ordered set of players for one session
#[derive(Debug, Clone)]
pub struct Roster {
    players: Vec<Player>,
    min_players: usize,
    max_players: usize,
    max_name_chars: usize,
}

impl Roster {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            players: Vec::new(),
            min_players: config.min_players,
            max_players: config.max_players,
            max_name_chars: config.max_name_chars,
        }
    }

    /// Add a player. The color is `PALETTE[size before add % PALETTE.len()]`.
    pub fn add(&mut self, name: &str) -> Result<Player, RosterError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }

        if name.chars().count() > self.max_name_chars {
            return Err(RosterError::NameTooLong {
                max: self.max_name_chars,
            });
        }

        let lowered = name.to_lowercase();
        if self.players.iter().any(|p| p.name.to_lowercase() == lowered) {
            return Err(RosterError::DuplicateName(name.to_string()));
        }

        if self.players.len() >= self.max_players {
            return Err(RosterError::RosterFull {
                max: self.max_players,
            });
        }

        let player = Player {
            id: ulid::Ulid::new().to_string(),
            name: name.to_string(),
            color: PALETTE[self.players.len() % PALETTE.len()].to_string(),
        };

        self.players.push(player.clone());
        tracing::info!("Added player {} ({})", player.name, player.id);
        Ok(player)
    }

    /// Remove a player by id; unknown ids are ignored
    pub fn remove(&mut self, id: &str) -> Option<Player> {
        let pos = self.players.iter().position(|p| p.id == id)?;
        let player = self.players.remove(pos);
        tracing::info!("Removed player {} ({})", player.name, player.id);
        Some(player)
    }

    /// Fisher-Yates shuffle; ids and colors are unchanged
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.players.shuffle(rng);
    }

    /// Draw one player uniformly at random
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Player> {
        if self.players.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.players.len());
        self.players.get(index)
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.get(id).is_some()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn min_players(&self) -> usize {
        self.min_players
    }

    /// Whether the roster size allows a round to start
    pub fn is_ready(&self) -> bool {
        (self.min_players..=self.max_players).contains(&self.players.len())
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn roster() -> Roster {
        Roster::new(&GameConfig::default())
    }

    #[test]
    fn test_add_assigns_palette_colors_in_order() {
        let mut roster = roster();
        let alice = roster.add("Alice").unwrap();
        let bob = roster.add("Bob").unwrap();

        assert_eq!(alice.color, PALETTE[0]);
        assert_eq!(bob.color, PALETTE[1]);
        assert_ne!(alice.id, bob.id);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_palette_wraps_when_roster_exceeds_it() {
        let config = GameConfig {
            max_players: PALETTE.len() + 2,
            ..GameConfig::default()
        };
        let mut roster = Roster::new(&config);

        for i in 0..PALETTE.len() + 2 {
            let player = roster.add(&format!("Player {i}")).unwrap();
            assert_eq!(player.color, PALETTE[i % PALETTE.len()]);
        }
    }

    #[test]
    fn test_color_follows_size_before_add_after_removal() {
        let mut roster = roster();
        let alice = roster.add("Alice").unwrap();
        roster.add("Bob").unwrap();
        roster.remove(&alice.id);

        // One player left, so the next color is PALETTE[1] again
        let carol = roster.add("Carol").unwrap();
        assert_eq!(carol.color, PALETTE[1]);
    }

    #[test]
    fn test_duplicate_name_is_case_insensitive() {
        let mut roster = roster();
        roster.add("Alice").unwrap();

        assert_eq!(
            roster.add("aLiCe"),
            Err(RosterError::DuplicateName("aLiCe".to_string()))
        );
        assert_eq!(
            roster.add("  ALICE  "),
            Err(RosterError::DuplicateName("ALICE".to_string()))
        );
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_roster_full() {
        let mut roster = roster();
        for i in 0..8 {
            roster.add(&format!("P{i}")).unwrap();
        }

        assert_eq!(
            roster.add("One more"),
            Err(RosterError::RosterFull { max: 8 })
        );
        assert_eq!(roster.len(), 8);
    }

    #[test]
    fn test_name_validation() {
        let mut roster = roster();
        assert_eq!(roster.add("   "), Err(RosterError::EmptyName));
        assert_eq!(
            roster.add("ThisNameIsWayTooLongToFit"),
            Err(RosterError::NameTooLong { max: 20 })
        );

        // Exactly 20 characters is fine, counted as chars not bytes
        assert!(roster.add("abcdefghijklmnopqrst").is_ok());
        assert!(roster.add("ñññññññññññññññññññ").is_ok());

        let trimmed = roster.add("  Dana ").unwrap();
        assert_eq!(trimmed.name, "Dana");
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut roster = roster();
        roster.add("Alice").unwrap();
        assert!(roster.remove("nope").is_none());
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_shuffle_preserves_identity() {
        let mut roster = roster();
        for name in ["Alice", "Bob", "Carol", "Dave", "Eve"] {
            roster.add(name).unwrap();
        }
        let before: HashSet<_> = roster
            .players()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        let colors: Vec<_> = roster
            .players()
            .iter()
            .map(|p| (p.id.clone(), p.color.clone()))
            .collect();

        let mut rng = StdRng::seed_from_u64(9);
        roster.shuffle(&mut rng);

        let after: HashSet<_> = roster
            .players()
            .iter()
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(before, after);
        for (id, color) in colors {
            assert_eq!(roster.get(&id).unwrap().color, color);
        }
    }

    #[test]
    fn test_shuffle_reaches_every_first_position() {
        let mut roster = roster();
        for name in ["Alice", "Bob", "Carol"] {
            roster.add(name).unwrap();
        }

        let mut rng = StdRng::seed_from_u64(11);
        let mut firsts = HashSet::new();
        for _ in 0..200 {
            roster.shuffle(&mut rng);
            firsts.insert(roster.players()[0].name.clone());
        }
        assert_eq!(firsts.len(), 3);
    }

    #[test]
    fn test_readiness_bounds() {
        let mut roster = roster();
        assert!(!roster.is_ready());
        roster.add("Alice").unwrap();
        assert!(!roster.is_ready());
        roster.add("Bob").unwrap();
        assert!(roster.is_ready());
    }

    #[test]
    fn test_pick_random_on_empty_roster() {
        let roster = roster();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(roster.pick_random(&mut rng).is_none());
    }
}
