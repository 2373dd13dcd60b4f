//! Kernel configuration.
//!
//! `KernelConfig` holds the numeric limits and switches of a game. It is
//! built once by the caller, usually with the builder methods, and shared by
//! every game through the [`KernelContext`](crate::core::KernelContext).
//!
//! ```
//! use ccg_kernel::core::KernelConfig;
//!
//! let config = KernelConfig::default()
//!     .with_max_board_size(5)
//!     .with_rune_enforcement(false);
//! assert_eq!(config.max_board_size, 5);
//! assert_eq!(config.max_hand_size, 10);
//! ```

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

/// Limits and switches for a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Minions a player may have on the board.
    pub max_board_size: usize,

    /// Cards a player may hold. Draws past this are burned.
    pub max_hand_size: usize,

    /// Cap on mana crystals.
    pub max_mana: u8,

    /// Hero health at game start.
    pub starting_health: i32,

    /// Opening hand size for the first and second player.
    pub starting_hand: [usize; 2],

    /// Death-check passes before a phase is declared runaway.
    pub max_death_passes: usize,

    /// Snapshot chain depth at which writes flatten the chain.
    pub snapshot_flatten_threshold: usize,

    /// Module cards a modular card may carry.
    pub max_sideboard_modules: usize,

    /// Reject decks that break their rune constraints.
    pub enforce_rune_constraints: bool,

    /// Check zone bookkeeping after every applied action.
    pub verify_invariants: bool,

    /// Card given to the second player at game start, if any.
    pub coin_card: Option<CardId>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            max_board_size: 7,
            max_hand_size: 10,
            max_mana: 10,
            starting_health: 30,
            starting_hand: [3, 4],
            max_death_passes: 64,
            snapshot_flatten_threshold: 32,
            max_sideboard_modules: 2,
            enforce_rune_constraints: true,
            verify_invariants: true,
            coin_card: None,
        }
    }
}

impl KernelConfig {
    /// Set the board limit.
    #[must_use]
    pub fn with_max_board_size(mut self, size: usize) -> Self {
        self.max_board_size = size;
        self
    }

    /// Set the hand limit.
    #[must_use]
    pub fn with_max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    /// Set the mana crystal cap.
    #[must_use]
    pub fn with_max_mana(mut self, mana: u8) -> Self {
        self.max_mana = mana;
        self
    }

    /// Set starting hero health.
    #[must_use]
    pub fn with_starting_health(mut self, health: i32) -> Self {
        self.starting_health = health;
        self
    }

    /// Set opening hand sizes (first player, second player).
    #[must_use]
    pub fn with_starting_hand(mut self, first: usize, second: usize) -> Self {
        self.starting_hand = [first, second];
        self
    }

    /// Set the runaway guard for death processing.
    #[must_use]
    pub fn with_max_death_passes(mut self, passes: usize) -> Self {
        self.max_death_passes = passes;
        self
    }

    /// Set the snapshot flatten threshold.
    #[must_use]
    pub fn with_snapshot_flatten_threshold(mut self, depth: usize) -> Self {
        self.snapshot_flatten_threshold = depth;
        self
    }

    /// Toggle rune enforcement at game construction.
    #[must_use]
    pub fn with_rune_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_rune_constraints = enforce;
        self
    }

    /// Toggle invariant checks after each action.
    #[must_use]
    pub fn with_invariant_checks(mut self, verify: bool) -> Self {
        self.verify_invariants = verify;
        self
    }

    /// Give the second player this card at game start.
    #[must_use]
    pub fn with_coin(mut self, card: impl Into<CardId>) -> Self {
        self.coin_card = Some(card.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KernelConfig::default();
        assert_eq!(config.max_board_size, 7);
        assert_eq!(config.max_hand_size, 10);
        assert_eq!(config.max_mana, 10);
        assert_eq!(config.starting_hand, [3, 4]);
        assert!(config.enforce_rune_constraints);
        assert!(config.coin_card.is_none());
    }

    #[test]
    fn test_builder() {
        let config = KernelConfig::default()
            .with_max_hand_size(4)
            .with_starting_health(10)
            .with_starting_hand(0, 0)
            .with_coin("GAME_005");

        assert_eq!(config.max_hand_size, 4);
        assert_eq!(config.starting_health, 10);
        assert_eq!(config.starting_hand, [0, 0]);
        assert_eq!(config.coin_card, Some(CardId::new("GAME_005")));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: KernelConfig =
            serde_json::from_str(r#"{"max_board_size": 5, "verify_invariants": false}"#).unwrap();
        assert_eq!(config.max_board_size, 5);
        assert!(!config.verify_invariants);
        assert_eq!(config.max_hand_size, 10);
    }
}
