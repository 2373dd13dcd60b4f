//! Rules engine trait.
//!
//! The contract a search algorithm needs from a game model:
//! - What actions are legal
//! - How actions modify state
//! - Win/loss conditions

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Action, GameRng, KernelResult, PlayerId};
use crate::game::Game;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Both heroes died in the same death check.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }

    /// +1 for a win, -1 for a loss, 0 for a draw, from `player`'s side.
    #[must_use]
    pub fn reward(&self, player: PlayerId) -> f32 {
        match self {
            GameResult::Winner(p) if *p == player => 1.0,
            GameResult::Winner(_) => -1.0,
            GameResult::Draw => 0.0,
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: empty only when the game is over
/// - `apply_action`: must be deterministic given the state's RNG, and
///   must leave the state unchanged when the action is illegal
/// - `fork`: cheap copy with an independent random stream
/// - `is_terminal`: `None` while the game continues
pub trait RulesEngine: Sized {
    /// Player to act.
    fn current_player(&self) -> PlayerId;

    /// Every legal action for the player to act.
    fn legal_actions(&self) -> Vec<Action>;

    /// Apply an action.
    fn apply_action(&mut self, action: Action) -> KernelResult<()>;

    /// Check if the game is over.
    fn is_terminal(&self) -> Option<GameResult>;

    /// Copy for speculative play.
    fn fork(&mut self) -> Self;

    // === Convenience Methods ===

    /// Whether `action` is currently legal.
    fn is_legal(&self, action: &Action) -> bool {
        self.legal_actions().contains(action)
    }

    /// Play uniformly random legal actions until the game ends or
    /// `max_actions` have been applied. Returns the result, if any.
    fn random_rollout(&mut self, rng: &mut GameRng, max_actions: usize) -> KernelResult<Option<GameResult>> {
        for applied in 0..max_actions {
            if let Some(result) = self.is_terminal() {
                debug!(applied, ?result, "rollout finished");
                return Ok(Some(result));
            }
            let actions = self.legal_actions();
            let Some(&action) = rng.choose(&actions) else {
                break;
            };
            self.apply_action(action)?;
        }
        Ok(self.is_terminal())
    }
}

impl RulesEngine for Game {
    fn current_player(&self) -> PlayerId {
        match self.pending_discover() {
            Some(pending) => pending.player,
            None => self.active_player(),
        }
    }

    fn legal_actions(&self) -> Vec<Action> {
        Game::legal_actions(self)
    }

    fn apply_action(&mut self, action: Action) -> KernelResult<()> {
        self.apply(action)
    }

    fn is_terminal(&self) -> Option<GameResult> {
        self.result()
    }

    fn fork(&mut self) -> Self {
        Game::fork(self)
    }

    fn is_legal(&self, action: &Action) -> bool {
        self.check_legal(action).is_ok()
    }
}
