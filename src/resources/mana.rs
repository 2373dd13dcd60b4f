//! Mana crystals.
//!
//! Overload is owed when a card is played and locked on the owner's next
//! turn. Temporary mana ("The Coin") is spent before crystals and is lost at
//! the end of the turn.

use serde::{Deserialize, Serialize};

/// Per-player mana state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManaState {
    /// Unspent crystals this turn.
    pub current: u8,
    /// Crystals owned.
    pub max: u8,
    /// Overload to lock at the start of the next turn.
    pub overload_owed: u8,
    /// Crystals locked this turn.
    pub overload_locked: u8,
    /// Temporary mana, spent first.
    pub temp: u8,
}

impl ManaState {
    /// Start-of-turn refresh: gain a crystal (up to `cap`), lock owed
    /// overload, refill.
    pub fn refresh_for_turn(&mut self, cap: u8) {
        self.max = self.max.saturating_add(1).min(cap);
        self.overload_locked = self.overload_owed;
        self.overload_owed = 0;
        self.current = self.max.saturating_sub(self.overload_locked);
        self.temp = 0;
    }

    /// Mana available to spend.
    #[must_use]
    pub fn available(&self) -> u8 {
        self.current.saturating_add(self.temp)
    }

    #[must_use]
    pub fn can_afford(&self, cost: u8) -> bool {
        self.available() >= cost
    }

    /// Pay `cost`, temporary mana first. Returns `false` and changes nothing
    /// when it cannot be paid.
    pub fn spend(&mut self, cost: u8) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        let from_temp = cost.min(self.temp);
        self.temp -= from_temp;
        self.current -= cost - from_temp;
        true
    }

    pub fn add_overload(&mut self, amount: u8) {
        self.overload_owed = self.overload_owed.saturating_add(amount);
    }

    pub fn gain_temp(&mut self, amount: u8) {
        self.temp = self.temp.saturating_add(amount);
    }

    /// Gain empty crystals (up to `cap`).
    pub fn gain_empty_crystals(&mut self, amount: u8, cap: u8) {
        self.max = self.max.saturating_add(amount).min(cap);
    }

    /// Refill `amount` spent crystals.
    pub fn refill(&mut self, amount: u8) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// End-of-turn cleanup.
    pub fn clear_temp(&mut self) {
        self.temp = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_caps() {
        let mut mana = ManaState::default();
        for _ in 0..12 {
            mana.refresh_for_turn(10);
        }
        assert_eq!(mana.max, 10);
        assert_eq!(mana.current, 10);
    }

    #[test]
    fn test_overload_locks_next_turn() {
        let mut mana = ManaState::default();
        mana.refresh_for_turn(10);
        mana.refresh_for_turn(10);
        mana.add_overload(2);
        assert_eq!(mana.current, 2);

        mana.refresh_for_turn(10);
        assert_eq!(mana.max, 3);
        assert_eq!(mana.overload_locked, 2);
        assert_eq!(mana.current, 1);

        mana.refresh_for_turn(10);
        assert_eq!(mana.overload_locked, 0);
        assert_eq!(mana.current, 4);
    }

    #[test]
    fn test_temp_spent_first() {
        let mut mana = ManaState::default();
        mana.refresh_for_turn(10);
        mana.gain_temp(1);
        assert_eq!(mana.available(), 2);

        assert!(mana.spend(1));
        assert_eq!(mana.temp, 0);
        assert_eq!(mana.current, 1);
    }

    #[test]
    fn test_spend_shortfall() {
        let mut mana = ManaState::default();
        mana.refresh_for_turn(10);
        assert!(!mana.spend(2));
        assert_eq!(mana.current, 1);
    }
}
