//! Corpse resource.
//!
//! A player gains a corpse whenever one of their minions dies (unless the
//! minion leaves no corpse). Effects spend corpses for bonuses. Spending is
//! all-or-nothing: a shortfall leaves the count untouched.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-player corpse count. Never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorpseCounter {
    count: u32,
}

impl CorpseCounter {
    #[must_use]
    pub fn new(count: u32) -> Self {
        Self { count }
    }

    /// Current corpse count.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn add(&mut self, amount: u32) {
        self.count = self.count.saturating_add(amount);
    }

    #[must_use]
    pub fn can_spend(&self, amount: u32) -> bool {
        self.count >= amount
    }

    /// Spend `amount` corpses. Returns `false` and changes nothing when
    /// there are not enough.
    pub fn spend(&mut self, amount: u32) -> bool {
        if !self.can_spend(amount) {
            debug!(have = self.count, need = amount, "corpse spend refused");
            return false;
        }
        self.count -= amount;
        true
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
