//! Discover: offer a player a choice of cards and act on the pick.
//!
//! A discover leaves a pending choice on the game. Until it is resolved
//! with `Action::ChooseDiscover`, that is the only legal action.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::Game;
use crate::cards::CardId;
use crate::core::{IllegalAction, KernelResult, PlayerId};

/// Called with the chosen card.
pub type DiscoverFn = Arc<dyn Fn(&mut Game, PlayerId, &CardId) -> KernelResult<()> + Send + Sync>;

/// Options discovered from a pool.
pub const DISCOVER_OPTIONS: usize = 3;

/// A choice waiting for the player.
#[derive(Clone)]
pub struct PendingDiscover {
    pub player: PlayerId,
    pub options: Vec<CardId>,
    callback: DiscoverFn,
}

impl fmt::Debug for PendingDiscover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingDiscover")
            .field("player", &self.player)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Offer up to three distinct cards from `pool`; the pick is added to
    /// the player's hand.
    pub fn discover(&mut self, player: PlayerId, pool: &[CardId]) -> KernelResult<()> {
        let options = self.random().choose_distinct(pool, DISCOVER_OPTIONS);
        self.initiate_discover(player, options, |game, player, card| {
            game.add_to_hand(player, card.clone()).map(|_| ())
        })
    }

    /// Offer `options` and run `callback` with the pick. An empty offer
    /// does nothing.
    pub fn initiate_discover<F>(&mut self, player: PlayerId, options: Vec<CardId>, callback: F) -> KernelResult<()>
    where
        F: Fn(&mut Game, PlayerId, &CardId) -> KernelResult<()> + Send + Sync + 'static,
    {
        if self.pending().is_some() {
            return Err(IllegalAction::PendingChoice.into());
        }
        if options.is_empty() {
            return Ok(());
        }
        debug!(%player, options = ?options, "discover");
        self.set_pending(Some(PendingDiscover {
            player,
            options,
            callback: Arc::new(callback),
        }));
        Ok(())
    }

    /// The choice waiting to be made, if any.
    #[must_use]
    pub fn pending_discover(&self) -> Option<&PendingDiscover> {
        self.pending()
    }

    /// Pick option `index` of the pending choice.
    ///
    /// An out-of-range index is rejected and the choice stays pending.
    pub fn resolve_discover(&mut self, index: usize) -> KernelResult<()> {
        let Some(pending) = self.pending() else {
            return Err(IllegalAction::NoPendingChoice.into());
        };
        let Some(card) = pending.options.get(index).cloned() else {
            return Err(IllegalAction::InvalidChoice(index).into());
        };
        let (player, callback) = (pending.player, Arc::clone(&pending.callback));
        self.set_pending(None);

        debug!(%player, %card, "discover resolved");
        callback(self, player, &card)
    }
}
