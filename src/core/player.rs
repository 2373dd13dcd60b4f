//! Players and per-player storage.
//!
//! ## PlayerId
//!
//! The kernel simulates a two-sided game. `PlayerId::opponent` flips sides.
//!
//! ## PlayerMap
//!
//! Fixed per-player storage indexed by `PlayerId`.
//!
//! ## Player
//!
//! Per-player state that is not an entity: mana, armor, the resource
//! subsystems and references to the hero-slot entities. Zone collections
//! (hand, board, deck, ...) live in the [`EntityStore`](crate::zones::EntityStore).

use std::ops::{Index, IndexMut};

use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::EntityId;
use crate::resources::{CorpseCounter, DeckRunes, ManaState};

/// Number of sides in a game.
pub const PLAYER_COUNT: usize = 2;

/// Player identifier (0 = first player, 1 = second player).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The player who takes the first turn.
    pub const FIRST: PlayerId = PlayerId(0);
    /// The player who takes the second turn.
    pub const SECOND: PlayerId = PlayerId(1);

    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both players in turn order.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        [Self::FIRST, Self::SECOND].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One value per player, indexable by `PlayerId`.
///
/// ```
/// use ccg_kernel::core::{PlayerId, PlayerMap};
///
/// let mut health: PlayerMap<i32> = PlayerMap::new(|_| 30);
/// health[PlayerId::SECOND] -= 4;
/// assert_eq!(health[PlayerId::FIRST], 30);
/// assert_eq!(health[PlayerId::SECOND], 26);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    /// Build from a factory receiving each `PlayerId`.
    pub fn new(mut factory: impl FnMut(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::FIRST), factory(PlayerId::SECOND)],
        }
    }

    /// Build with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// Per-player game state.
#[derive(Clone, Debug)]
pub struct Player {
    /// Which side this is.
    pub id: PlayerId,

    /// Hero entity (lives in the Hero zone).
    pub hero: EntityId,

    /// Hero power entity (lives in the Hero zone).
    pub hero_power: EntityId,

    /// Equipped weapon, if any.
    pub weapon: Option<EntityId>,

    /// Armor absorbs damage before hero health.
    pub armor: i32,

    /// Mana crystals, overload and temporary mana.
    pub mana: ManaState,

    /// Corpse resource.
    pub corpses: CorpseCounter,

    /// Rune slots declared by the deck, if the deck uses runes.
    pub runes: Option<DeckRunes>,

    /// Modular cards: card id -> module card ids chosen at deck building.
    pub sideboard: ImHashMap<CardId, Vec<CardId>>,

    /// Next fatigue damage is `fatigue + 1`.
    pub fatigue: i32,

    /// Hero power already used this turn.
    pub hero_power_used: bool,

    /// Set by death processing when the hero dies.
    pub defeated: bool,
}

impl Player {
    /// Create a player around its hero-slot entities.
    #[must_use]
    pub fn new(id: PlayerId, hero: EntityId, hero_power: EntityId) -> Self {
        Self {
            id,
            hero,
            hero_power,
            weapon: None,
            armor: 0,
            mana: ManaState::default(),
            corpses: CorpseCounter::default(),
            runes: None,
            sideboard: ImHashMap::new(),
            fatigue: 0,
            hero_power_used: false,
            defeated: false,
        }
    }

    /// Module cards attached to a modular card, if any.
    #[must_use]
    pub fn modules_for(&self, card: &CardId) -> &[CardId] {
        self.sideboard.get(card).map_or(&[], Vec::as_slice)
    }
}
