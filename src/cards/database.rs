//! Card catalog.
//!
//! The `CardDatabase` stores all card definitions for a game and provides
//! lookup by `CardId`. It is owned by the [`KernelContext`](crate::core::KernelContext),
//! so every game and fork reads the same catalog.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardId, CardType};
use crate::core::{KernelError, KernelResult};

/// Catalog of card definitions.
///
/// ## Example
///
/// ```
/// use ccg_kernel::cards::{CardDatabase, CardDefinition, CardId};
///
/// let mut db = CardDatabase::new();
/// db.insert(CardDefinition::spell("CS2_029", "Fireball", 4));
///
/// let found = db.get(&CardId::new("CS2_029")).unwrap();
/// assert_eq!(found.name, "Fireball");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardDatabase {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardDatabase {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions. Later duplicates replace earlier ones.
    pub fn from_definitions(defs: impl IntoIterator<Item = CardDefinition>) -> Self {
        let mut db = Self::new();
        for def in defs {
            db.insert(def);
        }
        db
    }

    /// Add or replace a definition. Returns the replaced one.
    pub fn insert(&mut self, card: CardDefinition) -> Option<CardDefinition> {
        self.cards.insert(card.id.clone(), card)
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    /// Get a card definition, failing with `UnknownCard`.
    pub fn require(&self, id: &CardId) -> KernelResult<&CardDefinition> {
        self.cards
            .get(id)
            .ok_or_else(|| KernelError::UnknownCard(id.clone()))
    }

    /// Check if a card ID is known.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains_key(id)
    }

    /// Get the number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find cards by type.
    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().filter(move |c| c.card_type == card_type)
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &CardDefinition>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.cards.values().filter(move |c| predicate(c))
    }

    /// Ids matching a predicate, sorted so that random picks over them are
    /// reproducible for a given seed.
    #[must_use]
    pub fn pool<F>(&self, predicate: F) -> Vec<CardId>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        let mut ids: Vec<CardId> = self.find(predicate).map(|c| c.id.clone()).collect();
        ids.sort();
        ids
    }
}
