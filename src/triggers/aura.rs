//! Computed stats.
//!
//! Stats are never cached. Every read starts from the entity's base value
//! plus enchantments and then runs the registered modifiers (auras) for that
//! stat in registration order. Removing an aura therefore takes effect on
//! the very next read.
//!
//! A modifier may read other stats through the same [`StatView`]. A nested
//! read of the same stat of the same entity returns the unmodified base, so
//! an aura that looks at its own target cannot recurse.

use std::cell::RefCell;

use smallvec::SmallVec;
use tracing::trace;

use super::event::{CalculateAttack, CalculateCost, CalculateHealth, EventKind, Query};
use crate::cards::CardInstance;
use crate::core::{EntityId, PlayerId};
use crate::game::Game;
use crate::zones::Zone;

/// Read-only view of a game used for stat queries.
pub struct StatView<'g> {
    game: &'g Game,
    active: RefCell<SmallVec<[(EventKind, EntityId); 8]>>,
}

impl<'g> StatView<'g> {
    #[must_use]
    pub fn new(game: &'g Game) -> Self {
        Self {
            game,
            active: RefCell::new(SmallVec::new()),
        }
    }

    /// The underlying game.
    #[must_use]
    pub fn game(&self) -> &'g Game {
        self.game
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&'g CardInstance> {
        self.game.entity(id)
    }

    /// Controller of an entity.
    #[must_use]
    pub fn controller_of(&self, id: EntityId) -> Option<PlayerId> {
        self.entity(id).map(|e| e.controller)
    }

    /// Whether two entities share a controller.
    #[must_use]
    pub fn same_side(&self, a: EntityId, b: EntityId) -> bool {
        matches!((self.controller_of(a), self.controller_of(b)), (Some(x), Some(y)) if x == y)
    }

    /// Run the modifiers for `query` over `base`.
    pub fn query<Q: Query>(&self, query: &Q, base: Q::Value) -> Q::Value {
        let key = (Q::KIND, query.subject());
        let nested = self.active.borrow().contains(&key);
        if nested {
            trace!(kind = ?Q::KIND, subject = %key.1, "nested stat query sees base value");
            return base;
        }

        self.active.borrow_mut().push(key);
        let mut value = base;
        for (ctx, modifier) in self.game.triggers().modifiers::<Q>() {
            modifier(self, &ctx, query, &mut value);
        }
        self.active.borrow_mut().pop();
        value
    }

    /// Current attack. A hero adds its equipped weapon's attack.
    #[must_use]
    pub fn attack(&self, id: EntityId) -> i32 {
        let Some(entity) = self.entity(id) else {
            return 0;
        };
        let mut base = entity.enchanted_attack();
        if entity.is_hero() {
            if let Some(weapon) = self.game.player(entity.controller).weapon {
                base += self.attack(weapon);
            }
        }
        self.query(&CalculateAttack { entity: id }, base).max(0)
    }

    /// Maximum health (durability for weapons).
    #[must_use]
    pub fn max_health(&self, id: EntityId) -> i32 {
        let Some(entity) = self.entity(id) else {
            return 0;
        };
        self.query(&CalculateHealth { entity: id }, entity.enchanted_health())
    }

    /// Current health: maximum health minus damage taken.
    #[must_use]
    pub fn health(&self, id: EntityId) -> i32 {
        let damage = self.entity(id).map_or(0, |e| e.damage);
        self.max_health(id) - damage
    }

    /// Current mana cost, never below zero.
    #[must_use]
    pub fn cost(&self, id: EntityId) -> i32 {
        let Some(entity) = self.entity(id) else {
            return 0;
        };
        self.query(&CalculateCost { entity: id }, entity.enchanted_cost()).max(0)
    }

    /// Spell damage from a player's board.
    #[must_use]
    pub fn spell_damage(&self, player: PlayerId) -> i32 {
        self.game
            .zone_entities(player, Zone::Board)
            .filter(|e| !e.keywords.is_dormant())
            .map(|e| e.keywords.spell_damage)
            .sum()
    }
}
