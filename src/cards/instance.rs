//! Card instances - runtime entity state.
//!
//! `CardInstance` is one entity in a game: a minion, spell, weapon, hero or
//! hero power. It stores base stats copied from the definition, a damage
//! counter, enchantments and keyword state. Aura contributions are never
//! stored here; they are resolved at query time through the trigger bus.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::{CardDefinition, CardId, CardType, Race};
use super::keywords::{Keyword, Keywords};
use crate::core::entity::EntityId;
use crate::core::player::PlayerId;
use crate::zones::Zone;

/// A persistent stat change attached to an entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enchantment {
    /// Entity that granted it, if any.
    pub source: Option<EntityId>,
    pub attack: i32,
    pub health: i32,
    pub cost: i32,
    /// Remaining turn ends before it expires. `None` is permanent.
    pub turns_left: Option<u8>,
}

impl Enchantment {
    /// Permanent +attack/+health buff.
    #[must_use]
    pub fn buff(attack: i32, health: i32) -> Self {
        Self {
            source: None,
            attack,
            health,
            cost: 0,
            turns_left: None,
        }
    }

    /// Permanent cost change.
    #[must_use]
    pub fn cost(delta: i32) -> Self {
        Self {
            cost: delta,
            ..Self::buff(0, 0)
        }
    }

    #[must_use]
    pub fn from_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// Expire after this many turn ends (1 = "this turn").
    #[must_use]
    pub fn for_turns(mut self, turns: u8) -> Self {
        self.turns_left = Some(turns);
        self
    }
}

/// A card instance in a game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique entity ID for this instance.
    pub entity_id: EntityId,

    /// Reference to the card definition.
    pub card_id: CardId,

    pub card_type: CardType,

    pub race: Option<Race>,

    /// Who started with this card.
    pub owner: PlayerId,

    /// Who currently controls it.
    pub controller: PlayerId,

    /// Current zone. Only `EntityStore::move_to` changes it.
    pub zone: Zone,

    pub base_attack: i32,
    /// Base health, or durability for weapons.
    pub base_health: i32,
    pub base_cost: i32,

    /// Damage taken (durability lost for weapons).
    pub damage: i32,

    pub enchantments: SmallVec<[Enchantment; 2]>,

    pub keywords: Keywords,

    /// Summoning sickness.
    pub exhausted: bool,

    pub attacks_this_turn: u8,

    /// Marked for destruction at the next death check.
    pub pending_destroy: bool,

    /// Board slot the entity last occupied.
    pub last_position: Option<usize>,

    pub leaves_corpse: bool,

    pub secret: bool,

    /// Module cards merged into a modular card.
    pub modules: SmallVec<[CardId; 2]>,
}

impl CardInstance {
    /// Create an instance from its definition.
    #[must_use]
    pub fn from_definition(
        entity_id: EntityId,
        def: &CardDefinition,
        owner: PlayerId,
        zone: Zone,
    ) -> Self {
        let mut keywords = Keywords::from_list(&def.keywords);
        keywords.overload = def.overload;
        keywords.spell_damage = def.spell_damage;
        keywords.dormant = def.dormant;

        Self {
            entity_id,
            card_id: def.id.clone(),
            card_type: def.card_type,
            race: def.race,
            owner,
            controller: owner,
            zone,
            base_attack: def.attack,
            base_health: def.health,
            base_cost: def.cost,
            damage: 0,
            enchantments: SmallVec::new(),
            keywords,
            exhausted: true,
            attacks_this_turn: 0,
            pending_destroy: false,
            last_position: None,
            leaves_corpse: def.leaves_corpse,
            secret: def.secret,
            modules: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn is_minion(&self) -> bool {
        self.card_type == CardType::Minion
    }

    #[must_use]
    pub fn is_hero(&self) -> bool {
        self.card_type == CardType::Hero
    }

    /// Minions and heroes can be damaged and attacked.
    #[must_use]
    pub fn is_character(&self) -> bool {
        matches!(self.card_type, CardType::Minion | CardType::Hero)
    }

    #[must_use]
    pub fn has(&self, keyword: Keyword) -> bool {
        self.keywords.has(keyword)
    }

    /// Base attack plus enchantments (auras excluded).
    #[must_use]
    pub fn enchanted_attack(&self) -> i32 {
        self.base_attack + self.enchantments.iter().map(|e| e.attack).sum::<i32>()
    }

    /// Base health plus enchantments (auras excluded).
    #[must_use]
    pub fn enchanted_health(&self) -> i32 {
        self.base_health + self.enchantments.iter().map(|e| e.health).sum::<i32>()
    }

    /// Base cost plus enchantments (auras excluded).
    #[must_use]
    pub fn enchanted_cost(&self) -> i32 {
        self.base_cost + self.enchantments.iter().map(|e| e.cost).sum::<i32>()
    }

    /// Count one turn end down on timed enchantments and drop expired ones.
    /// Returns how many expired.
    pub fn tick_enchantments(&mut self) -> usize {
        let before = self.enchantments.len();
        self.enchantments.retain(|e| match e.turns_left.as_mut() {
            Some(turns) => {
                *turns = turns.saturating_sub(1);
                *turns > 0
            }
            None => true,
        });
        before - self.enchantments.len()
    }

    /// Remove enchantments and keywords.
    pub fn silence(&mut self) {
        self.enchantments.clear();
        self.keywords.silence();
    }

    /// Reset per-zone state when the entity changes zones.
    pub fn reset_for_zone_change(&mut self) {
        self.damage = 0;
        self.enchantments.clear();
        self.attacks_this_turn = 0;
        self.pending_destroy = false;
        self.exhausted = true;
    }
}
