//! # ccg-kernel
//!
//! Simulation kernel for a collectible card game, built to be cloned
//! cheaply under tree search.
//!
//! ## Design Principles
//!
//! 1. **Explicit Context**: The card catalog, effect hooks and limits live in
//!    a shared [`KernelContext`]. There are no global registries.
//!
//! 2. **Computed Stats**: Attack, health and cost are computed on every read
//!    from base values, enchantments and auras. Nothing is cached, so an
//!    aura that leaves play stops applying at once.
//!
//! 3. **Phased Resolution**: Every action runs as a Sequence of Phases, and
//!    every Phase ends with a death check.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Entities, zones and triggers live in
//!   `im` collections, so [`Game::fork`] is O(1).
//!
//! - **Typed Hooks**: Card rules are plain functions registered per card id
//!   and checked against the catalog when the context is built.
//!
//! ## Modules
//!
//! - `core`: Entity ids, players, actions, RNG, configuration, errors
//! - `cards`: Card definitions, keywords, instances and the catalog
//! - `zones`: Zones and the entity store
//! - `resources`: Mana, corpses and deck runes
//! - `triggers`: Typed event bus for reactions and auras
//! - `effects`: Effect registry and targeting rules
//! - `sequence`: Sequence → Phase → Step resolution and death checks
//! - `game`: The game itself and the operations card hooks use
//! - `snapshot`: Layered copy-on-write snapshots
//! - `rules`: `RulesEngine` trait for search code

pub mod core;
pub mod cards;
pub mod zones;
pub mod resources;
pub mod triggers;
pub mod effects;
pub mod sequence;
pub mod game;
pub mod snapshot;
pub mod rules;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use crate::core::{
    EntityId, PlayerId, PlayerMap, Player,
    GameRng, GameRngState,
    KernelConfig, KernelContext,
    Action, ActionRecord,
    IllegalAction, KernelError, KernelResult,
};

pub use crate::cards::{
    CardId, CardType, CardDefinition, CardInstance, CardDatabase,
    Enchantment, Keyword, Keywords,
};

pub use crate::zones::{EntityStore, Zone};

pub use crate::resources::{CorpseCounter, DeckReport, DeckRunes, ManaState, RuneType};

pub use crate::triggers::{Event, EventKind, Lifetime, Query, StatView, TriggerBus, TriggerContext};

pub use crate::effects::{CardEffects, EffectRegistry, TargetScope, TargetingKind};

pub use crate::sequence::{Phase, PhaseKind, Sequence, SequenceKind, SequenceManager};

pub use crate::game::{Game, GameBuilder};

pub use crate::snapshot::{GameSnapshot, MaterializedState, Snapshot};

pub use crate::rules::{GameResult, RulesEngine};
