//! Per-player resource subsystems.
//!
//! - `CorpseCounter`: corpses gained on friendly deaths and spent by effects
//! - `DeckRunes` / `RuneRequirement`: rune deck-construction constraints
//! - `ManaState`: crystals, overload and temporary mana

pub mod corpse;
pub mod runes;
pub mod mana;

pub use corpse::CorpseCounter;
pub use mana::ManaState;
pub use runes::{validate_deck, DeckReport, DeckRunes, RuneRequirement, RuneType, RUNE_SLOTS};
