//! Zone identifiers.

use serde::{Deserialize, Serialize};

/// A container an entity occupies.
///
/// Every zone is ordered per player. For the deck, the last entry is the top
/// card. For the board, index 0 is the leftmost slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Board,
    Secret,
    /// Hero, hero power and weapon slots.
    Hero,
    /// In transit while a card is being played.
    SetAside,
    Graveyard,
    Removed,
}

impl Zone {
    /// All zones.
    pub const ALL: [Zone; 8] = [
        Zone::Deck,
        Zone::Hand,
        Zone::Board,
        Zone::Secret,
        Zone::Hero,
        Zone::SetAside,
        Zone::Graveyard,
        Zone::Removed,
    ];

    /// Entities in these zones keep their triggers registered.
    #[must_use]
    pub const fn is_in_play(self) -> bool {
        matches!(self, Zone::Board | Zone::Secret | Zone::Hero)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_play() {
        let in_play: Vec<_> = Zone::ALL.iter().filter(|z| z.is_in_play()).collect();
        assert_eq!(in_play, vec![&Zone::Board, &Zone::Secret, &Zone::Hero]);
    }
}
