//! Rune deck constraints.
//!
//! A rune deck declares three rune slots split between Blood, Frost and
//! Unholy. A card with a rune cost (e.g. `"BBF"`) can only be included if
//! the deck has at least that many of each rune.
//!
//! ```
//! use ccg_kernel::resources::{DeckRunes, RuneRequirement};
//!
//! let runes = DeckRunes::new(2, 1, 0).unwrap();
//! assert!(runes.can_include(&RuneRequirement::parse("BB")));
//! assert!(runes.can_include(&RuneRequirement::parse("bf")));
//! assert!(!runes.can_include(&RuneRequirement::parse("FF")));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{CardDatabase, CardId};
use crate::core::{KernelError, KernelResult};

/// Rune slots a deck has.
pub const RUNE_SLOTS: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuneType {
    Blood,
    Frost,
    Unholy,
}

impl RuneType {
    fn letter(self) -> char {
        match self {
            RuneType::Blood => 'B',
            RuneType::Frost => 'F',
            RuneType::Unholy => 'U',
        }
    }
}

/// Runes a card needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuneRequirement {
    pub blood: u8,
    pub frost: u8,
    pub unholy: u8,
}

impl RuneRequirement {
    /// Count B/F/U letters, case-insensitively. Other characters are ignored.
    #[must_use]
    pub fn parse(runes: &str) -> Self {
        let mut req = Self::default();
        for c in runes.chars() {
            match c.to_ascii_uppercase() {
                'B' => req.blood = req.blood.saturating_add(1),
                'F' => req.frost = req.frost.saturating_add(1),
                'U' => req.unholy = req.unholy.saturating_add(1),
                _ => {}
            }
        }
        req
    }

    #[must_use]
    pub fn total(&self) -> u8 {
        self.blood.saturating_add(self.frost).saturating_add(self.unholy)
    }

    #[must_use]
    pub fn get(&self, rune: RuneType) -> u8 {
        match rune {
            RuneType::Blood => self.blood,
            RuneType::Frost => self.frost,
            RuneType::Unholy => self.unholy,
        }
    }
}

impl fmt::Display for RuneRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            return f.write_str("None");
        }
        for rune in [RuneType::Blood, RuneType::Frost, RuneType::Unholy] {
            for _ in 0..self.get(rune) {
                write!(f, "{}", rune.letter())?;
            }
        }
        Ok(())
    }
}

/// A deck's rune configuration. Counts always sum to [`RUNE_SLOTS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckRunes {
    slots: RuneRequirement,
}

impl DeckRunes {
    pub fn new(blood: u8, frost: u8, unholy: u8) -> KernelResult<Self> {
        let mut runes = Self {
            slots: RuneRequirement::default(),
        };
        runes.set_runes(blood, frost, unholy)?;
        Ok(runes)
    }

    /// Parse a deck rune string such as `"BBF"`.
    pub fn parse(runes: &str) -> KernelResult<Self> {
        let req = RuneRequirement::parse(runes);
        Self::new(req.blood, req.frost, req.unholy)
    }

    /// Replace the configuration. Fails with `InvalidRuneCount` unless the
    /// counts sum to 3; the previous configuration is kept on failure.
    pub fn set_runes(&mut self, blood: u8, frost: u8, unholy: u8) -> KernelResult<()> {
        let total = blood as u16 + frost as u16 + unholy as u16;
        if total != RUNE_SLOTS as u16 {
            return Err(KernelError::InvalidRuneCount(total.min(u8::MAX as u16) as u8));
        }
        self.slots = RuneRequirement {
            blood,
            frost,
            unholy,
        };
        Ok(())
    }

    /// Whether a card needing `req` fits this deck.
    #[must_use]
    pub fn can_include(&self, req: &RuneRequirement) -> bool {
        req.blood <= self.slots.blood && req.frost <= self.slots.frost && req.unholy <= self.slots.unholy
    }

    #[must_use]
    pub fn slots(&self) -> RuneRequirement {
        self.slots
    }
}

impl fmt::Display for DeckRunes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.slots, f)
    }
}

/// Result of validating a deck against its runes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckReport {
    /// Human-readable problems, one per offending card.
    pub violations: Vec<String>,
}

impl DeckReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Turn a failing report into `DeckRejected`.
    pub fn into_result(self) -> KernelResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(KernelError::DeckRejected(self.violations))
        }
    }
}

/// Check every card of a deck against the deck's runes. Cards without a
/// rune cost always pass; ids missing from the catalog are reported.
#[must_use]
pub fn validate_deck(db: &CardDatabase, cards: &[CardId], runes: &DeckRunes) -> DeckReport {
    let mut report = DeckReport::default();
    for id in cards {
        let Some(def) = db.get(id) else {
            report.violations.push(format!("Unknown card '{id}'"));
            continue;
        };
        let Some(cost) = def.runes.as_deref() else {
            continue;
        };
        let req = RuneRequirement::parse(cost);
        if !runes.can_include(&req) {
            report.violations.push(format!(
                "Card '{}' requires {req} but deck has {runes}",
                def.name
            ));
        }
    }
    report
}
