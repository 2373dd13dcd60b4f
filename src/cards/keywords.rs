//! Keyword flags and counters.
//!
//! `Keyword` names a boolean ability. `Keywords` is the per-entity set of
//! flags plus the numeric keyword counters (dormant turns, overload, spell
//! damage). Silence clears all of it.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// A boolean keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Keyword {
    Taunt,
    DivineShield,
    Stealth,
    Rush,
    Charge,
    Windfury,
    Lifesteal,
    Poisonous,
    Frozen,
    Silenced,
    Reborn,
    Immune,
    Elusive,
}

impl Keyword {
    /// Every keyword, in declaration order.
    pub const ALL: [Keyword; 13] = [
        Keyword::Taunt,
        Keyword::DivineShield,
        Keyword::Stealth,
        Keyword::Rush,
        Keyword::Charge,
        Keyword::Windfury,
        Keyword::Lifesteal,
        Keyword::Poisonous,
        Keyword::Frozen,
        Keyword::Silenced,
        Keyword::Reborn,
        Keyword::Immune,
        Keyword::Elusive,
    ];
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "TAUNT" => Keyword::Taunt,
            "DIVINE_SHIELD" => Keyword::DivineShield,
            "STEALTH" => Keyword::Stealth,
            "RUSH" => Keyword::Rush,
            "CHARGE" => Keyword::Charge,
            "WINDFURY" => Keyword::Windfury,
            "LIFESTEAL" => Keyword::Lifesteal,
            "POISONOUS" => Keyword::Poisonous,
            "FROZEN" => Keyword::Frozen,
            "SILENCED" => Keyword::Silenced,
            "REBORN" => Keyword::Reborn,
            "IMMUNE" => Keyword::Immune,
            "ELUSIVE" => Keyword::Elusive,
            _ => return Err(()),
        })
    }
}

/// Deserialize a keyword list, dropping names this kernel does not model.
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<Vec<Keyword>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    Ok(names.iter().filter_map(|n| n.parse().ok()).collect())
}

/// Keyword state of one entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keywords {
    pub taunt: bool,
    pub divine_shield: bool,
    pub stealth: bool,
    pub rush: bool,
    pub charge: bool,
    pub windfury: bool,
    pub lifesteal: bool,
    pub poisonous: bool,
    pub frozen: bool,
    pub silenced: bool,
    pub reborn: bool,
    pub immune: bool,
    pub elusive: bool,

    /// Turns left asleep. A dormant minion cannot attack, be targeted or be damaged.
    pub dormant: u8,
    /// Mana this card locks when played.
    pub overload: u8,
    /// Spell damage granted while on the board.
    pub spell_damage: i32,
}

impl Keywords {
    /// Build from a keyword list.
    #[must_use]
    pub fn from_list(list: &[Keyword]) -> Self {
        let mut keywords = Self::default();
        for &k in list {
            keywords.set(k, true);
        }
        keywords
    }

    fn slot(&mut self, keyword: Keyword) -> &mut bool {
        match keyword {
            Keyword::Taunt => &mut self.taunt,
            Keyword::DivineShield => &mut self.divine_shield,
            Keyword::Stealth => &mut self.stealth,
            Keyword::Rush => &mut self.rush,
            Keyword::Charge => &mut self.charge,
            Keyword::Windfury => &mut self.windfury,
            Keyword::Lifesteal => &mut self.lifesteal,
            Keyword::Poisonous => &mut self.poisonous,
            Keyword::Frozen => &mut self.frozen,
            Keyword::Silenced => &mut self.silenced,
            Keyword::Reborn => &mut self.reborn,
            Keyword::Immune => &mut self.immune,
            Keyword::Elusive => &mut self.elusive,
        }
    }

    /// Check a flag.
    #[must_use]
    pub fn has(&self, keyword: Keyword) -> bool {
        match keyword {
            Keyword::Taunt => self.taunt,
            Keyword::DivineShield => self.divine_shield,
            Keyword::Stealth => self.stealth,
            Keyword::Rush => self.rush,
            Keyword::Charge => self.charge,
            Keyword::Windfury => self.windfury,
            Keyword::Lifesteal => self.lifesteal,
            Keyword::Poisonous => self.poisonous,
            Keyword::Frozen => self.frozen,
            Keyword::Silenced => self.silenced,
            Keyword::Reborn => self.reborn,
            Keyword::Immune => self.immune,
            Keyword::Elusive => self.elusive,
        }
    }

    /// Set or clear a flag.
    pub fn set(&mut self, keyword: Keyword, value: bool) {
        *self.slot(keyword) = value;
    }

    /// Whether the minion is still dormant.
    #[must_use]
    pub fn is_dormant(&self) -> bool {
        self.dormant > 0
    }

    /// Merge another set in: flags are OR-ed and counters are added.
    pub fn absorb(&mut self, other: &Keywords) {
        for k in Keyword::ALL {
            if other.has(k) {
                self.set(k, true);
            }
        }
        self.dormant = self.dormant.max(other.dormant);
        self.overload = self.overload.saturating_add(other.overload);
        self.spell_damage += other.spell_damage;
    }

    /// Clear everything and leave only the silenced flag.
    pub fn silence(&mut self) {
        *self = Keywords {
            silenced: true,
            ..Keywords::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_has() {
        let mut k = Keywords::default();
        assert!(!k.has(Keyword::Taunt));
        k.set(Keyword::Taunt, true);
        assert!(k.has(Keyword::Taunt));
        assert!(k.taunt);
    }

    #[test]
    fn test_silence_clears_counters() {
        let mut k = Keywords::from_list(&[Keyword::DivineShield, Keyword::Reborn]);
        k.spell_damage = 2;
        k.silence();
        assert!(!k.divine_shield);
        assert!(!k.reborn);
        assert_eq!(k.spell_damage, 0);
        assert!(k.silenced);
    }

    #[test]
    fn test_absorb() {
        let mut base = Keywords::from_list(&[Keyword::Taunt]);
        let mut module = Keywords::from_list(&[Keyword::Lifesteal]);
        module.spell_damage = 1;
        base.absorb(&module);
        assert!(base.taunt && base.lifesteal);
        assert_eq!(base.spell_damage, 1);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("DIVINE_SHIELD".parse::<Keyword>(), Ok(Keyword::DivineShield));
        assert!("BATTLECRY".parse::<Keyword>().is_err());
    }
}
