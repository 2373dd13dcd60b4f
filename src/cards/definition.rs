//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card. It is
//! deserializable from catalog JSON (field names follow the common
//! community card dumps, e.g. `"type": "MINION"`, `"mechanics": ["TAUNT"]`).
//!
//! Instance-specific data (damage taken, enchantments, zone) is stored
//! separately in `CardInstance`.

use serde::{Deserialize, Serialize};

use super::keywords::{self, Keyword};

/// Catalog identifier of a card definition, e.g. `"CS2_222"`.
///
/// This identifies the "type" of card, not a specific instance in a game.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Create a card id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The catalog string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of entity a card becomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Minion,
    Spell,
    Weapon,
    Hero,
    HeroPower,
}

/// Card class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardClass {
    #[default]
    Neutral,
    DeathKnight,
    DemonHunter,
    Druid,
    Hunter,
    Mage,
    Paladin,
    Priest,
    Rogue,
    Shaman,
    Warlock,
    Warrior,
}

/// Card rarity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rarity {
    #[default]
    Free,
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Minion type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Race {
    Beast,
    Demon,
    Dragon,
    Elemental,
    Mech,
    Murloc,
    Naga,
    Pirate,
    Quilboar,
    Totem,
    Undead,
    All,
}

impl Race {
    /// `All` counts as every race.
    #[must_use]
    pub fn matches(self, other: Race) -> bool {
        self == other || self == Race::All || other == Race::All
    }
}

fn default_true() -> bool {
    true
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ccg_kernel::cards::{CardDefinition, CardType, Keyword};
///
/// let guard = CardDefinition::minion("CS2_179", "Sen'jin Shieldmasta", 4, 3, 5)
///     .with_keyword(Keyword::Taunt);
///
/// assert_eq!(guard.card_type, CardType::Minion);
/// assert!(guard.has_keyword(Keyword::Taunt));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Catalog id.
    pub id: CardId,

    /// Card name (for display/debugging).
    pub name: String,

    /// Mana cost.
    #[serde(default)]
    pub cost: i32,

    /// Attack (minions and weapons).
    #[serde(default)]
    pub attack: i32,

    /// Health for minions and heroes, durability for weapons.
    #[serde(default, alias = "durability")]
    pub health: i32,

    #[serde(rename = "type")]
    pub card_type: CardType,

    #[serde(default, rename = "cardClass")]
    pub class: CardClass,

    #[serde(default)]
    pub rarity: Rarity,

    #[serde(default)]
    pub race: Option<Race>,

    /// Rune cost string such as `"BBF"`.
    #[serde(default)]
    pub runes: Option<String>,

    #[serde(default)]
    pub collectible: bool,

    /// Static keywords. Unrecognised mechanics in catalog data are skipped.
    #[serde(default, alias = "mechanics", deserialize_with = "keywords::lenient")]
    pub keywords: Vec<Keyword>,

    /// Mana locked on the controller's next turn.
    #[serde(default)]
    pub overload: u8,

    /// Spell damage bonus while on the board.
    #[serde(default, rename = "spellDamage")]
    pub spell_damage: i32,

    /// Turns the minion stays dormant after being played.
    #[serde(default)]
    pub dormant: u8,

    /// Spells that go to the secret zone instead of resolving.
    #[serde(default)]
    pub secret: bool,

    /// Whether the minion's death grants a corpse.
    #[serde(default = "default_true", rename = "leavesCorpse")]
    pub leaves_corpse: bool,
}

impl CardDefinition {
    fn base(id: impl Into<CardId>, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost: 0,
            attack: 0,
            health: 0,
            card_type,
            class: CardClass::Neutral,
            rarity: Rarity::Free,
            race: None,
            runes: None,
            collectible: false,
            keywords: Vec::new(),
            overload: 0,
            spell_damage: 0,
            dormant: 0,
            secret: false,
            leaves_corpse: true,
        }
    }

    /// A minion definition.
    #[must_use]
    pub fn minion(
        id: impl Into<CardId>,
        name: impl Into<String>,
        cost: i32,
        attack: i32,
        health: i32,
    ) -> Self {
        Self {
            cost,
            attack,
            health,
            ..Self::base(id, name, CardType::Minion)
        }
    }

    /// A spell definition.
    #[must_use]
    pub fn spell(id: impl Into<CardId>, name: impl Into<String>, cost: i32) -> Self {
        Self {
            cost,
            ..Self::base(id, name, CardType::Spell)
        }
    }

    /// A weapon definition.
    #[must_use]
    pub fn weapon(
        id: impl Into<CardId>,
        name: impl Into<String>,
        cost: i32,
        attack: i32,
        durability: i32,
    ) -> Self {
        Self {
            cost,
            attack,
            health: durability,
            ..Self::base(id, name, CardType::Weapon)
        }
    }

    /// A hero definition.
    #[must_use]
    pub fn hero(id: impl Into<CardId>, name: impl Into<String>, health: i32) -> Self {
        Self {
            health,
            ..Self::base(id, name, CardType::Hero)
        }
    }

    /// A hero power definition.
    #[must_use]
    pub fn hero_power(id: impl Into<CardId>, name: impl Into<String>, cost: i32) -> Self {
        Self {
            cost,
            ..Self::base(id, name, CardType::HeroPower)
        }
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        if !self.keywords.contains(&keyword) {
            self.keywords.push(keyword);
        }
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: CardClass) -> Self {
        self.class = class;
        self
    }

    #[must_use]
    pub fn with_race(mut self, race: Race) -> Self {
        self.race = Some(race);
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Set the rune cost, e.g. `"BB"`.
    #[must_use]
    pub fn with_runes(mut self, runes: impl Into<String>) -> Self {
        self.runes = Some(runes.into());
        self
    }

    #[must_use]
    pub fn with_overload(mut self, overload: u8) -> Self {
        self.overload = overload;
        self
    }

    #[must_use]
    pub fn with_spell_damage(mut self, amount: i32) -> Self {
        self.spell_damage = amount;
        self
    }

    #[must_use]
    pub fn with_dormant(mut self, turns: u8) -> Self {
        self.dormant = turns;
        self
    }

    /// Mark a spell as a secret.
    #[must_use]
    pub fn as_secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Minion leaves no corpse when it dies.
    #[must_use]
    pub fn without_corpse(mut self) -> Self {
        self.leaves_corpse = false;
        self
    }

    #[must_use]
    pub fn collectible(mut self) -> Self {
        self.collectible = true;
        self
    }

    /// Check for a static keyword.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }
}
