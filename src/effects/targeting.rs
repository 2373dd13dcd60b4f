//! Targeting legality.
//!
//! Which entities an action may select depends on the action kind and on
//! the target's stealth, elusive, immune and dormant state:
//!
//! | Kind        | Stealth (enemy) | Elusive | Immune  |
//! |-------------|-----------------|---------|---------|
//! | Spell       | blocked         | blocked | blocked |
//! | HeroPower   | blocked         | blocked | blocked |
//! | Battlecry   | blocked         | allowed | blocked |
//! | Attack      | blocked         | allowed | blocked |
//! | OwnerBuff   | allowed (friendly targets always pass)  |||
//! | Random      | allowed         | allowed | allowed |
//! | AoeDamage   | allowed         | allowed | allowed |
//! | AoeDestroy  | allowed         | allowed | allowed |
//!
//! Dormant entities are never targetable. Immune characters picked by a
//! random or area damage effect take no damage; that is enforced by
//! `Game::deal_damage`, not here.

use serde::{Deserialize, Serialize};

use crate::cards::{CardInstance, Keyword};
use crate::core::{EntityId, PlayerId};
use crate::game::Game;
use crate::zones::Zone;

/// How an entity is being selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetingKind {
    Spell,
    HeroPower,
    Battlecry,
    Attack,
    /// A player buffing their own entity.
    OwnerBuff,
    Random,
    AoeDamage,
    AoeDestroy,
}

impl TargetingKind {
    /// Directly chosen targets: stealth and immune block these.
    #[must_use]
    pub const fn is_direct(self) -> bool {
        matches!(
            self,
            TargetingKind::Spell | TargetingKind::HeroPower | TargetingKind::Battlecry | TargetingKind::Attack
        )
    }
}

/// Whether `target` may be selected by an action of `kind`.
///
/// `is_friendly` is true when the acting player controls the target.
#[must_use]
pub fn can_target(target: &CardInstance, kind: TargetingKind, is_friendly: bool) -> bool {
    if target.keywords.is_dormant() {
        return false;
    }
    if kind == TargetingKind::OwnerBuff && is_friendly {
        return true;
    }
    if target.has(Keyword::Stealth) && !is_friendly && kind.is_direct() {
        return false;
    }
    if target.has(Keyword::Elusive) && matches!(kind, TargetingKind::Spell | TargetingKind::HeroPower) {
        return false;
    }
    if target.has(Keyword::Immune) && kind.is_direct() {
        return false;
    }
    true
}

/// Keep the candidates `controller` may select with `kind`, in order.
pub fn filter_targets<'a>(
    candidates: impl IntoIterator<Item = &'a CardInstance>,
    kind: TargetingKind,
    controller: PlayerId,
) -> Vec<EntityId> {
    candidates
        .into_iter()
        .filter(|c| can_target(c, kind, c.controller == controller))
        .map(|c| c.entity_id)
        .collect()
}

/// Which sides and entity types a targeted effect may pick from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetScope {
    pub friendly: bool,
    pub enemy: bool,
    pub minions: bool,
    pub heroes: bool,
}

impl Default for TargetScope {
    fn default() -> Self {
        Self::any()
    }
}

impl TargetScope {
    /// Any character on either side.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            friendly: true,
            enemy: true,
            minions: true,
            heroes: true,
        }
    }

    /// Any minion on either side.
    #[must_use]
    pub const fn any_minion() -> Self {
        Self::any().without_heroes()
    }

    /// Enemy characters only.
    #[must_use]
    pub const fn enemies() -> Self {
        Self {
            friendly: false,
            ..Self::any()
        }
    }

    /// Friendly characters only.
    #[must_use]
    pub const fn friendly() -> Self {
        Self {
            enemy: false,
            ..Self::any()
        }
    }

    #[must_use]
    pub const fn without_heroes(mut self) -> Self {
        self.heroes = false;
        self
    }

    #[must_use]
    pub const fn without_minions(mut self) -> Self {
        self.minions = false;
        self
    }
}

/// Every entity `player` may select with `kind` inside `scope`: friendly
/// board, friendly hero, enemy board, enemy hero, in that order.
#[must_use]
pub fn get_all_targetable(
    game: &Game,
    player: PlayerId,
    kind: TargetingKind,
    scope: TargetScope,
) -> Vec<EntityId> {
    let mut targets = Vec::new();
    let mut sides = Vec::with_capacity(2);
    if scope.friendly {
        sides.push(player);
    }
    if scope.enemy {
        sides.push(player.opponent());
    }

    for side in sides {
        if scope.minions {
            targets.extend(filter_targets(game.zone_entities(side, Zone::Board), kind, player));
        }
        if scope.heroes {
            let hero = game.player(side).hero;
            if let Some(hero) = game.entity(hero) {
                targets.extend(filter_targets([hero], kind, player));
            }
        }
    }
    targets
}

/// Defenders `attacker` may legally attack. If the defending side has a
/// taunt minion the attacker is able to select, only those may be attacked.
#[must_use]
pub fn attack_targets(game: &Game, attacker: EntityId) -> Vec<EntityId> {
    let Some(attacker) = game.entity(attacker) else {
        return Vec::new();
    };
    let player = attacker.controller;
    let candidates = get_all_targetable(game, player, TargetingKind::Attack, TargetScope::enemies());

    let taunts: Vec<EntityId> = candidates
        .iter()
        .copied()
        .filter(|id| game.entity(*id).is_some_and(|e| e.is_minion() && e.has(Keyword::Taunt)))
        .collect();

    if taunts.is_empty() {
        candidates
    } else {
        taunts
    }
}
