//! Standard sequences for each action.
//!
//! Each builder returns the [`Sequence`] for an already-validated action;
//! the matching `Game` method runs it. Steps capture entity ids only and
//! look everything else up when they run, so they see the effects of
//! earlier phases (and of the deaths resolved after them).

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, trace};

use super::manager::{Sequence, SequenceKind};
use super::phase::{Phase, PhaseKind};
use crate::cards::Keyword;
use crate::core::{EntityId, IllegalAction, KernelResult, PlayerId};
use crate::game::{DamageHit, Game};
use crate::triggers::{self, AttackTargeting, HeroAttack, MinionAttack, MinionPlayed, MinionSummoned};
use crate::zones::Zone;

/// ON_PLAY → ENTER_PLAY → [BATTLECRY] → SECRET_ACTIVATION → AFTER_PLAY → AFTER_SUMMON
#[must_use]
pub fn play_minion(
    player: PlayerId,
    card: EntityId,
    target: Option<EntityId>,
    position: Option<usize>,
    has_battlecry: bool,
) -> Sequence {
    let mut sequence = Sequence::new(SequenceKind::PlayMinion)
        .then(Phase::new(PhaseKind::OnPlay).step("pay and lift", move |g| g.pay_and_lift(player, card)))
        .then(Phase::new(PhaseKind::EnterPlay).step("enter board", move |g| {
            g.move_entity(card, Zone::Board, position)?;
            g.require_entity_mut(card)?.exhausted = true;
            g.run_setup(card)?;
            g.fire(MinionPlayed { minion: card, player, target })
        }));

    if has_battlecry {
        sequence.push(Phase::new(PhaseKind::Battlecry).step("battlecry", move |g| {
            let target = g.still_in_play(target);
            match g.card_effects(card)?.battlecry {
                Some(hook) => hook(g, card, target),
                None => Ok(()),
            }
        }));
    }

    sequence
        .then(secret_activation(player, card, target))
        .then(after_play(player, card))
        .then(Phase::new(PhaseKind::AfterSummon).step("after summon", move |g| {
            if g.zone_of(card) != Some(Zone::Board) {
                trace!(minion = %card, "left the board before after-summon");
                return Ok(());
            }
            g.fire(MinionSummoned { minion: card, player })
        }))
}

/// ON_PLAY → CAST → SECRET_ACTIVATION → AFTER_PLAY
#[must_use]
pub fn play_spell(player: PlayerId, card: EntityId, target: Option<EntityId>) -> Sequence {
    Sequence::new(SequenceKind::PlaySpell)
        .then(Phase::new(PhaseKind::OnPlay).step("pay and lift", move |g| g.pay_and_lift(player, card)))
        .then(Phase::new(PhaseKind::Cast).step("cast", move |g| {
            g.fire(triggers::SpellPlayed { spell: card, player, target })?;
            if g.require_entity(card)?.secret {
                g.move_entity(card, Zone::Secret, None)?;
                return g.run_setup(card);
            }
            let target = g.still_in_play(target);
            if let Some(hook) = g.card_effects(card)?.on_play {
                hook(g, card, target)?;
            }
            g.move_entity(card, Zone::Graveyard, None).map(|_| ())
        }))
        .then(secret_activation(player, card, target))
        .then(after_play(player, card))
}

/// ON_PLAY → ENTER_PLAY → [BATTLECRY] → AFTER_PLAY
#[must_use]
pub fn play_weapon(player: PlayerId, card: EntityId, target: Option<EntityId>, has_battlecry: bool) -> Sequence {
    let mut sequence = Sequence::new(SequenceKind::PlayWeapon)
        .then(Phase::new(PhaseKind::OnPlay).step("pay and lift", move |g| g.pay_and_lift(player, card)))
        .then(Phase::new(PhaseKind::EnterPlay).step("equip", move |g| g.equip_weapon(player, card)));

    if has_battlecry {
        sequence.push(Phase::new(PhaseKind::Battlecry).step("battlecry", move |g| {
            let target = g.still_in_play(target);
            match g.card_effects(card)?.battlecry {
                Some(hook) => hook(g, card, target),
                None => Ok(()),
            }
        }));
    }
    sequence.then(after_play(player, card))
}

/// ON_PLAY → CAST → AFTER_PLAY
#[must_use]
pub fn hero_power(player: PlayerId, power: EntityId, target: Option<EntityId>) -> Sequence {
    Sequence::new(SequenceKind::HeroPower)
        .then(Phase::new(PhaseKind::OnPlay).step("pay", move |g| {
            g.pay(player, power)?;
            g.player_mut(player).hero_power_used = true;
            Ok(())
        }))
        .then(Phase::new(PhaseKind::Cast).step("cast", move |g| {
            let target = g.still_in_play(target);
            if let Some(hook) = g.card_effects(power)?.on_play {
                hook(g, power, target)?;
            }
            g.fire(triggers::HeroPowerUsed { player, hero_power: power, target })
        }))
        .then(after_play(player, power))
}

/// ATTACK_DECLARATION → ATTACK_TARGETING → COMBAT_DAMAGE → AFTER_ATTACK
#[must_use]
pub fn attack(attacker: EntityId, defender: EntityId) -> Sequence {
    let resolved = Rc::new(Cell::new(defender));
    let (retarget, combat, after) = (Rc::clone(&resolved), Rc::clone(&resolved), resolved);

    Sequence::new(SequenceKind::Attack)
        .then(Phase::new(PhaseKind::AttackDeclaration).step("declare", move |g| {
            let is_hero = {
                let a = g.require_entity_mut(attacker)?;
                a.attacks_this_turn += 1;
                a.keywords.stealth = false;
                a.is_hero()
            };
            if is_hero {
                g.fire(HeroAttack { attacker, defender })
            } else {
                g.fire(MinionAttack { attacker, defender })
            }
        }))
        .then(Phase::new(PhaseKind::AttackTargeting).step("redirect", move |g| {
            let current = retarget.get();
            let redirected = g.view().query(&AttackTargeting { attacker, defender: current }, current);
            let valid = g.entity(redirected).is_some_and(|e| e.is_character() && e.zone.is_in_play());
            if redirected != current && valid {
                debug!(%attacker, from = %current, to = %redirected, "attack redirected");
                retarget.set(redirected);
            }
            Ok(())
        }))
        .then(Phase::new(PhaseKind::CombatDamage).step("combat", move |g| g.combat(attacker, combat.get())))
        .then(Phase::new(PhaseKind::AfterAttack).step("after attack", move |g| {
            if g.entity(attacker).is_none() {
                return Ok(());
            }
            g.fire(triggers::AfterAttack { attacker, defender: after.get() })
        }))
}

/// TURN_END
#[must_use]
pub fn end_turn(player: PlayerId) -> Sequence {
    Sequence::new(SequenceKind::EndTurn).then(Phase::new(PhaseKind::TurnEnd).step("turn end", move |g| {
        g.fire(triggers::TurnEnd { player })?;
        g.expire_and_thaw(player)
    }))
}

/// TURN_START → DRAW
#[must_use]
pub fn start_turn(player: PlayerId) -> Sequence {
    Sequence::new(SequenceKind::StartTurn)
        .then(Phase::new(PhaseKind::TurnStart).step("turn start", move |g| {
            g.refresh_for_turn(player)?;
            g.fire(triggers::TurnStart { player })
        }))
        .then(Phase::new(PhaseKind::Draw).step("draw", move |g| g.draw(player).map(|_| ())))
}

fn secret_activation(player: PlayerId, card: EntityId, target: Option<EntityId>) -> Phase {
    Phase::new(PhaseKind::SecretActivation)
        .step("secret check", move |g| g.fire(triggers::SecretCheck { player, card, target }))
}

fn after_play(player: PlayerId, card: EntityId) -> Phase {
    Phase::new(PhaseKind::AfterPlay).step("after play", move |g| g.fire(triggers::AfterPlay { card, player }))
}

impl Game {
    /// Pay a card's current cost and its overload.
    fn pay(&mut self, player: PlayerId, card: EntityId) -> KernelResult<()> {
        let cost = u8::try_from(self.cost(card)).unwrap_or(u8::MAX);
        let overload = self.require_entity(card)?.keywords.overload;
        let mana = &mut self.player_mut(player).mana;
        if !mana.spend(cost) {
            return Err(IllegalAction::NotEnoughMana {
                need: cost,
                have: mana.available(),
            }
            .into());
        }
        mana.add_overload(overload);
        Ok(())
    }

    /// Pay for a card and take it out of the hand.
    fn pay_and_lift(&mut self, player: PlayerId, card: EntityId) -> KernelResult<()> {
        self.pay(player, card)?;
        self.move_entity(card, Zone::SetAside, None).map(|_| ())
    }

    /// A chosen target that is still in play, if any.
    fn still_in_play(&self, target: Option<EntityId>) -> Option<EntityId> {
        target.filter(|t| self.zone_of(*t).is_some_and(Zone::is_in_play))
    }

    /// Both sides deal their attack to each other at once. A defending
    /// hero deals no damage back. A hero attacking with a weapon wears it
    /// down by one.
    fn combat(&mut self, attacker: EntityId, defender: EntityId) -> KernelResult<()> {
        let in_play = |g: &Game, id: EntityId| g.zone_of(id).is_some_and(Zone::is_in_play);
        if !in_play(self, attacker) || !in_play(self, defender) {
            trace!(%attacker, %defender, "combat cancelled");
            return Ok(());
        }

        let (attacker_hero, controller) = {
            let a = self.require_entity(attacker)?;
            (a.is_hero(), a.controller)
        };
        let dealt = self.attack(attacker);
        let returned = if self.require_entity(defender)?.is_minion() {
            self.attack(defender)
        } else {
            0
        };

        // Both hits land before either side's reactions run.
        let hit = self.apply_damage(Some(attacker), defender, dealt)?;
        let back = if returned > 0 {
            self.apply_damage(Some(defender), attacker, returned)?
        } else {
            DamageHit::Nothing
        };
        self.settle_damage(hit)?;
        self.settle_damage(back)?;

        if attacker_hero {
            if let Some(weapon) = self.player(controller).weapon {
                self.require_entity_mut(weapon)?.damage += 1;
            }
        }
        Ok(())
    }

    /// Turn-end upkeep for `player`: timed enchantments tick on every
    /// entity in play, `player`'s characters that did not attack thaw, and
    /// temporary mana is lost.
    fn expire_and_thaw(&mut self, player: PlayerId) -> KernelResult<()> {
        let hero = self.player(player).hero;
        let in_play: Vec<(EntityId, PlayerId)> = PlayerId::both()
            .flat_map(|p| {
                self.board(p)
                    .into_iter()
                    .chain(self.entities().ids(p, Zone::Hero))
                    .map(move |id| (id, p))
            })
            .collect();

        for (id, controller) in in_play {
            let entity = self.require_entity_mut(id)?;
            let expired = entity.tick_enchantments();
            if expired > 0 {
                trace!(entity = %id, expired, "enchantments expired");
            }
            let thaws = controller == player
                && (entity.is_minion() || id == hero)
                && entity.attacks_this_turn == 0;
            if thaws {
                entity.keywords.frozen = false;
            }
        }
        self.player_mut(player).mana.clear_temp();
        Ok(())
    }

    /// Turn-start upkeep: `player` becomes active, gains a crystal, and
    /// their characters are ready to attack. Dormant minions count down.
    fn refresh_for_turn(&mut self, player: PlayerId) -> KernelResult<()> {
        self.set_active(player);
        self.advance_turn();
        let cap = self.config().max_mana;
        let state = self.player_mut(player);
        state.mana.refresh_for_turn(cap);
        state.hero_power_used = false;
        let hero = state.hero;

        for id in self.board(player).into_iter().chain([hero]) {
            let entity = self.require_entity_mut(id)?;
            entity.attacks_this_turn = 0;
            if entity.keywords.dormant > 0 {
                entity.keywords.dormant -= 1;
                if entity.keywords.dormant == 0 {
                    debug!(entity = %id, "awakens");
                }
                continue;
            }
            entity.exhausted = false;
        }
        debug!(%player, turn = self.turn(), "turn start");
        Ok(())
    }

    /// Whether `id` may attack now, ignoring the choice of defender.
    #[must_use]
    pub fn can_attack(&self, id: EntityId) -> bool {
        let Some(e) = self.entity(id) else {
            return false;
        };
        if e.controller != self.active_player() || !e.zone.is_in_play() || !e.is_character() {
            return false;
        }
        if e.keywords.is_dormant() || e.has(Keyword::Frozen) || self.attack(id) <= 0 {
            return false;
        }
        let allowed = if e.has(Keyword::Windfury) { 2 } else { 1 };
        if e.attacks_this_turn >= allowed {
            return false;
        }
        !e.exhausted || e.has(Keyword::Charge) || e.has(Keyword::Rush)
    }

    /// Whether `id` is limited to attacking minions this turn (rush).
    #[must_use]
    pub fn minions_only(&self, id: EntityId) -> bool {
        self.entity(id)
            .is_some_and(|e| e.exhausted && !e.has(Keyword::Charge) && e.has(Keyword::Rush))
    }

    pub(crate) fn play_minion(
        &mut self,
        card: EntityId,
        target: Option<EntityId>,
        position: Option<usize>,
    ) -> KernelResult<()> {
        let player = self.active_player();
        let has_battlecry = self.card_effects(card)?.battlecry.is_some();
        self.run_sequence(play_minion(player, card, target, position, has_battlecry))
    }

    pub(crate) fn play_spell(&mut self, card: EntityId, target: Option<EntityId>) -> KernelResult<()> {
        let player = self.active_player();
        self.run_sequence(play_spell(player, card, target))
    }

    pub(crate) fn play_weapon(&mut self, card: EntityId, target: Option<EntityId>) -> KernelResult<()> {
        let player = self.active_player();
        let has_battlecry = self.card_effects(card)?.battlecry.is_some();
        self.run_sequence(play_weapon(player, card, target, has_battlecry))
    }

    pub(crate) fn use_hero_power(&mut self, target: Option<EntityId>) -> KernelResult<()> {
        let player = self.active_player();
        let power = self.player(player).hero_power;
        self.run_sequence(hero_power(player, power, target))
    }

    pub(crate) fn attack_with(&mut self, attacker: EntityId, defender: EntityId) -> KernelResult<()> {
        self.run_sequence(attack(attacker, defender))
    }

    /// End the active player's turn and start the opponent's.
    pub(crate) fn pass_turn(&mut self) -> KernelResult<()> {
        let player = self.active_player();
        self.run_sequence(end_turn(player))?;
        self.start_turn(player.opponent())
    }

    pub(crate) fn start_turn(&mut self, player: PlayerId) -> KernelResult<()> {
        self.run_sequence(start_turn(player))
    }
}
