//! Kernel operations available to card hooks.
//!
//! These change state immediately and fire the matching reactions, but
//! never resolve deaths themselves: a minion brought to 0 health stays on
//! the board until the death check at the end of the current phase.

use tracing::{debug, trace, warn};

use super::Game;
use crate::cards::{create_instance, CardId, CardInstance, CardType, Enchantment, Keyword};
use crate::core::{EntityId, KernelError, KernelResult, PlayerId};
use crate::effects::CardEffects;
use crate::triggers::{
    CalculateDamage, CardDrawn, DamageTaken, DivineShieldLost, Event, Healed, Lifetime,
    MinionSummoned, MinionTransformed, Query, RegistrationId, StatView, TriggerContext,
};
use crate::zones::Zone;

/// A hit already applied to the game whose reactions have not run yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub(crate) enum DamageHit {
    Nothing,
    Shielded {
        target: EntityId,
        source: Option<EntityId>,
    },
    Dealt {
        target: EntityId,
        source: Option<EntityId>,
        amount: i32,
        lifesteal: Option<PlayerId>,
    },
}

impl Game {
    /// Deal `amount` damage to a character. Returns the damage dealt.
    ///
    /// Dormant and immune characters take nothing. Spells add their
    /// controller's spell damage, then damage modifiers run. Divine shield
    /// absorbs the whole hit, armor absorbs hero damage first, poisonous
    /// sources mark minions for destruction and lifesteal sources heal
    /// their hero.
    pub fn deal_damage(&mut self, source: Option<EntityId>, target: EntityId, amount: i32) -> KernelResult<i32> {
        let hit = self.apply_damage(source, target, amount)?;
        self.settle_damage(hit)
    }

    /// The state change of [`Game::deal_damage`] without its reactions.
    /// Pair every call with [`Game::settle_damage`].
    pub(crate) fn apply_damage(
        &mut self,
        source: Option<EntityId>,
        target: EntityId,
        amount: i32,
    ) -> KernelResult<DamageHit> {
        let (is_character, is_hero, is_minion, controller, suppressed, shielded) = {
            let t = self.require_entity(target)?;
            (
                t.is_character(),
                t.is_hero(),
                t.is_minion(),
                t.controller,
                t.keywords.is_dormant() || t.has(Keyword::Immune),
                t.has(Keyword::DivineShield),
            )
        };
        if !is_character {
            return Ok(DamageHit::Nothing);
        }
        if suppressed {
            trace!(%target, "damage suppressed");
            return Ok(DamageHit::Nothing);
        }

        let source_info = source
            .and_then(|s| self.entity(s))
            .map(|s| (s.card_type, s.controller, s.has(Keyword::Poisonous), s.has(Keyword::Lifesteal)));
        let from_spell = matches!(source_info, Some((CardType::Spell, ..)));

        let amount = {
            let view = self.view();
            let mut base = amount;
            if let (true, Some((_, owner, ..))) = (from_spell, source_info) {
                base += view.spell_damage(owner);
            }
            view.query(&CalculateDamage { target, source, from_spell }, base).max(0)
        };
        if amount == 0 {
            return Ok(DamageHit::Nothing);
        }

        if shielded {
            self.require_entity_mut(target)?.keywords.divine_shield = false;
            return Ok(DamageHit::Shielded { target, source });
        }

        let mut remaining = amount;
        if is_hero {
            let armor = &mut self.player_mut(controller).armor;
            let absorbed = remaining.min(*armor);
            *armor -= absorbed;
            remaining -= absorbed;
        }

        let entity = self.require_entity_mut(target)?;
        entity.damage += remaining;
        let mut lifesteal = None;
        if let Some((_, owner, poisonous, steals)) = source_info {
            if poisonous && is_minion {
                entity.pending_destroy = true;
            }
            if steals {
                lifesteal = Some(owner);
            }
        }

        Ok(DamageHit::Dealt {
            target,
            source,
            amount,
            lifesteal,
        })
    }

    /// Fire the reactions of a hit made by [`Game::apply_damage`] and heal
    /// lifesteal heroes. Returns the damage dealt.
    pub(crate) fn settle_damage(&mut self, hit: DamageHit) -> KernelResult<i32> {
        match hit {
            DamageHit::Nothing => Ok(0),
            DamageHit::Shielded { target, source } => {
                self.fire(DivineShieldLost { entity: target, source })?;
                Ok(0)
            }
            DamageHit::Dealt {
                target,
                source,
                amount,
                lifesteal,
            } => {
                if let Some(owner) = lifesteal {
                    let hero = self.player(owner).hero;
                    self.heal(source, hero, amount)?;
                }
                self.fire(DamageTaken { target, source, amount })?;
                Ok(amount)
            }
        }
    }

    /// Restore up to `amount` health. Returns the health restored.
    pub fn heal(&mut self, source: Option<EntityId>, target: EntityId, amount: i32) -> KernelResult<i32> {
        let entity = self.require_entity_mut(target)?;
        let healed = amount.clamp(0, entity.damage);
        if healed == 0 {
            return Ok(0);
        }
        entity.damage -= healed;
        self.fire(Healed { target, source, amount: healed })?;
        Ok(healed)
    }

    /// Summon a minion onto `player`'s board. Returns `None`, with a
    /// warning, when the board is full.
    pub fn summon_token(
        &mut self,
        player: PlayerId,
        card: impl Into<CardId>,
        position: Option<usize>,
    ) -> KernelResult<Option<EntityId>> {
        self.summon_prepared(player, card.into(), position, |_| {})
    }

    /// Summon a minion, letting `prepare` adjust the new instance before its
    /// setup hook runs and `MinionSummoned` fires.
    pub(crate) fn summon_prepared(
        &mut self,
        player: PlayerId,
        card: CardId,
        position: Option<usize>,
        prepare: impl FnOnce(&mut CardInstance),
    ) -> KernelResult<Option<EntityId>> {
        if self.entities().is_full(player, Zone::Board, self.config().max_board_size) {
            warn!(%player, %card, "board full, summon refused");
            return Ok(None);
        }
        let id = self.create_entity(player, &card, Zone::Board, position)?;
        prepare(self.require_entity_mut(id)?);
        self.run_setup(id)?;
        self.fire(MinionSummoned { minion: id, player })?;
        Ok(Some(id))
    }

    /// Mark an entity for destruction at the next death check.
    pub fn destroy(&mut self, id: EntityId) -> KernelResult<()> {
        self.require_entity_mut(id)?.pending_destroy = true;
        Ok(())
    }

    /// Remove enchantments, keywords and registered triggers.
    pub fn silence(&mut self, id: EntityId) -> KernelResult<()> {
        self.triggers_mut().unregister_all(id);
        self.require_entity_mut(id)?.silence();
        debug!(entity = %id, "silenced");
        Ok(())
    }

    pub fn freeze(&mut self, id: EntityId) -> KernelResult<()> {
        self.require_entity_mut(id)?.keywords.frozen = true;
        Ok(())
    }

    pub fn gain_armor(&mut self, player: PlayerId, amount: i32) {
        self.player_mut(player).armor += amount.max(0);
    }

    pub fn give_enchantment(&mut self, id: EntityId, enchantment: Enchantment) -> KernelResult<()> {
        self.require_entity_mut(id)?.enchantments.push(enchantment);
        Ok(())
    }

    /// Draw the top card of `player`'s deck.
    ///
    /// An empty deck deals increasing fatigue damage to the hero. A card
    /// drawn into a full hand is burned.
    pub fn draw(&mut self, player: PlayerId) -> KernelResult<Option<EntityId>> {
        let Some(card) = self.entities().top(player, Zone::Deck) else {
            let state = self.player_mut(player);
            state.fatigue += 1;
            let (hero, fatigue) = (state.hero, state.fatigue);
            debug!(%player, fatigue, "fatigue");
            self.deal_damage(None, hero, fatigue)?;
            return Ok(None);
        };

        if self.entities().is_full(player, Zone::Hand, self.config().max_hand_size) {
            self.move_entity(card, Zone::Graveyard, None)?;
            debug!(%player, entity = %card, "hand full, card burned");
            return Ok(None);
        }

        self.move_entity(card, Zone::Hand, None)?;
        self.fire(CardDrawn { card, player })?;
        Ok(Some(card))
    }

    /// Create a card in `player`'s hand. Returns `None` when the hand is full.
    pub fn add_to_hand(&mut self, player: PlayerId, card: impl Into<CardId>) -> KernelResult<Option<EntityId>> {
        let card = card.into();
        if self.entities().is_full(player, Zone::Hand, self.config().max_hand_size) {
            debug!(%player, %card, "hand full, card discarded");
            return Ok(None);
        }
        self.create_entity(player, &card, Zone::Hand, None).map(Some)
    }

    /// Turn an entity into another card, keeping its id, zone and slot.
    pub fn transform(&mut self, id: EntityId, to: impl Into<CardId>) -> KernelResult<()> {
        let to = to.into();
        let (from, owner, zone) = {
            let e = self.require_entity(id)?;
            (e.card_id.clone(), e.owner, e.zone)
        };

        self.triggers_mut().unregister_all(id);
        let fresh = create_instance(self.cards(), id, &to, owner, zone)?;
        let fresh_is_minion = fresh.is_minion();
        self.entities.replace(fresh)?;
        if zone.is_in_play() && fresh_is_minion {
            self.run_setup(id)?;
        }

        debug!(entity = %id, %from, %to, "transformed");
        self.fire(MinionTransformed { entity: id, from, to })
    }

    /// Move a board minion to `player`'s board.
    ///
    /// Returns `false` when the new controller's board is full; the minion
    /// is then destroyed instead. Anything off the board is an error.
    pub fn take_control(&mut self, id: EntityId, player: PlayerId) -> KernelResult<bool> {
        let entity = self.require_entity(id)?;
        if entity.zone != Zone::Board {
            return Err(KernelError::NotOnBoard(id));
        }
        if entity.controller == player {
            return Ok(true);
        }
        if self.entities().is_full(player, Zone::Board, self.config().max_board_size) {
            self.destroy(id)?;
            return Ok(false);
        }
        self.entities.set_controller(id, player, None)?;
        self.require_entity_mut(id)?.exhausted = true;
        Ok(true)
    }

    /// Register a reaction owned by `source`.
    pub fn register_trigger<E, F>(&mut self, source: EntityId, lifetime: Lifetime, reaction: F) -> RegistrationId
    where
        E: Event,
        F: Fn(&mut Game, &TriggerContext, &E) -> KernelResult<()> + Send + Sync + 'static,
    {
        self.triggers_mut().on::<E, F>(source, lifetime, reaction)
    }

    /// Register an aura owned by `source`.
    pub fn register_aura<Q, F>(&mut self, source: EntityId, lifetime: Lifetime, modifier: F) -> RegistrationId
    where
        Q: Query,
        F: Fn(&StatView<'_>, &TriggerContext, &Q, &mut Q::Value) + Send + Sync + 'static,
    {
        self.triggers_mut().modify::<Q, F>(source, lifetime, modifier)
    }

    /// Remove every non-persistent registration owned by `source`.
    pub fn unregister_triggers(&mut self, source: EntityId) -> usize {
        self.triggers_mut().unregister_all(source)
    }

    /// Move a triggered secret to the graveyard.
    pub fn reveal_secret(&mut self, id: EntityId) -> KernelResult<()> {
        if self.zone_of(id) != Some(Zone::Secret) {
            return Ok(());
        }
        self.triggers_mut().unregister_all(id);
        self.move_entity(id, Zone::Graveyard, None)?;
        debug!(entity = %id, "secret revealed");
        Ok(())
    }

    /// Equip a weapon already created for `player`, destroying the
    /// previous one.
    pub fn equip_weapon(&mut self, player: PlayerId, weapon: EntityId) -> KernelResult<()> {
        if let Some(old) = self.player(player).weapon {
            self.triggers_mut().unregister_all(old);
            self.move_entity(old, Zone::Graveyard, None)?;
        }
        self.move_entity(weapon, Zone::Hero, None)?;
        self.player_mut(player).weapon = Some(weapon);
        self.run_setup(weapon)
    }

    /// Hooks of an entity's card.
    pub fn card_effects(&self, id: EntityId) -> KernelResult<CardEffects> {
        let card = &self.require_entity(id)?.card_id;
        Ok(self.effects().effects_for(card))
    }

    /// Run the `setup` hook of an entity's card.
    pub(crate) fn run_setup(&mut self, id: EntityId) -> KernelResult<()> {
        match self.card_effects(id)?.setup {
            Some(setup) => setup(self, id),
            None => Ok(()),
        }
    }
}
