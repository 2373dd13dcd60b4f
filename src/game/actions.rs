//! Action legality and application.
//!
//! Every action is checked in full before its sequence starts, so an
//! illegal action returns an error with the game unchanged.

use tracing::debug;

use super::Game;
use crate::cards::CardType;
use crate::core::{Action, ActionRecord, EntityId, IllegalAction, KernelResult, PlayerId};
use crate::effects::{attack_targets, get_all_targetable, CardEffects, TargetingKind};
use crate::zones::Zone;

impl Game {
    /// Check `action` for the active player without changing anything.
    pub fn check_legal(&self, action: &Action) -> Result<(), IllegalAction> {
        if self.is_over() {
            return Err(IllegalAction::GameOver);
        }
        if let Some(pending) = self.pending() {
            return match action {
                Action::ChooseDiscover(i) if *i < pending.options.len() => Ok(()),
                Action::ChooseDiscover(i) => Err(IllegalAction::InvalidChoice(*i)),
                _ => Err(IllegalAction::PendingChoice),
            };
        }

        let player = self.active_player();
        match *action {
            Action::PlayCard { card, target, .. } => self.check_play(player, card, target),
            Action::Attack { attacker, defender } => self.check_attack(player, attacker, defender),
            Action::HeroPower { target } => self.check_hero_power(player, target),
            Action::ChooseDiscover(_) => Err(IllegalAction::NoPendingChoice),
            Action::EndTurn => Ok(()),
        }
    }

    fn check_play(&self, player: PlayerId, card: EntityId, target: Option<EntityId>) -> Result<(), IllegalAction> {
        let entity = self
            .entity(card)
            .filter(|e| e.zone == Zone::Hand && e.controller == player)
            .ok_or(IllegalAction::NotInHand(card))?;

        let kind = match entity.card_type {
            CardType::Minion | CardType::Weapon => TargetingKind::Battlecry,
            CardType::Spell => TargetingKind::Spell,
            CardType::Hero | CardType::HeroPower => return Err(IllegalAction::Unplayable(card)),
        };
        self.check_mana(player, card)?;
        if entity.card_type == CardType::Minion
            && self.entities().is_full(player, Zone::Board, self.config().max_board_size)
        {
            return Err(IllegalAction::BoardFull);
        }

        let effects = self.effects().effects_for(&entity.card_id);
        // A minion without targets can still be played; a spell cannot.
        let must_target = entity.card_type == CardType::Spell;
        self.check_target(player, &effects, kind, target, must_target)
    }

    fn check_attack(&self, player: PlayerId, attacker: EntityId, defender: EntityId) -> Result<(), IllegalAction> {
        let owned = self.entity(attacker).is_some_and(|e| e.controller == player);
        if !owned || !self.can_attack(attacker) {
            return Err(IllegalAction::CannotAttack(attacker));
        }
        if !attack_targets(self, attacker).contains(&defender) {
            return Err(IllegalAction::InvalidTarget(defender));
        }
        if self.minions_only(attacker) && !self.entity(defender).is_some_and(|e| e.is_minion()) {
            return Err(IllegalAction::InvalidTarget(defender));
        }
        Ok(())
    }

    fn check_hero_power(&self, player: PlayerId, target: Option<EntityId>) -> Result<(), IllegalAction> {
        let state = self.player(player);
        if state.hero_power_used {
            return Err(IllegalAction::HeroPowerUsed);
        }
        self.check_mana(player, state.hero_power)?;
        let effects = self.card_effects(state.hero_power).unwrap_or_default();
        self.check_target(player, &effects, TargetingKind::HeroPower, target, true)
    }

    fn check_mana(&self, player: PlayerId, card: EntityId) -> Result<(), IllegalAction> {
        let need = u8::try_from(self.cost(card)).unwrap_or(u8::MAX);
        let have = self.player(player).mana.available();
        if need > have {
            return Err(IllegalAction::NotEnoughMana { need, have });
        }
        Ok(())
    }

    /// A given target must be in the card's scope and selectable. A
    /// required target must be given when any candidate exists; with
    /// `must_target` the card is unplayable without one.
    fn check_target(
        &self,
        player: PlayerId,
        effects: &CardEffects,
        kind: TargetingKind,
        target: Option<EntityId>,
        must_target: bool,
    ) -> Result<(), IllegalAction> {
        let Some(scope) = effects.target else {
            return match target {
                Some(t) => Err(IllegalAction::InvalidTarget(t)),
                None => Ok(()),
            };
        };
        let candidates = get_all_targetable(self, player, kind, scope);
        match target {
            Some(t) if candidates.contains(&t) => Ok(()),
            Some(t) => Err(IllegalAction::InvalidTarget(t)),
            None if !effects.target_required => Ok(()),
            None if candidates.is_empty() && !must_target => Ok(()),
            None => Err(IllegalAction::TargetRequired),
        }
    }

    /// Apply an action for the active player.
    ///
    /// Illegal actions are rejected with the game unchanged. If a step
    /// fails midway the error is returned and the game keeps the changes
    /// made so far; use [`Game::try_apply`] to leave this game untouched.
    pub fn apply(&mut self, action: Action) -> KernelResult<()> {
        self.check_legal(&action)?;

        let player = self.active_player();
        self.record(ActionRecord::new(player, action, self.turn(), self.sequences().started()));
        debug!(%player, ?action, "apply");

        match action {
            Action::PlayCard { card, target, position } => match self.require_entity(card)?.card_type {
                CardType::Minion => self.play_minion(card, target, position)?,
                CardType::Spell => self.play_spell(card, target)?,
                CardType::Weapon => self.play_weapon(card, target)?,
                CardType::Hero | CardType::HeroPower => return Err(IllegalAction::Unplayable(card).into()),
            },
            Action::Attack { attacker, defender } => self.attack_with(attacker, defender)?,
            Action::HeroPower { target } => self.use_hero_power(target)?,
            Action::ChooseDiscover(index) => {
                self.resolve_discover(index)?;
                self.process_deaths()?;
            }
            Action::EndTurn => self.pass_turn()?,
        }

        if self.config().verify_invariants {
            self.verify_invariants()?;
        }
        Ok(())
    }

    /// Apply `action` to a copy, leaving `self` untouched whatever happens.
    pub fn try_apply(&self, action: Action) -> KernelResult<Game> {
        let mut next = self.clone();
        next.apply(action)?;
        Ok(next)
    }

    /// Every legal action for the active player (or the pending choice).
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.is_over() {
            return Vec::new();
        }
        if let Some(pending) = self.pending() {
            return (0..pending.options.len()).map(Action::ChooseDiscover).collect();
        }

        let player = self.active_player();
        let mut actions = Vec::new();

        for card in self.hand(player) {
            for target in self.target_options(player, card) {
                let action = Action::PlayCard { card, target, position: None };
                if self.check_legal(&action).is_ok() {
                    actions.push(action);
                }
            }
        }

        let hero = self.player(player).hero;
        for attacker in self.board(player).into_iter().chain([hero]) {
            if !self.can_attack(attacker) {
                continue;
            }
            for defender in attack_targets(self, attacker) {
                let action = Action::Attack { attacker, defender };
                if self.check_legal(&action).is_ok() {
                    actions.push(action);
                }
            }
        }

        let power = self.player(player).hero_power;
        for target in self.target_options(player, power) {
            let action = Action::HeroPower { target };
            if self.check_legal(&action).is_ok() {
                actions.push(action);
            }
        }

        actions.push(Action::EndTurn);
        actions
    }

    /// `None` plus every candidate in the card's target scope.
    fn target_options(&self, player: PlayerId, card: EntityId) -> Vec<Option<EntityId>> {
        let mut options = vec![None];
        let Some(entity) = self.entity(card) else {
            return options;
        };
        let Some(scope) = self.effects().effects_for(&entity.card_id).target else {
            return options;
        };
        let kind = match entity.card_type {
            CardType::Spell => TargetingKind::Spell,
            CardType::HeroPower => TargetingKind::HeroPower,
            _ => TargetingKind::Battlecry,
        };
        options.extend(get_all_targetable(self, player, kind, scope).into_iter().map(Some));
        options
    }
}
