//! Death processing.
//!
//! Runs after every phase. Dead minions and broken weapons leave play in
//! ascending entity id, which is the order they entered play. Deaths caused
//! while resolving (deathrattles, death reactions) are picked up by the next
//! pass until the board settles.

use tracing::{debug, error};

use crate::cards::{CardId, Keyword};
use crate::core::{EntityId, KernelError, KernelResult, PlayerId};
use crate::game::Game;
use crate::triggers::MinionDied;
use crate::zones::Zone;

impl Game {
    /// Resolve every pending death.
    ///
    /// A call made while deaths are already being resolved (from a death
    /// reaction, a deathrattle or a sequence they start) runs its own
    /// passes. Nesting deeper than `max_death_passes` is a runaway loop.
    pub fn process_deaths(&mut self) -> KernelResult<()> {
        let max_depth = self.config().max_death_passes;
        if self.death_depth >= max_depth {
            let message = format!("death processing nested {max_depth} deep");
            error!("{message}");
            return Err(KernelError::InvariantViolation(message));
        }
        self.death_depth += 1;
        let result = self.death_passes();
        self.death_depth -= 1;
        result
    }

    fn death_passes(&mut self) -> KernelResult<()> {
        let max_passes = self.config().max_death_passes;
        for pass in 0..max_passes {
            self.mark_defeated_heroes();

            let dying = self.collect_dying();
            if dying.is_empty() {
                return Ok(());
            }
            debug!(pass, count = dying.len(), "resolving deaths");
            for id in dying {
                // An earlier death this pass may have moved it already.
                if self.entity(id).is_some_and(|e| e.zone.is_in_play()) {
                    self.resolve_death(id)?;
                }
            }
        }

        let message = format!("deaths did not settle after {max_passes} passes");
        error!("{message}");
        Err(KernelError::InvariantViolation(message))
    }

    fn mark_defeated_heroes(&mut self) {
        for player in PlayerId::both() {
            let hero = self.player(player).hero;
            if !self.player(player).defeated && self.health(hero) <= 0 {
                debug!(%player, "hero defeated");
                self.player_mut(player).defeated = true;
            }
        }
    }

    /// Minions that died and weapons that broke, in ascending id.
    fn collect_dying(&self) -> Vec<EntityId> {
        let view = self.view();
        let mut dying: Vec<EntityId> = PlayerId::both()
            .flat_map(|p| {
                let weapon = self.player(p).weapon;
                self.zone_entities(p, Zone::Board)
                    .filter(|e| e.is_minion())
                    .chain(weapon.and_then(|w| self.entity(w)))
            })
            .filter(|e| {
                if e.pending_destroy {
                    return true;
                }
                let protected = e.has(Keyword::DivineShield) || e.has(Keyword::Immune);
                !protected && view.health(e.entity_id) <= 0
            })
            .map(|e| e.entity_id)
            .collect();
        dying.sort_unstable();
        dying
    }

    fn resolve_death(&mut self, id: EntityId) -> KernelResult<()> {
        let (card_id, controller, is_minion, silenced, reborn, leaves_corpse) = {
            let e = self.require_entity(id)?;
            (
                e.card_id.clone(),
                e.controller,
                e.is_minion(),
                e.has(Keyword::Silenced),
                e.has(Keyword::Reborn),
                e.leaves_corpse,
            )
        };
        let position = self.entities().position(id).unwrap_or(0);
        debug!(entity = %id, card = %card_id, %controller, "dies");

        self.triggers_mut().unregister_all(id);
        self.move_entity(id, Zone::Graveyard, None)?;

        if !is_minion {
            if self.player(controller).weapon == Some(id) {
                self.player_mut(controller).weapon = None;
            }
            return self.run_deathrattle(&card_id, id, silenced);
        }

        if leaves_corpse {
            self.player_mut(controller).corpses.add(1);
        }

        self.fire(MinionDied {
            minion: id,
            card_id: card_id.clone(),
            controller,
            position,
        })?;
        self.run_deathrattle(&card_id, id, silenced)?;

        if reborn && !silenced {
            self.reborn(controller, &card_id, position)?;
        }
        Ok(())
    }

    fn run_deathrattle(&mut self, card_id: &CardId, id: EntityId, silenced: bool) -> KernelResult<()> {
        if silenced {
            return Ok(());
        }
        let deathrattle = self.effects().effects_for(card_id).deathrattle;
        match deathrattle {
            Some(hook) => hook(self, id),
            None => Ok(()),
        }
    }

    fn reborn(&mut self, player: PlayerId, card_id: &CardId, position: usize) -> KernelResult<()> {
        let copy = self.summon_prepared(player, card_id.clone(), Some(position), |entity| {
            entity.keywords.reborn = false;
            entity.base_health = 1;
        })?;
        if let Some(copy) = copy {
            debug!(entity = %copy, card = %card_id, "reborn");
        }
        Ok(())
    }
}
