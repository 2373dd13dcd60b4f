//! The game: entities, players, triggers and the running sequence stack.
//!
//! `Game` is the `&mut` handle every card hook receives. All of its state
//! lives in `im` persistent collections or small `Copy` values, so
//! [`Game::fork`] is O(1) and a fork can be handed to another thread.
//!
//! ## Modules
//!
//! - `builder`: game construction from decks
//! - `ops`: kernel operations used by card hooks
//! - `discover`: pending "choose one of three" prompts
//! - `actions`: legality, `apply` and `legal_actions`

mod actions;
mod builder;
mod discover;
mod ops;

pub use builder::GameBuilder;
pub use discover::{DiscoverFn, PendingDiscover};
pub(crate) use ops::DamageHit;

use std::sync::Arc;

use im::Vector;
use tracing::{debug, error};

use crate::cards::{create_modular, CardDatabase, CardId, CardInstance, Keywords};
use crate::core::{
    ActionRecord, EntityId, GameRng, KernelConfig, KernelContext, KernelError, KernelResult,
    Player, PlayerId, PlayerMap,
};
use crate::effects::EffectRegistry;
use crate::rules::GameResult;
use crate::sequence::SequenceManager;
use crate::triggers::{StatView, TriggerBus};
use crate::zones::{EntityStore, Zone};

/// A game in progress.
#[derive(Clone, Debug)]
pub struct Game {
    ctx: Arc<KernelContext>,
    entities: EntityStore,
    players: PlayerMap<Player>,
    triggers: TriggerBus,
    sequences: SequenceManager,
    rng: GameRng,
    active: PlayerId,
    turn: u32,
    pending: Option<PendingDiscover>,
    pub(crate) death_depth: usize,
    history: Vector<ActionRecord>,
}

impl Game {
    fn empty(ctx: Arc<KernelContext>, seed: u64, players: PlayerMap<Player>, entities: EntityStore) -> Self {
        Self {
            ctx,
            entities,
            players,
            triggers: TriggerBus::new(),
            sequences: SequenceManager::new(),
            rng: GameRng::new(seed),
            active: PlayerId::FIRST,
            turn: 0,
            pending: None,
            death_depth: 0,
            history: Vector::new(),
        }
    }

    // === Context ===

    #[must_use]
    pub fn context(&self) -> &Arc<KernelContext> {
        &self.ctx
    }

    #[must_use]
    pub fn config(&self) -> &KernelConfig {
        self.ctx.config()
    }

    #[must_use]
    pub fn cards(&self) -> &CardDatabase {
        self.ctx.cards()
    }

    #[must_use]
    pub fn effects(&self) -> &EffectRegistry {
        self.ctx.effects()
    }

    /// Mutable context for fixtures that add cards after construction.
    #[cfg(test)]
    pub(crate) fn context_mut(&mut self) -> &mut KernelContext {
        Arc::make_mut(&mut self.ctx)
    }

    // === Turn state ===

    /// Player whose turn it is.
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active
    }

    /// Turn number, starting at 1 for the first player's first turn.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Actions applied so far.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Result once a hero has died.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        let first = self.player(PlayerId::FIRST).defeated;
        let second = self.player(PlayerId::SECOND).defeated;
        match (first, second) {
            (false, false) => None,
            (true, true) => Some(GameResult::Draw),
            (true, false) => Some(GameResult::Winner(PlayerId::SECOND)),
            (false, true) => Some(GameResult::Winner(PlayerId::FIRST)),
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result().is_some()
    }

    // === Players ===

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id]
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    // === Subsystems ===

    #[must_use]
    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    #[must_use]
    pub fn triggers(&self) -> &TriggerBus {
        &self.triggers
    }

    pub fn triggers_mut(&mut self) -> &mut TriggerBus {
        &mut self.triggers
    }

    #[must_use]
    pub fn sequences(&self) -> &SequenceManager {
        &self.sequences
    }

    pub(crate) fn sequences_mut(&mut self) -> &mut SequenceManager {
        &mut self.sequences
    }

    /// Seeded random source. Card effects must draw randomness from here so
    /// games replay from their seed.
    pub fn random(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    // === Entities ===

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&CardInstance> {
        self.entities.get(id)
    }

    pub fn require_entity(&self, id: EntityId) -> KernelResult<&CardInstance> {
        self.entities.require(id)
    }

    /// Mutable access for hooks that edit keywords or counters. Zone and
    /// controller changes must go through [`Game::move_entity`] and
    /// [`Game::take_control`].
    pub fn require_entity_mut(&mut self, id: EntityId) -> KernelResult<&mut CardInstance> {
        self.entities.require_mut(id)
    }

    #[must_use]
    pub fn zone_of(&self, id: EntityId) -> Option<Zone> {
        self.entities.zone_of(id)
    }

    /// Entities in one of a player's zones, in order.
    pub fn zone_entities(&self, player: PlayerId, zone: Zone) -> impl Iterator<Item = &CardInstance> {
        self.entities
            .ids(player, zone)
            .into_iter()
            .filter_map(move |id| self.entities.get(id))
    }

    #[must_use]
    pub fn board(&self, player: PlayerId) -> Vec<EntityId> {
        self.entities.ids(player, Zone::Board)
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> Vec<EntityId> {
        self.entities.ids(player, Zone::Hand)
    }

    /// Deck order; the last entry is drawn next.
    #[must_use]
    pub fn deck(&self, player: PlayerId) -> Vec<EntityId> {
        self.entities.ids(player, Zone::Deck)
    }

    #[must_use]
    pub fn graveyard(&self, player: PlayerId) -> Vec<EntityId> {
        self.entities.ids(player, Zone::Graveyard)
    }

    #[must_use]
    pub fn secrets(&self, player: PlayerId) -> Vec<EntityId> {
        self.entities.ids(player, Zone::Secret)
    }

    /// Minions on both boards, active player's first.
    #[must_use]
    pub fn all_minions(&self) -> Vec<EntityId> {
        let mut ids = self.board(self.active);
        ids.extend(self.board(self.active.opponent()));
        ids
    }

    // === Stats ===

    /// Stat view that applies auras.
    #[must_use]
    pub fn view(&self) -> StatView<'_> {
        StatView::new(self)
    }

    #[must_use]
    pub fn attack(&self, id: EntityId) -> i32 {
        self.view().attack(id)
    }

    #[must_use]
    pub fn health(&self, id: EntityId) -> i32 {
        self.view().health(id)
    }

    #[must_use]
    pub fn max_health(&self, id: EntityId) -> i32 {
        self.view().max_health(id)
    }

    #[must_use]
    pub fn cost(&self, id: EntityId) -> i32 {
        self.view().cost(id)
    }

    // === Zone changes ===

    /// Create an entity for `card_id` in `zone`. Modular cards pick up the
    /// modules recorded in the player's sideboard.
    pub fn create_entity(
        &mut self,
        player: PlayerId,
        card_id: &CardId,
        zone: Zone,
        position: Option<usize>,
    ) -> KernelResult<EntityId> {
        let id = self.entities.alloc_id();
        let modules = self.players[player].modules_for(card_id).to_vec();
        let instance = create_modular(
            self.ctx.cards(),
            id,
            card_id,
            &modules,
            self.ctx.config().max_sideboard_modules,
            player,
            zone,
        )?;
        self.entities.insert(instance, position)?;
        Ok(id)
    }

    /// Insert a prepared instance, for entities not in the catalog.
    pub(crate) fn insert_entity(&mut self, instance: CardInstance, position: Option<usize>) -> KernelResult<()> {
        self.entities.insert(instance, position)
    }

    pub(crate) fn alloc_id(&mut self) -> EntityId {
        self.entities.alloc_id()
    }

    /// Move an entity to another zone of its controller.
    ///
    /// Registrations whose lifetime ends in the new zone are dropped. An
    /// entity leaving play or the hand for a hidden or dead zone loses its
    /// damage and enchantments; one returning to hand or deck also gets its
    /// printed keywords back.
    pub fn move_entity(&mut self, id: EntityId, zone: Zone, position: Option<usize>) -> KernelResult<Zone> {
        let old = self.entities.move_to(id, zone, position)?;
        if old == zone {
            return Ok(old);
        }
        self.triggers.on_zone_change(id, zone);

        if matches!(zone, Zone::Hand | Zone::Deck | Zone::Graveyard | Zone::Removed) {
            let printed = if matches!(zone, Zone::Hand | Zone::Deck) && old.is_in_play() {
                let card_id = self.entities.require(id)?.card_id.clone();
                self.ctx.cards().get(&card_id).map(|def| {
                    let mut keywords = Keywords::from_list(&def.keywords);
                    keywords.overload = def.overload;
                    keywords.spell_damage = def.spell_damage;
                    keywords
                })
            } else {
                None
            };
            let entity = self.entities.require_mut(id)?;
            entity.reset_for_zone_change();
            if let Some(keywords) = printed {
                entity.keywords = keywords;
            }
        }
        Ok(old)
    }

    // === Forking ===

    /// O(1) copy for speculative execution. The fork gets its own RNG
    /// stream derived from this game's seed.
    pub fn fork(&mut self) -> Game {
        let mut fork = self.clone();
        fork.rng = self.rng.fork();
        fork
    }

    // === Integrity ===

    /// Check that zones, controllers, limits and hero slots agree.
    pub fn verify_invariants(&self) -> KernelResult<()> {
        self.entities.verify_integrity()?;

        let config = self.config();
        for player in PlayerId::both() {
            let board = self.entities.count(player, Zone::Board);
            if board > config.max_board_size {
                return Err(violation(format!("{player} has {board} minions on board")));
            }
            let hand = self.entities.count(player, Zone::Hand);
            if hand > config.max_hand_size {
                return Err(violation(format!("{player} has {hand} cards in hand")));
            }

            let state = &self.players[player];
            for (slot, id) in [("hero", Some(state.hero)), ("weapon", state.weapon)] {
                let Some(id) = id else { continue };
                match self.entities.get(id) {
                    Some(e) if e.zone == Zone::Hero && e.controller == player => {}
                    _ => return Err(violation(format!("{player} {slot} {id} is not in its hero zone"))),
                }
            }
        }
        debug!(entities = self.entities.len(), "invariants hold");
        Ok(())
    }

    pub(crate) fn record(&mut self, record: ActionRecord) {
        self.history.push_back(record);
    }

    pub(crate) fn set_active(&mut self, player: PlayerId) {
        self.active = player;
    }

    pub(crate) fn advance_turn(&mut self) {
        self.turn += 1;
    }

    pub(crate) fn pending(&self) -> Option<&PendingDiscover> {
        self.pending.as_ref()
    }

    pub(crate) fn set_pending(&mut self, pending: Option<PendingDiscover>) {
        self.pending = pending;
    }
}

fn violation(message: String) -> KernelError {
    error!("{message}");
    KernelError::InvariantViolation(message)
}
