//! Entity store: every entity and where it lives.
//!
//! The `EntityStore` owns all `CardInstance`s and the per-player ordered
//! zone collections. Both sides are kept in agreement: an entity's `zone` and
//! `controller` fields always name the collection that lists it. Zone
//! changes go through [`EntityStore::move_to`] and controller changes through
//! [`EntityStore::set_controller`], which update both sides together.
//!
//! Storage is `im` persistent collections, so cloning a store (and a whole
//! game) is O(1) and the clones share structure until they diverge.

use im::{HashMap as ImHashMap, Vector};
use tracing::error;

use super::zone::Zone;
use crate::cards::CardInstance;
use crate::core::{EntityId, GameRng, KernelError, KernelResult, PlayerId};

/// Owner of all entities and their zone placement.
///
/// ## Usage
///
/// ```
/// use ccg_kernel::cards::{CardDefinition, CardInstance};
/// use ccg_kernel::core::PlayerId;
/// use ccg_kernel::zones::{EntityStore, Zone};
///
/// let def = CardDefinition::minion("CS2_182", "Chillwind Yeti", 4, 4, 5);
/// let mut store = EntityStore::new();
///
/// let id = store.alloc_id();
/// store.insert(CardInstance::from_definition(id, &def, PlayerId::FIRST, Zone::Hand), None).unwrap();
/// store.move_to(id, Zone::Board, Some(0)).unwrap();
///
/// assert_eq!(store.ids(PlayerId::FIRST, Zone::Board), vec![id]);
/// assert!(store.ids(PlayerId::FIRST, Zone::Hand).is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct EntityStore {
    entities: ImHashMap<EntityId, CardInstance>,
    zones: ImHashMap<(PlayerId, Zone), Vector<EntityId>>,
    next_id: u32,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Create an empty store. The first allocated id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: ImHashMap::new(),
            zones: ImHashMap::new(),
            next_id: 1,
        }
    }

    /// Reserve the next entity id.
    pub fn alloc_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a new entity to the collection named by its `zone` and
    /// `controller`, at `position` (appended when `None`).
    pub fn insert(&mut self, instance: CardInstance, position: Option<usize>) -> KernelResult<()> {
        let id = instance.entity_id;
        if self.entities.contains_key(&id) {
            return Err(violation(format!("{id} inserted twice")));
        }
        if id.raw() >= self.next_id {
            self.next_id = id.raw() + 1;
        }
        let key = (instance.controller, instance.zone);
        self.entities.insert(id, instance);
        self.place(key, id, position);
        Ok(())
    }

    /// Get an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&CardInstance> {
        self.entities.get(&id)
    }

    /// Get an entity, failing with `UnknownEntity`.
    pub fn require(&self, id: EntityId) -> KernelResult<&CardInstance> {
        self.entities.get(&id).ok_or(KernelError::UnknownEntity(id))
    }

    /// Mutable access to an entity's state.
    ///
    /// Callers must not change `zone` or `controller` here; use `move_to`
    /// and `set_controller`.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut CardInstance> {
        self.entities.get_mut(&id)
    }

    /// Mutable access, failing with `UnknownEntity`.
    pub fn require_mut(&mut self, id: EntityId) -> KernelResult<&mut CardInstance> {
        self.entities.get_mut(&id).ok_or(KernelError::UnknownEntity(id))
    }

    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Zone an entity is in.
    #[must_use]
    pub fn zone_of(&self, id: EntityId) -> Option<Zone> {
        self.entities.get(&id).map(|e| e.zone)
    }

    /// Entity ids of one player's zone, in order.
    #[must_use]
    pub fn ids(&self, player: PlayerId, zone: Zone) -> Vec<EntityId> {
        self.zones
            .get(&(player, zone))
            .map(|v| v.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of entities in one player's zone.
    #[must_use]
    pub fn count(&self, player: PlayerId, zone: Zone) -> usize {
        self.zones.get(&(player, zone)).map_or(0, Vector::len)
    }

    /// Whether a zone has reached `capacity`.
    #[must_use]
    pub fn is_full(&self, player: PlayerId, zone: Zone, capacity: usize) -> bool {
        self.count(player, zone) >= capacity
    }

    /// Index of an entity within its zone collection.
    #[must_use]
    pub fn position(&self, id: EntityId) -> Option<usize> {
        let entity = self.entities.get(&id)?;
        self.zones
            .get(&(entity.controller, entity.zone))?
            .index_of(&id)
    }

    /// Last entry of a zone (the top card for a deck).
    #[must_use]
    pub fn top(&self, player: PlayerId, zone: Zone) -> Option<EntityId> {
        self.zones.get(&(player, zone))?.last().copied()
    }

    /// Move an entity to `zone` under its current controller, at `position`
    /// (appended when `None`). Returns the zone it left.
    ///
    /// Leaving the board records `last_position`. Moving within the same
    /// zone repositions the entity.
    pub fn move_to(
        &mut self,
        id: EntityId,
        zone: Zone,
        position: Option<usize>,
    ) -> KernelResult<Zone> {
        let (controller, old_zone) = {
            let entity = self.require(id)?;
            (entity.controller, entity.zone)
        };

        let old_index = self.unplace((controller, old_zone), id)?;
        self.place((controller, zone), id, position);

        let entity = self.require_mut(id)?;
        entity.zone = zone;
        if old_zone == Zone::Board && zone != Zone::Board {
            entity.last_position = Some(old_index);
        }
        Ok(old_zone)
    }

    /// Hand an entity to another player, keeping its zone. It is appended to
    /// the new controller's collection unless `position` is given.
    pub fn set_controller(
        &mut self,
        id: EntityId,
        controller: PlayerId,
        position: Option<usize>,
    ) -> KernelResult<()> {
        let (old_controller, zone) = {
            let entity = self.require(id)?;
            (entity.controller, entity.zone)
        };
        if old_controller == controller {
            return Ok(());
        }

        self.unplace((old_controller, zone), id)?;
        self.place((controller, zone), id, position);
        self.require_mut(id)?.controller = controller;
        Ok(())
    }

    /// Swap in a new instance for an existing id (transform). The new
    /// instance takes over the old one's zone, controller and slot.
    pub fn replace(&mut self, mut instance: CardInstance) -> KernelResult<CardInstance> {
        let id = instance.entity_id;
        let old = self.require(id)?;
        instance.zone = old.zone;
        instance.controller = old.controller;
        instance.last_position = old.last_position;
        self.entities
            .insert(id, instance)
            .ok_or(KernelError::UnknownEntity(id))
    }

    /// Shuffle one player's zone.
    pub fn shuffle(&mut self, player: PlayerId, zone: Zone, rng: &mut GameRng) {
        if let Some(order) = self.zones.get_mut(&(player, zone)) {
            let mut ids: Vec<EntityId> = order.iter().copied().collect();
            rng.shuffle(&mut ids);
            *order = ids.into_iter().collect();
        }
    }

    /// Iterate over all entities.
    pub fn iter(&self) -> impl Iterator<Item = &CardInstance> {
        self.entities.values()
    }

    /// Get total number of entities tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Check that entity fields and zone collections agree: every entity is
    /// listed exactly once, in the collection named by its own fields.
    pub fn verify_integrity(&self) -> KernelResult<()> {
        let mut listed = 0;
        for ((player, zone), ids) in &self.zones {
            for id in ids {
                let entity = self
                    .entities
                    .get(id)
                    .ok_or_else(|| violation(format!("{id} listed in {player}/{zone} but not stored")))?;
                if entity.zone != *zone || entity.controller != *player {
                    return Err(violation(format!(
                        "{id} listed in {player}/{zone} but records {}/{}",
                        entity.controller, entity.zone
                    )));
                }
                listed += 1;
            }
        }
        if listed != self.entities.len() {
            return Err(violation(format!(
                "{} entities stored but {listed} listed",
                self.entities.len()
            )));
        }
        Ok(())
    }

    fn place(&mut self, key: (PlayerId, Zone), id: EntityId, position: Option<usize>) {
        let order = self.zones.entry(key).or_default();
        match position {
            Some(i) => order.insert(i.min(order.len()), id),
            None => order.push_back(id),
        }
    }

    fn unplace(&mut self, key: (PlayerId, Zone), id: EntityId) -> KernelResult<usize> {
        let order = self
            .zones
            .get_mut(&key)
            .ok_or_else(|| violation(format!("{id} has no {}/{} collection", key.0, key.1)))?;
        let index = order
            .index_of(&id)
            .ok_or_else(|| violation(format!("{id} missing from {}/{}", key.0, key.1)))?;
        order.remove(index);
        Ok(index)
    }
}

fn violation(message: String) -> KernelError {
    error!(%message, "entity store invariant violated");
    KernelError::InvariantViolation(message)
}
