//! Trigger bus.
//!
//! The bus stores typed callbacks keyed by event kind, in registration
//! order. Each registration is owned by a source entity and carries a
//! [`Lifetime`] deciding when zone changes remove it.
//!
//! Storage is `im` persistent collections so the bus forks with the game in
//! O(1). Callbacks are `Arc`s and are shared between forks.

use im::{HashMap as ImHashMap, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use super::aura::StatView;
use super::event::{Event, EventKind, Handler, ModifierFn, Query, ReactionFn};
use crate::core::{EntityId, KernelResult};
use crate::game::Game;
use crate::zones::Zone;

/// Unique identifier for a registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegistrationId(pub u64);

impl std::fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Registration({})", self.0)
    }
}

/// When a registration is removed as its source moves between zones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifetime {
    /// Removed when the source leaves play (board, secret or hero zone).
    #[default]
    InPlay,
    /// Kept in hand and in play; removed when the source goes anywhere else.
    InHand,
    /// Only removed by `unregister`.
    Persistent,
}

impl Lifetime {
    /// Whether a registration survives its source arriving in `zone`.
    #[must_use]
    pub fn survives(self, zone: Zone) -> bool {
        match self {
            Lifetime::InPlay => zone.is_in_play(),
            Lifetime::InHand => zone == Zone::Hand || zone.is_in_play(),
            Lifetime::Persistent => true,
        }
    }
}

/// Passed to every callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerContext {
    /// The running registration.
    pub registration: RegistrationId,
    /// Entity that owns it.
    pub source: EntityId,
}

/// One registered callback.
#[derive(Clone, Debug)]
pub struct Registration {
    pub id: RegistrationId,
    pub source: EntityId,
    pub lifetime: Lifetime,
    handler: Handler,
}

impl Registration {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.handler.kind()
    }

    fn context(&self) -> TriggerContext {
        TriggerContext {
            registration: self.id,
            source: self.source,
        }
    }
}

/// Registry of reactions and modifiers.
#[derive(Clone, Debug, Default)]
pub struct TriggerBus {
    by_kind: ImHashMap<EventKind, Vector<Registration>>,
    live: ImHashMap<RegistrationId, EventKind>,
    next_id: u64,
    /// (kind, source) of reactions currently running.
    firing: SmallVec<[(EventKind, EntityId); 8]>,
}

impl TriggerBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reaction owned by `source`.
    pub fn on<E, F>(&mut self, source: EntityId, lifetime: Lifetime, reaction: F) -> RegistrationId
    where
        E: Event,
        F: Fn(&mut Game, &TriggerContext, &E) -> KernelResult<()> + Send + Sync + 'static,
    {
        let reaction: ReactionFn<E> = std::sync::Arc::new(reaction);
        self.insert(source, lifetime, E::into_handler(reaction))
    }

    /// Register a modifier owned by `source`.
    pub fn modify<Q, F>(&mut self, source: EntityId, lifetime: Lifetime, modifier: F) -> RegistrationId
    where
        Q: Query,
        F: Fn(&StatView<'_>, &TriggerContext, &Q, &mut Q::Value) + Send + Sync + 'static,
    {
        let modifier: ModifierFn<Q> = std::sync::Arc::new(modifier);
        self.insert(source, lifetime, Q::into_handler(modifier))
    }

    /// Register an already-typed handler.
    pub fn insert(&mut self, source: EntityId, lifetime: Lifetime, handler: Handler) -> RegistrationId {
        self.next_id += 1;
        let id = RegistrationId(self.next_id);
        let kind = handler.kind();
        self.by_kind.entry(kind).or_default().push_back(Registration {
            id,
            source,
            lifetime,
            handler,
        });
        self.live.insert(id, kind);
        trace!(%source, ?kind, %id, "trigger registered");
        id
    }

    /// Remove one registration. Returns whether it existed.
    pub fn unregister(&mut self, id: RegistrationId) -> bool {
        let Some(kind) = self.live.remove(&id) else {
            return false;
        };
        if let Some(list) = self.by_kind.get_mut(&kind) {
            list.retain(|r| r.id != id);
        }
        true
    }

    /// Remove every non-persistent registration owned by `source`.
    /// Returns how many were removed.
    pub fn unregister_all(&mut self, source: EntityId) -> usize {
        self.remove_where(|r| r.source == source && r.lifetime != Lifetime::Persistent)
    }

    /// Drop `source`'s registrations whose lifetime ends when it arrives in
    /// `zone`. Returns how many were removed.
    pub fn on_zone_change(&mut self, source: EntityId, zone: Zone) -> usize {
        self.remove_where(|r| r.source == source && !r.lifetime.survives(zone))
    }

    fn remove_where(&mut self, doomed: impl Fn(&Registration) -> bool) -> usize {
        let mut removed = 0;
        let kinds: Vec<EventKind> = self.by_kind.keys().copied().collect();
        for kind in kinds {
            let Some(list) = self.by_kind.get_mut(&kind) else {
                continue;
            };
            if !list.iter().any(&doomed) {
                continue;
            }
            let (gone, kept): (Vec<Registration>, Vec<Registration>) =
                list.iter().cloned().partition(|r| doomed(r));
            for r in &gone {
                self.live.remove(&r.id);
            }
            removed += gone.len();
            *list = kept.into_iter().collect();
        }
        removed
    }

    /// Whether a registration is still present.
    #[must_use]
    pub fn is_live(&self, id: RegistrationId) -> bool {
        self.live.contains_key(&id)
    }

    /// Reactions registered for `E`, in registration order. The list is a
    /// copy so callbacks may register and unregister while it is walked.
    #[must_use]
    pub fn reactions<E: Event>(&self) -> Vec<(TriggerContext, ReactionFn<E>)> {
        self.by_kind
            .get(&E::KIND)
            .map(|list| {
                list.iter()
                    .filter_map(|r| E::reaction(&r.handler).map(|f| (r.context(), f.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Modifiers registered for `Q`, in registration order.
    pub fn modifiers<Q: Query>(&self) -> impl Iterator<Item = (TriggerContext, &ModifierFn<Q>)> {
        self.by_kind
            .get(&Q::KIND)
            .into_iter()
            .flat_map(|list| list.iter())
            .filter_map(|r| Q::modifier(&r.handler).map(|f| (r.context(), f)))
    }

    /// Registrations owned by `source`.
    pub fn owned_by(&self, source: EntityId) -> impl Iterator<Item = &Registration> {
        self.by_kind
            .values()
            .flat_map(|list| list.iter())
            .filter(move |r| r.source == source)
    }

    /// Total registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Whether a reaction of `kind` owned by `source` is running.
    #[must_use]
    pub fn is_firing(&self, kind: EventKind, source: EntityId) -> bool {
        self.firing.contains(&(kind, source))
    }

    pub(crate) fn enter(&mut self, kind: EventKind, source: EntityId) {
        self.firing.push((kind, source));
    }

    pub(crate) fn exit(&mut self) {
        self.firing.pop();
    }
}
