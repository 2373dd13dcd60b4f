//! Event kinds and their payloads.
//!
//! Every event kind is a payload struct. The closed set of kinds, the
//! `EventKind` tag and the `Handler` storage enum are all generated by
//! `define_events!`, so the payload type decides both which kind a callback
//! is registered for and what arguments it receives.
//!
//! There are two families:
//!
//! - **Reactions** ([`Event`]) run after something happened and may mutate
//!   the game: `Fn(&mut Game, &TriggerContext, &Payload) -> KernelResult<()>`.
//! - **Modifiers** ([`Query`]) adjust a computed value every time it is
//!   read (auras): `Fn(&StatView, &TriggerContext, &Payload, &mut Value)`.
//!   They only see the game read-only.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::aura::StatView;
use super::bus::TriggerContext;
use crate::cards::CardId;
use crate::core::{EntityId, KernelResult, PlayerId};
use crate::game::Game;

/// Callback stored for a reaction kind.
pub type ReactionFn<E> =
    Arc<dyn Fn(&mut Game, &TriggerContext, &E) -> KernelResult<()> + Send + Sync>;

/// Callback stored for a modifier kind.
pub type ModifierFn<Q> =
    Arc<dyn Fn(&StatView<'_>, &TriggerContext, &Q, &mut <Q as Query>::Value) + Send + Sync>;

/// A reaction payload.
pub trait Event: Clone + fmt::Debug + Send + Sync + 'static {
    const KIND: EventKind;

    fn into_handler(reaction: ReactionFn<Self>) -> Handler;

    fn reaction(handler: &Handler) -> Option<&ReactionFn<Self>>;
}

/// A modifier query payload.
pub trait Query: fmt::Debug + Send + Sync + 'static {
    /// The value modifiers adjust.
    type Value: Copy + fmt::Debug;

    const KIND: EventKind;

    /// Entity the value belongs to; nested queries for the same
    /// (kind, subject) see the unmodified base.
    fn subject(&self) -> EntityId;

    fn into_handler(modifier: ModifierFn<Self>) -> Handler;

    fn modifier(handler: &Handler) -> Option<&ModifierFn<Self>>;
}

macro_rules! define_events {
    (
        reactions {
            $(
                $(#[$rmeta:meta])*
                $rname:ident { $( $(#[$rfmeta:meta])* $rfield:ident : $rty:ty ),* $(,)? }
            )*
        }
        modifiers {
            $(
                $(#[$mmeta:meta])*
                $mname:ident ($subject:ident) -> $mval:ty { $( $(#[$mfmeta:meta])* $mfield:ident : $mty:ty ),* $(,)? }
            )*
        }
    ) => {
        /// Tag of every event kind.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum EventKind {
            $( $rname, )*
            $( $mname, )*
        }

        impl EventKind {
            /// Every kind, reactions first.
            pub const ALL: &'static [EventKind] = &[
                $( EventKind::$rname, )*
                $( EventKind::$mname, )*
            ];

            /// Whether callbacks of this kind are modifiers.
            #[must_use]
            pub fn is_modifier(self) -> bool {
                matches!(self, $( EventKind::$mname )|*)
            }
        }

        /// Type-erased callback, one variant per kind.
        #[derive(Clone)]
        pub enum Handler {
            $( $rname(ReactionFn<$rname>), )*
            $( $mname(ModifierFn<$mname>), )*
        }

        impl Handler {
            #[must_use]
            pub fn kind(&self) -> EventKind {
                match self {
                    $( Handler::$rname(_) => EventKind::$rname, )*
                    $( Handler::$mname(_) => EventKind::$mname, )*
                }
            }
        }

        $(
            $(#[$rmeta])*
            #[derive(Clone, Debug, PartialEq)]
            pub struct $rname {
                $( $(#[$rfmeta])* pub $rfield: $rty, )*
            }

            impl Event for $rname {
                const KIND: EventKind = EventKind::$rname;

                fn into_handler(reaction: ReactionFn<Self>) -> Handler {
                    Handler::$rname(reaction)
                }

                fn reaction(handler: &Handler) -> Option<&ReactionFn<Self>> {
                    match handler {
                        Handler::$rname(f) => Some(f),
                        _ => None,
                    }
                }
            }
        )*

        $(
            $(#[$mmeta])*
            #[derive(Clone, Debug, PartialEq)]
            pub struct $mname {
                $( $(#[$mfmeta])* pub $mfield: $mty, )*
            }

            impl Query for $mname {
                type Value = $mval;

                const KIND: EventKind = EventKind::$mname;

                fn subject(&self) -> EntityId {
                    self.$subject
                }

                fn into_handler(modifier: ModifierFn<Self>) -> Handler {
                    Handler::$mname(modifier)
                }

                fn modifier(handler: &Handler) -> Option<&ModifierFn<Self>> {
                    match handler {
                        Handler::$mname(f) => Some(f),
                        _ => None,
                    }
                }
            }
        )*
    };
}

define_events! {
    reactions {
        /// A minion was played from hand and placed on the board.
        MinionPlayed { minion: EntityId, player: PlayerId, target: Option<EntityId> }
        /// Any card finished being played.
        AfterPlay { card: EntityId, player: PlayerId }
        /// A minion entered the board by any means.
        MinionSummoned { minion: EntityId, player: PlayerId }
        /// A spell was cast from hand.
        SpellPlayed { spell: EntityId, player: PlayerId, target: Option<EntityId> }
        /// A minion died and went to the graveyard.
        MinionDied {
            minion: EntityId,
            card_id: CardId,
            controller: PlayerId,
            /// Board slot it occupied.
            position: usize,
        }
        TurnStart { player: PlayerId }
        TurnEnd { player: PlayerId }
        DivineShieldLost { entity: EntityId, source: Option<EntityId> }
        /// Damage actually dealt (after prevention and shields).
        DamageTaken { target: EntityId, source: Option<EntityId>, amount: i32 }
        /// Health actually restored.
        Healed { target: EntityId, source: Option<EntityId>, amount: i32 }
        MinionAttack { attacker: EntityId, defender: EntityId }
        HeroAttack { attacker: EntityId, defender: EntityId }
        AfterAttack { attacker: EntityId, defender: EntityId }
        CardDrawn { card: EntityId, player: PlayerId }
        MinionTransformed { entity: EntityId, from: CardId, to: CardId }
        /// The acting player did something the opponent's secrets may answer.
        SecretCheck { player: PlayerId, card: EntityId, target: Option<EntityId> }
        HeroPowerUsed { player: PlayerId, hero_power: EntityId, target: Option<EntityId> }
    }
    modifiers {
        CalculateAttack (entity) -> i32 { entity: EntityId }
        CalculateHealth (entity) -> i32 { entity: EntityId }
        CalculateCost (entity) -> i32 { entity: EntityId }
        /// Damage about to be dealt to `target`.
        CalculateDamage (target) -> i32 {
            target: EntityId,
            source: Option<EntityId>,
            /// Damage from a spell (spell damage applies).
            from_spell: bool,
        }
        /// Defender an attack resolves against; modifiers may redirect it.
        AttackTargeting (attacker) -> EntityId { attacker: EntityId, defender: EntityId }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:?})", self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_constants() {
        assert_eq!(MinionDied::KIND, EventKind::MinionDied);
        assert_eq!(CalculateAttack::KIND, EventKind::CalculateAttack);
        assert!(EventKind::CalculateCost.is_modifier());
        assert!(!EventKind::TurnEnd.is_modifier());
        assert_eq!(EventKind::ALL.len(), 22);
    }

    #[test]
    fn test_handler_round_trip() {
        let reaction: ReactionFn<TurnEnd> =
            Arc::new(|_: &mut Game, _: &TriggerContext, _: &TurnEnd| -> KernelResult<()> { Ok(()) });
        let handler = TurnEnd::into_handler(reaction);
        assert_eq!(handler.kind(), EventKind::TurnEnd);
        assert!(TurnEnd::reaction(&handler).is_some());
        assert!(TurnStart::reaction(&handler).is_none());
        assert!(CalculateAttack::modifier(&handler).is_none());
    }

    #[test]
    fn test_query_subject() {
        let q = AttackTargeting {
            attacker: EntityId(4),
            defender: EntityId(9),
        };
        assert_eq!(q.subject(), EntityId(4));
    }
}
